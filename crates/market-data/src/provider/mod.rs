//! Price report source abstraction and implementations.
//!
//! This module contains:
//! - The `PriceReportSource` trait the fetcher talks to
//! - The HTTP implementation for the Jakarta price report API
//!
//! Sources return the raw commodity list for one city and month. Sources
//! do not know about city names, normalization or pacing; those live in the
//! fetcher and aggregators so a fake source can stand in during tests.

mod traits;

pub mod info_pangan;

// Re-exports
pub use info_pangan::InfoPanganSource;
pub use traits::PriceReportSource;

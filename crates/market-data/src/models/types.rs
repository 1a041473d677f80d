use std::borrow::Cow;

/// Numeric city identifier used by the report API (`Id` query parameter).
pub type CityId = u32;

/// Human-readable city name - static for the known set, owned for placeholders
pub type CityName = Cow<'static, str>;

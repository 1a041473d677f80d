/// Coarse classification of a [`MarketDataError`](super::MarketDataError).
///
/// Used by run diagnostics to report why a city was skipped.
///
/// | Kind | Raised by | Effect on the run |
/// |------|-----------|-------------------|
/// | `Transport` | report source | City skipped for that month |
/// | `Decode` | report source | City skipped for that month |
/// | `Config` | configuration | Run aborted before fetching |
/// | `Export` | CSV export | Run finished, file not written |
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Network failure, timeout, rate limiting or non-2xx status.
    Transport,

    /// Malformed JSON or a response missing the expected keys.
    Decode,

    /// Unusable configuration value.
    Config,

    /// Failure writing or reading the export file.
    Export,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport => write!(f, "transport"),
            Self::Decode => write!(f, "decode"),
            Self::Config => write!(f, "config"),
            Self::Export => write!(f, "export"),
        }
    }
}

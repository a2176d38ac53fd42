use thiserror::Error;

/// Errors surfaced by the scanner library.
///
/// Initialization failures are fatal and map to exit code 1; per-file
/// failures are wrapped as `Io` and never cross file boundaries.
#[derive(Debug, Error)]
pub enum Error {
    /// Embedded reference data failed to decompress or parse.
    #[error("embedded reference data could not be loaded: {0}")]
    ResourceInit(String),

    /// A user-provided path, pattern file or option is unusable.
    #[error("{0}")]
    Config(String),

    /// A secret pattern failed to compile at load time.
    #[error("compilation of regex for pattern {name:?} failed: {source}")]
    PatternCompile {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

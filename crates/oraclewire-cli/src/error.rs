use oraclewire_core::{ConfigError, DecodeError, ErrorKind, HttpError, OracleError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0} [{code}]", code = .0.code())]
    Oracle(#[from] OracleError),

    #[error("http client setup failed: {0}")]
    HttpClient(#[from] HttpError),

    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("timestamp formatting failed: {0}")]
    Timestamp(#[from] time::error::Format),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Oracle(error) => match error.kind() {
                ErrorKind::MissingIdentifier
                | ErrorKind::MultiValueNotAllowed
                | ErrorKind::UnknownMetric => 2,
                ErrorKind::TransportError | ErrorKind::Timeout => 3,
                ErrorKind::ApiFailure | ErrorKind::NoData => 4,
                ErrorKind::InvalidShape
                | ErrorKind::ValueNotFound
                | ErrorKind::NonNumeric
                | ErrorKind::OutOfRange
                | ErrorKind::EmptyText => 5,
            },
            Self::HttpClient(_) => 3,
            Self::Decode(_) => 6,
            Self::Serialization(_) | Self::Timestamp(_) => 7,
            Self::Io(_) => 10,
        }
    }
}

use tonic::Status;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("`host` must not be empty")]
    InvalidHost,

    #[error("`port` must be in 1..=65535")]
    InvalidPort,

    #[error("`total_size` must be a positive integer")]
    InvalidTotalSize,

    #[error("`batch_size` must be a positive integer")]
    InvalidBatchSize,

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] tonic::transport::Error),

    #[error("failed to connect: {0}")]
    Connect(#[source] tonic::transport::Error),

    #[error("stream closed with error: {0}")]
    Stream(#[source] Status),

    #[error("malformed batch report: {0}")]
    MalformedReport(String),
}

impl Error {
    /// True when the failure is the caller's to fix: a request rejected by
    /// local validation or by the service.
    #[must_use]
    pub fn is_invalid_request(&self) -> bool {
        match self {
            Self::InvalidHost
            | Self::InvalidPort
            | Self::InvalidTotalSize
            | Self::InvalidBatchSize => true,
            Self::Stream(status) => status.code() == tonic::Code::InvalidArgument,
            _ => false,
        }
    }
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidHost
            | Error::InvalidPort
            | Error::InvalidTotalSize
            | Error::InvalidBatchSize => Status::invalid_argument(err.to_string()),
            Error::InvalidEndpoint(_) | Error::Connect(_) => Status::unavailable(err.to_string()),
            Error::Stream(status) => status,
            Error::MalformedReport(_) => Status::internal(err.to_string()),
        }
    }
}

use gtimer_proto::gtimer::TimerRequest;

use crate::error::{Error, Result};

/// A validated timing run description.
///
/// Checks happen once, before any downstream call is attempted; instances
/// are never mutated afterwards. Exactly one driver execution consumes each
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    target_host: String,
    target_port: u16,
    total_size: u32,
    batch_size: u32,
}

impl RunRequest {
    /// Largest size value the wire's int32 fields can carry.
    const MAX_SIZE: u32 = i32::MAX as u32;

    pub fn new(
        target_host: impl Into<String>,
        target_port: u16,
        total_size: u32,
        batch_size: u32,
    ) -> Result<Self> {
        let target_host = target_host.into();
        if target_host.is_empty() {
            return Err(Error::InvalidHost);
        }
        if target_port == 0 {
            return Err(Error::InvalidPort);
        }
        if total_size == 0 || total_size > Self::MAX_SIZE {
            return Err(Error::InvalidTotalSize);
        }
        if batch_size == 0 || batch_size > Self::MAX_SIZE {
            return Err(Error::InvalidBatchSize);
        }

        Ok(Self {
            target_host,
            target_port,
            total_size,
            batch_size,
        })
    }

    #[must_use]
    pub fn target_host(&self) -> &str {
        &self.target_host
    }

    #[must_use]
    pub fn target_port(&self) -> u16 {
        self.target_port
    }

    /// Total number of downstream calls to perform.
    #[must_use]
    pub fn total_size(&self) -> u32 {
        self.total_size
    }

    /// Number of calls per reported batch.
    #[must_use]
    pub fn batch_size(&self) -> u32 {
        self.batch_size
    }

    #[must_use]
    pub fn to_proto(&self) -> TimerRequest {
        TimerRequest {
            host: self.target_host.clone(),
            port: i32::from(self.target_port),
            total_size: self.total_size as i32,
            batch_size: self.batch_size as i32,
        }
    }
}

impl TryFrom<TimerRequest> for RunRequest {
    type Error = Error;

    fn try_from(req: TimerRequest) -> Result<Self> {
        let port = u16::try_from(req.port).map_err(|_| Error::InvalidPort)?;
        let total_size = u32::try_from(req.total_size).map_err(|_| Error::InvalidTotalSize)?;
        let batch_size = u32::try_from(req.batch_size).map_err(|_| Error::InvalidBatchSize)?;
        Self::new(req.host, port, total_size, batch_size)
    }
}

use gtimer_proto::gtimer::BatchResponse;

use crate::error::{Error, Result};

/// One aggregated batch result.
///
/// Produced at every batch boundary and never revised afterwards. The
/// sequence of reports for a run has strictly decreasing `remaining`, and
/// the final report always carries `remaining == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Downstream calls not yet attempted when this report was produced.
    pub remaining: u32,

    /// Calls included in this report. Equals the configured batch size for
    /// every batch except a final partial one.
    pub batch_count: u32,

    /// Wall-clock duration of this batch in milliseconds, measured from the
    /// first call after the previous report to the call that closed it.
    pub batch_time_millis: u64,

    /// Downstream call failures within this batch.
    pub err_count: u32,
}

impl BatchReport {
    /// Throughput over this batch in calls per millisecond.
    ///
    /// `None` when the batch completed in under a millisecond; callers
    /// decide how to render an unavailable rate.
    #[must_use]
    pub fn calls_per_milli(&self) -> Option<f64> {
        if self.batch_time_millis == 0 {
            return None;
        }
        Some(f64::from(self.batch_count) / self.batch_time_millis as f64)
    }

    /// Mean per-call latency over this batch in microseconds.
    ///
    /// `None` for an empty batch.
    #[must_use]
    pub fn micros_per_call(&self) -> Option<f64> {
        if self.batch_count == 0 {
            return None;
        }
        Some(self.batch_time_millis as f64 / f64::from(self.batch_count) * 1000.0)
    }

    #[must_use]
    pub fn to_proto(&self) -> BatchResponse {
        BatchResponse {
            remaining: self.remaining as i32,
            batch_count: self.batch_count as i32,
            batch_time_millis: self.batch_time_millis as i64,
            err_count: self.err_count as i32,
        }
    }
}

impl TryFrom<BatchResponse> for BatchReport {
    type Error = Error;

    fn try_from(resp: BatchResponse) -> Result<Self> {
        let remaining = u32::try_from(resp.remaining)
            .map_err(|_| Error::MalformedReport(format!("negative remaining {}", resp.remaining)))?;
        let batch_count = u32::try_from(resp.batch_count).map_err(|_| {
            Error::MalformedReport(format!("negative batch_count {}", resp.batch_count))
        })?;
        let batch_time_millis = u64::try_from(resp.batch_time_millis).map_err(|_| {
            Error::MalformedReport(format!(
                "negative batch_time_millis {}",
                resp.batch_time_millis
            ))
        })?;
        let err_count = u32::try_from(resp.err_count)
            .map_err(|_| Error::MalformedReport(format!("negative err_count {}", resp.err_count)))?;

        if err_count > batch_count {
            return Err(Error::MalformedReport(format!(
                "err_count {err_count} exceeds batch_count {batch_count}"
            )));
        }

        Ok(Self {
            remaining,
            batch_count,
            batch_time_millis,
            err_count,
        })
    }
}

use std::time::Instant;

use tokio::sync::mpsc;
use tonic::Status;
use tracing::warn;

use gtimer_proto::gtimer::BatchResponse;

use crate::greeter::Greeter;
use crate::report::BatchReport;
use crate::request::RunRequest;

/// Why the batch loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveOutcome {
    /// Every requested call was attempted and every report was delivered.
    Completed,

    /// The consumer went away before the run finished; no further
    /// downstream calls were issued.
    Cancelled,
}

/// Drives one timing run: strictly sequential greetings, one report pushed
/// into `tx` per full batch, plus a trailing report when the final batch is
/// partial.
///
/// Per-call failures are counted into the current batch's `err_count` and
/// consume one unit of the total exactly like a success. A closed `tx`
/// means the consumer dropped the stream; the loop stops without issuing
/// further calls.
pub async fn drive<G: Greeter>(
    request: &RunRequest,
    greeter: &mut G,
    tx: &mpsc::Sender<Result<BatchResponse, Status>>,
) -> DriveOutcome {
    let mut remaining = request.total_size();
    let mut batch_count: u32 = 0;
    let mut err_count: u32 = 0;
    let mut batch_start = Instant::now();

    while remaining > 0 {
        // A cancelled stream must not grind through the rest of the run.
        if tx.is_closed() {
            return DriveOutcome::Cancelled;
        }

        remaining -= 1;
        if let Err(status) = greeter.greet(&format!("#{remaining}")).await {
            err_count += 1;
            warn!(%status, remaining, "greeting call failed");
        }

        batch_count += 1;
        if batch_count == request.batch_size() {
            let report = BatchReport {
                remaining,
                batch_count,
                batch_time_millis: millis_since(batch_start),
                err_count,
            };
            if tx.send(Ok(report.to_proto())).await.is_err() {
                return DriveOutcome::Cancelled;
            }

            batch_count = 0;
            err_count = 0;
            // The next batch is timed from after the report was handed to
            // the stream; backpressure on `tx` is not charged to it.
            batch_start = Instant::now();
        }
    }

    // A final partial batch. Skipped when the total is an exact multiple of
    // the batch size: the last full batch was already reported above.
    if batch_count > 0 {
        let report = BatchReport {
            remaining,
            batch_count,
            batch_time_millis: millis_since(batch_start),
            err_count,
        };
        if tx.send(Ok(report.to_proto())).await.is_err() {
            return DriveOutcome::Cancelled;
        }
    }

    DriveOutcome::Completed
}

fn millis_since(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

use std::sync::Arc;
use std::time::Duration;

use tonic::transport::Endpoint;
use tracing::{debug, info, warn};

use gtimer_proto::gtimer::greeter_timer_client::GreeterTimerClient;

use crate::error::{Error, Result};
use crate::report::BatchReport;
use crate::request::RunRequest;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Callback invoked for every received batch report, in arrival order.
pub type ReportFn = Arc<dyn Fn(&BatchReport) + Send + Sync + 'static>;

/// Client-side accumulation over one run's report stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub reports: u64,
    pub calls: u64,
    pub errors: u64,
    pub reported_millis: u64,
}

/// Submits `request` to the timer service at `target` and waits until the
/// stream terminates.
///
/// Reports are handed to `on_report` in the order they were produced.
/// Returns the accumulated totals on a normal close, or [`Error::Stream`]
/// when the service ends the run with an error. Either way the wait always
/// ends: a stream with zero reports still delivers exactly one terminal
/// signal.
pub async fn submit(
    target: &str,
    request: &RunRequest,
    on_report: Option<ReportFn>,
) -> Result<RunTotals> {
    let uri = if target.contains("://") {
        target.to_string()
    } else {
        format!("http://{target}")
    };
    let endpoint = Endpoint::from_shared(uri)?
        .tcp_nodelay(true)
        .connect_timeout(CONNECT_TIMEOUT);
    let channel = endpoint.connect().await.map_err(Error::Connect)?;
    let mut client = GreeterTimerClient::new(channel);

    let mut stream = client
        .time_greetings(request.to_proto())
        .await
        .map_err(Error::Stream)?
        .into_inner();

    let mut totals = RunTotals::default();
    loop {
        match stream.message().await {
            Ok(Some(resp)) => {
                let report = BatchReport::try_from(resp)?;
                debug!(
                    batch_count = report.batch_count,
                    err_count = report.err_count,
                    remaining = report.remaining,
                    batch_time_millis = report.batch_time_millis,
                    calls_per_milli = report.calls_per_milli().unwrap_or(0.0),
                    micros_per_call = report.micros_per_call().unwrap_or(0.0),
                    "batch report"
                );

                totals.reports += 1;
                totals.calls += u64::from(report.batch_count);
                totals.errors += u64::from(report.err_count);
                totals.reported_millis += report.batch_time_millis;

                if let Some(on_report) = &on_report {
                    on_report(&report);
                }
            }
            Ok(None) => {
                info!(
                    reports = totals.reports,
                    calls = totals.calls,
                    errors = totals.errors,
                    "timer run complete"
                );
                return Ok(totals);
            }
            Err(status) => {
                warn!(%status, "timer run failed");
                return Err(Error::Stream(status));
            }
        }
    }
}

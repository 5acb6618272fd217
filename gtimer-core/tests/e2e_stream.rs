use std::sync::{Arc, Mutex};

use gtimer_core::{BatchReport, Error, RunRequest, TimerServer, submit};
use gtimer_testserver::GreeterTestServer;

use gtimer_proto::gtimer::TimerRequest;
use gtimer_proto::gtimer::greeter_timer_client::GreeterTimerClient;
use tonic::Code;
use tonic::transport::Endpoint;

async fn start_timer() -> anyhow::Result<TimerServer> {
    Ok(TimerServer::start("127.0.0.1:0".parse()?).await?)
}

fn collecting_report_fn() -> (gtimer_core::ReportFn, Arc<Mutex<Vec<BatchReport>>>) {
    let reports: Arc<Mutex<Vec<BatchReport>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = reports.clone();
    let on_report: gtimer_core::ReportFn = Arc::new(move |report: &BatchReport| {
        let mut sink = sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        sink.push(*report);
    });
    (on_report, reports)
}

fn collected(reports: &Arc<Mutex<Vec<BatchReport>>>) -> Vec<BatchReport> {
    reports
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

#[tokio::test(flavor = "multi_thread")]
async fn e2e_full_run_streams_ordered_reports() -> anyhow::Result<()> {
    let greeter = GreeterTestServer::start().await?;
    let timer = start_timer().await?;

    let request = RunRequest::new(greeter.host(), greeter.port(), 10, 3)?;
    let (on_report, reports) = collecting_report_fn();

    let totals = submit(&timer.target(), &request, Some(on_report)).await?;

    let reports = collected(&reports);
    let counts: Vec<u32> = reports.iter().map(|r| r.batch_count).collect();
    let remaining: Vec<u32> = reports.iter().map(|r| r.remaining).collect();
    assert_eq!(counts, [3, 3, 3, 1]);
    assert_eq!(remaining, [7, 4, 1, 0]);
    assert!(reports.iter().all(|r| r.err_count == 0));

    assert_eq!(totals.reports, 4);
    assert_eq!(totals.calls, 10);
    assert_eq!(totals.errors, 0);
    assert_eq!(greeter.stats().greetings_total(), 10);

    timer.shutdown().await;
    greeter.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn e2e_injected_failures_are_counted_per_batch() -> anyhow::Result<()> {
    let greeter = GreeterTestServer::start_failing_every(4).await?;
    let timer = start_timer().await?;

    let request = RunRequest::new(greeter.host(), greeter.port(), 8, 4)?;
    let (on_report, reports) = collecting_report_fn();

    let totals = submit(&timer.target(), &request, Some(on_report)).await?;

    let reports = collected(&reports);
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.batch_count == 4));
    assert_eq!(
        reports.iter().map(|r| r.err_count).collect::<Vec<_>>(),
        [1, 1]
    );
    assert_eq!(totals.errors, 2);
    assert_eq!(greeter.stats().failures_injected(), 2);

    timer.shutdown().await;
    greeter.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn e2e_invalid_wire_request_is_rejected_with_no_reports() -> anyhow::Result<()> {
    let greeter = GreeterTestServer::start().await?;
    let timer = start_timer().await?;

    let channel = Endpoint::from_shared(format!("http://{}", timer.target()))?
        .connect()
        .await?;
    let mut client = GreeterTimerClient::new(channel);

    let wire = TimerRequest {
        host: greeter.host(),
        port: i32::from(greeter.port()),
        total_size: 0,
        batch_size: 1,
    };

    match client.time_greetings(wire).await {
        Err(status) => assert_eq!(status.code(), Code::InvalidArgument),
        Ok(response) => {
            // Some transports surface the rejection on the first read.
            match response.into_inner().message().await {
                Err(status) => assert_eq!(status.code(), Code::InvalidArgument),
                Ok(item) => panic!("expected a validation rejection, got {item:?}"),
            }
        }
    }
    assert_eq!(greeter.stats().greetings_total(), 0);

    timer.shutdown().await;
    greeter.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn e2e_unreachable_downstream_is_a_terminal_stream_error() -> anyhow::Result<()> {
    // Grab a free port, then close it so nothing listens there.
    let closed = GreeterTestServer::start().await?;
    let port = closed.port();
    closed.shutdown().await;

    let timer = start_timer().await?;

    let request = RunRequest::new("127.0.0.1", port, 10, 3)?;
    let (on_report, reports) = collecting_report_fn();

    match submit(&timer.target(), &request, Some(on_report)).await {
        Err(Error::Stream(status)) => assert_eq!(status.code(), Code::Unavailable),
        Err(err) => panic!("expected a stream error, got {err}"),
        Ok(totals) => panic!("expected a terminal error, got totals {totals:?}"),
    }
    assert!(collected(&reports).is_empty());

    timer.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn e2e_short_run_still_terminates_with_one_partial_report() -> anyhow::Result<()> {
    // total < batch: the only report is the final partial one, and the
    // consumer's wait still ends in a normal close.
    let greeter = GreeterTestServer::start().await?;
    let timer = start_timer().await?;

    let request = RunRequest::new(greeter.host(), greeter.port(), 2, 100)?;
    let (on_report, reports) = collecting_report_fn();

    let totals = submit(&timer.target(), &request, Some(on_report)).await?;

    let reports = collected(&reports);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].batch_count, 2);
    assert_eq!(reports[0].remaining, 0);
    assert_eq!(totals.calls, 2);

    timer.shutdown().await;
    greeter.shutdown().await;
    Ok(())
}

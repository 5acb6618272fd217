use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status};
use tracing::{error, info};

use gtimer_proto::gtimer::greeter_timer_server::GreeterTimer;
use gtimer_proto::gtimer::{BatchResponse, TimerRequest};

use crate::driver::{DriveOutcome, drive};
use crate::greeter::GreeterChannel;
use crate::request::RunRequest;

/// Streaming timer service: one driver task per accepted run.
///
/// Runs share no state; each task owns its request, its downstream channel
/// and its report sender exclusively.
#[derive(Debug, Default)]
pub struct GreeterTimerService;

#[tonic::async_trait]
impl GreeterTimer for GreeterTimerService {
    type TimeGreetingsStream = ReceiverStream<Result<BatchResponse, Status>>;

    async fn time_greetings(
        &self,
        request: Request<TimerRequest>,
    ) -> Result<Response<Self::TimeGreetingsStream>, Status> {
        // Fail fast: an invalid request produces no stream and no
        // downstream work.
        let run = RunRequest::try_from(request.into_inner()).map_err(Status::from)?;
        info!(
            host = run.target_host(),
            port = run.target_port(),
            total_size = run.total_size(),
            batch_size = run.batch_size(),
            "timer run accepted"
        );

        let (tx, rx) = mpsc::channel(4);
        tokio::spawn(async move {
            match GreeterChannel::connect(run.target_host(), run.target_port()).await {
                Ok(mut greeter) => match drive(&run, &mut greeter, &tx).await {
                    DriveOutcome::Completed => info!("timer run complete"),
                    DriveOutcome::Cancelled => info!("timer run cancelled by consumer"),
                },
                Err(err) => {
                    error!(%err, "downstream connection failed");
                    let _ = tx.send(Err(Status::from(err))).await;
                }
            }
            // The downstream channel drops here on every path.
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}

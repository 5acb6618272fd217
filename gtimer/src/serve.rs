use tracing::info;

use crate::cli::ServeArgs;
use crate::run_error::RunError;

pub async fn serve(args: ServeArgs) -> Result<(), RunError> {
    if args.bind.port() == 0 {
        return Err(RunError::InvalidInput(anyhow::anyhow!(
            "listening port must be non-zero (got {})",
            args.bind
        )));
    }

    let server = gtimer_core::TimerServer::start(args.bind).await.map_err(|e| {
        RunError::RuntimeError(
            anyhow::Error::new(e).context(format!("failed to bind timer service on {}", args.bind)),
        )
    })?;

    // Ready line for scripts; diagnostics go through tracing.
    println!("TIMER_URL={}", server.target());
    info!(addr = %server.addr(), "timer service listening");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| RunError::RuntimeError(anyhow::Error::new(e).context("signal wait failed")))?;

    info!("timer service stopping");
    server.shutdown().await;
    Ok(())
}

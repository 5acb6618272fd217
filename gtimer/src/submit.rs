use crate::cli::SubmitArgs;
use crate::output;
use crate::run_error::RunError;

pub async fn submit(args: SubmitArgs) -> Result<(), RunError> {
    let request = gtimer_core::RunRequest::new(
        args.greeter_host.clone(),
        args.greeter_port,
        args.total,
        args.batch,
    )
    .map_err(|e| RunError::InvalidInput(e.into()))?;

    let out = output::formatter(args.output);
    let target = format!("{}:{}", args.timer_host, args.timer_port);

    let totals = gtimer_core::submit(&target, &request, Some(out.report_fn()))
        .await
        .map_err(|e| {
            if e.is_invalid_request() {
                RunError::InvalidInput(e.into())
            } else {
                RunError::RuntimeError(e.into())
            }
        })?;

    out.print_totals(&totals).map_err(RunError::RuntimeError)?;
    Ok(())
}

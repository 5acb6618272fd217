use crate::cli::OutputFormat;

mod human;
mod json;

pub(crate) trait OutputFormatter: Send + Sync {
    /// Callback handed to the stream consumer; invoked once per report.
    fn report_fn(&self) -> gtimer_core::ReportFn;

    fn print_totals(&self, totals: &gtimer_core::RunTotals) -> anyhow::Result<()>;
}

pub(crate) fn formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::HumanReadable => Box::new(human::HumanReadableOutput),
        OutputFormat::Json => Box::new(json::JsonOutput),
    }
}

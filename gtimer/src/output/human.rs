use std::sync::Arc;

use super::OutputFormatter;

pub(crate) struct HumanReadableOutput;

impl OutputFormatter for HumanReadableOutput {
    fn report_fn(&self) -> gtimer_core::ReportFn {
        Arc::new(|report: &gtimer_core::BatchReport| println!("{}", format_report(report)))
    }

    fn print_totals(&self, totals: &gtimer_core::RunTotals) -> anyhow::Result<()> {
        println!(
            "done: {} calls + {} errors across {} reports in {}ms",
            totals.calls, totals.errors, totals.reports, totals.reported_millis
        );
        Ok(())
    }
}

fn format_report(report: &gtimer_core::BatchReport) -> String {
    let rate = report
        .calls_per_milli()
        .map_or_else(|| "n/a".to_string(), |v| format!("{v:.1} calls/ms"));
    let per_call = report
        .micros_per_call()
        .map_or_else(|| "n/a".to_string(), |v| format!("~{v:.0}\u{b5}s per call"));

    format!(
        "{} greetings + {} errors in {}ms ({rate}, {per_call}), {} more to go",
        report.batch_count, report.err_count, report.batch_time_millis, report.remaining
    )
}

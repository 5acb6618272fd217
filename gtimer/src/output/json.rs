use serde::Serialize;
use std::io::Write as _;
use std::sync::Arc;

use super::OutputFormatter;

pub(crate) struct JsonOutput;

#[derive(Debug, Serialize)]
struct JsonReportLine {
    kind: &'static str,
    batch_count: u32,
    err_count: u32,
    remaining: u32,
    batch_time_millis: u64,
    calls_per_milli: Option<f64>,
    micros_per_call: Option<f64>,
}

#[derive(Debug, Serialize)]
struct JsonSummaryLine {
    kind: &'static str,
    reports: u64,
    calls: u64,
    errors: u64,
    reported_millis: u64,
}

impl OutputFormatter for JsonOutput {
    fn report_fn(&self) -> gtimer_core::ReportFn {
        Arc::new(|report: &gtimer_core::BatchReport| {
            emit_json_line(&JsonReportLine {
                kind: "report",
                batch_count: report.batch_count,
                err_count: report.err_count,
                remaining: report.remaining,
                batch_time_millis: report.batch_time_millis,
                calls_per_milli: report.calls_per_milli(),
                micros_per_call: report.micros_per_call(),
            });
        })
    }

    fn print_totals(&self, totals: &gtimer_core::RunTotals) -> anyhow::Result<()> {
        emit_json_line(&JsonSummaryLine {
            kind: "summary",
            reports: totals.reports,
            calls: totals.calls,
            errors: totals.errors,
            reported_millis: totals.reported_millis,
        });
        Ok(())
    }
}

fn emit_json_line<T: Serialize>(line: &T) {
    let mut out = std::io::stdout().lock();
    if serde_json::to_writer(&mut out, line).is_ok() {
        let _ = writeln!(out);
    }
}

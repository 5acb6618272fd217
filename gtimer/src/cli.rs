use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report lines.
    HumanReadable,
    /// Emit JSON report lines (NDJSON) to stdout.
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "gtimer",
    author,
    version,
    about = "Streaming greeting-timer load harness",
    long_about = "gtimer times batches of greeting calls against a Greeter service and streams one aggregated report per batch.\n\n`gtimer serve` runs the GreeterTimer service. `gtimer submit` asks a running timer service to drive a load run against a downstream Greeter and logs every batch report as it arrives, until the stream closes or fails.",
    after_help = "Examples:\n  gtimer serve --bind 127.0.0.1:50053\n  gtimer submit --greeter-host localhost --greeter-port 50051\n  gtimer submit --total 10000 --batch 1000 --output json"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the GreeterTimer streaming service
    Serve(ServeArgs),

    /// Submit a timing run and stream its batch reports
    Submit(SubmitArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listening address for the timer service (port must be non-zero)
    #[arg(long, default_value = "127.0.0.1:50053")]
    pub bind: SocketAddr,
}

#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Hostname where the timer service is running
    #[arg(long, default_value = "localhost")]
    pub timer_host: String,

    /// Port where the timer service is running
    #[arg(long, default_value_t = 50053, value_parser = clap::value_parser!(u16).range(1..))]
    pub timer_port: u16,

    /// Hostname where the greeting service under test is running
    #[arg(long, default_value = "localhost")]
    pub greeter_host: String,

    /// Port where the greeting service under test is running
    #[arg(long, default_value_t = 50051, value_parser = clap::value_parser!(u16).range(1..))]
    pub greeter_port: u16,

    /// Total number of greeting calls to perform
    #[arg(long, default_value_t = 10_000, value_parser = clap::value_parser!(u32).range(1..))]
    pub total: u32,

    /// Number of calls per reported batch
    #[arg(long, default_value_t = 1_000, value_parser = clap::value_parser!(u32).range(1..))]
    pub batch: u32,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::HumanReadable)]
    pub output: OutputFormat,
}

//! Core protocol for gtimer, a streaming gRPC load-timing harness.
//!
//! A timer run drives a fixed number of strictly sequential greeting calls
//! against a downstream Greeter and reports aggregated statistics once per
//! batch over a server-streaming RPC. The pieces:
//!
//! - [`RunRequest`] / [`BatchReport`] — the validated run description and
//!   the per-batch result;
//! - [`drive`] — the batching/timing loop behind the service;
//! - [`GreeterTimerService`] / [`TimerServer`] — the tonic service and its
//!   bind/serve/shutdown lifecycle;
//! - [`submit`] — the consumer that waits for a run's terminal signal.

mod consumer;
mod driver;
mod error;
mod greeter;
mod report;
mod request;
mod server;
mod service;

pub use consumer::{ReportFn, RunTotals, submit};
pub use driver::{DriveOutcome, drive};
pub use error::{Error, Result};
pub use greeter::{Greeter, GreeterChannel};
pub use report::BatchReport;
pub use request::RunRequest;
pub use server::TimerServer;
pub use service::GreeterTimerService;

//! In-process downstream Greeter for exercising gtimer runs.
//!
//! Binds port 0 by default so tests can run many servers concurrently, and
//! can inject a failure on every Nth greeting to exercise the driver's
//! error counting.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{Request, Response, Status};

use gtimer_proto::greeting::greeter_server::{Greeter, GreeterServer};
use gtimer_proto::greeting::{GreetingReply, GreetingRequest};

/// Counters shared between the running server and the test body.
#[derive(Debug, Clone, Default)]
pub struct GreeterStats {
    greetings_total: Arc<AtomicU64>,
    failures_injected: Arc<AtomicU64>,
}

impl GreeterStats {
    pub fn greetings_total(&self) -> u64 {
        self.greetings_total.load(Ordering::Relaxed)
    }

    pub fn failures_injected(&self) -> u64 {
        self.failures_injected.load(Ordering::Relaxed)
    }
}

#[derive(Debug)]
struct GreeterSvc {
    stats: GreeterStats,
    fail_every: Option<u64>,
}

#[tonic::async_trait]
impl Greeter for GreeterSvc {
    async fn say_greeting(
        &self,
        request: Request<GreetingRequest>,
    ) -> Result<Response<GreetingReply>, Status> {
        let n = self.stats.greetings_total.fetch_add(1, Ordering::Relaxed) + 1;

        if let Some(every) = self.fail_every
            && n.is_multiple_of(every)
        {
            self.stats.failures_injected.fetch_add(1, Ordering::Relaxed);
            return Err(Status::unavailable("injected greeting failure"));
        }

        let name = request.into_inner().name;
        Ok(Response::new(GreetingReply {
            message: format!("hello, {name}"),
        }))
    }
}

pub struct GreeterTestServer {
    addr: SocketAddr,
    stats: GreeterStats,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl GreeterTestServer {
    /// Starts a Greeter that answers every call.
    pub async fn start() -> std::io::Result<Self> {
        Self::start_on("127.0.0.1:0".parse().map_err(invalid_addr)?, None).await
    }

    /// Starts a Greeter that fails every `every`th call with `UNAVAILABLE`.
    pub async fn start_failing_every(every: u64) -> std::io::Result<Self> {
        Self::start_on("127.0.0.1:0".parse().map_err(invalid_addr)?, Some(every)).await
    }

    pub async fn start_on(addr: SocketAddr, fail_every: Option<u64>) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;

        let stats = GreeterStats::default();
        let svc = GreeterServer::new(GreeterSvc {
            stats: stats.clone(),
            fail_every,
        });

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let incoming = TcpListenerStream::new(listener);

            let server = tonic::transport::Server::builder()
                .add_service(svc)
                .serve_with_incoming_shutdown(incoming, async move {
                    let _ = shutdown_rx.await;
                });

            let _ = server.await;
        });

        Ok(Self {
            addr,
            stats,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn target(&self) -> String {
        format!("{}:{}", self.addr.ip(), self.addr.port())
    }

    pub fn stats(&self) -> &GreeterStats {
        &self.stats
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for GreeterTestServer {
    fn drop(&mut self) {
        if self.shutdown_tx.is_some()
            && let Some(task) = self.task.take()
        {
            task.abort();
        }
    }
}

fn invalid_addr(err: std::net::AddrParseError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
}

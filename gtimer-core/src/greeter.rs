use std::time::Duration;

use tonic::Status;
use tonic::transport::{Channel, Endpoint};

use gtimer_proto::greeting::GreetingRequest;
use gtimer_proto::greeting::greeter_client::GreeterClient;

use crate::error::{Error, Result};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// The downstream seam the driver issues calls through.
///
/// One greeting per call; a non-OK status is a normal per-call outcome that
/// the driver counts without aborting the run.
#[tonic::async_trait]
pub trait Greeter: Send {
    async fn greet(&mut self, name: &str) -> std::result::Result<(), Status>;
}

/// Greeter backed by a dedicated tonic channel.
///
/// Each run owns exactly one; dropping it releases the connection on every
/// exit path.
#[derive(Debug)]
pub struct GreeterChannel {
    client: GreeterClient<Channel>,
}

impl GreeterChannel {
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let endpoint = Endpoint::from_shared(format!("http://{host}:{port}"))?
            .tcp_nodelay(true)
            .connect_timeout(CONNECT_TIMEOUT);
        let channel = endpoint.connect().await.map_err(Error::Connect)?;

        Ok(Self {
            client: GreeterClient::new(channel),
        })
    }
}

#[tonic::async_trait]
impl Greeter for GreeterChannel {
    async fn greet(&mut self, name: &str) -> std::result::Result<(), Status> {
        self.client
            .say_greeting(GreetingRequest {
                name: name.to_string(),
            })
            .await
            .map(|_| ())
    }
}

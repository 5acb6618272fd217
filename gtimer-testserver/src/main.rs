use std::net::SocketAddr;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut bind_addr: SocketAddr = "127.0.0.1:0".parse()?;
    let mut fail_every: Option<u64> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--bind" => {
                let addr = args.next().ok_or_else(|| {
                    anyhow::anyhow!("--bind requires an address, e.g. 127.0.0.1:0")
                })?;
                bind_addr = addr.parse()?;
            }
            "--fail-every" => {
                let n = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--fail-every requires a positive integer"))?;
                let n: u64 = n.parse()?;
                if n == 0 {
                    return Err(anyhow::anyhow!("--fail-every requires a positive integer"));
                }
                fail_every = Some(n);
            }
            "-h" | "--help" => {
                eprintln!(
                    "gtimer-testserver\n\nUSAGE:\n  gtimer-testserver [--bind 127.0.0.1:0] [--fail-every N]\n\nOUTPUT:\n  Prints GREETER_URL=<host:port> to stdout once ready."
                );
                return Ok(());
            }
            other => {
                return Err(anyhow::anyhow!("unknown argument: {other}"));
            }
        }
    }

    let greeter = gtimer_testserver::GreeterTestServer::start_on(bind_addr, fail_every).await?;
    println!("GREETER_URL={}", greeter.target());

    let _ = tokio::signal::ctrl_c().await;
    greeter.shutdown().await;
    Ok(())
}

use std::sync::Arc;

use clap::Parser;
use trapdoor::InvocationBridge;
use trapdoor_gateway::{demo_registry, init_tracing, router};

#[derive(Parser, Debug)]
#[command(
    name = "trapdoor-gateway",
    about = "HTTP gateway exposing the trapdoor invocation bridge"
)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "TRAPDOOR_ADDR", default_value = "127.0.0.1:9119")]
    addr: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing().map_err(|e| anyhow::anyhow!(e))?;

    let args = Args::parse();
    let bridge = Arc::new(InvocationBridge::new(Arc::new(demo_registry())));

    tracing::info!(addr = %args.addr, components = ?bridge.identifiers(), "trapdoor gateway listening");
    let listener = tokio::net::TcpListener::bind(&args.addr).await?;
    axum::serve(listener, router(bridge)).await?;
    Ok(())
}

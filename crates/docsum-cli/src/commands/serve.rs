use std::net::SocketAddr;

use anyhow::Result;
use tracing::info;

use docsum_core::AppConfig;
use docsum_web::Server;

pub async fn run(mut config: AppConfig, bind: Option<SocketAddr>) -> Result<()> {
    if let Some(addr) = bind {
        config.server.bind_address = addr;
    }

    let server = Server::new(config).await?;
    println!("Document Summary Generator");
    println!("  Listening on: http://{}", server.bind_address());
    println!("  Archive storage: {}", server.state().storage_backend());
    println!("Press Ctrl-C to stop.");

    server
        .run(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Received shutdown signal");
        })
        .await?;

    println!("Server stopped.");
    Ok(())
}

use anyhow::{bail, Result};

use docsum_core::storage::build_store;
use docsum_core::AppConfig;

pub async fn check(config: &AppConfig) -> Result<()> {
    let Some(store) = build_store(config).await else {
        println!("Archive storage is disabled.");
        return Ok(());
    };

    println!("Checking {} ({})...", store.location(), store.backend());
    match store.check().await {
        Ok(()) => {
            println!("Archive storage is reachable.");
            Ok(())
        }
        Err(e) => bail!("Archive storage check failed: {}", e),
    }
}

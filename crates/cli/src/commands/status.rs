use anyhow::Result;
use migrun_core::{DatabaseConfig, MigratorConfig};

use super::open_migrator;

pub(crate) async fn run(db: &DatabaseConfig, config: MigratorConfig) -> Result<()> {
    let migrator = open_migrator(db, config).await?;
    let status = migrator.status().await?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

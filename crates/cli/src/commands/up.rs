use anyhow::Result;
use migrun_core::{DatabaseConfig, MigratorConfig};

use super::open_migrator;

pub(crate) async fn run(db: &DatabaseConfig, config: MigratorConfig) -> Result<()> {
    let migrator = open_migrator(db, config).await?;
    let report = migrator.run().await?;

    match report.batch {
        Some(batch) => {
            println!("Applied {} migration(s) in batch {batch}:", report.applied.len());
            for name in &report.applied {
                println!("  {name}");
            }
        },
        None => println!(
            "Nothing to migrate ({} discovered, {} already applied)",
            report.discovered, report.already_applied
        ),
    }
    Ok(())
}

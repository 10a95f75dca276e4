//! Stats command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_stats(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let counts = store.catalog_counts().await?;

    println!("Catalog");
    println!("{:-<30}", "");
    println!("  Total items : {}", counts.total_movies);
    println!("  Films       : {}", counts.films);
    println!("  Series      : {}", counts.series);
    println!("  Users       : {}", counts.users);

    Ok(())
}

//! Loads content ids into the staging table from a plain text file.

use std::path::Path;

use sqlx::PgPool;

pub(crate) async fn run_stage(pool: &PgPool, ids_file: &Path) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(ids_file)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", ids_file.display()))?;

    let ids: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect();

    if ids.is_empty() {
        anyhow::bail!("{} contains no content ids", ids_file.display());
    }

    movielake_db::insert_staged_content_ids(pool, &ids).await?;
    println!("staged {} content ids", ids.len());
    Ok(())
}

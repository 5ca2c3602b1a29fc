use std::env;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;

use coffre_backend::db::cleanup::{
    cleanup_hard_deleted, cleanup_soft_deleted, PERMISSIONS_RESOURCE, PERMISSIONS_USER,
};

/// Removes permission rows left behind by deleted resources and users.
/// Pass `--dry-run` to report counts without touching anything.
#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let dry_run = env::args().any(|arg| arg == "--dry-run");

    let database_url =
        env::var("DATABASE_URL").context("DATABASE_URL is required to run cleanup")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to DATABASE_URL")?;

    let mut total = 0u64;

    let count = cleanup_soft_deleted(&pool, &PERMISSIONS_RESOURCE, dry_run, None)
        .await
        .context("failed to clean permissions of soft-deleted resources")?;
    report("permissions -> soft-deleted resources", count, dry_run);
    total += count;

    let count = cleanup_hard_deleted(&pool, &PERMISSIONS_RESOURCE, dry_run, None)
        .await
        .context("failed to clean permissions of missing resources")?;
    report("permissions -> missing resources", count, dry_run);
    total += count;

    let count = cleanup_soft_deleted(&pool, &PERMISSIONS_USER, dry_run, None)
        .await
        .context("failed to clean permissions of soft-deleted users")?;
    report("permissions -> soft-deleted users", count, dry_run);
    total += count;

    let count = cleanup_hard_deleted(&pool, &PERMISSIONS_USER, dry_run, None)
        .await
        .context("failed to clean permissions of missing users")?;
    report("permissions -> missing users", count, dry_run);
    total += count;

    if dry_run {
        println!("Dry run complete: {total} orphan rows found");
    } else {
        println!("Cleanup complete: {total} orphan rows deleted");
    }

    Ok(())
}

fn report(label: &str, count: u64, dry_run: bool) {
    if dry_run {
        println!("{label}: {count} rows would be deleted");
    } else {
        println!("{label}: {count} rows deleted");
    }
}

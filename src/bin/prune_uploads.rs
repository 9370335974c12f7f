//! Script to remove orphaned files from the upload directory.

use dotenvy::dotenv;
use founder_onboarding_api::db_storage::OnboardingStorage;
use sqlx::postgres::PgPoolOptions;
use std::collections::HashSet;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Files younger than this may belong to an upload still in flight.
const MIN_AGE: Duration = Duration::from_secs(60 * 60);

/// Main entry point for the prune script.
///
/// Deletes files in `UPLOAD_DIR` that no document row references, typically left
/// behind by uploads aborted between the disk write and the database insert.
/// Pass `--dry-run` to only list them.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let dry_run = env::args().any(|a| a == "--dry-run");

    let database_url = env::var("DATABASE_URL")
        .or_else(|_| env::var("DB_URL"))
        .map_err(|_| "DATABASE_URL or DB_URL must be set")?;
    let upload_dir = env::var("UPLOAD_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("uploads"));

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await?;

    tracing::info!(
        "Connected to database. Scanning {} for orphaned uploads...",
        upload_dir.display()
    );

    let storage = OnboardingStorage::new(pool);
    let referenced = referenced_names(&storage.all_document_paths().await?);

    let mut entries = match tokio::fs::read_dir(&upload_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("Upload directory does not exist, nothing to prune");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let now = SystemTime::now();
    let mut removed = 0usize;
    let mut kept = 0usize;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }

        if referenced.contains(&entry.file_name()) {
            kept += 1;
            continue;
        }

        let age = metadata
            .modified()
            .ok()
            .and_then(|m| now.duration_since(m).ok())
            .unwrap_or_default();
        if age < MIN_AGE {
            tracing::debug!("Skipping recent file {}", path.display());
            continue;
        }

        if dry_run {
            tracing::info!("Would remove orphan {}", path.display());
        } else {
            tokio::fs::remove_file(&path).await?;
            tracing::info!("Removed orphan {}", path.display());
        }
        removed += 1;
    }

    tracing::info!(
        "Prune complete. {} orphan(s) {}, {} referenced file(s) kept.",
        removed,
        if dry_run { "found" } else { "removed" },
        kept
    );

    Ok(())
}

/// File names of every stored document.
///
/// Stored names are unique within the upload dir, so matching on the last
/// component holds however the server and this script spell `UPLOAD_DIR`.
fn referenced_names(paths: &[String]) -> HashSet<OsString> {
    paths
        .iter()
        .filter_map(|p| Path::new(p).file_name().map(|n| n.to_os_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referenced_names_ignore_directory_spelling() {
        let names = referenced_names(&[
            "uploads/1717200000000-deck.pdf".to_string(),
            "/srv/app/uploads/1717200000001-model.xlsx".to_string(),
        ]);

        let relative = PathBuf::from("./uploads/1717200000000-deck.pdf");
        let absolute = PathBuf::from("/var/data/uploads/1717200000001-model.xlsx");
        assert!(names.contains(relative.file_name().unwrap()));
        assert!(names.contains(absolute.file_name().unwrap()));
        assert!(!names.contains(std::ffi::OsStr::new("1717200000002-orphan.pdf")));
    }
}

//! Mission file export to the configured directory.

use std::path::{Path, PathBuf};

use thiserror::Error;
use wpgen_core::mission_file_name;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create export directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write mission file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Write `INAV_<user_id>.mission`, replacing any earlier file for that user.
pub async fn write_mission_file(
    dir: &Path,
    user_id: i64,
    xml: &str,
) -> Result<PathBuf, ExportError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| ExportError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

    let path = dir.join(mission_file_name(user_id));
    tokio::fs::write(&path, xml.as_bytes())
        .await
        .map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;

    tracing::debug!("Mission file written to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_named_file_and_overwrites() {
        let dir = std::env::temp_dir().join(format!("wpgen-export-{}", uuid::Uuid::new_v4()));

        let path = write_mission_file(&dir, 42, "<first/>").await.unwrap();
        assert_eq!(path.file_name().unwrap(), "INAV_42.mission");

        write_mission_file(&dir, 42, "<second/>").await.unwrap();
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "<second/>");

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}

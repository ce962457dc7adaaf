//! Persistence of the published rankings file.
//!
//! One artifact, overwritten atomically once per successful run. The
//! previous file is moved to a timestamped backup first, so a botched
//! write can always be recovered from the backup directory.

use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::Utc;

use crate::config::Settings;

/// Publish a new rankings JSON document.
///
/// The previous published file, if any, is archived before the new one
/// is moved into place. Returns the published path.
pub fn publish(settings: &Settings, json: &str) -> io::Result<PathBuf> {
    settings.ensure_directories()?;

    if let Some(backup) = archive_previous(settings)? {
        tracing::info!(backup = %backup.display(), "archived previous rankings");
    }

    let output = settings.output_path();
    // Write to a sibling temp file and rename so readers never observe a
    // half-written document.
    let tmp = output.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, &output)?;

    Ok(output)
}

/// Move the currently published file into the backup directory under a
/// timestamped name. Returns the backup path, or `None` when there was
/// nothing to archive.
pub fn archive_previous(settings: &Settings) -> io::Result<Option<PathBuf>> {
    let output = settings.output_path();
    if !output.exists() {
        return Ok(None);
    }

    let stamp = Utc::now().format("%Y%m%d-%H%M%S%.3f");
    let backup = settings.backup_dir.join(format!("rankings-{stamp}.json"));
    fs::create_dir_all(&settings.backup_dir)?;
    fs::rename(&output, &backup)?;
    Ok(Some(backup))
}

/// Read the most recently published rankings document verbatim.
pub fn read_published(settings: &Settings) -> io::Result<String> {
    fs::read_to_string(settings.output_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_settings(dir: &std::path::Path) -> Settings {
        Config {
            data_dir: Some(dir.to_path_buf()),
            ..Config::default()
        }
        .into_settings()
    }

    #[test]
    fn publish_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());

        let path = publish(&settings, r#"[{"weightClass":"Heavyweight"}]"#).unwrap();
        assert_eq!(path, settings.output_path());
        assert_eq!(
            read_published(&settings).unwrap(),
            r#"[{"weightClass":"Heavyweight"}]"#
        );
    }

    #[test]
    fn republish_archives_the_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());

        publish(&settings, "[1]").unwrap();
        publish(&settings, "[2]").unwrap();

        assert_eq!(read_published(&settings).unwrap(), "[2]");
        let backups: Vec<_> = fs::read_dir(&settings.backup_dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "[1]");
    }

    #[test]
    fn read_before_first_publish_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        let err = read_published(&settings).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}

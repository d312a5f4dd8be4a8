use chrono::{DateTime, NaiveDateTime, Utc};
use std::{
    cmp::Reverse,
    ffi::OsStr,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    domain::Transaction,
    errors::StorageError,
    utils::paths::{backup_dir_in, data_file_in, ensure_dir, resolve_base},
};

use super::{Result, TransactionStorage};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_PREFIX: &str = "transactions";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const CORRUPT_NOTE: &str = "corrupt";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Filesystem-backed JSON snapshot of the transaction collection.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    data_path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let root = resolve_base(root);
        ensure_dir(&root)?;
        let backups_dir = backup_dir_in(&root);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            data_path: data_file_in(&root),
            backups_dir,
            root,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Copies the current snapshot into the backups directory.
    ///
    /// Returns `None` when there is no snapshot on disk yet.
    pub fn backup(&self, note: Option<&str>) -> Result<Option<PathBuf>> {
        if !self.data_path.exists() {
            return Ok(None);
        }
        ensure_dir(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut file_stem = format!("{}_{}", BACKUP_PREFIX, timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            file_stem.push('_');
            file_stem.push_str(&label);
        }
        let path = self
            .backups_dir
            .join(format!("{}.{}", file_stem, BACKUP_EXTENSION));
        fs::copy(&self.data_path, &path)?;
        self.prune_backups()?;
        tracing::debug!(path = %path.display(), "wrote transaction backup");
        Ok(Some(path))
    }

    /// Backup file names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by_key(|name| (Reverse(parse_backup_timestamp(name)), Reverse(name.clone())));
        Ok(entries)
    }

    /// Replaces the live snapshot with `backup_name` and returns its contents.
    ///
    /// `backup_name` must be a bare file name inside the backups directory.
    pub fn restore(&self, backup_name: &str) -> Result<Vec<Transaction>> {
        if Path::new(backup_name).file_name() != Some(OsStr::new(backup_name)) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("`{}` is not a backup file name", backup_name),
            )));
        }
        let backup_path = self.backups_dir.join(backup_name);
        if !backup_path.exists() {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("backup `{}` not found", backup_name),
            )));
        }
        let transactions = read_snapshot(&backup_path)?;
        self.save(&transactions)?;
        Ok(transactions)
    }

    fn prune_backups(&self) -> Result<()> {
        let backups = self.list_backups()?;
        for name in backups.iter().skip(self.retention) {
            let _ = fs::remove_file(self.backups_dir.join(name));
        }
        Ok(())
    }
}

impl TransactionStorage for JsonStorage {
    fn load(&self) -> Result<Option<Vec<Transaction>>> {
        if !self.data_path.exists() {
            return Ok(None);
        }
        read_snapshot(&self.data_path).map(Some)
    }

    fn save(&self, transactions: &[Transaction]) -> Result<()> {
        let json = serde_json::to_string_pretty(transactions)?;
        let tmp = tmp_path(&self.data_path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.data_path)?;
        tracing::debug!(
            path = %self.data_path.display(),
            count = transactions.len(),
            "saved transactions"
        );
        Ok(())
    }

    fn quarantine(&self) -> Result<()> {
        if let Some(path) = self.backup(Some(CORRUPT_NOTE))? {
            tracing::warn!(path = %path.display(), "kept a copy of the unreadable snapshot");
        }
        Ok(())
    }
}

fn read_snapshot(path: &Path) -> Result<Vec<Transaction>> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| {
        StorageError::Corrupt(format!("{}: {}", path.display(), err))
    })
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name
        .strip_suffix(&format!(".{}", BACKUP_EXTENSION))?
        .strip_prefix(&format!("{}_", BACKUP_PREFIX))?;
    let mut parts = stem.split('_');
    let date_part = parts.next()?;
    let time_part = parts.next()?;
    if !is_digits(date_part, 8) || !is_digits(time_part, 6) {
        return None;
    }
    let raw = format!("{}{}", date_part, time_part);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed_transactions;
    use std::io::ErrorKind;
    use tempfile::TempDir;

    fn storage_with_temp_dir(retention: usize) -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(Some(temp.path().to_path_buf()), Some(retention))
            .expect("json storage");
        (storage, temp)
    }

    #[test]
    fn missing_snapshot_loads_as_none() {
        let (storage, _guard) = storage_with_temp_dir(3);
        assert!(storage.load().expect("load").is_none());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir(3);
        let seed = seed_transactions();
        storage.save(&seed).expect("save");
        let loaded = storage.load().expect("load").expect("snapshot present");
        assert_eq!(loaded, seed);
        assert!(!tmp_path(storage.data_path()).exists());
    }

    #[test]
    fn unparseable_snapshot_is_reported_as_corrupt() {
        let (storage, _guard) = storage_with_temp_dir(3);
        fs::write(storage.data_path(), "{ not json").unwrap();
        let err = storage.load().expect_err("corrupt snapshot");
        assert!(matches!(err, StorageError::Corrupt(_)), "unexpected: {err:?}");
    }

    #[test]
    fn backups_are_pruned_to_retention() {
        let (storage, _guard) = storage_with_temp_dir(2);
        storage.save(&seed_transactions()).unwrap();
        for note in ["first", "second", "third"] {
            storage.backup(Some(note)).expect("backup");
        }
        let backups = storage.list_backups().expect("list backups");
        assert_eq!(backups.len(), 2);
        assert!(backups.iter().all(|name| name.starts_with("transactions_")));
    }

    #[test]
    fn restore_replaces_live_snapshot() {
        let (storage, _guard) = storage_with_temp_dir(3);
        let seed = seed_transactions();
        storage.save(&seed).unwrap();
        let backup = storage.backup(None).unwrap().expect("backup written");
        storage.save(&seed[..2]).unwrap();

        let name = backup.file_name().unwrap().to_str().unwrap();
        let restored = storage.restore(name).expect("restore");
        assert_eq!(restored.len(), seed.len());
        assert_eq!(storage.load().unwrap().unwrap().len(), seed.len());
    }

    #[test]
    fn restore_only_accepts_names_inside_the_backups_dir() {
        let (storage, guard) = storage_with_temp_dir(3);
        let seed = seed_transactions();
        storage.save(&seed[..1]).unwrap();
        let outside = guard.path().join("outside.json");
        fs::write(&outside, serde_json::to_string(&seed).unwrap()).unwrap();

        for name in ["../outside.json", "backups/../../outside.json", "", ".."] {
            let err = storage.restore(name).expect_err("path escaping backups dir");
            let rejected =
                matches!(&err, StorageError::Io(io) if io.kind() == ErrorKind::InvalidInput);
            assert!(rejected, "unexpected for {name:?}: {err:?}");
        }
        let absolute = outside.to_str().unwrap();
        assert!(storage.restore(absolute).is_err());
        assert_eq!(storage.load().unwrap().unwrap().len(), 1);
    }

    #[test]
    fn parses_backup_names_with_and_without_notes() {
        assert!(parse_backup_timestamp("transactions_20240105_101530.json").is_some());
        assert!(parse_backup_timestamp("transactions_20240105_101530_corrupt.json").is_some());
        assert!(parse_backup_timestamp("notes.json").is_none());
        assert_eq!(
            sanitize_backup_note(Some(" Before Import ")),
            Some("before-import".into())
        );
    }
}

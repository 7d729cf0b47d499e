use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

use super::{GameRecord, GameStore, StoreError};

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// One pretty-printed JSON file per key. Writes go to a temporary file that is
/// renamed over the old record, so readers never see half a record.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir: dir.as_ref().to_path_buf() })
    }

    pub fn dir(&self) -> &Path { &self.dir }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let safe = !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !safe { return Err(StoreError::InvalidKey(key.to_string())); }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl GameStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<GameRecord>, StoreError> {
        let path = self.path_for(key)?;
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn put(&self, key: &str, record: &GameRecord) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let tmp = self.dir.join(format!("{key}.{}.{seq}.tmp", std::process::id()));
        {
            let mut w = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut w, record)?;
            w.flush()?;
        }
        fs::rename(&tmp, &path)?;
        debug!("saved record {}", path.display());
        Ok(())
    }
}

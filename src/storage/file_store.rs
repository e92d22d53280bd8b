use std::cell::OnceCell;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::domain::Ledger;

use super::{codec, LedgerStore, StoreError};

/// Ledger persisted in a single file.
///
/// Opening the store takes an exclusive lock on a sidecar `<path>.lock`
/// file. The lock is held until the store is dropped, so a load followed
/// by a save from one command cannot interleave with another process.
///
/// When the storage directory does not exist yet nothing is created on
/// open. The directory and the lock are set up by the first save, which
/// fails with [`StoreError::Conflict`] if another process wrote the file
/// in the meantime.
pub struct FileStore {
    path: PathBuf,
    lock: OnceCell<File>,
}

impl FileStore {
    /// Open (and lock) the store at `path`. The storage file itself is not
    /// created until the first save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.into(),
            lock: OnceCell::new(),
        };

        if parent_dir(&store.path).is_dir() {
            store.acquire_lock()?;
        } else {
            debug!(path = %store.path.display(), "storage directory missing, lock deferred");
        }
        debug!(path = %store.path.display(), "opened storage");

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn acquire_lock(&self) -> Result<&File, StoreError> {
        if let Some(lock_file) = self.lock.get() {
            return Ok(lock_file);
        }

        let lock_path = lock_path_for(&self.path);
        let lock_file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| StoreError::io("open lock file", &lock_path, e))?;

        if lock_file.try_lock_exclusive().is_err() {
            info!(path = %lock_path.display(), "storage is locked by another process, waiting");
            lock_file
                .lock_exclusive()
                .map_err(|source| StoreError::Lock {
                    path: lock_path.clone(),
                    source,
                })?;
        }

        Ok(self.lock.get_or_init(|| lock_file))
    }

    /// Create the storage directory and take the lock that `open` skipped.
    /// The earlier load saw no file, so one appearing now was written by
    /// someone else and would be overwritten.
    fn lock_for_first_save(&self) -> Result<(), StoreError> {
        let dir = parent_dir(&self.path);
        std::fs::create_dir_all(dir).map_err(|e| StoreError::io("create directory", dir, e))?;
        self.acquire_lock()?;

        if self.path.exists() {
            return Err(StoreError::Conflict {
                path: self.path.clone(),
            });
        }
        Ok(())
    }
}

impl LedgerStore for FileStore {
    fn load(&self) -> Result<Ledger, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no storage yet, starting empty");
                return Ok(Ledger::new());
            }
            Err(e) => return Err(StoreError::io("read", &self.path, e)),
        };

        let ledger = codec::decode(&bytes).map_err(|reason| StoreError::Corrupt {
            path: self.path.clone(),
            reason,
        })?;
        debug!(count = ledger.len(), "loaded ledger");
        Ok(ledger)
    }

    fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        if self.lock.get().is_none() {
            self.lock_for_first_save()?;
        }

        let bytes = codec::encode(ledger)
            .map_err(|e| StoreError::io("encode", &self.path, e.into()))?;
        replace_file(&self.path, |file| file.write_all(&bytes))
            .map_err(|e| StoreError::io("write", &self.path, e))?;
        debug!(count = ledger.len(), path = %self.path.display(), "saved ledger");
        Ok(())
    }
}

impl Drop for FileStore {
    fn drop(&mut self) {
        // Closing the handle would release it too; unlock eagerly anyway.
        if let Some(lock_file) = self.lock.get() {
            let _ = FileExt::unlock(lock_file);
        }
    }
}

/// Write `path` through a temp file in the same directory and rename it into
/// place. Readers see either the old contents or the complete new ones.
///
/// The replacement keeps the permissions of the file it replaces; a new
/// file is created readable by everyone (`0644` on Unix).
pub fn replace_file<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let mut temp = NamedTempFile::new_in(parent_dir(path))?;
    write(temp.as_file_mut())?;
    temp.as_file_mut().flush()?;

    match std::fs::metadata(path) {
        Ok(meta) => temp.as_file().set_permissions(meta.permissions())?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => set_new_file_permissions(temp.as_file())?,
        Err(e) => return Err(e),
    }

    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn set_new_file_permissions(file: &File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_new_file_permissions(_file: &File) -> io::Result<()> {
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

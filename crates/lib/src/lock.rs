//! Per-project run lock.
//!
//! Every project carries one lock file next to its build record. `deps` holds
//! it exclusively for the whole pipeline and stamps itself as the holder;
//! `status` only needs a shared hold so it never observes a half-written
//! runtime directory or record.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// The process recorded as holding a project's exclusive lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockHolder {
  pub pid: u32,
  pub command: String,
  pub acquired_at_unix: u64,
}

impl LockHolder {
  fn current(command: &str) -> Self {
    Self {
      pid: std::process::id(),
      command: command.to_string(),
      acquired_at_unix: SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default(),
    }
  }
}

#[derive(Debug, Error)]
pub enum LockError {
  #[error("project {} is busy: {}\nremove {} if no rtbuild process is running", .project.display(), describe(.holder), .lock_path.display())]
  Busy {
    project: PathBuf,
    holder: Option<LockHolder>,
    lock_path: PathBuf,
  },

  #[error("cannot open lock file {}", .path.display())]
  Open {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("cannot lock {}", .path.display())]
  Acquire {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("cannot record lock holder in {}", .path.display())]
  Stamp {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

fn describe(holder: &Option<LockHolder>) -> String {
  match holder {
    Some(h) => format!("`rtbuild {}` (PID {}) since unix time {}", h.command, h.pid, h.acquired_at_unix),
    None => "held by another process".to_string(),
  }
}

/// A held project lock. Released on drop.
#[derive(Debug)]
pub struct BuildLock {
  file: File,
  path: PathBuf,
}

impl BuildLock {
  /// Take the project lock for a mutating run and record `command` as its holder.
  pub fn exclusive(lock_path: &Path, command: &str) -> Result<Self, LockError> {
    let lock = Self::take(lock_path, true)?;
    lock.stamp(&LockHolder::current(command))?;
    debug!(path = %lock_path.display(), command, "project lock held exclusively");
    Ok(lock)
  }

  /// Take the project lock for a read-only inspection. Any number may be held at once.
  pub fn shared(lock_path: &Path) -> Result<Self, LockError> {
    let lock = Self::take(lock_path, false)?;
    debug!(path = %lock_path.display(), "project lock held shared");
    Ok(lock)
  }

  fn take(lock_path: &Path, exclusive: bool) -> Result<Self, LockError> {
    let file = OpenOptions::new()
      .read(true)
      .write(true)
      .create(true)
      .truncate(false)
      .open(lock_path)
      .map_err(|source| LockError::Open {
        path: lock_path.to_path_buf(),
        source,
      })?;

    match try_lock(&file, exclusive) {
      Ok(()) => Ok(Self {
        file,
        path: lock_path.to_path_buf(),
      }),
      Err(e) if e.kind() == io::ErrorKind::WouldBlock => Err(LockError::Busy {
        project: lock_path.parent().map(Path::to_path_buf).unwrap_or_default(),
        holder: File::open(lock_path).ok().and_then(|f| read_holder(&f)),
        lock_path: lock_path.to_path_buf(),
      }),
      Err(source) => Err(LockError::Acquire {
        path: lock_path.to_path_buf(),
        source,
      }),
    }
  }

  fn stamp(&self, holder: &LockHolder) -> Result<(), LockError> {
    let stamp_err = |source| LockError::Stamp {
      path: self.path.clone(),
      source,
    };
    let json = serde_json::to_vec(holder).map_err(|e| stamp_err(io::Error::other(e)))?;

    let mut file = &self.file;
    file.set_len(0).map_err(stamp_err)?;
    file.seek(SeekFrom::Start(0)).map_err(stamp_err)?;
    file.write_all(&json).map_err(stamp_err)?;
    file.flush().map_err(stamp_err)
  }
}

/// Reads the stamped holder. Through the held handle when the caller owns the
/// lock, since Windows refuses reads of a locked region from a second handle.
fn read_holder(mut file: &File) -> Option<LockHolder> {
  file.seek(SeekFrom::Start(0)).ok()?;
  let mut contents = String::new();
  file.read_to_string(&mut contents).ok()?;
  serde_json::from_str(&contents).ok()
}

#[cfg(unix)]
fn try_lock(file: &File, exclusive: bool) -> io::Result<()> {
  use rustix::fs::{FlockOperation, flock};
  use std::os::unix::io::AsFd;

  let operation = if exclusive {
    FlockOperation::NonBlockingLockExclusive
  } else {
    FlockOperation::NonBlockingLockShared
  };

  flock(file.as_fd(), operation).map_err(|e| io::Error::from_raw_os_error(e.raw_os_error()))
}

#[cfg(windows)]
fn try_lock(file: &File, exclusive: bool) -> io::Result<()> {
  use std::os::windows::io::AsRawHandle;
  use windows_sys::Win32::Foundation::{ERROR_LOCK_VIOLATION, HANDLE};
  use windows_sys::Win32::Storage::FileSystem::{LOCKFILE_EXCLUSIVE_LOCK, LOCKFILE_FAIL_IMMEDIATELY, LockFileEx};

  let handle = file.as_raw_handle() as HANDLE;
  let mut flags = LOCKFILE_FAIL_IMMEDIATELY;
  if exclusive {
    flags |= LOCKFILE_EXCLUSIVE_LOCK;
  }

  // SAFETY: the handle stays valid for the call and a zeroed OVERLAPPED selects offset 0.
  let locked = unsafe {
    let mut overlapped = std::mem::zeroed();
    LockFileEx(handle, flags, 0, 1, 0, &mut overlapped)
  };

  if locked != 0 {
    return Ok(());
  }
  let err = io::Error::last_os_error();
  if err.raw_os_error() == Some(ERROR_LOCK_VIOLATION as i32) {
    return Err(io::Error::new(io::ErrorKind::WouldBlock, err));
  }
  Err(err)
}

//! Advisory file locking for track record writes
//!
//! Record writes are the only mutation points in the engine and must behave
//! as critical sections when several processes share a store. `fs2` locks
//! are cooperative: every writer must go through these helpers for the
//! protection to hold.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Read a file under a shared lock. Multiple readers may proceed together;
/// an exclusive writer blocks them until it finishes.
pub fn locked_read(path: &Path) -> Result<String> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    file.lock_shared()
        .with_context(|| format!("Failed to acquire shared lock on {}", path.display()))?;

    let mut content = String::new();
    BufReader::new(&file)
        .read_to_string(&mut content)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(content)
}

/// Replace a file's contents under an exclusive lock.
///
/// The file is truncated only after the lock is held, so a concurrent
/// reader can never observe the empty window between truncate and write.
pub fn locked_write(path: &Path, content: &str) -> Result<()> {
    #[allow(clippy::suspicious_open_options)]
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .open(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;
    file.lock_exclusive()
        .with_context(|| format!("Failed to acquire exclusive lock on {}", path.display()))?;
    file.set_len(0)
        .with_context(|| format!("Failed to truncate {}", path.display()))?;

    let mut writer = BufWriter::new(&file);
    writer
        .write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

//! Temp-file-and-rename writes inside a capability-scoped directory.
//!
//! A reader of the target path sees either the previous contents or the new
//! contents in full.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};

use crate::domain::ports::IdentityStoreError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Replace `path` inside `dir` with `contents`.
///
/// `path` must be a bare file name; the temp file is created next to it.
pub(super) fn write_atomic(
    dir: &Dir,
    path: &Utf8Path,
    contents: &[u8],
) -> Result<(), IdentityStoreError> {
    let mut components = path.components();
    let (Some(Utf8Component::Normal(file_name)), None) = (components.next(), components.next())
    else {
        return Err(IdentityStoreError::io(format!(
            "{path} is not a plain file name"
        )));
    };
    let tmp_name = temp_name(file_name);

    if let Err(err) = write_temp(dir, &tmp_name, contents)
        .and_then(|()| dir.rename(&tmp_name, dir, file_name))
    {
        // Cleanup is best effort; the write error is what matters.
        let _ = dir.remove_file(&tmp_name);
        return Err(IdentityStoreError::io(format!("writing {path}: {err}")));
    }

    if let Err(err) = dir.open(".").and_then(|handle| handle.sync_all()) {
        tracing::debug!(%err, "directory sync after rename failed");
    }
    Ok(())
}

fn temp_name(file_name: &str) -> String {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    format!(
        ".{file_name}.tmp.{pid}.{nanos}.{counter}",
        pid = std::process::id()
    )
}

fn write_temp(dir: &Dir, tmp_name: &str, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents)?;
    file.sync_all()
}

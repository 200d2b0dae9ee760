// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Small filesystem helpers shared by the state stores.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Write `bytes` to `path` via a temp file and rename, so a crash
/// mid-write cannot leave a truncated file behind.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_write_replaces_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cursor");

        atomic_write(&path, b"111\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "111\n");

        atomic_write(&path, b"222\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "222\n");

        // No temp droppings left behind
        assert!(!dir.path().join("cursor.tmp").exists());
    }
}

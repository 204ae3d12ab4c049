//! Run directory preparation

use crate::error::Result;
use std::fs;
use std::io::BufRead;
use std::path::Path;

/// Outcome of [`ensure_path`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathAction {
    /// The directory did not exist and was created
    Created,
    /// An existing directory was removed and recreated empty
    Recreated,
    /// An existing directory was left as is
    Kept,
}

/// Make sure `path` exists as a directory
///
/// When it already exists and `remove` is set, it is wiped and recreated if
/// its name starts with `_` (scratch runs) or `confirm` agrees. `confirm` is
/// only called when needed.
pub fn ensure_path<P, F>(path: P, remove: bool, confirm: F) -> Result<PathAction>
where
    P: AsRef<Path>,
    F: FnOnce(&Path) -> bool,
{
    let path = path.as_ref();

    if !path.exists() {
        fs::create_dir_all(path)?;
        return Ok(PathAction::Created);
    }

    if remove && (is_scratch(path) || confirm(path)) {
        fs::remove_dir_all(path)?;
        fs::create_dir_all(path)?;
        return Ok(PathAction::Recreated);
    }

    Ok(PathAction::Kept)
}

/// Read one `[y]/n` answer from `input`
///
/// An empty line means yes; end of input or a read error means no.
pub fn read_confirmation<R: BufRead>(input: &mut R) -> bool {
    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => answer.trim() != "n",
    }
}

fn is_scratch(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('_'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_creates_missing_directory() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("save/protonet_1shot");

        let action = ensure_path(&path, true, |_| panic!("no prompt for a new path")).unwrap();
        assert_eq!(action, PathAction::Created);
        assert!(path.is_dir());
    }

    #[test]
    fn test_scratch_directory_is_wiped_without_asking() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("_debug");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("log.txt"), "old").unwrap();

        let action = ensure_path(&path, true, |_| panic!("scratch runs never prompt")).unwrap();
        assert_eq!(action, PathAction::Recreated);
        assert!(path.is_dir());
        assert!(!path.join("log.txt").exists());
    }

    #[test]
    fn test_trailing_slash_still_scratch() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("_debug");
        fs::create_dir(&path).unwrap();

        let with_slash = format!("{}/", path.display());
        let action = ensure_path(&with_slash, true, |_| false).unwrap();
        assert_eq!(action, PathAction::Recreated);
    }

    #[test]
    fn test_confirm_decides_for_named_runs() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("run");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep.txt"), "x").unwrap();

        let asked = Cell::new(false);
        let action = ensure_path(&path, true, |p| {
            asked.set(true);
            assert_eq!(p, path.as_path());
            false
        })
        .unwrap();
        assert!(asked.get());
        assert_eq!(action, PathAction::Kept);
        assert!(path.join("keep.txt").exists());

        let action = ensure_path(&path, true, |_| true).unwrap();
        assert_eq!(action, PathAction::Recreated);
        assert!(!path.join("keep.txt").exists());
    }

    #[test]
    fn test_remove_disabled_keeps_contents() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("_debug");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("log.txt"), "old").unwrap();

        let action = ensure_path(&path, false, |_| true).unwrap();
        assert_eq!(action, PathAction::Kept);
        assert!(path.join("log.txt").exists());
    }

    #[test]
    fn test_read_confirmation_answers() {
        assert!(read_confirmation(&mut Cursor::new("y\n")));
        assert!(read_confirmation(&mut Cursor::new("\n")));
        assert!(read_confirmation(&mut Cursor::new("yes")));
        assert!(!read_confirmation(&mut Cursor::new("n\n")));
        assert!(!read_confirmation(&mut Cursor::new("  n  \n")));
    }

    #[test]
    fn test_closed_input_keeps_existing_run() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("important_run");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("ckpt.pth"), "weights").unwrap();

        let mut input = Cursor::new(Vec::<u8>::new());
        let action = ensure_path(&path, true, |_| read_confirmation(&mut input)).unwrap();

        assert_eq!(action, PathAction::Kept);
        assert!(path.join("ckpt.pth").exists());
    }
}

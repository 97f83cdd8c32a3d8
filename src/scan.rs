use std::fs;
use std::path::{Path, PathBuf};

use anyhow::bail;

use crate::config::MARKER_FILE;

/// Whether `dir` directly contains the marker file.
pub fn is_build_dir(dir: &Path) -> bool {
    fs::symlink_metadata(dir.join(MARKER_FILE))
        .map(|m| m.is_file())
        .unwrap_or(false)
}

/// `dir` itself if it is a build directory, otherwise its immediate
/// subdirectories that are, sorted by name.
pub fn find_build_dirs(dir: &Path) -> Vec<PathBuf> {
    if is_build_dir(dir) {
        return vec![dir.to_path_buf()];
    }

    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut dirs = entries
        .flat_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|path| is_build_dir(path))
        .collect::<Vec<_>>();
    dirs.sort();
    dirs
}

/// Resolves the directories a `reload` or `build` should act on: the given
/// ones that are build directories, or a search from `cwd` when none are
/// given.
pub fn select_build_dirs(cwd: &Path, requested: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let dirs = if requested.is_empty() {
        find_build_dirs(cwd)
    } else {
        requested
            .iter()
            .map(|dir| cwd.join(dir))
            .filter(|dir| is_build_dir(dir))
            .collect()
    };

    if dirs.is_empty() {
        bail!("no build dirs found");
    }
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_build_dir(path: &Path) {
        fs::create_dir_all(path).unwrap();
        fs::write(path.join(MARKER_FILE), "{}").unwrap();
    }

    #[test]
    fn current_dir_wins() {
        let root = tempfile::tempdir().unwrap();
        make_build_dir(root.path());
        make_build_dir(&root.path().join("nested"));

        assert_eq!(find_build_dirs(root.path()), vec![root.path().to_path_buf()]);
    }

    #[test]
    fn finds_subdirectories_only_one_level_deep() {
        let root = tempfile::tempdir().unwrap();
        make_build_dir(&root.path().join("cmake-x86"));
        make_build_dir(&root.path().join("cmake-arm64-v8a"));
        make_build_dir(&root.path().join("deep/cmake-x86_64"));
        fs::create_dir_all(root.path().join("src")).unwrap();

        assert_eq!(
            find_build_dirs(root.path()),
            vec![
                root.path().join("cmake-arm64-v8a"),
                root.path().join("cmake-x86"),
            ]
        );
    }

    #[test]
    fn marker_must_be_a_file() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join(MARKER_FILE)).unwrap();
        assert!(!is_build_dir(root.path()));
    }

    #[test]
    fn explicit_dirs_are_filtered() {
        let root = tempfile::tempdir().unwrap();
        make_build_dir(&root.path().join("a"));
        fs::create_dir_all(root.path().join("b")).unwrap();

        let dirs = select_build_dirs(
            root.path(),
            &[PathBuf::from("a"), PathBuf::from("b"), PathBuf::from("c")],
        )
        .unwrap();
        assert_eq!(dirs, vec![root.path().join("a")]);
    }

    #[test]
    fn nothing_found_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let err = select_build_dirs(root.path(), &[]).unwrap_err();
        assert_eq!(err.to_string(), "no build dirs found");
    }
}

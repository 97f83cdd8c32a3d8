use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;

use crate::options::{Abi, ArmMode, BuildMode, Linker, Neon, Stl};

/// Optional per-project file that overrides the wizard's built-in defaults.
pub const PROJECT_FILE: &str = "ndk-cmake.toml";

#[derive(Debug, Default, Deserialize)]
struct ProjectFile {
    #[serde(default)]
    defaults: Defaults,
}

/// Answers used when the user accepts a question's default.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    pub abi: Option<Abi>,
    pub arm_mode: Option<ArmMode>,
    pub neon: Option<Neon>,
    pub ld: Option<Linker>,
    pub platform: Option<u32>,
    pub stl: Option<Stl>,
    pub build_mode: Option<BuildMode>,
    pub ninja: Option<bool>,
}

/// Reads `[defaults]` from the project's `ndk-cmake.toml`, if there is one.
pub fn load_defaults(project: &Path) -> anyhow::Result<Defaults> {
    let path = project.join(PROJECT_FILE);
    if !path.is_file() {
        return Ok(Defaults::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file: ProjectFile =
        toml::from_str(&content).with_context(|| format!("invalid {}", path.display()))?;
    Ok(file.defaults)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_builtin_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_defaults(dir.path()).unwrap(), Defaults::default());
    }

    #[test]
    fn reads_defaults_table() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PROJECT_FILE),
            r#"
[defaults]
abi = "arm64-v8a"
platform = 24
stl = "c++_shared"
build_mode = "Release"
ninja = true
"#,
        )
        .unwrap();

        let defaults = load_defaults(dir.path()).unwrap();
        assert_eq!(defaults.abi, Some(Abi::Arm64V8a));
        assert_eq!(defaults.platform, Some(24));
        assert_eq!(defaults.stl, Some(Stl::CxxShared));
        assert_eq!(defaults.build_mode, Some(BuildMode::Release));
        assert_eq!(defaults.ninja, Some(true));
        assert_eq!(defaults.neon, None);
    }

    #[test]
    fn rejects_bad_values() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PROJECT_FILE), "[defaults]\nabi = \"mips\"\n").unwrap();
        let err = load_defaults(dir.path()).unwrap_err();
        assert!(err.to_string().contains(PROJECT_FILE));

        std::fs::write(dir.path().join(PROJECT_FILE), "[defaults]\ntarget = \"x86\"\n").unwrap();
        assert!(load_defaults(dir.path()).is_err());
    }
}

use std::fmt::{self, Display};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::cmake::Generator;
use crate::options::{Abi, ArmMode, BuildMode, Linker, Neon, Stl, empty_as_none};

/// Name of the marker file that makes a directory a build directory.
pub const MARKER_FILE: &str = ".cmake-android-build.cfg";

/// Everything needed to configure and build one CMake build directory.
///
/// Written once by `init` and read back unchanged by `reload` and `build`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub project: PathBuf,
    pub sdk: PathBuf,
    pub cmake: PathBuf,
    pub ndk: PathBuf,
    pub abi: Abi,
    pub arm_mode: ArmMode,
    #[serde(default, with = "empty_as_none")]
    pub neon: Option<Neon>,
    #[serde(default, with = "empty_as_none")]
    pub ld: Option<Linker>,
    pub platform: u32,
    pub stl: Stl,
    pub build_mode: BuildMode,
    /// Configure with Ninja instead of Makefiles. Omitted from the marker
    /// when false.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ninja: bool,
}

impl BuildConfig {
    /// Path of the marker inside `build_dir`.
    pub fn marker_path(build_dir: &Path) -> PathBuf {
        build_dir.join(MARKER_FILE)
    }

    pub fn read_from(path: &Path) -> anyhow::Result<BuildConfig> {
        let content =
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_slice(&content)
            .with_context(|| format!("invalid build configuration in {}", path.display()))
    }

    pub fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_vec(self)?;
        fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    pub fn generator(&self) -> Generator {
        if self.ninja {
            Generator::Ninja
        } else {
            Generator::Makefiles
        }
    }

    /// Location of the NDK's CMake toolchain file.
    pub fn toolchain_file(&self) -> PathBuf {
        self.ndk
            .join("build")
            .join("cmake")
            .join("android.toolchain.cmake")
    }

    /// Default name of the build directory for these settings, e.g.
    /// `cmake-armeabi-v7a-thumb-c++_static-android21-Debug`.
    pub fn default_build_dir_name(&self) -> String {
        let mut name = format!("cmake-{}", self.abi.dir_name());
        if self.abi.is_armv7() {
            name.push('-');
            name.push_str(self.arm_mode.as_str());
        }
        name.push_str(&format!(
            "-{}-android{}-{}",
            self.stl, self.platform, self.build_mode
        ));
        name
    }
}

impl Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

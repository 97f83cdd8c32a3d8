use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// API level used when the user gives no (or an unknown) answer.
pub const DEFAULT_PLATFORM: u32 = 21;

/// A fixed list of alternatives offered by one wizard question. The first
/// variant is the default.
pub trait Choice: Copy + Display + 'static {
    fn variants() -> &'static [Self];

    fn default_choice() -> Self {
        Self::variants()[0]
    }
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl Choice for $name {
            fn variants() -> &'static [Self] {
                &[$($name::$variant,)+]
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(match s {
                    $($text => $name::$variant,)+
                    _ => return Err(format!(concat!("Unsupported ", stringify!($name), ": '{}'"), s)),
                })
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum! {
    /// `ANDROID_ABI`
    pub enum Abi {
        ArmeabiV7a => "armeabi-v7a",
        ArmeabiV7aNeon => "armeabi-v7a with NEON",
        Arm64V8a => "arm64-v8a",
        X86 => "x86",
        X86_64 => "x86_64",
    }
}

choice_enum! {
    /// `ANDROID_ARM_MODE`
    pub enum ArmMode {
        Thumb => "thumb",
        Arm => "arm",
    }
}

choice_enum! {
    /// `ANDROID_ARM_NEON`
    pub enum Neon {
        True => "TRUE",
        False => "FALSE",
    }
}

choice_enum! {
    /// `ANDROID_LD`
    pub enum Linker {
        Lld => "lld",
        Default => "default",
    }
}

choice_enum! {
    /// `ANDROID_STL`
    pub enum Stl {
        CxxStatic => "c++_static",
        CxxShared => "c++_shared",
        None => "none",
        System => "system",
    }
}

choice_enum! {
    /// `CMAKE_BUILD_TYPE`
    pub enum BuildMode {
        Debug => "Debug",
        Release => "Release",
        RelWithDebInfo => "RelWithDebInfo",
        MinSizeRel => "MinSizeRel",
    }
}

impl Abi {
    /// Both 32-bit ARM ABIs, which take an instruction-set mode.
    pub fn is_armv7(&self) -> bool {
        matches!(self, Abi::ArmeabiV7a | Abi::ArmeabiV7aNeon)
    }

    /// Only plain `armeabi-v7a` leaves NEON up to the user.
    pub fn has_optional_neon(&self) -> bool {
        matches!(self, Abi::ArmeabiV7a)
    }

    /// The ABI as it may appear in a directory name.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Abi::ArmeabiV7aNeon => "armeabi-v7a-with-NEON",
            other => other.as_str(),
        }
    }
}

/// Marketing name of an Android API level, if known.
pub fn android_version_name(level: u32) -> Option<&'static str> {
    Some(match level {
        1 => "Android 1.0",
        2 => "Android 1.1",
        3 => "Android 1.5",
        4 => "Android 1.6",
        5 => "Android 2.0",
        6 => "Android 2.0.1",
        7 => "Android 2.1",
        8 => "Android 2.2",
        9 => "Android 2.3",
        10 => "Android 2.3.3",
        11 => "Android 3.0",
        12 => "Android 3.1",
        13 => "Android 3.2",
        14 => "Android 4.0",
        15 => "Android 4.0.3",
        16 => "Android 4.1",
        17 => "Android 4.2",
        18 => "Android 4.3",
        19 => "Android 4.4",
        20 => "Android 4.4W",
        21 => "Android 5.0 Lollipop",
        22 => "Android 5.1 Lollipop",
        23 => "Android 6.0 Marshmallow",
        24 => "Android 7.0 Nougat",
        25 => "Android 7.1 Nougat",
        26 => "Android 8.0 Oreo",
        27 => "Android 8.1 Oreo",
        28 => "Android 9.0 Pie",
        29 => "Android 10.0 Q",
        30 => "Android 11.0 R",
        31 => "Android 12.0",
        32 => "Android 12L",
        33 => "Android 13.0",
        34 => "Android 14.0",
        35 => "Android 15.0",
        36 => "Android 16.0",
        _ => return None,
    })
}

/// Serializes an unset `Option` as `""`, the marker file's encoding for
/// "leave it to the toolchain file".
pub(crate) mod empty_as_none {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(v) => v.serialize(serializer),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            Ok(None)
        } else {
            s.parse().map(Some).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_first_variants() {
        assert_eq!(Abi::default_choice(), Abi::ArmeabiV7a);
        assert_eq!(ArmMode::default_choice(), ArmMode::Thumb);
        assert_eq!(Stl::default_choice(), Stl::CxxStatic);
        assert_eq!(BuildMode::default_choice(), BuildMode::Debug);
    }

    #[test]
    fn parses_cmake_spelling() {
        assert_eq!("armeabi-v7a with NEON".parse(), Ok(Abi::ArmeabiV7aNeon));
        assert_eq!("RelWithDebInfo".parse(), Ok(BuildMode::RelWithDebInfo));
        assert_eq!("c++_shared".parse(), Ok(Stl::CxxShared));
        assert!("mips".parse::<Abi>().is_err());
        assert!("true".parse::<Neon>().is_err());
    }

    #[test]
    fn arm_only_questions() {
        assert!(Abi::ArmeabiV7a.is_armv7());
        assert!(Abi::ArmeabiV7aNeon.is_armv7());
        assert!(!Abi::Arm64V8a.is_armv7());
        assert!(Abi::ArmeabiV7a.has_optional_neon());
        assert!(!Abi::ArmeabiV7aNeon.has_optional_neon());
    }

    #[test]
    fn neon_abi_dir_name_has_no_spaces() {
        assert_eq!(Abi::ArmeabiV7aNeon.dir_name(), "armeabi-v7a-with-NEON");
        assert_eq!(Abi::X86_64.dir_name(), "x86_64");
    }

    #[test]
    fn version_names() {
        assert_eq!(android_version_name(21), Some("Android 5.0 Lollipop"));
        assert_eq!(android_version_name(0), None);
    }
}

pub mod cli;
pub mod cmake;
pub mod config;
pub mod meta;
pub mod options;
pub mod prompt;
pub mod scan;
pub mod sdk;
pub mod shell;
pub mod wizard;

#[cfg(all(target_os = "android", not(ndk_cmake_on_android)))]
compile_error!(
    r#"
Building ndk-cmake on Android is not supported. This binary is intended to be run on your host OS.

Set NDK_CMAKE_ON_ANDROID to override this check (for example, building for Termux)."
"#
);

#[cfg(not(any(
    target_os = "android",
    target_os = "macos",
    target_os = "linux",
    target_os = "windows"
)))]
compile_error!("Unsupported target OS");

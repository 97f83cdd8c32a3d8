fn main() {
    println!("cargo:rerun-if-env-changed=NDK_CMAKE_ON_ANDROID");

    if std::env::var("NDK_CMAKE_ON_ANDROID").is_ok() {
        println!("cargo:rustc-cfg=ndk_cmake_on_android");
    }

    println!("cargo:rustc-check-cfg=cfg(ndk_cmake_on_android)");
}

fn main() -> anyhow::Result<()> {
    let args = std::env::args().collect::<Vec<_>>();

    ndk_cmake::cli::run(args)
}

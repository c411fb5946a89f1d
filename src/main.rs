fn main() -> anyhow::Result<()> {
    notefmt::cli::run()
}

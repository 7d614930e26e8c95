fn main() -> anyhow::Result<()> {
    adphase::run()
}

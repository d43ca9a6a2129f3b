fn main() -> anyhow::Result<()> {
    night_drive::run()
}

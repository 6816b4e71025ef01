fn main() -> anyhow::Result<()> {
    nomos_determinacy_cli::run()?;
    Ok(())
}

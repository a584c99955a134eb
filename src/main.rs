use anyhow::Result;

fn main() -> Result<()> {
    simcore::cli::run()
}

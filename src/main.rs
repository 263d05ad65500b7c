use deskgate::{Pipeline, logging};

fn main() -> anyhow::Result<()> {
    logging::init();
    Pipeline::from_env()?.run()?;
    Ok(())
}

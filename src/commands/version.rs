use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("sysmap version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}

use std::path::Path;

use crate::error::Result;
use crate::sample;

pub fn run(output: &str) -> Result<()> {
    let path = Path::new(output);
    sample::write(path)?;
    println!(
        "Wrote {} sample entries to {}",
        sample::sample_rows().len(),
        path.display()
    );
    Ok(())
}

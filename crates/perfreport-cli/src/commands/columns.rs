use std::path::Path;

use perfreport_core::{Dataset, LoadOptions, LogLayout, Result};

pub fn run(input: &Path, layout: &str) -> Result<()> {
    let options = LoadOptions {
        layout: layout.parse::<LogLayout>()?,
        ..Default::default()
    };
    let dataset = Dataset::load(input, &options)?;

    println!(
        "{} ({} layout): {} columns, {} samples\n",
        input.display(),
        options.layout,
        dataset.identifiers().len(),
        dataset.sample_count()
    );
    for (i, identifier) in dataset.identifiers().iter().enumerate() {
        let marker = match dataset.series(identifier) {
            Some(series) if dataset.is_framerate(series) => "  (framerate)",
            _ => "",
        };
        println!("  {i:>3}  {identifier}{marker}");
    }
    Ok(())
}

use anyhow::Result;

use crate::cli::OutputFormat;
use crate::output::print_types;
use crate::sample::Sample;

pub fn sdl(sample: &Sample) -> Result<()> {
    let schema = sample.schema()?;
    print!("{}", schema.sdl());
    Ok(())
}

pub fn types(sample: &Sample, format: OutputFormat) -> Result<()> {
    let graph = sample.graph()?;
    print_types(&graph, format);
    Ok(())
}

use std::io::{self, BufWriter, Write};

use crate::{atlas::find_inputs, data::AtlasConfig, options::ListOptions};

pub fn list(options: ListOptions) -> anyhow::Result<()> {
    let config = super::load_config(options.atlas)?;

    let stdout = io::stdout();
    let output = BufWriter::new(stdout.lock());
    write_input_list(&config, output)?;

    Ok(())
}

/// Writes the name of every input the config would pack, one per line, in the
/// order they would be placed.
fn write_input_list<W: Write>(config: &AtlasConfig, mut output: W) -> anyhow::Result<()> {
    config.validate()?;

    let inputs = find_inputs(config)?;

    for input in &inputs {
        writeln!(output, "{}", input.name)?;
    }
    output.flush()?;

    Ok(())
}

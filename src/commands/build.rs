use indicatif::{ProgressBar, ProgressStyle};

use crate::{atlas::build_atlas, options::BuildOptions};

pub fn build(options: BuildOptions) -> anyhow::Result<()> {
    let mut config = super::load_config(options.atlas)?;

    if let Some(output) = options.output {
        config.output_path = output;
    }

    if options.alpha_bleed {
        config.alpha_bleed = true;
    }

    log::debug!("Building atlas with {:?}", config);

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar().template("{prefix} [{bar:30}] {pos}/{len} {wide_msg}"),
    );
    progress.set_prefix("Loading");

    let atlas = build_atlas(&config, &progress)?;

    for placement in &atlas.placements {
        log::debug!(
            "Placed {} at ({}, {})",
            placement.name,
            placement.position.0,
            placement.position.1
        );
    }

    atlas.write_to_file(&config.output_path)?;

    println!("Texture atlas saved to {}", config.output_path.display());

    Ok(())
}

//! Composites a folder of tiles into a single grid-arranged atlas image.

use std::{
    collections::HashMap,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use fs_err as fs;
use gridpack::{GridPacker, InputItem, PackError};
use indicatif::ProgressBar;
use thiserror::Error;

use crate::{
    alpha_bleed::alpha_bleed,
    data::{AtlasConfig, ConfigError},
    discover::{discover_inputs, DiscoveredInput},
    image::{DecodeError, Image},
    input_name::InputName,
};

/// A decoded input image, ready to be placed.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub name: InputName,
    pub image: Image,
}

/// Where a single input ended up in the atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub name: InputName,
    pub position: (u32, u32),
}

/// A finished atlas that hasn't been written to disk yet.
#[derive(Debug, Clone)]
pub struct Atlas {
    pub image: Image,
    pub placements: Vec<Placement>,
}

/// Runs every step of an atlas build except writing the result, so that
/// nothing touches the output path unless the whole build succeeded.
pub fn build_atlas(config: &AtlasConfig, progress: &ProgressBar) -> Result<Atlas, AtlasError> {
    config.validate()?;

    let inputs = find_inputs(config)?;
    let sources = load_sources(&inputs, progress)?;

    pack_atlas(config, &sources)
}

/// Finds the inputs that a build with this config would pack, in the order
/// they would be placed.
///
/// The atlas from a previous run is skipped if it lives in the source folder,
/// since it would otherwise be packed into the next atlas.
pub fn find_inputs(config: &AtlasConfig) -> io::Result<Vec<DiscoveredInput>> {
    let inputs = discover_inputs(&config.source_dir, &config.extension, config.input_order)?;

    Ok(exclude_output(inputs, &config.output_path))
}

/// Decodes every discovered input, in order. The first input that can't be
/// read or decoded aborts the whole load.
pub fn load_sources(
    inputs: &[DiscoveredInput],
    progress: &ProgressBar,
) -> Result<Vec<SourceImage>, AtlasError> {
    progress.set_length(inputs.len() as u64);

    let mut sources = Vec::with_capacity(inputs.len());

    for input in inputs {
        progress.set_message(input.name.to_string());

        let file = BufReader::new(fs::File::open(&input.path)?);
        let image = Image::decode_png(file).map_err(|source| AtlasError::Decode {
            path: input.path.clone(),
            source,
        })?;

        log::trace!(
            "Loaded {} ({}x{})",
            input.name,
            image.size().0,
            image.size().1
        );

        sources.push(SourceImage {
            name: input.name.clone(),
            image,
        });
        progress.inc(1);
    }

    progress.finish_and_clear();

    Ok(sources)
}

/// Lays out the given images on a grid and copies each one into its cell.
///
/// `config` must have passed `AtlasConfig::validate`.
pub fn pack_atlas(config: &AtlasConfig, sources: &[SourceImage]) -> Result<Atlas, AtlasError> {
    if sources.is_empty() {
        log::warn!("No inputs were found, the atlas will be a single empty row");
    }

    // PNG can't represent an image with no rows, so an empty atlas still gets
    // one row of empty cells.
    let packer = GridPacker::new(config.cell_size, config.columns).min_rows(1);

    let mut items = Vec::with_capacity(sources.len());
    let mut sources_by_id = HashMap::with_capacity(sources.len());

    for source in sources {
        let item = InputItem::new(source.image.size());

        if !item.fits_cell(config.cell_size) {
            let (width, height) = item.size();
            log::warn!(
                "{} is {}x{}, but cells are {}x{}; it may overlap other cells",
                source.name,
                width,
                height,
                config.cell_size,
                config.cell_size
            );
        }

        sources_by_id.insert(item.id(), source);
        items.push(item);
    }

    let output = packer.pack(items)?;
    let (width, height) = output.size();
    let (columns, rows) = output.grid();

    if Image::buffer_len(output.size()).is_none() {
        return Err(AtlasError::CanvasTooLarge { width, height });
    }

    log::debug!(
        "Packing {} inputs into a {}x{} grid ({}x{} pixels)",
        sources.len(),
        columns,
        rows,
        width,
        height
    );

    let mut image = Image::new_empty_rgba8(output.size());
    let mut placements = Vec::with_capacity(sources.len());

    for item in output.items() {
        let source = sources_by_id[&item.id()];
        image.blit(&source.image, item.position());

        placements.push(Placement {
            name: source.name.clone(),
            position: item.position(),
        });
    }

    if config.alpha_bleed {
        log::debug!("Bleeding colors into transparent pixels");
        alpha_bleed(&mut image);
    }

    Ok(Atlas { image, placements })
}

impl Atlas {
    /// Encodes the atlas as a PNG and writes it to the given path, replacing
    /// anything already there.
    pub fn write_to_file(&self, path: &Path) -> Result<(), AtlasError> {
        let mut file = BufWriter::new(fs::File::create(path)?);

        self.image
            .encode_png(&mut file)
            .map_err(|source| AtlasError::Encode {
                path: path.to_owned(),
                source,
            })?;

        file.flush()?;

        log::trace!("Saved atlas to {}", path.display());

        Ok(())
    }
}

fn exclude_output(inputs: Vec<DiscoveredInput>, output_path: &Path) -> Vec<DiscoveredInput> {
    let output_path = match fs::canonicalize(output_path) {
        Ok(path) => path,
        Err(_) => return inputs,
    };

    inputs
        .into_iter()
        .filter(|input| match fs::canonicalize(&input.path) {
            Ok(path) if path == output_path => {
                log::debug!("Skipping {}, it's the output of a previous build", input.name);
                false
            }
            _ => true,
        })
        .collect()
}

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("couldn't decode image {}", .path.display())]
    Decode {
        path: PathBuf,
        source: DecodeError,
    },

    #[error("couldn't encode atlas {}", .path.display())]
    Encode {
        path: PathBuf,
        source: png::EncodingError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Layout(#[from] PackError),

    #[error("a {width}x{height} atlas is too large to hold in memory")]
    CanvasTooLarge { width: u32, height: u32 },

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::{data::InputOrder, image::Pixel};

    fn tile(size: u32, seed: u8) -> Image {
        let mut image = Image::new_empty_rgba8((size, size));
        for y in 0..size {
            for x in 0..size {
                let pixel = Pixel::new(seed, x as u8, y as u8, 255 - seed);
                image.set_pixel((x, y), pixel);
            }
        }
        image
    }

    fn write_tile(dir: &Path, name: &str, image: &Image) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        image.encode_png(&mut file).unwrap();
    }

    fn config_for(source_dir: &Path, output_path: &Path) -> AtlasConfig {
        AtlasConfig {
            source_dir: source_dir.to_owned(),
            output_path: output_path.to_owned(),
            ..AtlasConfig::default()
        }
    }

    fn assert_tile_at(atlas: &Image, tile: &Image, pos: (u32, u32)) {
        let (width, height) = tile.size();
        for y in 0..height {
            for x in 0..width {
                assert_eq!(
                    atlas.get_pixel((pos.0 + x, pos.1 + y)),
                    tile.get_pixel((x, y)),
                    "pixel ({}, {}) of tile at {:?}",
                    x,
                    y,
                    pos
                );
            }
        }
    }

    fn assert_cell_empty(atlas: &Image, pos: (u32, u32), size: u32) {
        for y in 0..size {
            for x in 0..size {
                assert_eq!(
                    atlas.get_pixel((pos.0 + x, pos.1 + y)),
                    Pixel::new(0, 0, 0, 0)
                );
            }
        }
    }

    #[test]
    fn five_tiles_in_four_columns() {
        let _ = env_logger::try_init();

        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        let names = ["a.png", "b.png", "c.png", "d.png", "e.png"];
        let tiles: Vec<_> = (0..5).map(|i| tile(16, i as u8 * 40)).collect();
        for (name, image) in names.iter().zip(&tiles) {
            write_tile(source.path(), name, image);
        }

        let output_path = output.path().join("atlas.png");
        let config = config_for(source.path(), &output_path);

        let atlas = build_atlas(&config, &ProgressBar::hidden()).unwrap();
        atlas.write_to_file(&output_path).unwrap();

        let file = fs::File::open(&output_path).unwrap();
        let written = Image::decode_png(BufReader::new(file)).unwrap();

        assert_eq!(written.size(), (64, 32));

        let expected = [(0, 0), (16, 0), (32, 0), (48, 0), (0, 16)];
        for ((placement, tile), pos) in atlas.placements.iter().zip(&tiles).zip(&expected) {
            assert_eq!(placement.position, *pos);
            assert_tile_at(&written, tile, *pos);
        }

        for x in &[16, 32, 48] {
            assert_cell_empty(&written, (*x, 16), 16);
        }
    }

    #[test]
    fn dimensions_follow_input_count() {
        let config = AtlasConfig {
            cell_size: 8,
            columns: 3,
            ..AtlasConfig::default()
        };

        for &(count, expected_height) in &[(1, 8), (3, 8), (4, 16), (6, 16), (7, 24)] {
            let sources: Vec<_> = (0..count)
                .map(|i| SourceImage {
                    name: InputName::from_path(Path::new(&format!("{}.png", i))).unwrap(),
                    image: tile(8, i as u8),
                })
                .collect();

            let atlas = pack_atlas(&config, &sources).unwrap();
            assert_eq!(atlas.image.size(), (24, expected_height));
            assert_eq!(atlas.placements.len(), count);
        }
    }

    #[test]
    fn empty_folder_makes_one_empty_row() {
        let source = tempfile::tempdir().unwrap();
        let output_path = source.path().join("out.atlas");
        let config = config_for(source.path(), &output_path);

        let atlas = build_atlas(&config, &ProgressBar::hidden()).unwrap();

        assert_eq!(atlas.image.size(), (64, 16));
        assert!(atlas.placements.is_empty());
        assert_eq!(atlas.image, Image::new_empty_rgba8((64, 16)));
    }

    #[test]
    fn builds_are_byte_identical() {
        let source = tempfile::tempdir().unwrap();
        for (i, name) in ["x.png", "y.png", "z.png"].iter().enumerate() {
            write_tile(source.path(), name, &tile(16, i as u8 * 7));
        }

        let output = tempfile::tempdir().unwrap();
        let first_path = output.path().join("first.png");
        let second_path = output.path().join("second.png");

        for path in &[&first_path, &second_path] {
            let config = config_for(source.path(), path);
            let atlas = build_atlas(&config, &ProgressBar::hidden()).unwrap();
            atlas.write_to_file(path).unwrap();
        }

        let first = fs::read(&first_path).unwrap();
        let second = fs::read(&second_path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn previous_output_in_source_folder_is_skipped() {
        let source = tempfile::tempdir().unwrap();
        write_tile(source.path(), "a.png", &tile(16, 1));

        let output_path = source.path().join("texture_atlas.png");
        let config = config_for(source.path(), &output_path);

        let first = build_atlas(&config, &ProgressBar::hidden()).unwrap();
        first.write_to_file(&output_path).unwrap();

        let second = build_atlas(&config, &ProgressBar::hidden()).unwrap();
        assert_eq!(second.placements.len(), 1);
        assert_eq!(first.image, second.image);
    }

    #[test]
    fn oversized_tile_spills_into_next_cell() {
        let config = AtlasConfig {
            cell_size: 4,
            columns: 2,
            ..AtlasConfig::default()
        };
        let big = tile(6, 9);
        let sources = vec![SourceImage {
            name: InputName::from_path(Path::new("big.png")).unwrap(),
            image: big.clone(),
        }];

        let atlas = pack_atlas(&config, &sources).unwrap();

        assert_eq!(atlas.image.size(), (8, 4));
        assert_eq!(atlas.image.get_pixel((5, 3)), big.get_pixel((5, 3)));
    }

    #[test]
    fn invalid_image_fails_the_build() {
        let source = tempfile::tempdir().unwrap();
        write_tile(source.path(), "a.png", &tile(16, 1));
        fs::write(source.path().join("b.png"), b"not an image").unwrap();

        let output_path = source.path().join("out.atlas");
        let config = config_for(source.path(), &output_path);

        match build_atlas(&config, &ProgressBar::hidden()) {
            Err(AtlasError::Decode { path, .. }) => {
                assert_eq!(path, source.path().join("b.png"))
            }
            other => panic!("expected a decode error, got {:?}", other.map(|_| ())),
        }

        assert!(!output_path.exists());
    }

    #[test]
    fn missing_source_folder_is_an_io_error() {
        let root = tempfile::tempdir().unwrap();
        let config = config_for(&root.path().join("missing"), &root.path().join("out.png"));

        let result = build_atlas(&config, &ProgressBar::hidden());

        assert!(matches!(result, Err(AtlasError::Io(_))));
    }

    #[test]
    fn unwritable_output_is_an_io_error() {
        let source = tempfile::tempdir().unwrap();
        write_tile(source.path(), "a.png", &tile(16, 1));

        let output_path = source.path().join("no").join("such").join("atlas.png");
        let config = config_for(source.path(), &output_path);

        let atlas = build_atlas(&config, &ProgressBar::hidden()).unwrap();
        let result = atlas.write_to_file(&output_path);

        assert!(matches!(result, Err(AtlasError::Io(_))));
    }

    #[test]
    fn invalid_config_is_rejected_before_reading_inputs() {
        let root = tempfile::tempdir().unwrap();
        let config = AtlasConfig {
            columns: 0,
            ..config_for(&root.path().join("missing"), &root.path().join("out.png"))
        };

        let result = build_atlas(&config, &ProgressBar::hidden());

        assert!(matches!(result, Err(AtlasError::Config(_))));
    }

    #[test]
    fn grid_taller_than_u32_is_an_error() {
        let config = AtlasConfig {
            cell_size: 1 << 31,
            columns: 1,
            ..AtlasConfig::default()
        };
        assert!(config.validate().is_ok());

        let sources: Vec<_> = ["a.png", "b.png"]
            .iter()
            .map(|name| SourceImage {
                name: InputName::from_path(Path::new(name)).unwrap(),
                image: tile(1, 0),
            })
            .collect();

        let result = pack_atlas(&config, &sources);

        assert!(matches!(result, Err(AtlasError::Layout(_))));
    }

    #[test]
    fn leading_dot_in_extension_is_accepted() {
        let source = tempfile::tempdir().unwrap();
        write_tile(source.path(), "a.png", &tile(16, 3));

        let config = AtlasConfig {
            extension: ".png".to_owned(),
            ..config_for(source.path(), &source.path().join("out.atlas"))
        };

        let atlas = build_atlas(&config, &ProgressBar::hidden()).unwrap();

        assert_eq!(atlas.placements.len(), 1);
        assert_eq!(atlas.placements[0].name.as_ref(), "a.png");
    }

    #[test]
    fn alpha_bleed_only_touches_transparent_pixels() {
        let source = tempfile::tempdir().unwrap();
        let opaque = tile(4, 50);
        write_tile(source.path(), "a.png", &opaque);

        let config = AtlasConfig {
            cell_size: 4,
            columns: 2,
            alpha_bleed: true,
            input_order: InputOrder::Name,
            ..config_for(source.path(), &source.path().join("out.atlas"))
        };

        let atlas = build_atlas(&config, &ProgressBar::hidden()).unwrap();

        assert_tile_at(&atlas.image, &opaque, (0, 0));

        let bled = atlas.image.get_pixel((4, 0));
        assert_eq!(bled.a, 0);
        assert_eq!(bled.r, opaque.get_pixel((3, 0)).r);
    }
}

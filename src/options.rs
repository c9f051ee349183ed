use std::path::PathBuf;

use structopt::StructOpt;

use crate::data::InputOrder;

#[derive(Debug, StructOpt)]
#[structopt(about = "Packs a folder of equally-sized tiles into a grid texture atlas")]
pub struct Options {
    #[structopt(flatten)]
    pub global: GlobalOptions,

    #[structopt(subcommand)]
    pub command: Subcommand,
}

#[derive(Debug, StructOpt)]
pub struct GlobalOptions {
    /// Sets verbosity level. Can be specified multiple times.
    #[structopt(long = "verbose", short, global = true, parse(from_occurrences))]
    pub verbosity: u8,
}

#[derive(Debug, StructOpt)]
pub enum Subcommand {
    /// Pack every matching image in the source folder into an atlas and write
    /// it to the output path.
    Build(BuildOptions),

    /// Print the inputs that would be packed, one per line, in the order they
    /// would be placed.
    List(ListOptions),
}

/// Options that decide which inputs are found and how they're laid out. Any
/// option given here overrides the value from the config file.
#[derive(Debug, StructOpt)]
pub struct AtlasOptions {
    /// The path to an atlas.toml config file, or a folder containing one.
    /// Defaults to the atlas.toml in the current directory, if there is one.
    #[structopt(long)]
    pub config: Option<PathBuf>,

    /// The folder to read input images from.
    #[structopt(long)]
    pub source_dir: Option<PathBuf>,

    /// The side length, in pixels, of each square cell.
    #[structopt(long)]
    pub cell_size: Option<u32>,

    /// The number of cells in each row.
    #[structopt(long)]
    pub columns: Option<u32>,

    /// Only files ending with this extension are packed.
    #[structopt(long)]
    pub extension: Option<String>,

    /// The order inputs are placed in.
    ///
    /// Options:
    ///
    /// - name: Sort by file name
    ///
    /// - directory: Use the order the operating system lists files in
    #[structopt(long)]
    pub input_order: Option<InputOrder>,
}

#[derive(Debug, StructOpt)]
pub struct BuildOptions {
    #[structopt(flatten)]
    pub atlas: AtlasOptions,

    /// Where to write the finished atlas.
    #[structopt(long)]
    pub output: Option<PathBuf>,

    /// Fill fully transparent pixels with the color of their nearest visible
    /// neighbors.
    #[structopt(long)]
    pub alpha_bleed: bool,
}

#[derive(Debug, StructOpt)]
pub struct ListOptions {
    #[structopt(flatten)]
    pub atlas: AtlasOptions,
}

use std::{
    io,
    path::{Path, PathBuf},
    str::FromStr,
};

use fs_err as fs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static CONFIG_FILENAME: &str = "atlas.toml";

/// Configuration for a single atlas build, optionally read from an
/// `atlas.toml` file.
///
/// Every field has a default, so an empty config file (or no config file at
/// all) packs `assets/textures/*.png` into 16px cells, four per row, and
/// writes the result to `texture_atlas.png`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case", default)]
pub struct AtlasConfig {
    /// The folder to read input images from. Only the top level of the folder
    /// is searched.
    pub source_dir: PathBuf,

    /// Where to write the finished atlas. Any existing file at this path is
    /// overwritten.
    pub output_path: PathBuf,

    /// The side length, in pixels, of each square cell in the atlas.
    pub cell_size: u32,

    /// The number of cells in each row of the atlas.
    pub columns: u32,

    /// Only files whose names end with `.` followed by this extension are
    /// treated as inputs. The comparison is case-sensitive, and the extension
    /// can be written as either `png` or `.png`.
    pub extension: String,

    /// The order that inputs are placed into cells.
    pub input_order: InputOrder,

    /// Whether fully transparent pixels in the finished atlas should take on
    /// the color of their nearest visible neighbors.
    ///
    /// This prevents dark fringes around tiles when the atlas is sampled with
    /// filtering, at the cost of changing the color channels of transparent
    /// pixels copied from the inputs.
    pub alpha_bleed: bool,

    /// The path that this config came from, if it was read from a file. Paths
    /// from this config are relative to the folder containing this file.
    #[serde(skip)]
    pub file_path: Option<PathBuf>,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("assets/textures/"),
            output_path: PathBuf::from("texture_atlas.png"),
            cell_size: 16,
            columns: 4,
            extension: String::from("png"),
            input_order: InputOrder::default(),
            alpha_bleed: false,
            file_path: None,
        }
    }
}

impl AtlasConfig {
    /// Reads the config at the given path if one was given, otherwise looks
    /// for an `atlas.toml` in `fallback_folder` and uses the default config if
    /// there isn't one.
    pub fn read_or_default(
        path: Option<&Path>,
        fallback_folder: &Path,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::read_from_folder_or_file(path);
        }

        match Self::read_from_folder(fallback_folder) {
            Ok(config) => Ok(config),
            Err(err) if err.is_not_found() => {
                log::debug!(
                    "No {} found in {}, using the default config",
                    CONFIG_FILENAME,
                    fallback_folder.display()
                );

                Ok(Self::default())
            }
            Err(err) => Err(err),
        }
    }

    pub fn read_from_folder_or_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let meta = fs::metadata(path)?;

        if meta.is_file() {
            Self::read_from_file(path)
        } else {
            Self::read_from_folder(path)
        }
    }

    pub fn read_from_folder<P: AsRef<Path>>(folder_path: P) -> Result<Self, ConfigError> {
        let folder_path = folder_path.as_ref();
        let file_path = &folder_path.join(CONFIG_FILENAME);

        Self::read_from_file(file_path)
    }

    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read(path)?;

        Self::from_slice(&contents, path)
    }

    fn from_slice(contents: &[u8], path: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_slice(contents).map_err(|source| ConfigError::Toml {
            path: path.to_owned(),
            source,
        })?;

        if let Some(folder) = path.parent() {
            config.source_dir = folder.join(&config.source_dir);
            config.output_path = folder.join(&config.output_path);
        }

        config.file_path = Some(path.to_owned());
        log::trace!("Read config from {}", path.display());

        Ok(config)
    }

    /// Checks that this config describes a grid that can actually be built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size == 0 {
            return Err(ConfigError::Invalid {
                message: "cell-size must be greater than zero".to_owned(),
            });
        }

        if self.columns == 0 {
            return Err(ConfigError::Invalid {
                message: "columns must be greater than zero".to_owned(),
            });
        }

        if self.extension.is_empty() || self.extension == "." {
            return Err(ConfigError::Invalid {
                message: "extension must not be empty".to_owned(),
            });
        }

        if self.cell_size.checked_mul(self.columns).is_none() {
            return Err(ConfigError::Invalid {
                message: format!(
                    "an atlas with {} columns of {}px cells is too wide",
                    self.columns, self.cell_size
                ),
            });
        }

        Ok(())
    }
}

/// Describes the order that discovered inputs are placed into the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputOrder {
    /// Sort inputs by file name. The resulting atlas is the same on every
    /// machine.
    Name,

    /// Keep inputs in whatever order the operating system lists them. This
    /// can differ between filesystems and platforms.
    Directory,
}

impl Default for InputOrder {
    fn default() -> Self {
        InputOrder::Name
    }
}

impl FromStr for InputOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<InputOrder, Self::Err> {
        match value {
            "name" => Ok(InputOrder::Name),
            "directory" => Ok(InputOrder::Directory),

            _ => Err(String::from(
                "Invalid input order. Valid options are 'name' and 'directory'.",
            )),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{source} in {}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid atlas config: {message}")]
    Invalid { message: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ConfigError {
    /// Tells whether this ConfigError originated because of a path not
    /// existing.
    ///
    /// This is intended for use with methods like
    /// `AtlasConfig::read_from_folder` in order to avoid needing to check if a
    /// file with the right name exists.
    pub fn is_not_found(&self) -> bool {
        match self {
            ConfigError::Io(source) => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = AtlasConfig::from_slice(b"", Path::new("atlas.toml")).unwrap();

        assert_eq!(config.cell_size, 16);
        assert_eq!(config.columns, 4);
        assert_eq!(config.extension, "png");
        assert_eq!(config.input_order, InputOrder::Name);
        assert!(!config.alpha_bleed);
    }

    #[test]
    fn paths_are_relative_to_config() {
        let source = br#"
            source-dir = "tiles"
            output-path = "out/atlas.png"
            cell-size = 32
            columns = 8
            input-order = "directory"
        "#;

        let config = AtlasConfig::from_slice(source, Path::new("project/atlas.toml")).unwrap();

        assert_eq!(config.source_dir, Path::new("project/tiles"));
        assert_eq!(config.output_path, Path::new("project/out/atlas.png"));
        assert_eq!(config.cell_size, 32);
        assert_eq!(config.columns, 8);
        assert_eq!(config.input_order, InputOrder::Directory);
        assert_eq!(config.file_path, Some(PathBuf::from("project/atlas.toml")));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let source = b"cell-size = 16\nrows = 3\n";
        let err = AtlasConfig::from_slice(source, Path::new("atlas.toml")).unwrap_err();

        match err {
            ConfigError::Toml { path, .. } => assert_eq!(path, Path::new("atlas.toml")),
            other => panic!("expected a TOML error, got {:?}", other),
        }
    }

    #[test]
    fn validate_rejects_empty_grids() {
        let mut config = AtlasConfig::default();
        assert!(config.validate().is_ok());

        config.columns = 0;
        assert!(config.validate().is_err());

        config.columns = 4;
        config.cell_size = 0;
        assert!(config.validate().is_err());

        config.cell_size = u32::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_extension() {
        let mut config = AtlasConfig::default();

        config.extension = ".png".to_owned();
        assert!(config.validate().is_ok());

        config.extension = ".".to_owned();
        assert!(config.validate().is_err());

        config.extension = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_folder_config_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AtlasConfig::read_or_default(None, dir.path()).unwrap();

        assert_eq!(config, AtlasConfig::default());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let err = AtlasConfig::read_or_default(Some(&path), dir.path()).unwrap_err();

        assert!(err.is_not_found());
    }

    #[test]
    fn parse_input_order() {
        assert_eq!("name".parse(), Ok(InputOrder::Name));
        assert_eq!("directory".parse(), Ok(InputOrder::Directory));
        assert!("random".parse::<InputOrder>().is_err());
    }
}

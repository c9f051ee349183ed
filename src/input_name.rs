use std::{fmt, path::Path, sync::Arc};

/// The file name of an input image, used to identify it in logs, errors, and
/// when sorting inputs.
///
/// This is really just a string, but giving it an explicit type keeps it from
/// getting mixed up with paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputName(Arc<str>);

impl InputName {
    /// Creates an InputName from the final component of the given path.
    ///
    /// Returns `None` if the path has no file name or the file name is not
    /// valid Unicode.
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;

        Some(InputName(file_name.into()))
    }

    /// Tells whether this name ends with `.` followed by the given extension.
    /// The extension may be written with or without its leading `.`.
    pub fn has_extension(&self, extension: &str) -> bool {
        let name: &str = &self.0;
        let extension = extension.strip_prefix('.').unwrap_or(extension);

        match name.strip_suffix(extension) {
            Some(rest) => rest.ends_with('.'),
            None => false,
        }
    }
}

impl AsRef<str> for InputName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InputName {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

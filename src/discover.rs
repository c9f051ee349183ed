use std::{
    io,
    path::{Path, PathBuf},
};

use fs_err as fs;

use crate::{data::InputOrder, input_name::InputName};

/// An image file found in the source folder that will be packed into the
/// atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredInput {
    pub name: InputName,
    pub path: PathBuf,
}

/// Finds every entry directly inside `source_dir` whose name ends with the
/// given extension, in the requested order.
///
/// Entries aren't checked for being files; anything matching the extension is
/// expected to be an image and will fail to load later if it isn't.
pub fn discover_inputs(
    source_dir: &Path,
    extension: &str,
    order: InputOrder,
) -> io::Result<Vec<DiscoveredInput>> {
    log::trace!(
        "Searching for inputs in '{}' with extension '{}'",
        source_dir.display(),
        extension
    );

    let mut inputs = Vec::new();

    for entry in fs::read_dir(source_dir)? {
        let path = entry?.path();

        let name = match InputName::from_path(&path) {
            Some(name) => name,

            None => {
                log::warn!(
                    "Path {} had invalid Unicode, skipping it...",
                    path.display()
                );
                continue;
            }
        };

        if !name.has_extension(extension) {
            continue;
        }

        log::trace!("Found input {}", name);
        inputs.push(DiscoveredInput { name, path });
    }

    match order {
        InputOrder::Name => inputs.sort_by(|a, b| a.name.cmp(&b.name)),
        InputOrder::Directory => {}
    }

    log::debug!(
        "Found {} inputs in {}",
        inputs.len(),
        source_dir.display()
    );

    Ok(inputs)
}

//! Gridpack is a small library for laying out equally-sized square cells on
//! a grid. It was built for texatlas, a tool that packs a folder of tiles into
//! a single texture atlas.
//!
//! Items are placed in row-major order: item `i` lands in column
//! `i % columns` and row `i / columns`. Every item gets its own cell, in the
//! same order the items were given.
//!
//! ## Example
//! ```
//! use gridpack::{GridPacker, InputItem};
//!
//! // Transform the things you want to lay out into the Gridpack InputItem
//! // type.
//! let my_items = vec![
//!     InputItem::new((16, 16)),
//!     InputItem::new((16, 16)),
//!     InputItem::new((16, 16)),
//! ];
//!
//! // Construct a packer with your cell size and column count.
//! let packer = GridPacker::new(16, 2);
//!
//! // GridPacker::pack accepts anything that can turn into an iterator of
//! // InputItem. It fails if the grid would be too large to address.
//! let output = packer.pack(my_items).unwrap();
//!
//! assert_eq!(output.size(), (32, 32));
//! assert_eq!(output.items()[2].position(), (0, 16));
//! ```

mod geometry;
mod id;
mod packer;
mod types;

pub use id::*;
pub use packer::*;
pub use types::*;

use crate::{geometry::Rect, id::Id};

/// An input to the grid layout routines.
///
/// `InputItem` is just a 2D size and a Gridpack-generated unique identifier.
/// It's expected that consumers will assign meaning to the given IDs and then
/// use them to associate the layout results back to the application's own
/// objects.
///
/// The size is informational: every item is given a full cell regardless of
/// how large it claims to be.
#[derive(Debug, Clone, Copy)]
pub struct InputItem {
    pub(crate) id: Id,
    pub(crate) size: (u32, u32),
}

impl InputItem {
    #[inline]
    pub fn new(size: (u32, u32)) -> Self {
        Self {
            id: Id::new(),
            size,
        }
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Tells whether this item fits exactly into a square cell of the given
    /// size.
    #[inline]
    pub fn fits_cell(&self, cell_size: u32) -> bool {
        self.size == (cell_size, cell_size)
    }
}

/// An item that was placed by `GridPacker::pack`.
///
/// `OutputItem` corresponds 1:1 to `InputItem` objects that were passed into
/// the packing function. They expose the ID from the input, the index of the
/// cell the item was given, as well as that cell's position and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputItem {
    pub(crate) id: Id,
    pub(crate) index: usize,
    pub(crate) rect: Rect,
}

impl OutputItem {
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn position(&self) -> (u32, u32) {
        self.rect.pos
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.rect.size
    }

    #[inline]
    pub fn min(&self) -> (u32, u32) {
        self.rect.pos
    }

    #[inline]
    pub fn max(&self) -> (u32, u32) {
        self.rect.max()
    }
}

/// The results from running `GridPacker::pack`.
#[derive(Debug, Clone)]
pub struct PackOutput {
    pub(crate) size: (u32, u32),
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) items: Vec<OutputItem>,
}

impl PackOutput {
    /// The size in pixels of the canvas needed to hold every cell.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// The grid dimensions, in cells, as `(columns, rows)`.
    #[inline]
    pub fn grid(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Placed items, in the same order they were passed in.
    #[inline]
    pub fn items(&self) -> &[OutputItem] {
        &self.items
    }
}

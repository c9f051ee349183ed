use std::convert::TryFrom;

use thiserror::Error;

use crate::{
    geometry::Rect,
    types::{InputItem, OutputItem, PackOutput},
};

/// Lays items out on a grid of square cells, left to right and then top to
/// bottom.
#[derive(Debug, Clone)]
pub struct GridPacker {
    cell_size: u32,
    columns: u32,
    min_rows: u32,
}

impl GridPacker {
    /// Creates a packer with the given cell side length, in pixels, and number
    /// of cells per row.
    ///
    /// Panics if either value is zero.
    pub fn new(cell_size: u32, columns: u32) -> Self {
        assert!(cell_size > 0, "cell size must be greater than zero");
        assert!(columns > 0, "column count must be greater than zero");

        Self {
            cell_size,
            columns,
            min_rows: 0,
        }
    }

    /// Forces the output to have at least this many rows, even if there are
    /// not enough items to fill them.
    pub fn min_rows(self, min_rows: u32) -> Self {
        Self { min_rows, ..self }
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// The number of rows needed to hold `count` items, or `None` if that
    /// doesn't fit in a `u32`.
    pub fn rows_for(&self, count: usize) -> Option<u32> {
        let columns = self.columns as usize;
        let rows = u32::try_from((count + columns - 1) / columns).ok()?;

        Some(rows.max(self.min_rows))
    }

    /// The top-left corner, in pixels, of the cell with the given index, or
    /// `None` if it lies beyond `u32::MAX` pixels.
    pub fn cell_position(&self, index: usize) -> Option<(u32, u32)> {
        let columns = self.columns as usize;
        let column = (index % columns) as u32;
        let row = u32::try_from(index / columns).ok()?;

        Some((
            column.checked_mul(self.cell_size)?,
            row.checked_mul(self.cell_size)?,
        ))
    }

    /// The size in pixels of a canvas holding `count` items.
    pub fn canvas_size(&self, count: usize) -> Result<(u32, u32), PackError> {
        let too_large = || PackError::TooLarge {
            count,
            cell_size: self.cell_size,
            columns: self.columns,
        };

        let rows = self.rows_for(count).ok_or_else(too_large)?;
        let width = self.columns.checked_mul(self.cell_size).ok_or_else(too_large)?;
        let height = rows.checked_mul(self.cell_size).ok_or_else(too_large)?;

        Ok((width, height))
    }

    pub fn pack<I: IntoIterator<Item = InputItem>>(
        &self,
        items: I,
    ) -> Result<PackOutput, PackError> {
        let items: Vec<_> = items.into_iter().collect();

        let num_items = items.len();
        log::trace!(
            "Packing {} items into {}px cells, {} per row",
            num_items,
            self.cell_size,
            self.columns
        );

        let size = self.canvas_size(num_items)?;
        let rows = size.1 / self.cell_size;

        // Every cell lies inside the canvas, whose size was just checked, so
        // these multiplications can't overflow.
        let columns = self.columns as usize;
        let items = items
            .iter()
            .enumerate()
            .map(|(index, input_item)| {
                let column = (index % columns) as u32;
                let row = (index / columns) as u32;
                let pos = (column * self.cell_size, row * self.cell_size);

                if !input_item.fits_cell(self.cell_size) {
                    log::trace!(
                        "Item {:?} is {}x{}, which doesn't match the {}px cell it was given",
                        input_item.id,
                        input_item.size.0,
                        input_item.size.1,
                        self.cell_size
                    );
                }

                OutputItem {
                    id: input_item.id,
                    index,
                    rect: Rect {
                        pos,
                        size: (self.cell_size, self.cell_size),
                    },
                }
            })
            .collect();

        log::trace!(
            "Finished packing {} items into a {}x{} grid ({}x{} pixels)",
            num_items,
            self.columns,
            rows,
            size.0,
            size.1
        );

        Ok(PackOutput {
            size,
            columns: self.columns,
            rows,
            items,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    #[error("a grid of {count} items in {columns} columns of {cell_size}px cells is too large")]
    TooLarge {
        count: usize,
        cell_size: u32,
        columns: u32,
    },
}

//! Gives fully transparent pixels the color of their nearest visible
//! neighbors. Texture filtering samples the color of transparent pixels too,
//! so without this, tiles sampled at their edges pick up a dark fringe from
//! the empty canvas around them.

use std::collections::VecDeque;

use crate::image::{Image, Pixel};

pub fn alpha_bleed(image: &mut Image) {
    let (width, height) = image.size();

    // Positions whose color is final and can be averaged into neighbors.
    // Visible pixels start out in this set; transparent ones join it once
    // they've been bled.
    let mut settled = Mask::new(width, height);

    // Positions that have been queued at some point, so that no position is
    // bled twice.
    let mut queued = Mask::new(width, height);

    // Transparent pixels waiting to be bled, processed breadth-first outwards
    // from the visible pixels.
    let mut frontier = VecDeque::new();

    for y in 0..height {
        for x in 0..width {
            if !image.get_pixel((x, y)).is_transparent() {
                settled.set(x, y);
                queued.set(x, y);
                continue;
            }

            let touches_visible = neighbors(x, y, width, height)
                .any(|pos| !image.get_pixel(pos).is_transparent());

            if touches_visible {
                queued.set(x, y);
                frontier.push_back((x, y));
            }
        }
    }

    while let Some((x, y)) = frontier.pop_front() {
        let mut sum = (0u16, 0u16, 0u16);
        let mut contributing = 0u16;

        for (nx, ny) in neighbors(x, y, width, height) {
            if settled.get(nx, ny) {
                let source = image.get_pixel((nx, ny));

                contributing += 1;
                sum.0 += u16::from(source.r);
                sum.1 += u16::from(source.g);
                sum.2 += u16::from(source.b);
            } else if !queued.get(nx, ny) {
                queued.set(nx, ny);
                frontier.push_back((nx, ny));
            }
        }

        // Every queued position was queued by a settled neighbor.
        debug_assert!(contributing > 0);
        let contributing = contributing.max(1);

        let bled = Pixel::new(
            (sum.0 / contributing) as u8,
            (sum.1 / contributing) as u8,
            (sum.2 / contributing) as u8,
            0,
        );

        image.set_pixel((x, y), bled);
        settled.set(x, y);
    }
}

const DIRECTIONS: &[(i64, i64)] = &[
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// In-bounds positions adjacent to (x, y), including diagonals.
fn neighbors(x: u32, y: u32, width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    DIRECTIONS.iter().filter_map(move |&(dx, dy)| {
        let nx = i64::from(x) + dx;
        let ny = i64::from(y) + dy;

        if nx < 0 || ny < 0 || nx >= i64::from(width) || ny >= i64::from(height) {
            return None;
        }

        Some((nx as u32, ny as u32))
    })
}

struct Mask {
    width: u32,
    data: Vec<bool>,
}

impl Mask {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            data: vec![false; (width * height) as usize],
        }
    }

    fn get(&self, x: u32, y: u32) -> bool {
        self.data[(x + y * self.width) as usize]
    }

    fn set(&mut self, x: u32, y: u32) {
        self.data[(x + y * self.width) as usize] = true;
    }
}

//! A simple RGBA8 image container used for both the input tiles and the atlas
//! canvas.

use std::io::{Read, Write};

use thiserror::Error;

const STRIDE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    size: (u32, u32),
    data: Vec<u8>,
}

impl Image {
    pub fn new_rgba8<D: Into<Vec<u8>>>(size: (u32, u32), data: D) -> Self {
        let data = data.into();

        assert!(Some(data.len()) == Self::buffer_len(size));

        Self { size, data }
    }

    /// Creates a fully transparent image of the given size.
    ///
    /// Panics if the image would have more bytes than fit in a `usize`; check
    /// with `Image::buffer_len` first when the size comes from user input.
    pub fn new_empty_rgba8(size: (u32, u32)) -> Self {
        let len = match Self::buffer_len(size) {
            Some(len) => len,
            None => panic!("a {}x{} image is too large", size.0, size.1),
        };

        Self::new_rgba8(size, vec![0; len])
    }

    /// The number of bytes an RGBA8 image of the given size needs, or `None`
    /// if that doesn't fit in a `usize`.
    pub fn buffer_len(size: (u32, u32)) -> Option<usize> {
        (size.0 as usize)
            .checked_mul(size.1 as usize)?
            .checked_mul(STRIDE)
    }

    /// Decodes a PNG image, converting it to 8-bit RGBA.
    ///
    /// Paletted and low bit depth images are expanded, 16-bit channels are
    /// truncated to 8 bits, and images without an alpha channel are treated as
    /// fully opaque.
    pub fn decode_png<R: Read>(input: R) -> Result<Self, DecodeError> {
        let mut decoder = png::Decoder::new(input);
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

        let (info, mut reader) = decoder.read_info()?;

        if info.bit_depth != png::BitDepth::Eight {
            return Err(DecodeError::UnsupportedFormat {
                color_type: info.color_type,
                bit_depth: info.bit_depth,
            });
        }

        let mut raw = vec![0; info.buffer_size()];
        reader.next_frame(&mut raw)?;

        let data = match info.color_type {
            png::ColorType::RGBA => raw,
            png::ColorType::RGB => raw
                .chunks_exact(3)
                .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
                .collect(),
            png::ColorType::GrayscaleAlpha => raw
                .chunks_exact(2)
                .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
                .collect(),
            png::ColorType::Grayscale => raw
                .iter()
                .flat_map(|&g| [g, g, g, 255])
                .collect(),
            color_type => {
                return Err(DecodeError::UnsupportedFormat {
                    color_type,
                    bit_depth: info.bit_depth,
                })
            }
        };

        let size = (info.width, info.height);

        Ok(Self::new_rgba8(size, data))
    }

    pub fn encode_png<W: Write>(&self, output: W) -> Result<(), png::EncodingError> {
        let mut encoder = png::Encoder::new(output, self.size.0, self.size.1);
        encoder.set_color(png::ColorType::RGBA);
        encoder.set_depth(png::BitDepth::Eight);

        let mut output_writer = encoder.write_header()?;
        output_writer.write_image_data(&self.data)?;

        // On drop, output_writer will write the last chunk of the PNG file.
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Copies `other` onto this image with its top-left corner at `pos`.
    ///
    /// Pixels are replaced rather than blended. Any part of `other` that falls
    /// outside of this image is clipped.
    pub fn blit(&mut self, other: &Image, pos: (u32, u32)) {
        if pos.0 >= self.size.0 || pos.1 >= self.size.1 {
            return;
        }

        let copy_width = other.size.0.min(self.size.0 - pos.0);
        let copy_height = other.size.1.min(self.size.1 - pos.1);

        let other_width_bytes = other.size.0 as usize * STRIDE;
        let copy_width_bytes = copy_width as usize * STRIDE;

        for other_y in 0..copy_height {
            let other_start = other_y as usize * other_width_bytes;
            let other_row = &other.data[other_start..other_start + copy_width_bytes];

            let self_y = (pos.1 + other_y) as usize;
            let start_px = pos.0 as usize + self.size.0 as usize * self_y;

            let start_in_bytes = STRIDE * start_px;
            let end_in_bytes = start_in_bytes + copy_width_bytes;

            let self_row = &mut self.data[start_in_bytes..end_in_bytes];
            self_row.copy_from_slice(other_row);
        }
    }

    pub fn get_pixel(&self, pos: (u32, u32)) -> Pixel {
        let start = self.pixel_offset(pos);

        Pixel {
            r: self.data[start],
            g: self.data[start + 1],
            b: self.data[start + 2],
            a: self.data[start + 3],
        }
    }

    pub fn set_pixel(&mut self, pos: (u32, u32), pixel: Pixel) {
        let start = self.pixel_offset(pos);

        self.data[start] = pixel.r;
        self.data[start + 1] = pixel.g;
        self.data[start + 2] = pixel.b;
        self.data[start + 3] = pixel.a;
    }

    fn pixel_offset(&self, pos: (u32, u32)) -> usize {
        assert!(pos.0 < self.size.0);
        assert!(pos.1 < self.size.1);

        STRIDE * (pos.0 as usize + pos.1 as usize * self.size.0 as usize)
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Png(#[from] png::DecodingError),

    #[error("unsupported PNG format {color_type:?} with bit depth {bit_depth:?}")]
    UnsupportedFormat {
        color_type: png::ColorType,
        bit_depth: png::BitDepth,
    },
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The pixel grid a channel renders into, plus the adapters that hand
//! it to a display or to disk.

use crate::color::Color;
use crate::error::Error;
use image::pnm::{PNMEncoder, PNMSubtype};
use image::{ColorType, ImageBuffer, Pixel, Rgba, RgbaImage};
use log::info;
use std::fs::File;
use std::path::Path;
use std::slice::ChunksMut;

/// A fixed-size, row-major grid of colors.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterBuffer {
    width: usize,
    height: usize,
    fill: Color,
    pixels: Vec<Color>,
}

impl RasterBuffer {
    /// Allocates a `width` x `height` grid filled with `fill`.
    pub fn new(width: usize, height: usize, fill: Color) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyRaster);
        }
        Ok(RasterBuffer {
            width,
            height,
            fill,
            pixels: vec![fill; width * height],
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The color the grid was created with.
    pub fn fill(&self) -> Color {
        self.fill
    }

    /// The pixel at column `x`, row `y`, if it is inside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Overwrites one pixel.  Out-of-range writes are ignored and
    /// reported as `false`.
    pub fn set(&mut self, x: usize, y: usize, color: Color) -> bool {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
            true
        } else {
            false
        }
    }

    /// Every pixel, row by row.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Mutable rows, top to bottom.  Rows are disjoint, so they can be
    /// handed to different workers.
    pub fn rows_mut(&mut self) -> ChunksMut<Color> {
        self.pixels.chunks_mut(self.width)
    }

    /// The grid as tightly packed RGBA bytes.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_array().to_vec()).collect()
    }

    /// The grid as an `image` buffer, for display sinks that want one.
    pub fn to_image(&self) -> RgbaImage {
        ImageBuffer::from_fn(self.width as u32, self.height as u32, |x, y| {
            let c = self.pixels[(y as usize) * self.width + (x as usize)];
            Rgba::from_channels(c.r, c.g, c.b, c.a)
        })
    }

    /// Writes the grid losslessly.  `.pnm` and `.pam` paths get an
    /// RGBA PAM file, anything else is handed to `image` to pick an
    /// encoder from the extension; `.png` is the one to use.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        write_rgba(path.as_ref(), &self.to_rgba_bytes(), self.width, self.height)
    }
}

/// Writes raw RGBA bytes as an image file.
pub(crate) fn write_rgba(
    path: &Path,
    bytes: &[u8],
    width: usize,
    height: usize,
) -> Result<(), Error> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_ref().map(|e| e.as_str()) {
        Some("pnm") | Some("pam") => {
            let output = File::create(path)?;
            let mut encoder = PNMEncoder::new(output).with_subtype(PNMSubtype::ArbitraryMap);
            encoder.encode(bytes, width as u32, height as u32, ColorType::RGBA(8))?;
        }
        _ => {
            image::save_buffer(path, bytes, width as u32, height as u32, ColorType::RGBA(8))?;
        }
    }
    info!("wrote {}x{} image to {}", width, height, path.display());
    Ok(())
}

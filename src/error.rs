// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The single error type shared by every part of the renderer.

use failure::Fail;
use std::io;

/// Everything that can go wrong while building, rendering, or saving
/// a channel.
#[derive(Debug, Fail)]
pub enum Error {
    /// A matrix handed to the determinant engine was not 3x3.
    #[fail(display = "matrix must be 3x3, got {} rows of {} columns", rows, columns)]
    InvalidDimension {
        /// Number of rows supplied.
        rows: usize,
        /// Length of the first row that was not 3 long, or of the
        /// first row if the row count was the problem.
        columns: usize,
    },

    /// The domain rectangle has a non-positive or non-finite size.
    #[fail(display = "domain rectangle must have a positive, finite width and height")]
    InvalidRegion,

    /// A raster was requested with zero width or height.
    #[fail(display = "raster must be at least 1x1 pixels")]
    EmptyRaster,

    /// The gradient being replaced has identical red endpoints, so the
    /// interpolation parameter cannot be recovered from the pixels.
    #[fail(display = "cannot repalette: previous gradient endpoints share a red value")]
    DegenerateGradient,

    /// No built-in field has the requested name.
    #[fail(display = "unknown field '{}'", _0)]
    UnknownField(String),

    /// A color could not be parsed.
    #[fail(display = "could not parse color '{}'", _0)]
    BadColor(String),

    /// Writing an image failed.
    #[fail(display = "could not write image: {}", _0)]
    Io(#[cause] io::Error),

    /// A render worker panicked before the pass completed.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

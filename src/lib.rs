#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Generalized-normal renderer
//!
//! Given an implicit function of two variables, z = f(x, y), this
//! crate paints how its graph is oriented.  For every pixel the field
//! is sampled at three nearby points, the three samples are lifted into
//! four dimensions as (x, y, z, 1), and the unit vector orthogonal to
//! all three, the "generalized normal", is built out of four 3x3
//! determinants.  Each of the normal's four components gets its own
//! channel: a raster colored by a two-color gradient, where -1 maps to
//! the first color and +1 to the second.
//!
//! The pieces, leaves first: `determinant`, `planes` (pixel to domain
//! mapping), `field`, `normal`, `color`, `raster`, `channel` (one
//! component rendered into one raster) and `scene` (all four channels
//! of one field, rendered concurrently).

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
extern crate log;
extern crate num;

pub mod channel;
pub mod color;
pub mod determinant;
pub mod error;
pub mod field;
pub mod normal;
pub mod planes;
pub mod raster;
pub mod scene;

pub use channel::{ChannelRenderer, RenderState};
pub use color::{interpolate, Color, Gradient};
pub use determinant::determinant;
pub use error::Error;
pub use field::ScalarField;
pub use normal::{Normal4, NormalComponent};
pub use planes::{DomainPoint, DomainRect};
pub use raster::RasterBuffer;
pub use scene::RenderSet;

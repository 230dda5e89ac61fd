// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Generalized normals of a field's graph.
//!
//! Around each pixel we sample the field at three domain points: the
//! pixel's own corner, one step to the right, and one step down.  The
//! three samples `(x, y, z)` lifted to `(x, y, z, 1)` span a plane in
//! four dimensions, and the vector orthogonal to it has the four 3x3
//! minors of the sample matrix as its components:
//!
//! ```text
//!     | y1 z1 1 |      | x1 z1 1 |      | x1 y1 1 |      | x1 y1 z1 |
//! A = | y2 z2 1 |  B = | x2 z2 1 |  C = | x2 y2 1 |  D = | x2 y2 z2 |
//!     | y3 z3 1 |      | x3 z3 1 |      | x3 y3 1 |      | x3 y3 z3 |
//! ```
//!
//! The column order of each minor fixes the sign of its component and
//! therefore which side of the surface reads as "positive".

use crate::determinant::determinant;
use crate::error::Error;
use crate::field::ScalarField;
use crate::planes::{DomainPoint, Pixel, PlaneMapper};

/// Which of the four normal components a channel displays.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NormalComponent {
    /// `nx`, from minor A.
    X,
    /// `ny`, from minor B.
    Y,
    /// `nz`, from minor C.
    Z,
    /// `nw`, from minor D.
    W,
}

impl NormalComponent {
    /// All four, in channel-index order.
    pub const ALL: [NormalComponent; 4] = [
        NormalComponent::X,
        NormalComponent::Y,
        NormalComponent::Z,
        NormalComponent::W,
    ];

    /// 0 through 3 select X, Y, Z, W.  Anything else selects X.
    pub fn from_index(index: i32) -> Self {
        match index {
            1 => NormalComponent::Y,
            2 => NormalComponent::Z,
            3 => NormalComponent::W,
            _ => NormalComponent::X,
        }
    }

    /// The channel index of this component.
    pub fn index(self) -> usize {
        match self {
            NormalComponent::X => 0,
            NormalComponent::Y => 1,
            NormalComponent::Z => 2,
            NormalComponent::W => 3,
        }
    }

    /// Short name, as used for per-channel file names.
    pub fn name(self) -> &'static str {
        match self {
            NormalComponent::X => "nx",
            NormalComponent::Y => "ny",
            NormalComponent::Z => "nz",
            NormalComponent::W => "nw",
        }
    }
}

/// A unit 4-vector.  When the minors are all zero the components are
/// NaN; nothing downstream treats that as an error.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Normal4 {
    /// First component.
    pub nx: f64,
    /// Second component.
    pub ny: f64,
    /// Third component.
    pub nz: f64,
    /// Fourth component.
    pub nw: f64,
}

impl Normal4 {
    /// Normalizes the raw minors.  A zero-length input divides by zero
    /// and yields non-finite components.
    pub fn from_minors(a: f64, b: f64, c: f64, d: f64) -> Self {
        let len = (a * a + b * b + c * c + d * d).sqrt();
        Normal4 {
            nx: a / len,
            ny: b / len,
            nz: c / len,
            nw: d / len,
        }
    }

    /// Picks one component.
    pub fn component(&self, which: NormalComponent) -> f64 {
        match which {
            NormalComponent::X => self.nx,
            NormalComponent::Y => self.ny,
            NormalComponent::Z => self.nz,
            NormalComponent::W => self.nw,
        }
    }
}

// One minor: each sample contributes the row `columns(point, value)`.
fn minor<C>(samples: &[(DomainPoint, f64); 3], columns: C) -> Result<f64, Error>
where
    C: Fn(DomainPoint, f64) -> [f64; 3],
{
    let rows = [
        columns(samples[0].0, samples[0].1),
        columns(samples[1].0, samples[1].1),
        columns(samples[2].0, samples[2].1),
    ];
    determinant(&rows)
}

/// Builds the four minors from three `(point, value)` samples and
/// normalizes them.
pub fn generalized_cross(samples: &[(DomainPoint, f64); 3]) -> Result<Normal4, Error> {
    let a = minor(samples, |p, z| [p.y, z, 1.0])?;
    let b = minor(samples, |p, z| [p.x, z, 1.0])?;
    let c = minor(samples, |p, _| [p.x, p.y, 1.0])?;
    let d = minor(samples, |p, z| [p.x, p.y, z])?;
    Ok(Normal4::from_minors(a, b, c, d))
}

/// Samples the field at the corner of `pixel` and at its right and
/// lower neighbours.
pub fn sample_triangle<F: ScalarField + ?Sized>(
    field: &F,
    mapper: &PlaneMapper,
    pixel: Pixel,
) -> [(DomainPoint, f64); 3] {
    let Pixel(x, y) = pixel;
    let p1 = mapper.pixel_to_point(&Pixel(x, y));
    let p2 = mapper.pixel_to_point(&Pixel(x + 1, y));
    let p3 = mapper.pixel_to_point(&Pixel(x, y + 1));
    [(p1, field.eval(p1)), (p2, field.eval(p2)), (p3, field.eval(p3))]
}

/// The generalized normal of `field` at `pixel`.
pub fn estimate<F: ScalarField + ?Sized>(
    field: &F,
    mapper: &PlaneMapper,
    pixel: Pixel,
) -> Result<Normal4, Error> {
    generalized_cross(&sample_triangle(field, mapper, pixel))
}

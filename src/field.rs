// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Scalar fields and the R-function operators used to build them.
//!
//! The two R-function operators reduce to `w1 + w2 +/- |w1 - w2|`,
//! i.e. twice the larger or twice the smaller of their inputs.  Nested
//! together they carve continuous but creased surfaces, and the creases
//! are what make the normals worth looking at.

use crate::error::Error;
use crate::planes::DomainPoint;

/// A pure function of the plane.  Implementations must be callable
/// from many render workers at once.
pub trait ScalarField: Sync {
    /// Value of the field at `p`.
    fn eval(&self, p: DomainPoint) -> f64;
}

impl<F> ScalarField for F
where
    F: Fn(DomainPoint) -> f64 + Sync,
{
    #[inline]
    fn eval(&self, p: DomainPoint) -> f64 {
        self(p)
    }
}

/// R-conjunction.
#[inline]
pub fn r_and(w1: f64, w2: f64) -> f64 {
    w1 + w2 + ((w1 * w1 + w2 * w2) - 2.0 * w1 * w2).sqrt()
}

/// R-disjunction.
#[inline]
pub fn r_or(w1: f64, w2: f64) -> f64 {
    w1 + w2 - ((w1 * w1 + w2 * w2) - 2.0 * w1 * w2).sqrt()
}

/// The built-in fields, by name.
pub const FIELD_NAMES: &[&str] = &[
    "complex", "waves", "ripple", "diagonal", "bowl", "saddle", "plane", "constant",
];

fn waves(p: DomainPoint) -> f64 {
    p.x.sin() + p.y.cos()
}

fn ripple(p: DomainPoint) -> f64 {
    p.x.cos() * p.y.sin()
}

fn diagonal(p: DomainPoint) -> f64 {
    (p.x + p.y).cos()
}

fn bowl(p: DomainPoint) -> f64 {
    p.x * p.x + p.y * p.y - 200.0
}

fn saddle(p: DomainPoint) -> f64 {
    p.x.sin() * p.y.cos()
}

/// Every primitive joined into one shape.
fn complex(p: DomainPoint) -> f64 {
    r_and(
        r_and(r_or(r_and(waves(p), ripple(p)), diagonal(p)), bowl(p)),
        saddle(p),
    )
}

fn plane(p: DomainPoint) -> f64 {
    p.x
}

fn constant(_: DomainPoint) -> f64 {
    5.0
}

/// Looks up a built-in field by one of the names in `FIELD_NAMES`.
pub fn builtin(name: &str) -> Result<fn(DomainPoint) -> f64, Error> {
    let f: fn(DomainPoint) -> f64 = match name {
        "complex" => complex,
        "waves" => waves,
        "ripple" => ripple,
        "diagonal" => diagonal,
        "bowl" => bowl,
        "saddle" => saddle,
        "plane" => plane,
        "constant" => constant,
        _ => return Err(Error::UnknownField(name.to_string())),
    };
    Ok(f)
}

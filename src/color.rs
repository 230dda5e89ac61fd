// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colors and the two-color gradient that turns a normal component
//! into a pixel.

use crate::error::Error;
use num::clamp;
use std::str::FromStr;

/// An 8-bit RGBA color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    /// Opaque cyan; rasters start out filled with it.
    pub const CYAN: Color = Color::rgba(0, 255, 255, 255);

    /// Constructor.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Opaque constructor.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    /// The channels in RGBA order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

// Truncates toward zero, as an integer cast would, after clamping into
// range.
#[inline]
fn mix(a: u8, b: u8, t: f64) -> u8 {
    let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
    clamp(v, 0.0, 255.0) as u8
}

/// Linear interpolation from `a` (t = 0) to `b` (t = 1), channel by
/// channel.  `t` is clamped to [0, 1] and a NaN `t` yields `a`, so a
/// degenerate normal always lands on a gradient endpoint.
pub fn interpolate(a: Color, b: Color, t: f64) -> Color {
    let t = if t.is_nan() { 0.0 } else { clamp(t, 0.0, 1.0) };
    Color {
        r: mix(a.r, b.r, t),
        g: mix(a.g, b.g, t),
        b: mix(a.b, b.b, t),
        a: mix(a.a, b.a, t),
    }
}

/// Maps a normal component in [-1, 1] onto the gradient parameter.
#[inline]
pub fn normal_to_t(v: f64) -> f64 {
    (1.0 + v) / 2.0
}

/// A two-color linear ramp.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Gradient {
    /// Color at t = 0, i.e. a normal component of -1.
    pub first: Color,
    /// Color at t = 1, i.e. a normal component of +1.
    pub second: Color,
}

impl Default for Gradient {
    fn default() -> Self {
        Gradient {
            first: Color::BLACK,
            second: Color::WHITE,
        }
    }
}

impl Gradient {
    /// Constructor.
    pub fn new(first: Color, second: Color) -> Self {
        Gradient { first, second }
    }

    /// Color at parameter `t`.
    #[inline]
    pub fn at(&self, t: f64) -> Color {
        interpolate(self.first, self.second, t)
    }

    /// Color for a normal component.
    #[inline]
    pub fn for_normal(&self, v: f64) -> Color {
        self.at(normal_to_t(v))
    }

    /// Recovers the parameter that produced `pixel` from its red channel
    /// alone.  This is only an approximation: it ignores the other
    /// channels and inherits the truncation of the first mapping.
    /// `None` when both endpoints share a red value.
    pub fn recover_t(&self, pixel: Color) -> Option<f64> {
        if self.first.r == self.second.r {
            return None;
        }
        let span = f64::from(self.second.r) - f64::from(self.first.r);
        let t = (f64::from(pixel.r) - f64::from(self.first.r)) / span;
        Some(clamp(t, 0.0, 1.0))
    }
}

fn parse_hex(s: &str) -> Option<Color> {
    let digits = s.trim_start_matches('#');
    if !s.starts_with('#') || (digits.len() != 6 && digits.len() != 8) {
        return None;
    }
    let channel = |i: usize| digits.get(i..i + 2).and_then(|d| u8::from_str_radix(d, 16).ok());
    let alpha = if digits.len() == 8 { channel(6)? } else { 255 };
    Some(Color::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
}

fn parse_list(s: &str) -> Option<Color> {
    let parts: Result<Vec<u8>, _> = s.split(',').map(|p| u8::from_str(p.trim())).collect();
    match parts.ok()?.as_slice() {
        [r, g, b] => Some(Color::rgb(*r, *g, *b)),
        [r, g, b, a] => Some(Color::rgba(*r, *g, *b, *a)),
        _ => None,
    }
}

impl FromStr for Color {
    type Err = Error;

    /// Accepts `#rrggbb`, `#rrggbbaa`, `r,g,b` and `r,g,b,a`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = if s.starts_with('#') {
            parse_hex(s)
        } else {
            parse_list(s)
        };
        parsed.ok_or_else(|| Error::BadColor(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Color = Color::rgba(10, 200, 30, 255);
    const B: Color = Color::rgba(250, 0, 31, 0);

    #[test]
    fn endpoints_are_exact() {
        assert_eq!(interpolate(A, B, 0.0), A);
        assert_eq!(interpolate(A, B, 1.0), B);
        assert_eq!(interpolate(B, A, 0.0), B);
        assert_eq!(interpolate(B, A, 1.0), A);
    }

    #[test]
    fn halfway_truncates() {
        let c = interpolate(Color::BLACK, Color::WHITE, 0.5);
        assert_eq!(c, Color::rgba(127, 127, 127, 255));
    }

    #[test]
    fn monotonic_per_channel() {
        let mut prev = interpolate(A, B, 0.0);
        for i in 1..=100 {
            let c = interpolate(A, B, f64::from(i) / 100.0);
            assert!(c.r >= prev.r);
            assert!(c.g <= prev.g);
            assert!(c.b >= prev.b);
            assert!(c.a <= prev.a);
            prev = c;
        }
    }

    #[test]
    fn out_of_range_t_is_clamped() {
        assert_eq!(interpolate(A, B, -3.0), A);
        assert_eq!(interpolate(A, B, 7.5), B);
        assert_eq!(interpolate(A, B, std::f64::INFINITY), B);
        assert_eq!(interpolate(A, B, std::f64::NEG_INFINITY), A);
    }

    #[test]
    fn nan_lands_on_first_color() {
        assert_eq!(interpolate(A, B, std::f64::NAN), A);
        assert_eq!(Gradient::new(A, B).for_normal(std::f64::NAN), A);
    }

    #[test]
    fn normal_range_spans_gradient() {
        let g = Gradient::default();
        assert_eq!(g.for_normal(-1.0), Color::BLACK);
        assert_eq!(g.for_normal(1.0), Color::WHITE);
    }

    #[test]
    fn recover_t_inverts_red() {
        let g = Gradient::new(Color::rgb(0, 9, 9), Color::rgb(200, 9, 9));
        assert_eq!(g.recover_t(Color::rgb(50, 0, 0)), Some(0.25));
        assert_eq!(g.recover_t(Color::rgb(255, 0, 0)), Some(1.0));
        let flat = Gradient::new(Color::rgb(7, 0, 0), Color::rgb(7, 255, 255));
        assert_eq!(flat.recover_t(Color::rgb(7, 3, 3)), None);
    }

    #[test]
    fn parses_colors() {
        assert_eq!("#ff8000".parse::<Color>().unwrap(), Color::rgb(255, 128, 0));
        assert_eq!("#ff800040".parse::<Color>().unwrap(), Color::rgba(255, 128, 0, 64));
        assert_eq!("1, 2, 3".parse::<Color>().unwrap(), Color::rgb(1, 2, 3));
        assert_eq!("1,2,3,4".parse::<Color>().unwrap(), Color::rgba(1, 2, 3, 4));
    }

    #[test]
    fn rejects_bad_colors() {
        for bad in &["", "#ff80", "#gg0000", "1,2", "1,2,3,4,5", "256,0,0", "red"] {
            assert!(bad.parse::<Color>().is_err(), "{}", bad);
        }
    }
}

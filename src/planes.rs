//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a rectangle in the domain of a scalar field, given by its
//! left-top corner and its width and height.

use crate::error::Error;

/// A point in the domain of a scalar field.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DomainPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl DomainPoint {
    /// Constructor.
    pub fn new(x: f64, y: f64) -> Self {
        DomainPoint { x, y }
    }
}

/// The rectangular sub-region of domain space mapped onto a raster.
/// `top` is the smallest y; y grows with the pixel row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DomainRect {
    /// Smallest x.
    pub left: f64,
    /// Smallest y.
    pub top: f64,
    /// Extent along x; must be positive.
    pub width: f64,
    /// Extent along y; must be positive.
    pub height: f64,
}

impl DomainRect {
    /// Builds a rectangle, refusing empty, negative or non-finite
    /// sizes.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Result<Self, Error> {
        let rect = DomainRect {
            left,
            top,
            width,
            height,
        };
        rect.validate()?;
        Ok(rect)
    }

    /// The fields are public, so a rectangle can be built without
    /// `new`; anything that maps onto it checks again.
    pub fn validate(&self) -> Result<(), Error> {
        let finite = self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite();
        if !finite || self.width <= 0.0 || self.height <= 0.0 {
            return Err(Error::InvalidRegion);
        }
        Ok(())
    }
}

/// Describes the x, y of a pixel in a raster.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels of a W x H raster onto a domain rectangle.  Pixel
/// (0, 0) lands on the left-top corner and every pixel is one step
/// wide, so pixel (W, H) would land on the opposite corner.
#[derive(Debug, Clone, Copy)]
pub struct PlaneMapper {
    /// Width and height of the raster.
    pub integral_plane: (usize, usize),
    /// The domain rectangle being sampled.
    pub domain: DomainRect,
    // Domain distance covered by one pixel, horizontally and vertically.
    step: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Fails on an empty raster or an invalid rectangle.
    pub fn new(width: usize, height: usize, domain: DomainRect) -> Result<PlaneMapper, Error> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyRaster);
        }
        domain.validate()?;

        Ok(PlaneMapper {
            integral_plane: (width, height),
            domain,
            step: (
                domain.width / (width as f64),
                domain.height / (height as f64),
            ),
        })
    }

    /// Given a pixel on the integral plane, return the domain point
    /// at its top-left corner.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> DomainPoint {
        DomainPoint {
            x: self.domain.left + (pixel.0 as f64) * self.step.0,
            y: self.domain.top + (pixel.1 as f64) * self.step.1,
        }
    }
}

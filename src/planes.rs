// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Viewport and Resolution structs, which together
//! describe a relationship between a rectangle on the integral plane
//! with an origin at 0,0 and a rectangle on the complex plane bounded
//! by `x_min..=x_max` on the real axis and `y_min..=y_max` on the
//! imaginary axis.
use num::complex::Complex64;

use error::RenderError;

/// The factor by which a double-click zooms into the plane.
pub const ZOOM_CLICK_FACTOR: f64 = 4.0;

/// Describes the width and height of an integral plane that is
/// assumed to start at 0,0.  Both dimensions must be non-zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Number of columns, sampled along the real axis.
    pub width: usize,
    /// Number of rows, sampled along the imaginary axis.
    pub height: usize,
}

impl Resolution {
    /// Constructor.  Fails if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Result<Resolution, RenderError> {
        let resolution = Resolution { width, height };
        resolution.validate()?;
        Ok(resolution)
    }

    /// Checks the invariant for a resolution that may have been built
    /// from its public fields.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Describes that the integral plane has no size.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution {
            width: 800,
            height: 600,
        }
    }
}

/// Describes the x, y of a pixel on the integral plane.  `x` is the
/// column, `y` the row counted from `y_min`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pixel(pub usize, pub usize);

/// Describes the rectangle of the complex plane being sampled,
/// treating the real part as the x-component and the imaginary part
/// as the y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Left edge of the real axis.
    pub x_min: f64,
    /// Right edge of the real axis.
    pub x_max: f64,
    /// Bottom edge of the imaginary axis.
    pub y_min: f64,
    /// Top edge of the imaginary axis.
    pub y_max: f64,
}

impl Viewport {
    /// Constructor.  The bounds may coincide, which collapses that
    /// axis to a single sample, but they may not be inverted and must
    /// all be finite.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Viewport, RenderError> {
        let viewport = Viewport {
            x_min,
            x_max,
            y_min,
            y_max,
        };
        viewport.validate()?;
        Ok(viewport)
    }

    /// Builds a viewport from its left-lower and right-upper corners.
    pub fn from_corners(
        leftlower: Complex64,
        rightupper: Complex64,
    ) -> Result<Viewport, RenderError> {
        Viewport::new(leftlower.re, rightupper.re, leftlower.im, rightupper.im)
    }

    /// Checks the invariant for a viewport that may have been built
    /// from its public fields.
    pub fn validate(&self) -> Result<(), RenderError> {
        let finite = self.x_min.is_finite()
            && self.x_max.is_finite()
            && self.y_min.is_finite()
            && self.y_max.is_finite();
        if !finite || self.x_min > self.x_max || self.y_min > self.y_max {
            return Err(RenderError::InvalidViewport {
                x_min: self.x_min,
                x_max: self.x_max,
                y_min: self.y_min,
                y_max: self.y_max,
            });
        }
        Ok(())
    }

    /// Extent of the real axis.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Extent of the imaginary axis.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// The point in the middle of the viewport.
    pub fn centre(&self) -> Complex64 {
        Complex64::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// The real coordinate of every column.
    pub fn x_axis(&self, width: usize) -> Vec<f64> {
        linspace(self.x_min, self.x_max, width)
    }

    /// The imaginary coordinate of every row.
    pub fn y_axis(&self, height: usize) -> Vec<f64> {
        linspace(self.y_min, self.y_max, height)
    }

    /// Given a pixel on the integral cartesian plane, map it to the
    /// sample point on the complex cartesian plane.  Both corners of
    /// the grid land exactly on the corners of the viewport.
    pub fn pixel_to_point(&self, resolution: Resolution, pixel: Pixel) -> Complex64 {
        Complex64::new(
            sample(self.x_min, self.x_max, resolution.width, pixel.0),
            sample(self.y_min, self.y_max, resolution.height, pixel.1),
        )
    }

    /// A new viewport centred on `centre` whose spans are those of
    /// this one divided by `factor`.
    pub fn zoom_at(&self, centre: Complex64, factor: f64) -> Viewport {
        let half_width = self.width() / factor / 2.0;
        let half_height = self.height() / factor / 2.0;
        Viewport {
            x_min: centre.re - half_width,
            x_max: centre.re + half_width,
            y_min: centre.im - half_height,
            y_max: centre.im + half_height,
        }
    }

    /// A new viewport of the same size moved by `dx` along the real
    /// axis and `dy` along the imaginary one.
    pub fn pan(&self, dx: f64, dy: f64) -> Viewport {
        Viewport {
            x_min: self.x_min + dx,
            x_max: self.x_max + dx,
            y_min: self.y_min + dy,
            y_max: self.y_max + dy,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            x_min: -2.0,
            x_max: 1.0,
            y_min: -1.5,
            y_max: 1.5,
        }
    }
}

/// `count` evenly spaced samples over `min..=max`.  The first sample
/// is `min` and the last is exactly `max`; a single sample is `min`.
pub fn linspace(min: f64, max: f64, count: usize) -> Vec<f64> {
    (0..count).map(|index| sample(min, max, count, index)).collect()
}

fn sample(min: f64, max: f64, count: usize, index: usize) -> f64 {
    if count < 2 || index == 0 {
        return min;
    }
    if index == count - 1 {
        return max;
    }
    let step = (max - min) / ((count - 1) as f64);
    min + (index as f64) * step
}

#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time fractal renderer
//!
//! An escape-time fractal takes a point on the complex plane and
//! repeatedly feeds it through a small recurrence, measuring how many
//! steps it takes for the orbit to leave a disc around the origin.
//! That count is the number used to render the image; points whose
//! orbits never leave within the iteration budget are presumed to be
//! inside the set.
//!
//! The Mandelbrot set is the classic example, with `z² + c`.  Changing
//! the recurrence gives the Julia sets, the Burning Ship, the Tricorn
//! and their Celtic, Perpendicular and Buffalo relatives, the
//! Multibrots, and the convergence fractal of Newton's method on
//! `z³ - 1`.  Callers may also register their own step.
//!
//! `render` samples a `Viewport` at every pixel of a `Resolution` and
//! hands back an `IterationField` of counts, ready for whatever
//! colouring the caller wants to apply.

extern crate failure;
#[macro_use]
extern crate failure_derive;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;

pub mod cancellation;
pub mod custom;
pub mod error;
pub mod grayscale;
pub mod params;
pub mod planes;
pub mod recurrence;
pub mod render;

pub use cancellation::{AtomicBoolChecker, CancellationChecker, NeverCancel};
pub use custom::{CustomRecurrence, CustomSeed};
pub use error::RenderError;
pub use params::{RenderParameters, VariantParams};
pub use planes::{Pixel, Resolution, Viewport, ZOOM_CLICK_FACTOR};
pub use recurrence::FractalVariant;
pub use render::{render, render_with_cancel, IterationField};

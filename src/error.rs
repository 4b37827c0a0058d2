// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The failures a render request can report.  Numeric trouble inside
//! a recurrence (Newton's zero derivative, a failing custom step) is
//! recovered per pixel and never shows up here.

/// Everything that stops a render before or during the sweep.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum RenderError {
    /// One of the grid dimensions is zero.
    #[fail(display = "invalid resolution {}x{}: both dimensions must be positive", width, height)]
    InvalidResolution {
        /// Requested number of columns.
        width: usize,
        /// Requested number of rows.
        height: usize,
    },

    /// The bounds are inverted or not finite.
    #[fail(
        display = "invalid viewport [{}, {}] x [{}, {}]: bounds must be finite and ordered",
        x_min, x_max, y_min, y_max
    )]
    InvalidViewport {
        /// Requested left edge.
        x_min: f64,
        /// Requested right edge.
        x_max: f64,
        /// Requested bottom edge.
        y_min: f64,
        /// Requested top edge.
        y_max: f64,
    },

    /// The bail-out radius is not a positive finite number.
    #[fail(display = "invalid escape radius {}", _0)]
    InvalidEscapeRadius(f64),

    /// The Custom variant was selected without registering a step.
    #[fail(display = "the Custom variant needs a registered recurrence")]
    MissingCustomRecurrence,

    /// The cancellation checker fired before the sweep completed.
    #[fail(display = "render cancelled")]
    Cancelled,
}

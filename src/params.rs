// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! What to render: the family, the iteration budget, the bail-out
//! radius and the handful of numbers some families take.

use num::complex::Complex64;

use custom::CustomRecurrence;
use error::RenderError;
use recurrence::{FractalVariant, DEFAULT_POWER};

/// The default iteration budget.
pub const DEFAULT_MAX_ITERATIONS: usize = 256;

/// The bail-out radius of the classical families.
pub const DEFAULT_ESCAPE_RADIUS: f64 = 2.0;

/// The numbers individual families read.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VariantParams {
    /// The fixed constant of the Julia set, and of a Custom recurrence
    /// seeded with `CustomSeed::PixelIsZ`.
    pub c: Complex64,
    /// The starting `z` of a Custom recurrence seeded with
    /// `CustomSeed::PixelIsC`.
    pub z0: Complex64,
    /// The exponent of the Multibrot.
    pub power: u32,
}

impl Default for VariantParams {
    fn default() -> Self {
        VariantParams {
            c: Complex64::new(-0.7, 0.27015),
            z0: Complex64::new(0.0, 0.0),
            power: DEFAULT_POWER,
        }
    }
}

/// Everything `render` needs beyond the viewport and resolution.
#[derive(Clone, Debug)]
pub struct RenderParameters {
    /// The family to render.
    pub variant: FractalVariant,
    /// The iteration budget; also the value of non-escaping points.
    pub max_iterations: usize,
    /// Points farther than this from the origin have escaped.
    pub escape_radius: f64,
    /// Family-specific numbers.
    pub variant_params: VariantParams,
    /// The registered step for `FractalVariant::Custom`.
    pub custom: Option<CustomRecurrence>,
}

impl RenderParameters {
    /// The reference defaults for `variant`.
    pub fn new(variant: FractalVariant) -> Self {
        RenderParameters {
            variant,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            escape_radius: DEFAULT_ESCAPE_RADIUS,
            variant_params: VariantParams::default(),
            custom: None,
        }
    }

    /// A Custom render with the given step.
    pub fn custom(recurrence: CustomRecurrence) -> Self {
        RenderParameters::new(FractalVariant::Custom).with_custom(recurrence)
    }

    /// Replaces the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Replaces the bail-out radius.
    pub fn with_escape_radius(mut self, escape_radius: f64) -> Self {
        self.escape_radius = escape_radius;
        self
    }

    /// Replaces the Julia constant.
    pub fn with_c(mut self, c: Complex64) -> Self {
        self.variant_params.c = c;
        self
    }

    /// Replaces the initial `z` of a Custom recurrence.
    pub fn with_z0(mut self, z0: Complex64) -> Self {
        self.variant_params.z0 = z0;
        self
    }

    /// Replaces the Multibrot exponent.
    pub fn with_power(mut self, power: u32) -> Self {
        self.variant_params.power = power;
        self
    }

    /// Registers the Custom step.
    pub fn with_custom(mut self, recurrence: CustomRecurrence) -> Self {
        self.custom = Some(recurrence);
        self
    }

    /// Checks the parameters before any pixel is computed.
    pub fn validate(&self) -> Result<(), RenderError> {
        if !(self.escape_radius.is_finite() && self.escape_radius > 0.0) {
            return Err(RenderError::InvalidEscapeRadius(self.escape_radius));
        }
        if self.variant == FractalVariant::Custom && self.custom.is_none() {
            return Err(RenderError::MissingCustomRecurrence);
        }
        Ok(())
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! User-supplied recurrences.  The caller registers a fixed-signature
//! step `(z, c) -> z` that may fail; the renderer runs it through the
//! same escape loop as the built-in families.

use num::complex::Complex64;
use std::fmt;
use std::sync::Arc;

use recurrence::try_escape_count;

/// The signature of a registered step.
pub type StepFn = dyn Fn(Complex64, Complex64) -> Result<Complex64, String> + Send + Sync;

/// Which of `z` and `c` the pixel supplies.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CustomSeed {
    /// The pixel is `c`; `z` starts at the configured initial value.
    PixelIsC,
    /// The pixel is the initial `z`; `c` is the configured constant.
    PixelIsZ,
}

impl Default for CustomSeed {
    fn default() -> Self {
        CustomSeed::PixelIsC
    }
}

/// A registered step together with its seeding rule.  Clones share
/// the same step.
#[derive(Clone)]
pub struct CustomRecurrence {
    step: Arc<StepFn>,
    seed: CustomSeed,
}

impl CustomRecurrence {
    /// Registers `step` with the given seeding rule.
    pub fn new<F>(seed: CustomSeed, step: F) -> Self
    where
        F: Fn(Complex64, Complex64) -> Result<Complex64, String> + Send + Sync + 'static,
    {
        CustomRecurrence {
            step: Arc::new(step),
            seed,
        }
    }

    /// Registers a step that cannot fail.
    pub fn infallible<F>(seed: CustomSeed, step: F) -> Self
    where
        F: Fn(Complex64, Complex64) -> Complex64 + Send + Sync + 'static,
    {
        CustomRecurrence::new(seed, move |z, c| Ok(step(z, c)))
    }

    /// The seeding rule.
    pub fn seed(&self) -> CustomSeed {
        self.seed
    }

    /// The escape loop with the registered step.  The first error the
    /// step reports ends the orbit and is handed back to the caller,
    /// who treats the point as non-escaping.
    pub fn escape_count(
        &self,
        z0: Complex64,
        c: Complex64,
        max_iterations: usize,
        escape_radius: f64,
    ) -> Result<usize, String> {
        try_escape_count(z0, c, max_iterations, escape_radius, &*self.step)
    }
}

impl fmt::Debug for CustomRecurrence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CustomRecurrence")
            .field("seed", &self.seed)
            .finish()
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time recurrences.
//!
//! Every family shares the same loop: test whether `z` has left the
//! disc of radius `escape_radius`, and if it hasn't, apply one update.
//! The count returned is the number of updates applied before the
//! orbit left the disc, or `max_iterations` if it never did.  Only
//! the update differs between families, so each one is a small step
//! function plugged into `escape_count`.

use num::complex::Complex64;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// The tolerance under which Newton's method is considered to have
/// landed on a root of `z³ - 1`.
pub const NEWTON_TOLERANCE: f64 = 1e-6;

/// The default exponent of the Multibrot family.
pub const DEFAULT_POWER: u32 = 3;

/// The closed set of fractal families the renderer knows about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FractalVariant {
    /// `z² + c`, seeded with `z = c`.
    Mandelbrot,
    /// `z² + c` where the pixel is `z` and `c` is a fixed constant.
    Julia,
    /// `(|Re z| + i|Im z|)² + c`.
    BurningShip,
    /// `conj(z)² + c`.
    Tricorn,
    /// Newton's method on `z³ - 1`, seeded with the pixel.
    Newton,
    /// `z^power + c`.
    Multibrot,
    /// `conj(z)² + c`.
    Mandelbar,
    /// `conj(z²) + c`.
    PerpendicularMandelbrot,
    /// `conj((|Re z| + i|Im z|)²) + c`.
    PerpendicularBurningShip,
    /// `(|Re z| - i|Im z|)² + c`.
    PerpendicularBuffalo,
    /// `(|Re z| + i Im z)² + c`.
    CelticMandelbrot,
    /// `(|Re z| - i Im z)² + c`.
    CelticMandelbar,
    /// A caller-supplied step, see `custom::CustomRecurrence`.
    Custom,
}

impl FractalVariant {
    /// Every variant, in menu order.
    pub const ALL: [FractalVariant; 13] = [
        FractalVariant::Mandelbrot,
        FractalVariant::Julia,
        FractalVariant::BurningShip,
        FractalVariant::Tricorn,
        FractalVariant::Newton,
        FractalVariant::Multibrot,
        FractalVariant::Mandelbar,
        FractalVariant::PerpendicularMandelbrot,
        FractalVariant::PerpendicularBurningShip,
        FractalVariant::PerpendicularBuffalo,
        FractalVariant::CelticMandelbrot,
        FractalVariant::CelticMandelbar,
        FractalVariant::Custom,
    ];

    /// The human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            FractalVariant::Mandelbrot => "Mandelbrot",
            FractalVariant::Julia => "Julia",
            FractalVariant::BurningShip => "Burning Ship",
            FractalVariant::Tricorn => "Tricorn",
            FractalVariant::Newton => "Newton",
            FractalVariant::Multibrot => "Multibrot",
            FractalVariant::Mandelbar => "Mandelbar",
            FractalVariant::PerpendicularMandelbrot => "Perpendicular Mandelbrot",
            FractalVariant::PerpendicularBurningShip => "Perpendicular Burning Ship",
            FractalVariant::PerpendicularBuffalo => "Perpendicular Buffalo",
            FractalVariant::CelticMandelbrot => "Celtic Mandelbrot",
            FractalVariant::CelticMandelbar => "Celtic Mandelbar",
            FractalVariant::Custom => "Custom",
        }
    }

    /// Runs the built-in recurrence for this variant from `z0` with
    /// parameter `c`.  `power` is only read by Multibrot.  Returns
    /// `None` for Custom, which has no built-in update.
    pub fn iterate(
        self,
        z0: Complex64,
        c: Complex64,
        max_iterations: usize,
        escape_radius: f64,
        power: u32,
    ) -> Option<usize> {
        let count = match self {
            FractalVariant::Mandelbrot | FractalVariant::Julia => {
                escape_count(z0, c, max_iterations, escape_radius, square)
            }
            FractalVariant::BurningShip => {
                escape_count(z0, c, max_iterations, escape_radius, burning_ship)
            }
            FractalVariant::Tricorn | FractalVariant::Mandelbar => {
                escape_count(z0, c, max_iterations, escape_radius, conjugate_square)
            }
            FractalVariant::PerpendicularMandelbrot => {
                escape_count(z0, c, max_iterations, escape_radius, perpendicular_mandelbrot)
            }
            FractalVariant::PerpendicularBurningShip => escape_count(
                z0,
                c,
                max_iterations,
                escape_radius,
                perpendicular_burning_ship,
            ),
            FractalVariant::PerpendicularBuffalo => {
                escape_count(z0, c, max_iterations, escape_radius, perpendicular_buffalo)
            }
            FractalVariant::CelticMandelbrot => {
                escape_count(z0, c, max_iterations, escape_radius, celtic_mandelbrot)
            }
            FractalVariant::CelticMandelbar => {
                escape_count(z0, c, max_iterations, escape_radius, celtic_mandelbar)
            }
            FractalVariant::Multibrot => escape_count(z0, c, max_iterations, escape_radius, |z, c| {
                powu(z, power) + c
            }),
            FractalVariant::Newton => newton(z0, max_iterations, escape_radius),
            FractalVariant::Custom => return None,
        };
        Some(count)
    }
}

impl fmt::Display for FractalVariant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FractalVariant {
    type Err = String;

    /// Accepts the human-readable name in any case, with spaces,
    /// dashes or underscores between the words.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = squash(s);
        FractalVariant::ALL
            .iter()
            .find(|variant| squash(variant.name()) == wanted)
            .cloned()
            .ok_or_else(|| format!("Unknown fractal type '{}'", s))
    }
}

fn squash(s: &str) -> String {
    s.chars()
        .filter(|ch| !(ch.is_whitespace() || *ch == '-' || *ch == '_'))
        .flat_map(|ch| ch.to_lowercase())
        .collect()
}

/// The loop shared by every family.  Before each update, test for
/// escape; `|z| > escape_radius` is compared as squared magnitudes.
/// A magnitude that overflowed or became NaN counts as escaped.
#[inline]
pub fn escape_count<F>(
    z0: Complex64,
    c: Complex64,
    max_iterations: usize,
    escape_radius: f64,
    step: F,
) -> usize
where
    F: Fn(Complex64, Complex64) -> Complex64,
{
    match try_escape_count(z0, c, max_iterations, escape_radius, |z, c| {
        Ok::<Complex64, Infallible>(step(z, c))
    }) {
        Ok(n) => n,
        Err(never) => match never {},
    }
}

/// `escape_count` for a step that may fail.  The first error ends
/// the orbit and is returned as is.
#[inline]
pub fn try_escape_count<F, E>(
    z0: Complex64,
    c: Complex64,
    max_iterations: usize,
    escape_radius: f64,
    step: F,
) -> Result<usize, E>
where
    F: Fn(Complex64, Complex64) -> Result<Complex64, E>,
{
    let bound = escape_radius * escape_radius;
    let mut z = z0;
    for n in 0..max_iterations {
        if escaped(z, bound) {
            return Ok(n);
        }
        z = step(z, c)?;
    }
    Ok(max_iterations)
}

#[inline]
fn escaped(z: Complex64, bound: f64) -> bool {
    let magnitude = z.norm_sqr();
    magnitude > bound || magnitude.is_nan()
}

/// Newton's method for `z³ - 1`.  Returns the number of updates once
/// the orbit is within `NEWTON_TOLERANCE` of a root; a vanishing
/// derivative counts as never converging.
pub fn newton(z0: Complex64, max_iterations: usize, escape_radius: f64) -> usize {
    let bound = escape_radius * escape_radius;
    let one = Complex64::new(1.0, 0.0);
    let mut z = z0;
    for n in 0..max_iterations {
        if escaped(z, bound) {
            return n;
        }
        let z2 = z * z;
        let residual = z2 * z - one;
        if residual.norm() < NEWTON_TOLERANCE {
            return n;
        }
        let derivative = z2 * 3.0;
        if derivative.norm_sqr() == 0.0 {
            return max_iterations;
        }
        z = z - residual / derivative;
        if !(z.re.is_finite() && z.im.is_finite()) {
            return max_iterations;
        }
    }
    max_iterations
}

/// `z` raised to a non-negative integer power by repeated
/// multiplication.
#[inline]
pub fn powu(z: Complex64, power: u32) -> Complex64 {
    (0..power).fold(Complex64::new(1.0, 0.0), |acc, _| acc * z)
}

#[inline]
fn square(z: Complex64, c: Complex64) -> Complex64 {
    z * z + c
}

#[inline]
fn burning_ship(z: Complex64, c: Complex64) -> Complex64 {
    let w = Complex64::new(z.re.abs(), z.im.abs());
    w * w + c
}

#[inline]
fn conjugate_square(z: Complex64, c: Complex64) -> Complex64 {
    let w = z.conj();
    w * w + c
}

#[inline]
fn perpendicular_mandelbrot(z: Complex64, c: Complex64) -> Complex64 {
    (z * z).conj() + c
}

#[inline]
fn perpendicular_burning_ship(z: Complex64, c: Complex64) -> Complex64 {
    let w = Complex64::new(z.re.abs(), z.im.abs());
    (w * w).conj() + c
}

#[inline]
fn perpendicular_buffalo(z: Complex64, c: Complex64) -> Complex64 {
    let w = Complex64::new(z.re.abs(), -z.im.abs());
    w * w + c
}

#[inline]
fn celtic_mandelbrot(z: Complex64, c: Complex64) -> Complex64 {
    let w = Complex64::new(z.re.abs(), z.im);
    w * w + c
}

#[inline]
fn celtic_mandelbar(z: Complex64, c: Complex64) -> Complex64 {
    let w = Complex64::new(z.re.abs(), -z.im);
    w * w + c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn builtin() -> Vec<FractalVariant> {
        FractalVariant::ALL
            .iter()
            .cloned()
            .filter(|v| *v != FractalVariant::Custom)
            .collect()
    }

    #[test]
    fn zero_budget_returns_zero_for_every_variant() {
        for variant in builtin() {
            assert_eq!(variant.iterate(c(0.1, 0.1), c(0.1, 0.1), 0, 2.0, 3), Some(0));
        }
    }

    #[test]
    fn custom_has_no_builtin_recurrence() {
        assert_eq!(FractalVariant::Custom.iterate(c(0.0, 0.0), c(0.0, 0.0), 10, 2.0, 3), None);
    }

    #[test]
    fn origin_never_escapes_the_mandelbrot() {
        for budget in &[1, 10, 1000] {
            let n = FractalVariant::Mandelbrot.iterate(c(0.0, 0.0), c(0.0, 0.0), *budget, 2.0, 3);
            assert_eq!(n, Some(*budget));
        }
    }

    #[test]
    fn far_points_escape_before_any_update() {
        let p = c(3.0, 0.0);
        for variant in builtin() {
            assert_eq!(variant.iterate(p, p, 50, 2.0, 3), Some(0), "{}", variant);
        }
    }

    #[test]
    fn the_escape_test_is_strict() {
        // z = 2 sits on the circle and stays there: 2² - 2 = 2.
        let p = c(-2.0, 0.0);
        assert_eq!(FractalVariant::Mandelbrot.iterate(p, p, 25, 2.0, 3), Some(25));
    }

    #[test]
    fn mandelbrot_counts_updates_applied() {
        // 1 -> 2 -> 5
        let p = c(1.0, 0.0);
        assert_eq!(FractalVariant::Mandelbrot.iterate(p, p, 10, 2.0, 3), Some(2));
    }

    #[test]
    fn a_larger_radius_delays_the_escape() {
        let p = c(1.0, 0.0);
        // 1 -> 2 -> 5 -> 26
        assert_eq!(FractalVariant::Mandelbrot.iterate(p, p, 10, 10.0, 3), Some(3));
    }

    #[test]
    fn julia_iterates_from_the_pixel() {
        let n = FractalVariant::Julia.iterate(c(0.0, 0.0), c(-0.7, 0.27015), 256, 2.0, 3);
        let m = FractalVariant::Julia.iterate(c(1.5, 1.5), c(-0.7, 0.27015), 256, 2.0, 3);
        assert!(n.unwrap() > m.unwrap());
        assert_eq!(m, Some(0));
    }

    #[test]
    fn burning_ship_folds_both_axes() {
        let z = c(-0.5, -0.5);
        assert_eq!(burning_ship(z, c(0.0, 0.0)), c(0.0, 0.5));
    }

    #[test]
    fn step_functions_follow_their_algebra() {
        let z = c(-1.0, 2.0);
        let zero = c(0.0, 0.0);
        // (-1 + 2i)² = -3 - 4i
        assert_eq!(square(z, zero), c(-3.0, -4.0));
        // (-1 - 2i)² = -3 + 4i
        assert_eq!(conjugate_square(z, zero), c(-3.0, 4.0));
        assert_eq!(perpendicular_mandelbrot(z, zero), c(-3.0, 4.0));
        // (1 + 2i)² = -3 + 4i
        assert_eq!(burning_ship(z, zero), c(-3.0, 4.0));
        assert_eq!(celtic_mandelbrot(z, zero), c(-3.0, 4.0));
        assert_eq!(perpendicular_burning_ship(z, zero), c(-3.0, -4.0));
        // (1 - 2i)² = -3 - 4i
        assert_eq!(perpendicular_buffalo(z, zero), c(-3.0, -4.0));
        assert_eq!(celtic_mandelbar(z, zero), c(-3.0, -4.0));
    }

    #[test]
    fn celtic_forms_differ_on_the_sign_of_the_imaginary_part() {
        let z = c(-1.0, -2.0);
        let zero = c(0.0, 0.0);
        // (1 - 2i)² = -3 - 4i
        assert_eq!(celtic_mandelbrot(z, zero), c(-3.0, -4.0));
        // (1 + 2i)² = -3 + 4i
        assert_eq!(celtic_mandelbar(z, zero), c(-3.0, 4.0));
        // (1 - 2i)² regardless of the sign of Im z
        assert_eq!(perpendicular_buffalo(z, zero), c(-3.0, -4.0));
    }

    #[test]
    fn powu_matches_repeated_multiplication() {
        let z = c(0.5, -1.0);
        assert_eq!(powu(z, 0), c(1.0, 0.0));
        assert_eq!(powu(z, 1), z);
        assert_eq!(powu(z, 3), z * z * z);
    }

    #[test]
    fn multibrot_uses_the_requested_power() {
        // 1 -> 1³ + 1 = 2 -> 2³ + 1 = 9
        let p = c(1.0, 0.0);
        assert_eq!(FractalVariant::Multibrot.iterate(p, p, 10, 2.0, 3), Some(2));
        // 1 -> 1 + 1 = 2 -> 2 + 1 = 3 with the identity power
        assert_eq!(FractalVariant::Multibrot.iterate(p, p, 10, 2.0, 1), Some(2));
        // -1 -> (-1)² - 1 = 0 -> -1 -> ... stays bounded with power 2
        let q = c(-1.0, 0.0);
        assert_eq!(FractalVariant::Multibrot.iterate(q, q, 40, 2.0, 2), Some(40));
    }

    #[test]
    fn newton_stops_on_a_root() {
        assert_eq!(newton(c(1.0, 0.0), 1, 2.0), 0);
        assert_eq!(newton(c(1.0, 0.0), 100, 2.0), 0);
    }

    #[test]
    fn newton_converges_near_a_root() {
        let n = newton(c(1.1, 0.1), 64, 2.0);
        assert!(n > 0 && n < 64);
    }

    #[test]
    fn newton_survives_a_zero_derivative() {
        assert_eq!(newton(c(0.0, 0.0), 30, 2.0), 30);
    }

    #[test]
    fn newton_escapes_like_the_others() {
        assert_eq!(newton(c(2.5, 0.0), 30, 2.0), 0);
    }

    #[test]
    fn a_failing_step_ends_the_orbit() {
        let z0 = c(0.0, 0.0);
        let result = try_escape_count(z0, c(0.5, 0.0), 10, 2.0, |z, c| {
            if z.re > 0.9 {
                Err(z.re)
            } else {
                Ok(z + c)
            }
        });
        // 0 -> 0.5 -> 1.0, and the step refuses 1.0.
        assert_eq!(result, Err(1.0));
        // 0 -> 0.5 -> 1.0 -> 1.5 -> 2.0 -> 2.5 escapes
        let result = try_escape_count(z0, c(0.5, 0.0), 10, 2.0, |z, c| Ok::<_, ()>(z + c));
        assert_eq!(result, Ok(5));
    }

    #[test]
    fn overflow_counts_as_escape() {
        let huge = c(1e300, 1e300);
        assert_eq!(escape_count(huge, huge, 10, 1e300, square), 1);
        let nan = c(std::f64::NAN, 0.0);
        assert_eq!(escape_count(nan, nan, 10, 2.0, square), 0);
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for variant in FractalVariant::ALL.iter() {
            assert_eq!(variant.name().parse::<FractalVariant>(), Ok(*variant));
        }
        assert_eq!("burning_ship".parse::<FractalVariant>(), Ok(FractalVariant::BurningShip));
        assert_eq!(
            "perpendicular-buffalo".parse::<FractalVariant>(),
            Ok(FractalVariant::PerpendicularBuffalo)
        );
        assert!("Sierpinski".parse::<FractalVariant>().is_err());
    }
}

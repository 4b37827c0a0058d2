// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The rasterizer.  Samples the viewport at every pixel of the
//! resolution, seeds the selected recurrence from that sample, and
//! collects the escape counts into a freshly allocated field.

use itertools::iproduct;
use num::complex::Complex64;
use std::time::Instant;

use cancellation::{CancellationChecker, NeverCancel};
use custom::CustomSeed;
use error::RenderError;
use params::RenderParameters;
use planes::{Pixel, Resolution, Viewport};
use recurrence::FractalVariant;

/// The escape counts of one render, stored column by column: the
/// outer index runs along the real axis, the inner one along the
/// imaginary axis starting at `y_min`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IterationField {
    width: usize,
    height: usize,
    max_iterations: usize,
    recurrence_failures: usize,
    counts: Vec<usize>,
}

impl IterationField {
    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The budget the field was rendered with; the largest value any
    /// cell can hold.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// How many pixels a failing Custom step forced to
    /// `max_iterations`.
    pub fn recurrence_failures(&self) -> usize {
        self.recurrence_failures
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Describes that the field holds no cells.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The count at column `i`, row `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<usize> {
        if i < self.width && j < self.height {
            Some(self.counts[i * self.height + j])
        } else {
            None
        }
    }

    /// Every count of column `i`, from `y_min` upwards.
    pub fn column(&self, i: usize) -> Option<&[usize]> {
        if i < self.width {
            Some(&self.counts[i * self.height..(i + 1) * self.height])
        } else {
            None
        }
    }

    /// The raw counts in column-major order.
    pub fn values(&self) -> &[usize] {
        &self.counts
    }

    /// Every pixel with its count, in storage order.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (Pixel, usize)> + 'a {
        iproduct!(0..self.width, 0..self.height)
            .zip(self.counts.iter())
            .map(|((i, j), count)| (Pixel(i, j), *count))
    }
}

/// Renders the viewport at the given resolution.
pub fn render(
    viewport: Viewport,
    resolution: Resolution,
    params: &RenderParameters,
) -> Result<IterationField, RenderError> {
    render_with_cancel(viewport, resolution, params, &NeverCancel)
}

/// Renders the viewport at the given resolution, asking `checker`
/// before each column whether to give up.
pub fn render_with_cancel<C: CancellationChecker>(
    viewport: Viewport,
    resolution: Resolution,
    params: &RenderParameters,
    checker: &C,
) -> Result<IterationField, RenderError> {
    resolution.validate()?;
    viewport.validate()?;
    params.validate()?;

    let started = Instant::now();
    debug!(
        "rendering {} at {}x{} over [{}, {}] x [{}, {}], {} iterations",
        params.variant,
        resolution.width,
        resolution.height,
        viewport.x_min,
        viewport.x_max,
        viewport.y_min,
        viewport.y_max,
        params.max_iterations
    );

    let xs = viewport.x_axis(resolution.width);
    let ys = viewport.y_axis(resolution.height);
    let mut counts = Vec::with_capacity(resolution.len());
    let mut failures = 0;
    let mut first_failure: Option<String> = None;

    for x in &xs {
        if checker.is_cancelled() {
            debug!("render cancelled after {} columns", counts.len() / resolution.height);
            return Err(RenderError::Cancelled);
        }
        for y in &ys {
            let point = Complex64::new(*x, *y);
            match escape_at(point, params) {
                Ok(count) => counts.push(count),
                Err(message) => {
                    failures += 1;
                    if first_failure.is_none() {
                        first_failure = Some(message);
                    }
                    counts.push(params.max_iterations);
                }
            }
        }
    }

    if let Some(message) = first_failure {
        warn!(
            "custom recurrence failed at {} of {} pixels; first error: {}",
            failures,
            counts.len(),
            message
        );
    }
    debug!("rendered {} pixels in {:?}", counts.len(), started.elapsed());

    Ok(IterationField {
        width: resolution.width,
        height: resolution.height,
        max_iterations: params.max_iterations,
        recurrence_failures: failures,
        counts,
    })
}

/// Seeds the selected recurrence from the sampled point and runs it.
/// An error carries the message of a failing Custom step.
fn escape_at(point: Complex64, params: &RenderParameters) -> Result<usize, String> {
    let vp = &params.variant_params;
    let (z0, c) = match params.variant {
        FractalVariant::Julia => (point, vp.c),
        FractalVariant::Newton => (point, Complex64::new(0.0, 0.0)),
        FractalVariant::Custom => {
            let custom = params
                .custom
                .as_ref()
                .ok_or_else(|| "no custom recurrence registered".to_string())?;
            let (z0, c) = match custom.seed() {
                CustomSeed::PixelIsC => (vp.z0, point),
                CustomSeed::PixelIsZ => (point, vp.c),
            };
            return custom.escape_count(z0, c, params.max_iterations, params.escape_radius);
        }
        _ => (point, point),
    };
    params
        .variant
        .iterate(z0, c, params.max_iterations, params.escape_radius, vp.power)
        .ok_or_else(|| format!("{} has no built-in recurrence", params.variant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cancellation::AtomicBoolChecker;
    use custom::CustomRecurrence;
    use std::cell::Cell;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    /// Lets `columns` columns through, then cancels.
    struct AfterColumns {
        columns: usize,
        asked: Cell<usize>,
    }

    impl AfterColumns {
        fn new(columns: usize) -> Self {
            AfterColumns {
                columns,
                asked: Cell::new(0),
            }
        }
    }

    impl CancellationChecker for AfterColumns {
        fn is_cancelled(&self) -> bool {
            let asked = self.asked.get();
            self.asked.set(asked + 1);
            asked >= self.columns
        }
    }

    fn small() -> (Viewport, Resolution) {
        (Viewport::default(), Resolution::new(3, 3).unwrap())
    }

    #[test]
    fn hand_computed_mandelbrot_grid() {
        let (vp, res) = small();
        let params = RenderParameters::new(FractalVariant::Mandelbrot).with_max_iterations(10);
        let field = render(vp, res, &params).unwrap();
        assert_eq!(field.column(0), Some(&[0, 10, 0][..]));
        assert_eq!(field.column(1), Some(&[1, 10, 1][..]));
        assert_eq!(field.column(2), Some(&[1, 2, 1][..]));
    }

    #[test]
    fn get_rejects_out_of_range_pixels() {
        let (vp, res) = small();
        let field = render(vp, res, &RenderParameters::new(FractalVariant::Mandelbrot)).unwrap();
        assert_eq!(field.get(1, 1), Some(256));
        assert_eq!(field.get(3, 0), None);
        assert_eq!(field.get(0, 3), None);
        assert_eq!(field.column(3), None);
    }

    #[test]
    fn iter_walks_column_major() {
        let vp = Viewport::default();
        let res = Resolution::new(2, 3).unwrap();
        let field = render(vp, res, &RenderParameters::new(FractalVariant::Tricorn)).unwrap();
        let pixels: Vec<Pixel> = field.iter().map(|(p, _)| p).collect();
        assert_eq!(
            pixels,
            vec![
                Pixel(0, 0),
                Pixel(0, 1),
                Pixel(0, 2),
                Pixel(1, 0),
                Pixel(1, 1),
                Pixel(1, 2)
            ]
        );
    }

    #[test]
    fn julia_uses_the_configured_constant() {
        // With c = 0 the Julia set is the unit disc.
        let vp = Viewport::new(-0.5, 1.5, 0.0, 0.0).unwrap();
        let res = Resolution::new(3, 1).unwrap();
        let params = RenderParameters::new(FractalVariant::Julia)
            .with_c(Complex64::new(0.0, 0.0))
            .with_max_iterations(20);
        let field = render(vp, res, &params).unwrap();
        // -0.5 stays, 0.5 stays, 1.5 -> 2.25 escapes after one update.
        assert_eq!(field.values(), &[20, 20, 1]);
    }

    #[test]
    fn custom_seeding_follows_the_rule() {
        let vp = Viewport::new(1.0, 1.0, 0.0, 0.0).unwrap();
        let res = Resolution::new(1, 1).unwrap();
        let square = CustomRecurrence::infallible(CustomSeed::PixelIsC, |z, c| z * z + c);
        let params = RenderParameters::custom(square).with_max_iterations(10);
        // z0 = 0, c = 1: 0 -> 1 -> 2 -> 5
        assert_eq!(render(vp, res, &params).unwrap().values(), &[3]);

        let square = CustomRecurrence::infallible(CustomSeed::PixelIsZ, |z, c| z * z + c);
        let params = RenderParameters::custom(square)
            .with_c(Complex64::new(0.0, 0.0))
            .with_max_iterations(10);
        // z0 = 1, c = 0 stays on the unit circle.
        assert_eq!(render(vp, res, &params).unwrap().values(), &[10]);
    }

    #[test]
    fn failing_custom_pixels_do_not_abort_the_field() {
        let vp = Viewport::new(-0.5, 1.5, 0.0, 0.0).unwrap();
        let res = Resolution::new(3, 1).unwrap();
        let step = CustomRecurrence::new(CustomSeed::PixelIsZ, |z, c| {
            if z.re > 0.5 {
                Err("no".to_string())
            } else {
                Ok(z * z + c)
            }
        });
        let params = RenderParameters::custom(step)
            .with_c(Complex64::new(0.0, 0.0))
            .with_max_iterations(7);
        let field = render(vp, res, &params).unwrap();
        assert_eq!(field.values(), &[7, 7, 7]);
        assert_eq!(field.recurrence_failures(), 1);
    }

    #[test]
    fn validation_happens_before_rendering() {
        let vp = Viewport::default();
        let bad = Resolution {
            width: 0,
            height: 10,
        };
        let params = RenderParameters::new(FractalVariant::Mandelbrot);
        assert_eq!(
            render(vp, bad, &params),
            Err(RenderError::InvalidResolution {
                width: 0,
                height: 10
            })
        );
        let inverted = Viewport {
            x_min: 1.0,
            x_max: -1.0,
            y_min: 0.0,
            y_max: 1.0,
        };
        assert!(render(inverted, Resolution::default(), &params).is_err());
        let custom = RenderParameters::new(FractalVariant::Custom);
        assert_eq!(
            render(vp, Resolution::new(2, 2).unwrap(), &custom),
            Err(RenderError::MissingCustomRecurrence)
        );
    }

    #[test]
    fn a_raised_flag_cancels_the_render() {
        let flag = Arc::new(AtomicBool::new(true));
        let checker = AtomicBoolChecker::new(flag);
        let params = RenderParameters::new(FractalVariant::Mandelbrot);
        let result = render_with_cancel(
            Viewport::default(),
            Resolution::new(4, 4).unwrap(),
            &params,
            &checker,
        );
        assert_eq!(result, Err(RenderError::Cancelled));
    }

    #[test]
    fn cancelling_between_columns_returns_no_partial_field() {
        let checker = AfterColumns::new(2);
        let params = RenderParameters::new(FractalVariant::Mandelbrot);
        let result = render_with_cancel(
            Viewport::default(),
            Resolution::new(6, 5).unwrap(),
            &params,
            &checker,
        );
        assert_eq!(result, Err(RenderError::Cancelled));
        // Asked before columns 0, 1 and 2; the third answer stopped it.
        assert_eq!(checker.asked.get(), 3);
    }

    #[test]
    fn the_checker_is_asked_once_per_column() {
        let checker = AfterColumns::new(6);
        let params = RenderParameters::new(FractalVariant::Mandelbrot).with_max_iterations(20);
        let res = Resolution::new(6, 5).unwrap();
        let field = render_with_cancel(Viewport::default(), res, &params, &checker).unwrap();
        assert_eq!(checker.asked.get(), 6);
        assert_eq!(field, render(Viewport::default(), res, &params).unwrap());
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A plain grayscale ramp for writing an iteration field to disk.
//! Points that never escaped come out white, points that escaped
//! immediately come out black.  The top row of the image is `y_max`.

use image::{GrayImage, ImageBuffer, Luma};
use std::io;
use std::path::Path;

use render::IterationField;

/// Maps a count onto `0..=255` linearly over `0..=max_iterations`.
pub fn shade(count: usize, max_iterations: usize) -> u8 {
    if max_iterations == 0 {
        return 0;
    }
    let count = count.min(max_iterations) as u64;
    ((count * 255) / (max_iterations as u64)) as u8
}

/// The field as an image, flipped so the imaginary axis points up.
pub fn to_image(field: &IterationField) -> GrayImage {
    let height = field.height();
    let max = field.max_iterations();
    ImageBuffer::from_fn(field.width() as u32, height as u32, |x, y| {
        let row = height - 1 - (y as usize);
        let count = field.get(x as usize, row).unwrap_or(0);
        Luma([shade(count, max)])
    })
}

/// Writes the field to `path`; the format follows the extension.
pub fn write_image<P: AsRef<Path>>(path: P, field: &IterationField) -> Result<(), io::Error> {
    to_image(field).save(path)
}

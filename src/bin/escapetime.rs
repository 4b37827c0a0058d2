// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate escapetime;
extern crate failure;
#[macro_use]
extern crate log;
extern crate num;

use clap::{App, Arg, ArgMatches};
use escapetime::grayscale::write_image;
use escapetime::{render, FractalVariant, RenderParameters, Resolution, Viewport, ZOOM_CLICK_FACTOR};
use failure::Error;
use num::complex::Complex64;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex64> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex64 { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_fractal(s: &str) -> Result<(), String> {
    match FractalVariant::from_str(s)? {
        FractalVariant::Custom => {
            Err("Custom recurrences can only be registered through the library".to_string())
        }
        _ => Ok(()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const ITERATIONS: &str = "iterations";
const FRACTAL: &str = "fractal";
const CONSTANT: &str = "constant";
const POWER: &str = "power";
const RADIUS: &str = "radius";
const ZOOM: &str = "zoom";
const ZOOM_STEPS: &str = "zoom-steps";
const VERBOSE: &str = "verbose";

fn args<'a>() -> ArgMatches<'a> {
    App::new("escapetime")
        .version("0.1.0")
        .about("Escape-time fractal renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file; the format follows the extension"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .required(false)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2,-1.5")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the complex plane"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .required(false)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("1,1.5")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the complex plane"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("256")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Maximum number of iterations per point"),
        )
        .arg(
            Arg::with_name(FRACTAL)
                .required(false)
                .long(FRACTAL)
                .short("f")
                .takes_value(true)
                .default_value("Mandelbrot")
                .validator(|s| validate_fractal(&s))
                .help("Fractal family, e.g. \"Burning Ship\" or celtic-mandelbar"),
        )
        .arg(
            Arg::with_name(CONSTANT)
                .required(false)
                .long(CONSTANT)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-0.7,0.27015")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse Julia constant"))
                .help("Julia constant"),
        )
        .arg(
            Arg::with_name(POWER)
                .required(false)
                .long(POWER)
                .short("p")
                .takes_value(true)
                .default_value("3")
                .validator(|s| {
                    validate_range(
                        &s,
                        0,
                        64,
                        "Could not parse Multibrot power",
                        "Multibrot power must be between 0 and 64",
                    )
                })
                .help("Multibrot exponent"),
        )
        .arg(
            Arg::with_name(RADIUS)
                .required(false)
                .long(RADIUS)
                .takes_value(true)
                .default_value("2.0")
                .validator(|s| {
                    validate_range(
                        &s,
                        std::f64::MIN_POSITIVE,
                        std::f64::MAX,
                        "Could not parse escape radius",
                        "Escape radius must be positive",
                    )
                })
                .help("Escape radius"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .required(false)
                .long(ZOOM)
                .takes_value(true)
                .allow_hyphen_values(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse zoom point"))
                .help("Zoom into this point, four times closer per step"),
        )
        .arg(
            Arg::with_name(ZOOM_STEPS)
                .required(false)
                .long(ZOOM_STEPS)
                .takes_value(true)
                .default_value("1")
                .validator(|s| {
                    validate_range(
                        &s,
                        0,
                        48,
                        "Could not parse zoom step count",
                        "Zoom step count must be between 0 and 48",
                    )
                })
                .help("Number of zoom steps"),
        )
        .arg(
            Arg::with_name(VERBOSE)
                .long(VERBOSE)
                .short("v")
                .help("Log progress"),
        )
        .get_matches()
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    // All values below have defaults and have passed their validators.
    let (width, height) = parse_pair::<usize>(matches.value_of(SIZE).unwrap_or_default(), 'x')
        .ok_or_else(|| failure::err_msg("Error parsing image dimensions"))?;
    let leftlower = parse_complex(matches.value_of(LEFTLOWER).unwrap_or_default())
        .ok_or_else(|| failure::err_msg("Error parsing left lower point"))?;
    let rightupper = parse_complex(matches.value_of(RIGHTUPPER).unwrap_or_default())
        .ok_or_else(|| failure::err_msg("Error parsing right upper point"))?;
    let constant = parse_complex(matches.value_of(CONSTANT).unwrap_or_default())
        .ok_or_else(|| failure::err_msg("Error parsing Julia constant"))?;
    let variant = FractalVariant::from_str(matches.value_of(FRACTAL).unwrap_or_default())
        .map_err(failure::err_msg)?;
    let iterations = usize::from_str(matches.value_of(ITERATIONS).unwrap_or_default())?;
    let power = u32::from_str(matches.value_of(POWER).unwrap_or_default())?;
    let radius = f64::from_str(matches.value_of(RADIUS).unwrap_or_default())?;

    let resolution = Resolution::new(width, height)?;
    let mut viewport = Viewport::from_corners(leftlower, rightupper)?;
    if let Some(point) = matches.value_of(ZOOM) {
        let point = parse_complex(point).ok_or_else(|| failure::err_msg("Error parsing zoom point"))?;
        let steps = usize::from_str(matches.value_of(ZOOM_STEPS).unwrap_or_default())?;
        for _ in 0..steps {
            viewport = viewport.zoom_at(point, ZOOM_CLICK_FACTOR);
        }
    }

    let params = RenderParameters::new(variant)
        .with_max_iterations(iterations)
        .with_escape_radius(radius)
        .with_c(constant)
        .with_power(power);

    info!("rendering {} over {:?}", variant, viewport);
    let field = render(viewport, resolution, &params)?;

    let output = matches.value_of(OUTPUT).unwrap_or_default();
    write_image(output, &field)?;
    info!("wrote {}x{} image to {}", width, height, output);
    Ok(())
}

fn main() {
    let matches = args();
    let level = if matches.is_present(VERBOSE) { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}

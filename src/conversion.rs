use crate::constants::{Degree, Dms, E7_SCALE, SEXAGESIMAL};

/// Axis of a geographic coordinate, selects the hemisphere letters of the DMS reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Hemisphere reference letter for a signed degree value on this axis
    fn reference(self, degree: Degree) -> char {
        match (self, degree < 0.0) {
            (Axis::Latitude, false) => 'N',
            (Axis::Latitude, true) => 'S',
            (Axis::Longitude, false) => 'E',
            (Axis::Longitude, true) => 'W',
        }
    }
}

/// Convert an E7 fixed-point coordinate to degrees
///
/// The integer part is the value truncated toward zero, the remaining seven digits are the
/// fractional part, so the sign is carried by both parts consistently.
///
/// Arguments
/// ---------
/// * `e7`: a coordinate in degrees scaled by 10^7 (e.g. `355050042`)
///
/// Return
/// ------
/// * the coordinate in degrees (e.g. `35.5050042`)
pub fn e7_to_degree(e7: i64) -> Degree {
    let whole = e7 / E7_SCALE;
    let frac = (e7 - whole * E7_SCALE) as f64 / E7_SCALE as f64;
    whole as f64 + frac
}

/// Convert degrees to the E7 fixed-point encoding, rounded to the nearest unit
pub fn degree_to_e7(degree: Degree) -> i64 {
    (degree * E7_SCALE as f64).round() as i64
}

/// Convert a degree value to a `((D, 1), (M, 1), (S, 1))` triple and its hemisphere letter
///
/// Degrees, minutes and seconds are obtained by truncation of the magnitude `|degree|`, the
/// sign only selects the reference letter. Example for `35.67`:
/// D = 35, M = trunc(0.67 × 60) = 40, S = trunc(0.2 × 60) = 12.
///
/// Arguments
/// ---------
/// * `degree`: a signed latitude or longitude in degrees
/// * `axis`: the axis of the coordinate, `N`/`S` for latitude and `E`/`W` for longitude
///
/// Return
/// ------
/// * `(Dms, char)`: the rational triple and the reference letter
pub fn degree_to_dms_ref(degree: Degree, axis: Axis) -> (Dms, char) {
    let reference = axis.reference(degree);

    let magnitude = degree.abs();
    let minutes = magnitude.fract() * SEXAGESIMAL;
    let seconds = minutes.fract() * SEXAGESIMAL;

    (
        [
            (magnitude.trunc() as u32, 1),
            (minutes.trunc() as u32, 1),
            (seconds.trunc() as u32, 1),
        ],
        reference,
    )
}

/// Rebuild a signed degree value from a DMS rational triple and its reference letter
///
/// Arguments
/// ---------
/// * `dms`: the `(D, M, S)` rationals, denominators of zero are read as zero
/// * `reference`: one of `N`, `S`, `E`, `W`
///
/// Return
/// ------
/// * the degree value, negative for the `S` and `W` hemispheres
pub fn dms_ref_to_degree(dms: &Dms, reference: char) -> Degree {
    let value = |(num, den): (u32, u32)| {
        if den == 0 {
            0.0
        } else {
            num as f64 / den as f64
        }
    };
    let magnitude = value(dms[0])
        + value(dms[1]) / SEXAGESIMAL
        + value(dms[2]) / (SEXAGESIMAL * SEXAGESIMAL);

    match reference {
        'S' | 'W' => -magnitude,
        _ => magnitude,
    }
}

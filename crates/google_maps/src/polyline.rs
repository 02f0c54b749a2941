//! Encoder and decoder for the encoded polyline format used by Google Maps.
//!
//! Every coordinate is stored as the difference to its predecessor, scaled
//! by `10^precision`, zig-zag encoded and split into 5-bit chunks offset by
//! 63 so they form printable ASCII.

use std::{error, fmt};

use model::{Coordinate, InvalidCoordinate};

/// Precision of the polylines returned by the Directions API.
pub const PRECISION: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum PolylineError {
    InvalidCharacter { position: usize, character: char },
    Truncated,
    Overflow { position: usize },
    OutOfRange(InvalidCoordinate),
}

impl error::Error for PolylineError {}

impl fmt::Display for PolylineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PolylineError::InvalidCharacter {
                position,
                character,
            } => write!(f, "Invalid polyline character {character:?} at {position}."),
            PolylineError::Truncated => write!(f, "Polyline ends in the middle of a value."),
            PolylineError::Overflow { position } => {
                write!(f, "Polyline value at {position} is too long.")
            }
            PolylineError::OutOfRange(e) => write!(f, "Polyline leaves the globe: {e}"),
        }
    }
}

pub fn decode(encoded: &str, precision: u32) -> Result<Vec<Coordinate>, PolylineError> {
    let factor = 10_f64.powi(precision as i32);
    let bytes = encoded.as_bytes();

    let mut position = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::with_capacity(bytes.len() / 4);

    while position < bytes.len() {
        lat += next_value(bytes, &mut position)?;
        lng += next_value(bytes, &mut position)?;
        let point = Coordinate::new(lat as f64 / factor, lng as f64 / factor)
            .map_err(PolylineError::OutOfRange)?;
        points.push(point);
    }

    Ok(points)
}

pub fn encode(points: &[Coordinate], precision: u32) -> String {
    let factor = 10_f64.powi(precision as i32);
    let mut encoded = String::with_capacity(points.len() * 8);

    let mut previous = (0_i64, 0_i64);
    for point in points {
        let lat = (point.lat() * factor).round() as i64;
        let lng = (point.lng() * factor).round() as i64;
        push_value(&mut encoded, lat - previous.0);
        push_value(&mut encoded, lng - previous.1);
        previous = (lat, lng);
    }

    encoded
}

fn push_value(encoded: &mut String, value: i64) {
    let mut rest = if value < 0 { !(value << 1) } else { value << 1 };
    while rest >= 0x20 {
        encoded.push(((0x20 | (rest & 0x1f)) as u8 + 63) as char);
        rest >>= 5;
    }
    encoded.push((rest as u8 + 63) as char);
}

fn next_value(bytes: &[u8], position: &mut usize) -> Result<i64, PolylineError> {
    let start = *position;
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes.get(*position).ok_or(PolylineError::Truncated)?;
        if !(63..=126).contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                position: *position,
                character: byte as char,
            });
        }
        if shift > 55 {
            return Err(PolylineError::Overflow { position: start });
        }

        let chunk = (byte - 63) as i64;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        *position += 1;

        if chunk < 0x20 {
            break;
        }
    }

    // zig-zag: the lowest bit carries the sign
    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

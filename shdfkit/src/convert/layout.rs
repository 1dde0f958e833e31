//! Synthetic placement and wire colouring for generated Wokwi diagrams.
//!
//! Both are pure functions of their inputs so regenerating a diagram from
//! the same SHDF document yields an identical file.

use super::Mode;
use crate::document::Position;

/// Position plus optional rotation for one part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Position,
    pub rotate: Option<f64>,
}

impl Placement {
    fn at(top: f64, left: f64) -> Self {
        Self {
            position: Position { top, left },
            rotate: None,
        }
    }

    fn rotated(mut self, degrees: f64) -> Self {
        self.rotate = Some(degrees);
        self
    }
}

/// Default placement for the `index`-th component of a document.
pub fn position_for(simulator_type: &str, index: usize, mode: Mode) -> Placement {
    let i = index as f64;
    match simulator_type {
        "wokwi-arduino-uno" => Placement::at(200.0, 20.0),
        "wokwi-breadboard" => Placement::at(0.0, 100.0),
        "wokwi-resistor" => Placement::at(100.0, 150.0 + i * 50.0).rotated(90.0),
        "wokwi-led" => Placement::at(50.0, 150.0 + i * 50.0),
        "wokwi-pushbutton" => Placement::at(150.0, 150.0 + i * 50.0).rotated(90.0),
        _ => match mode {
            Mode::Logical => Placement::at(100.0, 200.0 + i * 80.0),
            Mode::Physical => Placement::at(50.0 + i * 30.0, 150.0 + i * 40.0),
        },
    }
}

pub const WIRE_PALETTE: [&str; 5] = ["blue", "green", "yellow", "orange", "purple"];

/// Wire colour for a connection between two SHDF endpoints.
///
/// Ground is black, supply is red, LED polarity pins are green. Anything
/// else is picked from [`WIRE_PALETTE`] by the MD5 digest of the sorted
/// endpoint pair, so `(a, b)` and `(b, a)` get the same colour.
pub fn wire_color(from: &str, to: &str) -> &'static str {
    let (first, second) = if from <= to { (from, to) } else { (to, from) };
    let key = format!("{}{}", first, second);
    let lower = key.to_lowercase();

    if lower.contains("gnd") {
        return "black";
    }
    if lower.contains("5v") || lower.contains("3.3v") {
        return "red";
    }
    if lower.contains("anode") || lower.contains("cathode") {
        return "green";
    }

    let digest = md5::compute(key.as_bytes());
    // digest read as a big-endian integer, reduced modulo the palette size
    let index = digest
        .0
        .iter()
        .fold(0usize, |acc, &byte| (acc * 256 + byte as usize) % WIRE_PALETTE.len());
    WIRE_PALETTE[index]
}

//! Builtin footprint generators.
//!
//! When a name cannot be resolved to a library file, these generators
//! produce an equivalent model programmatically, so boards can be built
//! with no footprint files on disk at all.

use crate::kicad::footprint::{Footprint, FootprintAttr, Pad};

/// Names the builtin generators answer to with specific geometry.
pub const BUILTIN_NAMES: [&str; 3] = ["Battery_Cell", "LED_0603", "R_0402"];

/// Returns the builtin model for a footprint name.
///
/// Unknown names get the generic two-pad geometry under the requested
/// name, so every part can be placed even without a real footprint.
#[must_use]
pub fn builtin(name: &str) -> Footprint {
    match name {
        "R_0402" => resistor_0402(),
        "Battery_Cell" => battery_cell(),
        "LED_0603" | "LED_SMD" => {
            let mut fp = led_0603();
            fp.name = name.to_string();
            fp
        }
        other => generic_two_pad(other),
    }
}

/// 0402 chip resistor: two 0.9 mm square pads 1.2 mm apart.
#[must_use]
pub fn resistor_0402() -> Footprint {
    let mut fp = two_pad_smd("R_0402", 0.6, 0.9);
    fp.descr = "Resistor SMD 0402 (1005 metric), generated".to_string();
    fp.tags = "resistor 0402".to_string();
    fp
}

/// 0603 chip LED: two 1.0 mm square pads 1.5 mm apart. Pad 1 is the
/// cathode.
#[must_use]
pub fn led_0603() -> Footprint {
    let mut fp = two_pad_smd("LED_0603", 0.75, 1.0);
    fp.descr = "LED SMD 0603 (1608 metric), generated".to_string();
    fp.tags = "LED 0603".to_string();
    fp
}

/// Coin-cell style battery holder stub: two 1.5 mm through-hole pads
/// 4 mm apart vertically, 0.8 mm drill. Pad 1 is positive.
#[must_use]
pub fn battery_cell() -> Footprint {
    let mut fp = Footprint::new("Battery_Cell");
    fp.descr = "Battery cell holder, generated".to_string();
    fp.tags = "battery cell".to_string();
    fp.set_reference("REF**");
    fp.set_value("Battery_Cell");
    fp.add_pad(Pad::through_hole("1", 0.0, -2.0, 1.5, 0.8));
    fp.add_pad(Pad::through_hole("2", 0.0, 2.0, 1.5, 0.8));
    fp
}

/// Generic two-pad placeholder with 0402 resistor geometry, used for
/// names no builtin covers.
#[must_use]
pub fn generic_two_pad(name: &str) -> Footprint {
    let mut fp = two_pad_smd(name, 0.6, 0.9);
    fp.descr = "Generic two-pad placeholder, generated".to_string();
    fp
}

fn two_pad_smd(name: &str, pad_offset: f64, pad_size: f64) -> Footprint {
    let mut fp = Footprint::new(name);
    fp.attr = Some(FootprintAttr::Smd);
    fp.set_reference("REF**");
    fp.set_value(name);
    fp.add_pad(Pad::smd("1", -pad_offset, 0.0, pad_size, pad_size));
    fp.add_pad(Pad::smd("2", pad_offset, 0.0, pad_size, pad_size));
    fp
}

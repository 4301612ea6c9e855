//! Typed circuit description.
//!
//! A [`Circuit`] is the programmatic alternative to reading a netlist
//! file: parts carry pin tables so connections can be made by pin name
//! ("+", "K") as well as pad number, and the result converts to a
//! [`Netlist`](crate::netlist::Netlist) for export or board import.

use crate::netlist::{Net, Netlist, Node, Part};
use crate::refdes;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::warn;

/// Result type for circuit operations.
pub type CircuitResult<T> = Result<T, CircuitError>;

/// Errors that can occur while building a circuit.
#[derive(Debug, Error)]
pub enum CircuitError {
    /// A reference designator was used for two parts.
    #[error("Duplicate reference designator: {reference}")]
    DuplicateReference {
        /// The repeated designator.
        reference: String,
    },

    /// A connection named a part the circuit does not contain.
    #[error("No part {reference} in circuit {circuit}")]
    UnknownPart {
        /// Circuit name.
        circuit: String,
        /// The missing designator.
        reference: String,
    },

    /// A connection named a pin the part does not have.
    #[error("Part {reference} has no pin {pin}")]
    UnknownPin {
        /// Part designator.
        reference: String,
        /// The pin number or name that failed to resolve.
        pin: String,
    },
}

impl CircuitError {
    /// Creates a duplicate-reference error.
    pub fn duplicate_reference(reference: impl Into<String>) -> Self {
        Self::DuplicateReference {
            reference: reference.into(),
        }
    }

    /// Creates an unknown-part error.
    pub fn unknown_part(circuit: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::UnknownPart {
            circuit: circuit.into(),
            reference: reference.into(),
        }
    }

    /// Creates an unknown-pin error.
    pub fn unknown_pin(reference: impl Into<String>, pin: impl Into<String>) -> Self {
        Self::UnknownPin {
            reference: reference.into(),
            pin: pin.into(),
        }
    }
}

/// One pin of a part: the KiCad pad number plus a human-readable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinDef {
    /// Pad number as it appears on the footprint ("1", "2").
    pub number: String,

    /// Pin name ("+", "-", "A", "K"; "~" for no meaningful name).
    pub name: String,
}

impl PinDef {
    /// Creates a pin definition.
    #[must_use]
    pub fn new(number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
        }
    }
}

/// A part in a circuit, before any board geometry exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartSpec {
    /// Reference designator (e.g., "R1").
    pub reference: String,

    /// Part value (e.g., "330", "Battery").
    pub value: String,

    /// Default footprint name for this part.
    pub footprint: String,

    /// Pin table, in pad-number order.
    pub pins: Vec<PinDef>,
}

impl PartSpec {
    /// Creates a part with the given pin table.
    #[must_use]
    pub fn new(
        reference: impl Into<String>,
        value: impl Into<String>,
        footprint: impl Into<String>,
        pins: Vec<PinDef>,
    ) -> Self {
        Self {
            reference: reference.into(),
            value: value.into(),
            footprint: footprint.into(),
            pins,
        }
    }

    /// Resolves a pin by pad number first, then by pin name.
    ///
    /// Number takes precedence so that "1" always means pad 1 even on
    /// parts with numeric-looking pin names.
    #[must_use]
    pub fn pin(&self, selector: &str) -> Option<&PinDef> {
        self.pins
            .iter()
            .find(|pin| pin.number == selector)
            .or_else(|| self.pins.iter().find(|pin| pin.name == selector))
    }
}

/// A circuit under construction: parts plus named nets.
///
/// Nets keep their declaration order, which becomes the net-code order
/// when the circuit reaches a board.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    name: String,
    parts: Vec<PartSpec>,
    nets: IndexMap<String, Vec<Node>>,
}

impl Circuit {
    /// Creates an empty circuit.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parts: Vec::new(),
            nets: IndexMap::new(),
        }
    }

    /// Returns the circuit name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parts in insertion order.
    #[must_use]
    pub fn parts(&self) -> &[PartSpec] {
        &self.parts
    }

    /// Gets a part by reference designator.
    #[must_use]
    pub fn part(&self, reference: &str) -> Option<&PartSpec> {
        self.parts.iter().find(|p| p.reference == reference)
    }

    /// Adds a part to the circuit.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference designator is already taken.
    pub fn add_part(&mut self, part: PartSpec) -> CircuitResult<()> {
        if self.part(&part.reference).is_some() {
            return Err(CircuitError::duplicate_reference(&part.reference));
        }
        if !refdes::is_well_formed(&part.reference) {
            warn!(
                reference = %part.reference,
                "Reference designator does not follow the prefix-index convention"
            );
        }
        self.parts.push(part);
        Ok(())
    }

    /// Connects one pin of a part to a named net, creating the net on
    /// first use.
    ///
    /// The pin may be given by pad number ("1") or pin name ("+", "A").
    ///
    /// # Errors
    ///
    /// Returns an error if the part or the pin does not exist.
    pub fn connect(&mut self, net: &str, reference: &str, pin: &str) -> CircuitResult<()> {
        let part = self
            .part(reference)
            .ok_or_else(|| CircuitError::unknown_part(&self.name, reference))?;
        let pad = part
            .pin(pin)
            .ok_or_else(|| CircuitError::unknown_pin(reference, pin))?
            .number
            .clone();

        self.nets.entry(net.to_string()).or_default().push(Node {
            reference: reference.to_string(),
            pad,
        });
        Ok(())
    }

    /// Converts the circuit to a netlist, parts and nets in declaration
    /// order.
    #[must_use]
    pub fn to_netlist(&self) -> Netlist {
        let parts = self
            .parts
            .iter()
            .map(|part| Part::new(&part.reference, &part.value).with_footprint(&part.footprint))
            .collect();
        let nets = self
            .nets
            .iter()
            .map(|(name, nodes)| Net {
                name: name.clone(),
                nodes: nodes.clone(),
            })
            .collect();

        Netlist {
            source: Some(self.name.clone()),
            parts,
            nets,
        }
    }
}

/// Battery cell template: pins `+` and `-`, `Battery_Cell` footprint.
#[must_use]
pub fn battery_cell(reference: impl Into<String>) -> PartSpec {
    PartSpec::new(
        reference,
        "Battery",
        "Battery_Cell",
        vec![PinDef::new("1", "+"), PinDef::new("2", "-")],
    )
}

/// Resistor template: unpolarized pins, `R_0402` footprint.
#[must_use]
pub fn resistor(reference: impl Into<String>, value: impl Into<String>) -> PartSpec {
    PartSpec::new(
        reference,
        value,
        "R_0402",
        vec![PinDef::new("1", "~"), PinDef::new("2", "~")],
    )
}

/// LED template: pin 1 is the cathode, pin 2 the anode, `LED_0603`
/// footprint.
#[must_use]
pub fn led(reference: impl Into<String>) -> PartSpec {
    PartSpec::new(
        reference,
        "LED",
        "LED_0603",
        vec![PinDef::new("1", "K"), PinDef::new("2", "A")],
    )
}

/// Builds the LED-flashlight demo circuit: a battery driving an LED
/// through a 330 ohm current-limiting resistor.
///
/// # Errors
///
/// Construction is static, so errors indicate a template regression.
pub fn led_flashlight() -> CircuitResult<Circuit> {
    let mut circuit = Circuit::new("led_flashlight");
    circuit.add_part(battery_cell("B1"))?;
    circuit.add_part(resistor("R1", "330"))?;
    circuit.add_part(led("D1"))?;

    circuit.connect("V+", "B1", "+")?;
    circuit.connect("V+", "R1", "1")?;
    circuit.connect("V+", "D1", "A")?;

    circuit.connect("GND", "B1", "-")?;
    circuit.connect("GND", "D1", "K")?;

    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_resolution_prefers_numbers() {
        let part = battery_cell("B1");
        assert_eq!(part.pin("1").unwrap().name, "+");
        assert_eq!(part.pin("+").unwrap().number, "1");
        assert_eq!(part.pin("-").unwrap().number, "2");
        assert!(part.pin("3").is_none());
    }

    #[test]
    fn duplicate_references_are_rejected() {
        let mut circuit = Circuit::new("test");
        circuit.add_part(resistor("R1", "330")).unwrap();
        let err = circuit.add_part(resistor("R1", "470")).unwrap_err();
        assert!(matches!(
            err,
            CircuitError::DuplicateReference { reference } if reference == "R1"
        ));
    }

    #[test]
    fn connect_rejects_unknown_parts_and_pins() {
        let mut circuit = Circuit::new("test");
        circuit.add_part(led("D1")).unwrap();

        assert!(matches!(
            circuit.connect("N1", "D9", "1"),
            Err(CircuitError::UnknownPart { .. })
        ));
        assert!(matches!(
            circuit.connect("N1", "D1", "B"),
            Err(CircuitError::UnknownPin { .. })
        ));
    }

    #[test]
    fn flashlight_connectivity() {
        let netlist = led_flashlight().unwrap().to_netlist();

        assert_eq!(netlist.source.as_deref(), Some("led_flashlight"));
        assert_eq!(netlist.parts.len(), 3);
        assert_eq!(netlist.part("B1").unwrap().value, "Battery");
        assert_eq!(
            netlist.part("R1").unwrap().footprint.as_deref(),
            Some("R_0402")
        );

        assert_eq!(netlist.nets.len(), 2);
        let vplus = &netlist.nets[0];
        assert_eq!(vplus.name, "V+");
        let pads: Vec<_> = vplus
            .nodes
            .iter()
            .map(|n| (n.reference.as_str(), n.pad.as_str()))
            .collect();
        assert_eq!(pads, vec![("B1", "1"), ("R1", "1"), ("D1", "2")]);

        let gnd = &netlist.nets[1];
        assert_eq!(gnd.name, "GND");
        let pads: Vec<_> = gnd
            .nodes
            .iter()
            .map(|n| (n.reference.as_str(), n.pad.as_str()))
            .collect();
        assert_eq!(pads, vec![("B1", "2"), ("D1", "1")]);
    }

    #[test]
    fn names_resolve_to_pad_numbers() {
        let mut circuit = Circuit::new("test");
        circuit.add_part(led("D1")).unwrap();
        circuit.connect("A_NET", "D1", "A").unwrap();

        let netlist = circuit.to_netlist();
        assert_eq!(netlist.nets[0].nodes[0].pad, "2");
    }
}

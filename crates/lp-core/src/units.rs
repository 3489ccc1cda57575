// lp-core/src/units.rs

use core::fmt;

use uom::si::f64::{
    ElectricCurrent as UomElectricCurrent, ElectricPotential as UomElectricPotential,
    Frequency as UomFrequency, Power as UomPower,
};

// SI quantities (f64) used to derive prefix scales
type Voltage = UomElectricPotential;
type Current = UomElectricCurrent;
type Frequency = UomFrequency;
type Power = UomPower;

/// Display name of a unit as shown in a unit selector (e.g. `"V"`, `"mA"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(String);

impl UnitId {
    pub fn new(unit: impl Into<String>) -> Self {
        Self(unit.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitId {
    fn from(unit: &str) -> Self {
        Self(unit.to_string())
    }
}

impl From<String> for UnitId {
    fn from(unit: String) -> Self {
        Self(unit)
    }
}

impl PartialEq<str> for UnitId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for UnitId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Physical quantity family whose SI-prefixed units are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QuantityKind {
    Voltage,
    Current,
    Frequency,
    Power,
}

impl QuantityKind {
    /// Parse a quantity name as written in panel files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "voltage" | "electric_potential" => Some(Self::Voltage),
            "current" | "electric_current" => Some(Self::Current),
            "frequency" => Some(Self::Frequency),
            "power" => Some(Self::Power),
            _ => None,
        }
    }

    /// Symbol of the unprefixed SI unit.
    pub fn base_symbol(self) -> &'static str {
        match self {
            Self::Voltage => "V",
            Self::Current => "A",
            Self::Frequency => "Hz",
            Self::Power => "W",
        }
    }

    /// Prefixed symbols supported for this quantity, smallest first.
    pub fn prefixed_symbols(self) -> &'static [&'static str] {
        match self {
            Self::Voltage => &["uV", "mV", "kV"],
            Self::Current => &["nA", "uA", "mA"],
            Self::Frequency => &["kHz", "MHz", "GHz"],
            Self::Power => &["uW", "mW", "kW"],
        }
    }

    /// Size of one `symbol` expressed in the base unit, e.g. `mV -> 1e-3`.
    ///
    /// Returns `None` for symbols that are not units of this quantity.
    pub fn scale_of(self, symbol: &str) -> Option<f64> {
        match self {
            Self::Voltage => voltage_scale(symbol),
            Self::Current => current_scale(symbol),
            Self::Frequency => frequency_scale(symbol),
            Self::Power => power_scale(symbol),
        }
    }
}

impl fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Voltage => write!(f, "voltage"),
            Self::Current => write!(f, "current"),
            Self::Frequency => write!(f, "frequency"),
            Self::Power => write!(f, "power"),
        }
    }
}

fn voltage_scale(symbol: &str) -> Option<f64> {
    use uom::si::electric_potential::{kilovolt, microvolt, millivolt, volt};
    let one = match symbol {
        "V" => Voltage::new::<volt>(1.0),
        "uV" | "µV" => Voltage::new::<microvolt>(1.0),
        "mV" => Voltage::new::<millivolt>(1.0),
        "kV" => Voltage::new::<kilovolt>(1.0),
        _ => return None,
    };
    Some(one.get::<volt>())
}

fn current_scale(symbol: &str) -> Option<f64> {
    use uom::si::electric_current::{ampere, microampere, milliampere, nanoampere};
    let one = match symbol {
        "A" => Current::new::<ampere>(1.0),
        "nA" => Current::new::<nanoampere>(1.0),
        "uA" | "µA" => Current::new::<microampere>(1.0),
        "mA" => Current::new::<milliampere>(1.0),
        _ => return None,
    };
    Some(one.get::<ampere>())
}

fn frequency_scale(symbol: &str) -> Option<f64> {
    use uom::si::frequency::{gigahertz, hertz, kilohertz, megahertz};
    let one = match symbol {
        "Hz" => Frequency::new::<hertz>(1.0),
        "kHz" => Frequency::new::<kilohertz>(1.0),
        "MHz" => Frequency::new::<megahertz>(1.0),
        "GHz" => Frequency::new::<gigahertz>(1.0),
        _ => return None,
    };
    Some(one.get::<hertz>())
}

fn power_scale(symbol: &str) -> Option<f64> {
    use uom::si::power::{kilowatt, microwatt, milliwatt, watt};
    let one = match symbol {
        "W" => Power::new::<watt>(1.0),
        "uW" | "µW" => Power::new::<microwatt>(1.0),
        "mW" => Power::new::<milliwatt>(1.0),
        "kW" => Power::new::<kilowatt>(1.0),
        _ => return None,
    };
    Some(one.get::<watt>())
}

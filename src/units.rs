//! Size units and number formatting for reports.
//!
//! Sizes are scaled per channel to bytes, kibibytes or mebibytes using exact
//! powers of 1024. Undefined quantities render as [`UNDEFINED`] so `NaN` and
//! infinities never reach the output.

use serde::Serialize;

pub const KIB: u64 = 1024;
pub const MIB: u64 = 1024 * 1024;

/// Marker printed in place of a quantity that cannot be computed
pub const UNDEFINED: &str = "n/a";

/// Display unit for a byte count
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SizeUnit {
    Bytes,
    Kibibytes,
    Mebibytes,
}

impl SizeUnit {
    /// Pick the unit for `bytes`: lower bound inclusive, upper bound exclusive
    pub fn for_bytes(bytes: u64) -> Self {
        if bytes < KIB {
            SizeUnit::Bytes
        } else if bytes < MIB {
            SizeUnit::Kibibytes
        } else {
            SizeUnit::Mebibytes
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            SizeUnit::Bytes => "B",
            SizeUnit::Kibibytes => "KB",
            SizeUnit::Mebibytes => "MB",
        }
    }

    pub fn divisor(&self) -> u64 {
        match self {
            SizeUnit::Bytes => 1,
            SizeUnit::Kibibytes => KIB,
            SizeUnit::Mebibytes => MIB,
        }
    }

    /// Convert from bytes to this unit
    pub fn convert_from_bytes(&self, bytes: u64) -> f64 {
        bytes as f64 / self.divisor() as f64
    }
}

/// A byte count expressed in its natural unit
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScaledSize {
    pub value: f64,
    pub unit: SizeUnit,
}

impl ScaledSize {
    pub fn from_bytes(bytes: u64) -> Self {
        let unit = SizeUnit::for_bytes(bytes);
        Self {
            value: unit.convert_from_bytes(bytes),
            unit,
        }
    }

    /// Two decimals plus unit symbol, e.g. `1.00 KB`
    pub fn display(&self) -> String {
        format!("{:.2} {}", self.value, self.unit.symbol())
    }
}

pub fn bytes_to_mib(bytes: u64) -> f64 {
    SizeUnit::Mebibytes.convert_from_bytes(bytes)
}

/// Right-align an optional value in `width` columns with two decimals
pub fn format_optional(value: Option<f64>, width: usize) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:>width$.2}", v, width = width),
        None => format!("{:>width$}", UNDEFINED, width = width),
    }
}

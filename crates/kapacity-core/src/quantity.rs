//! Unit-aware resource quantity arithmetic
//!
//! Node capacities arrive as heterogeneous Kubernetes quantity strings
//! (`"4"`, `"3800m"`, `"16Gi"`). All arithmetic happens in a normalized
//! internal unit per resource class: millicores for CPU, bytes for memory.
//! Text only appears at the boundary, via [`ResourceQuantity::parse`] on the
//! way in and [`std::fmt::Display`] on the way out.

use crate::error::CapacityError;
use serde::{Serialize, Serializer};
use std::fmt;

/// The resource dimension a quantity belongs to
///
/// Arithmetic across classes is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceClass {
    Cpu,
    Memory,
}

impl fmt::Display for ResourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceClass::Cpu => write!(f, "cpu"),
            ResourceClass::Memory => write!(f, "memory"),
        }
    }
}

/// A resource amount tagged with its class
///
/// CPU amounts are held in millicores, memory amounts in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceQuantity {
    class: ResourceClass,
    amount: i64,
}

/// Binary memory suffixes, largest first, for canonical rendering
const BINARY_SUFFIXES: [(&str, i64); 6] = [
    ("Ei", 1 << 60),
    ("Pi", 1 << 50),
    ("Ti", 1 << 40),
    ("Gi", 1 << 30),
    ("Mi", 1 << 20),
    ("Ki", 1 << 10),
];

impl ResourceQuantity {
    /// The additive identity for a class
    pub fn zero(class: ResourceClass) -> Self {
        Self { class, amount: 0 }
    }

    /// Build a quantity directly from an amount in canonical internal units
    pub fn from_amount(class: ResourceClass, amount: i64) -> Self {
        Self { class, amount }
    }

    pub fn class(&self) -> ResourceClass {
        self.class
    }

    /// Amount in canonical internal units (millicores or bytes)
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Add two quantities of the same class
    ///
    /// Fails with [`CapacityError::IncompatibleUnits`] when the classes
    /// differ.
    pub fn checked_add(&self, other: &Self) -> Result<Self, CapacityError> {
        if self.class != other.class {
            return Err(CapacityError::IncompatibleUnits {
                left: self.class,
                right: other.class,
            });
        }
        Ok(Self {
            class: self.class,
            amount: self.amount + other.amount,
        })
    }

    /// Normalize a Kubernetes quantity string into internal units
    ///
    /// Accepts plain integers, decimal fractions, the `n`/`u`/`m` CPU
    /// suffixes, and the SI (`k`..`E`) and binary (`Ki`..`Ei`) memory
    /// suffixes. Sub-unit remainders round up, matching apimachinery's
    /// milli-value rounding.
    pub fn parse(class: ResourceClass, text: &str) -> Result<Self, CapacityError> {
        let trimmed = text.trim();
        let malformed = |reason: &str| CapacityError::MalformedQuantity {
            text: text.to_string(),
            reason: reason.to_string(),
        };

        let body_end = trimmed
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(trimmed.len());
        let (body, suffix) = trimmed.split_at(body_end);

        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(malformed("no digits"));
        }
        if frac_part.contains('.') {
            return Err(malformed("multiple decimal points"));
        }

        let digits: i128 = format!("{int_part}{frac_part}")
            .parse()
            .map_err(|_| malformed("unparseable digits"))?;
        let frac_scale = 10i128
            .checked_pow(
                u32::try_from(frac_part.len()).map_err(|_| malformed("fraction too long"))?,
            )
            .ok_or_else(|| malformed("fraction too long"))?;

        // Suffix maps to a rational multiplier relative to the internal unit.
        let (num, den): (i128, i128) = match (class, suffix) {
            (ResourceClass::Cpu, "") => (1000, 1),
            (ResourceClass::Cpu, "m") => (1, 1),
            (ResourceClass::Cpu, "u") => (1, 1_000),
            (ResourceClass::Cpu, "n") => (1, 1_000_000),
            (ResourceClass::Memory, "") => (1, 1),
            (ResourceClass::Memory, "k") => (1_000, 1),
            (ResourceClass::Memory, "M") => (1_000_000, 1),
            (ResourceClass::Memory, "G") => (1_000_000_000, 1),
            (ResourceClass::Memory, "T") => (1_000_000_000_000, 1),
            (ResourceClass::Memory, "P") => (1_000_000_000_000_000, 1),
            (ResourceClass::Memory, "E") => (1_000_000_000_000_000_000, 1),
            (ResourceClass::Memory, "Ki") => (1 << 10, 1),
            (ResourceClass::Memory, "Mi") => (1 << 20, 1),
            (ResourceClass::Memory, "Gi") => (1 << 30, 1),
            (ResourceClass::Memory, "Ti") => (1 << 40, 1),
            (ResourceClass::Memory, "Pi") => (1 << 50, 1),
            (ResourceClass::Memory, "Ei") => (1i128 << 60, 1),
            _ => return Err(malformed("unrecognized suffix")),
        };

        let numerator = digits
            .checked_mul(num)
            .ok_or_else(|| malformed("value out of range"))?;
        let denominator = den
            .checked_mul(frac_scale)
            .ok_or_else(|| malformed("value out of range"))?;
        // Round up so "100n" of CPU is 1m, not 0m.
        let amount = (numerator + denominator - 1) / denominator;

        Ok(Self {
            class,
            amount: i64::try_from(amount).map_err(|_| malformed("value out of range"))?,
        })
    }
}

impl fmt::Display for ResourceQuantity {
    /// Canonical rendering: CPU as whole cores when even, otherwise
    /// millicores (`"9800m"`); memory with the largest binary suffix that
    /// divides evenly (`"2Gi"`), otherwise plain bytes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.amount == 0 {
            return write!(f, "0");
        }
        match self.class {
            ResourceClass::Cpu => {
                if self.amount % 1000 == 0 {
                    write!(f, "{}", self.amount / 1000)
                } else {
                    write!(f, "{}m", self.amount)
                }
            }
            ResourceClass::Memory => {
                for (suffix, unit) in BINARY_SUFFIXES {
                    if self.amount % unit == 0 {
                        return write!(f, "{}{}", self.amount / unit, suffix);
                    }
                }
                write!(f, "{}", self.amount)
            }
        }
    }
}

impl Serialize for ResourceQuantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

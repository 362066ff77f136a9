use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::error::UnitError;

/// Symbol of the canonical signal unit
pub const PICOAMPERE_SYMBOL: &str = "pA";

const AMPERE_SYMBOL: &str = "A";
const PICO_EXPONENT: i32 = -12;

// Longest prefixes first so that "da" wins over "d"
const SI_PREFIXES: [(&str, i32); 22] = [
    ("da", 1),
    ("Y", 24),
    ("Z", 21),
    ("E", 18),
    ("P", 15),
    ("T", 12),
    ("G", 9),
    ("M", 6),
    ("k", 3),
    ("h", 2),
    ("d", -1),
    ("c", -2),
    ("m", -3),
    ("\u{00B5}", -6), // micro sign
    ("\u{03BC}", -6), // greek mu
    ("u", -6),
    ("n", -9),
    ("p", -12),
    ("f", -15),
    ("a", -18),
    ("z", -21),
    ("y", -24),
];

/// The physical quantity a signal unit measures. Only electric current is accepted
/// for ChemStation detector signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Quantity {
    ElectricCurrent,
}

/// A unit of electric current: an SI prefix applied to the ampere.
///
/// Signal values are always reported in picoampere; CurrentUnit carries the scale needed
/// to move a value between its own unit and picoampere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUnit {
    pub quantity: Quantity,
    pub symbol: String,
    pub exponent: i32,
}

impl CurrentUnit {
    /// The canonical unit, picoampere
    pub fn picoampere() -> Self {
        Self {
            quantity: Quantity::ElectricCurrent,
            symbol: String::from(PICOAMPERE_SYMBOL),
            exponent: PICO_EXPONENT,
        }
    }

    /// Parse a unit string as written in a .ch file (e.g. `pA`, `nA`, `A`).
    ///
    /// Fails with IncompatibleUnit when the text does not name an electric current.
    pub fn parse(text: &str) -> Result<Self, UnitError> {
        let trimmed = text.trim();
        let prefix = match trimmed.strip_suffix(AMPERE_SYMBOL) {
            Some(p) => p,
            None => return Err(UnitError::IncompatibleUnit(text.to_string())),
        };

        let exponent = if prefix.is_empty() {
            0
        } else {
            match SI_PREFIXES.iter().find(|(symbol, _)| *symbol == prefix) {
                Some((_, exp)) => *exp,
                None => return Err(UnitError::IncompatibleUnit(text.to_string())),
            }
        };

        Ok(Self {
            quantity: Quantity::ElectricCurrent,
            symbol: trimmed.to_string(),
            exponent,
        })
    }

    /// Multiplier taking a value in this unit to picoampere
    pub fn picoampere_factor(&self) -> f64 {
        10f64.powi(self.exponent - PICO_EXPONENT)
    }

    pub fn to_picoampere(&self, value: f64) -> f64 {
        if self.exponent == PICO_EXPONENT {
            value
        } else {
            value * self.picoampere_factor()
        }
    }

    pub fn from_picoampere(&self, value: f64) -> f64 {
        if self.exponent == PICO_EXPONENT {
            value
        } else {
            value / self.picoampere_factor()
        }
    }
}

impl FromStr for CurrentUnit {
    type Err = UnitError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CurrentUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picoampere_is_identity() {
        let unit = CurrentUnit::parse("pA").unwrap();
        assert_eq!(unit, CurrentUnit::picoampere());
        assert_eq!(unit.to_picoampere(2.165234), 2.165234);
    }

    #[test]
    fn test_prefixed_units() {
        let nano = CurrentUnit::parse("nA").unwrap();
        assert!((nano.to_picoampere(1.5) - 1500.0).abs() < 1e-9);
        let ampere = CurrentUnit::parse("A").unwrap();
        assert!((ampere.to_picoampere(1.0) - 1.0e12).abs() < 1.0);
        let micro = CurrentUnit::parse("\u{00B5}A").unwrap();
        assert_eq!(micro.exponent, -6);
        let femto = CurrentUnit::parse("fA").unwrap();
        assert!((femto.to_picoampere(250.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_round_trip_is_linear() {
        for symbol in ["A", "mA", "uA", "nA", "pA", "fA", "kA"] {
            let unit = CurrentUnit::parse(symbol).unwrap();
            for value in [0.0, -3.25, 1.0e-3, 42.0, 7.5e5] {
                let back = unit.from_picoampere(unit.to_picoampere(value));
                assert!(
                    (back - value).abs() <= 1e-9 * value.abs().max(1.0),
                    "{symbol}: {value} -> {back}"
                );
            }
        }
    }

    #[test]
    fn test_incompatible_units() {
        for symbol in ["mV", "V", "counts", "", "Am", "xA", "25 uV"] {
            match CurrentUnit::parse(symbol) {
                Err(UnitError::IncompatibleUnit(raw)) => assert_eq!(raw, symbol),
                Ok(u) => panic!("{symbol} parsed as {u}"),
            }
        }
    }
}

//! Instrument classification: base symbol, proximity (veto) limit and
//! minimum-risk floor.

use std::fmt;

/// Instrument classes with their own veto limit. Anything unrecognised
/// falls into `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrumentClass {
    Crypto,
    Forex,
    Nas100,
    Petrolio,
    Oro,
    Default,
}

impl InstrumentClass {
    pub const ALL: [InstrumentClass; 6] = [
        InstrumentClass::Crypto,
        InstrumentClass::Forex,
        InstrumentClass::Nas100,
        InstrumentClass::Petrolio,
        InstrumentClass::Oro,
        InstrumentClass::Default,
    ];

    pub fn from_base_symbol(base: &str) -> Self {
        match base.to_uppercase().as_str() {
            "CRYPTO" => InstrumentClass::Crypto,
            "FOREX" => InstrumentClass::Forex,
            "NAS100" => InstrumentClass::Nas100,
            "PETROLIO" => InstrumentClass::Petrolio,
            "ORO" => InstrumentClass::Oro,
            _ => InstrumentClass::Default,
        }
    }

    /// Maximum fractional distance between price and an actionable zone.
    pub fn veto_limit(self) -> f64 {
        match self {
            InstrumentClass::Crypto => 0.010,
            InstrumentClass::Forex => 0.005,
            InstrumentClass::Nas100 => 0.003,
            InstrumentClass::Petrolio => 0.007,
            InstrumentClass::Oro => 0.004,
            InstrumentClass::Default => 0.005,
        }
    }

    /// Minimum stop distance as a fraction of entry.
    pub fn min_risk_pct(self) -> f64 {
        match self {
            InstrumentClass::Crypto => 0.015,
            _ => 0.005,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InstrumentClass::Crypto => "CRYPTO",
            InstrumentClass::Forex => "FOREX",
            InstrumentClass::Nas100 => "NAS100",
            InstrumentClass::Petrolio => "PETROLIO",
            InstrumentClass::Oro => "ORO",
            InstrumentClass::Default => "DEFAULT",
        }
    }
}

impl fmt::Display for InstrumentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An instrument name as typed by the operator, upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    name: String,
}

impl Instrument {
    pub fn new(name: &str) -> Self {
        Instrument {
            name: name.trim().to_uppercase(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Part before the first `/`, e.g. `CRYPTO` for `CRYPTO/USD`.
    pub fn base_symbol(&self) -> &str {
        self.name.split('/').next().unwrap_or_default()
    }

    pub fn class(&self) -> InstrumentClass {
        InstrumentClass::from_base_symbol(self.base_symbol())
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_symbol_splits_on_slash() {
        let inst = Instrument::new("crypto/usd");
        assert_eq!(inst.name(), "CRYPTO/USD");
        assert_eq!(inst.base_symbol(), "CRYPTO");
        assert_eq!(inst.class(), InstrumentClass::Crypto);
    }

    #[test]
    fn base_symbol_without_slash() {
        let inst = Instrument::new("Oro");
        assert_eq!(inst.base_symbol(), "ORO");
        assert_eq!(inst.class(), InstrumentClass::Oro);
    }

    #[test]
    fn unknown_symbol_uses_default_limit() {
        let inst = Instrument::new("BTC/USD");
        assert_eq!(inst.class(), InstrumentClass::Default);
        assert!((inst.class().veto_limit() - 0.005).abs() < f64::EPSILON);
    }

    #[test]
    fn veto_limit_table() {
        let expected = [
            ("CRYPTO", 0.010),
            ("FOREX", 0.005),
            ("NAS100", 0.003),
            ("PETROLIO", 0.007),
            ("ORO", 0.004),
            ("DEFAULT", 0.005),
        ];
        for (name, limit) in expected {
            let class = InstrumentClass::from_base_symbol(name);
            assert_eq!(class.as_str(), name);
            assert!((class.veto_limit() - limit).abs() < f64::EPSILON, "{name}");
        }
    }

    #[test]
    fn min_risk_floor_only_wider_for_crypto() {
        assert!((InstrumentClass::Crypto.min_risk_pct() - 0.015).abs() < f64::EPSILON);
        for class in InstrumentClass::ALL.iter().filter(|c| **c != InstrumentClass::Crypto) {
            assert!((class.min_risk_pct() - 0.005).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let inst = Instrument::new(" crypto/usd ");
        assert_eq!(inst.name(), "CRYPTO/USD");
        assert_eq!(inst.class(), InstrumentClass::Crypto);
    }

    #[test]
    fn empty_name_has_empty_base() {
        let inst = Instrument::new("  ");
        assert_eq!(inst.base_symbol(), "");
        assert_eq!(inst.class(), InstrumentClass::Default);
    }
}

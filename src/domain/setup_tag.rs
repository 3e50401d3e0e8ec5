//! The fixed setup-tag vocabulary.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SetupTag {
    LongPdl,
    LongOb,
    LongFvg,
    LongWl,
    LongPdhBreakout,
    LongWhBreakout,
    LongEq50Support,
    ShortPdh,
    ShortOb,
    ShortFvg,
    ShortWh,
    ShortPdlBreakdown,
    ShortWlBreakdown,
    ShortEq50Resistance,
}

impl SetupTag {
    pub const ALL: [SetupTag; 14] = [
        SetupTag::LongPdl,
        SetupTag::LongOb,
        SetupTag::LongFvg,
        SetupTag::LongWl,
        SetupTag::LongPdhBreakout,
        SetupTag::LongWhBreakout,
        SetupTag::LongEq50Support,
        SetupTag::ShortPdh,
        SetupTag::ShortOb,
        SetupTag::ShortFvg,
        SetupTag::ShortWh,
        SetupTag::ShortPdlBreakdown,
        SetupTag::ShortWlBreakdown,
        SetupTag::ShortEq50Resistance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SetupTag::LongPdl => "LONG: PDL",
            SetupTag::LongOb => "LONG: OB",
            SetupTag::LongFvg => "LONG: FVG",
            SetupTag::LongWl => "LONG: WL",
            SetupTag::LongPdhBreakout => "LONG: PDH (breakout)",
            SetupTag::LongWhBreakout => "LONG: WH (breakout)",
            SetupTag::LongEq50Support => "LONG: EQ50 (Soporte)",
            SetupTag::ShortPdh => "SHORT: PDH",
            SetupTag::ShortOb => "SHORT: OB",
            SetupTag::ShortFvg => "SHORT: FVG",
            SetupTag::ShortWh => "SHORT: WH",
            SetupTag::ShortPdlBreakdown => "SHORT: PDL (breakdown)",
            SetupTag::ShortWlBreakdown => "SHORT: WL (breakdown)",
            SetupTag::ShortEq50Resistance => "SHORT: EQ50 (Resistencia)",
        }
    }
}

impl fmt::Display for SetupTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetupTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SetupTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| format!("unknown setup tag: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn vocabulary_has_fourteen_distinct_strings() {
        let strings: HashSet<&str> = SetupTag::ALL.iter().map(|t| t.as_str()).collect();
        assert_eq!(strings.len(), 14);
    }

    #[test]
    fn parses_every_tag_back() {
        for tag in SetupTag::ALL {
            assert_eq!(tag.as_str().parse::<SetupTag>().unwrap(), tag);
        }
    }

    #[test]
    fn unknown_tag_is_error() {
        assert!("LONG: XYZ".parse::<SetupTag>().is_err());
    }
}

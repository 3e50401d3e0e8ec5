//! Veto (proximity) filtering and hierarchy selection of the winning zone.
//!
//! Candidates are taken in a fixed order (WH, WL, PDH, PDL, OB, FVG, EQ50).
//! A zone survives when it is on the correct side of price for the
//! direction, within the instrument's veto limit and, for EQ50, passes the
//! directional correction. Survivors are stable-sorted by (tier, distance)
//! and the first one wins.

use std::cmp::Ordering;
use std::fmt;

use crate::domain::direction::Direction;
use crate::domain::instrument::{Instrument, InstrumentClass};
use crate::domain::setup_tag::SetupTag;
use crate::domain::zones::ZoneSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneName {
    Wh,
    Wl,
    Pdh,
    Pdl,
    Ob,
    Fvg,
    Eq50,
}

impl ZoneName {
    pub fn as_str(self) -> &'static str {
        match self {
            ZoneName::Wh => "WH",
            ZoneName::Wl => "WL",
            ZoneName::Pdh => "PDH",
            ZoneName::Pdl => "PDL",
            ZoneName::Ob => "OB",
            ZoneName::Fvg => "FVG",
            ZoneName::Eq50 => "EQ50",
        }
    }

    /// 1 is the highest priority.
    pub fn tier(self) -> u8 {
        match self {
            ZoneName::Wh | ZoneName::Wl => 1,
            ZoneName::Pdh | ZoneName::Pdl => 2,
            ZoneName::Ob | ZoneName::Fvg | ZoneName::Eq50 => 3,
        }
    }

    /// Weekly extremes are always tagged as breakout/breakdown setups, and
    /// either daily extreme maps to the PDL (long) or PDH (short) tag.
    pub fn setup_tag(self, direction: Direction) -> SetupTag {
        match (self, direction) {
            (ZoneName::Wh | ZoneName::Wl, Direction::Long) => SetupTag::LongWhBreakout,
            (ZoneName::Wh | ZoneName::Wl, Direction::Short) => SetupTag::ShortWlBreakdown,
            (ZoneName::Pdh | ZoneName::Pdl, Direction::Long) => SetupTag::LongPdl,
            (ZoneName::Pdh | ZoneName::Pdl, Direction::Short) => SetupTag::ShortPdh,
            (ZoneName::Ob, Direction::Long) => SetupTag::LongOb,
            (ZoneName::Ob, Direction::Short) => SetupTag::ShortOb,
            (ZoneName::Fvg, Direction::Long) => SetupTag::LongFvg,
            (ZoneName::Fvg, Direction::Short) => SetupTag::ShortFvg,
            (ZoneName::Eq50, Direction::Long) => SetupTag::LongEq50Support,
            (ZoneName::Eq50, Direction::Short) => SetupTag::ShortEq50Resistance,
        }
    }
}

impl fmt::Display for ZoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneCandidate {
    pub zone: ZoneName,
    pub value: f64,
    /// |price - value| / price
    pub distance_pct: f64,
    pub tier: u8,
    pub tag: SetupTag,
}

/// What happened to EQ50 during filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eq50Check {
    /// Filtered out by direction or proximity before the correction ran.
    NotReached,
    Retained,
    /// Rejected by the directional correction.
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VetoOutcome {
    pub class: InstrumentClass,
    pub limit: f64,
    /// Surviving zones, best first.
    pub candidates: Vec<ZoneCandidate>,
    pub eq50: Eq50Check,
}

impl VetoOutcome {
    pub fn winner(&self) -> Option<&ZoneCandidate> {
        self.candidates.first()
    }

    pub fn approved(&self) -> bool {
        !self.candidates.is_empty()
    }
}

fn zone_values(zones: &ZoneSet) -> [(ZoneName, Option<f64>); 7] {
    [
        (ZoneName::Wh, Some(zones.wh)),
        (ZoneName::Wl, Some(zones.wl)),
        (ZoneName::Pdh, Some(zones.pdh)),
        (ZoneName::Pdl, Some(zones.pdl)),
        (ZoneName::Ob, zones.ob),
        (ZoneName::Fvg, zones.fvg),
        (ZoneName::Eq50, Some(zones.eq50)),
    ]
}

fn on_correct_side(direction: Direction, value: f64, price: f64) -> bool {
    match direction {
        Direction::Long => value < price,
        Direction::Short => value > price,
    }
}

/// EQ50 directional correction: support below price for longs, resistance
/// above price for shorts. Directional eligibility already guarantees this,
/// so the check never rejects anything today; it is kept as a separate step.
fn eq50_correction_holds(direction: Direction, price: f64, eq50: f64) -> bool {
    match direction {
        Direction::Short => price < eq50,
        Direction::Long => price > eq50,
    }
}

pub fn evaluate_veto(
    direction: Direction,
    zones: &ZoneSet,
    price: f64,
    instrument: &Instrument,
) -> VetoOutcome {
    let class = instrument.class();
    let limit = class.veto_limit();
    let mut candidates = Vec::new();
    let mut eq50 = Eq50Check::NotReached;

    for (zone, value) in zone_values(zones) {
        let Some(value) = value else { continue };

        if !on_correct_side(direction, value, price) {
            continue;
        }

        let distance_pct = (price - value).abs() / price;
        if distance_pct > limit {
            continue;
        }

        if zone == ZoneName::Eq50 {
            if eq50_correction_holds(direction, price, zones.eq50) {
                eq50 = Eq50Check::Retained;
            } else {
                eq50 = Eq50Check::Discarded;
                continue;
            }
        }

        candidates.push(ZoneCandidate {
            zone,
            value,
            distance_pct,
            tier: zone.tier(),
            tag: zone.setup_tag(direction),
        });
    }

    candidates.sort_by(|a, b| {
        a.tier.cmp(&b.tier).then(
            a.distance_pct
                .partial_cmp(&b.distance_pct)
                .unwrap_or(Ordering::Equal),
        )
    });

    tracing::debug!(
        %direction,
        class = %class,
        limit,
        survivors = candidates.len(),
        "veto evaluated"
    );

    VetoOutcome {
        class,
        limit,
        candidates,
        eq50,
    }
}

//! Report text and ledger entry for a finished analysis.
//!
//! The full report lists every intermediate value in a fixed section
//! order: zones, state, direction, checklist, veto/hierarchy, final
//! result, risk, signal block.

use crate::domain::checklist::Checklist;
use crate::domain::direction::Direction;
use crate::domain::instrument::InstrumentClass;
use crate::domain::market_state::{Case, MarketState, Rupture};
use crate::domain::risk::RiskPlan;
use crate::domain::signal_request::SignalRequest;
use crate::domain::trade_record::{TradeRecord, TradeStatus};
use crate::domain::veto::{Eq50Check, VetoOutcome, ZoneCandidate};
use crate::domain::zones::ZoneSet;

const BANNER: &str = "===== PROTOCOL D ANALYSIS =====";
const FOOTER: &str = "===== END OF ANALYSIS =====";
const RULE: &str = "----------------------------------";
const MAX_DURATION: &str = "48h";

fn pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn optional_price(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
}

fn mark(ok: bool) -> &'static str {
    if ok { "OK" } else { "NO" }
}

pub fn render_zones(zones: &ZoneSet) -> String {
    let mut out = String::new();
    out.push_str("STEP 1 - BASE ZONES\n");
    out.push_str(&format!(
        "PDH: {:.2} | PDL: {:.2} | EQ50: {:.2} | Range: {:.2}\n",
        zones.pdh, zones.pdl, zones.eq50, zones.daily_range
    ));
    out.push_str(&format!(
        "Candle: {} (C:{:.2} vs O:{:.2}) [OB: {} | FVG: {}] | WH: {:.2} WL: {:.2}\n",
        zones.candle,
        zones.prior_close,
        zones.prior_open,
        optional_price(zones.ob),
        optional_price(zones.fvg),
        zones.wh,
        zones.wl
    ));
    out
}

pub fn render_state(state: &MarketState) -> String {
    let mut out = String::new();
    out.push_str("STEP 2 - STATE AND AUDIT\n");
    out.push_str(&format!(
        "Rupture: {} {} | Territory: {}\n",
        state.rupture,
        pct(state.rupture_distance),
        state.territory
    ));
    out.push_str(&format!("Case: {} ({})\n", state.case, state.context()));
    out
}

pub fn render_direction(direction: Direction) -> String {
    format!("STEP 3 - DIRECTION\nPrimary direction: {direction}\n")
}

pub fn render_checklist(checklist: &Checklist, request: &SignalRequest, zones: &ZoneSet) -> String {
    let mut out = String::new();
    out.push_str("STEP 4 - CHECKLIST\n");
    out.push_str(&format!(
        "P1 Zone: {} | P2 Vol: {} ATR:{:.2} | P3 Range: {} R:{:.2} | P4 Weekly: {}\n",
        mark(checklist.zone),
        mark(checklist.volatility),
        request.atr_5d,
        mark(checklist.range),
        zones.daily_range,
        mark(checklist.weekly)
    ));
    out.push_str(&format!(
        "Total: {}/4 -> {}\n",
        checklist.score(),
        if checklist.passes() { "CONTINUE" } else { "NEUTRAL" }
    ));
    out
}

pub fn render_veto(veto: &VetoOutcome, request: &SignalRequest, state: &MarketState) -> String {
    let mut out = String::new();
    out.push_str("STEP 5-7 - VETO AND HIERARCHY\n");
    out.push_str(&format!(
        "Veto limit [{}]: {}\n",
        request.instrument,
        pct(veto.limit)
    ));
    out.push_str(&format!("Valid zones: {}\n", veto.candidates.len()));
    for candidate in &veto.candidates {
        out.push_str(&format!(
            "  {} {:.2} (tier {}, {})\n",
            candidate.zone,
            candidate.value,
            candidate.tier,
            pct(candidate.distance_pct)
        ));
    }
    match veto.winner() {
        Some(winner) => out.push_str(&format!("Hierarchy winner: {}\n", winner.zone)),
        None => out.push_str("Hierarchy winner: none\n"),
    }
    out.push_str(&format!(
        "EQ50 check: {}\n",
        match veto.eq50 {
            Eq50Check::NotReached => "NOT REACHED",
            Eq50Check::Retained => "OK",
            Eq50Check::Discarded => "DISCARDED",
        }
    ));
    let anti_neutral = state.case == Case::C && veto.class == InstrumentClass::Crypto;
    out.push_str(&format!(
        "Anti-neutral clause: {}\n",
        if anti_neutral { "ACTIVE" } else { "N/A" }
    ));
    out.push_str(&format!(
        "Veto result: {}\n",
        if veto.approved() { "APPROVED" } else { "REJECTED" }
    ));
    out
}

pub fn render_final(winner: &ZoneCandidate, direction: Direction) -> String {
    format!(
        "STEP 8 - FINAL RESULT\nZone: {} | Dist: {} | Final direction: {}\n",
        winner.zone,
        pct(winner.distance_pct),
        direction
    )
}

pub fn render_risk(risk: &RiskPlan, winner: &ZoneCandidate) -> String {
    let mut out = String::new();
    out.push_str("STEP 9 - RISK\n");
    out.push_str(&format!(
        "SL: {:.2} [{}] | Risk: {:.2} pts\n",
        risk.stop_price, risk.stop_type, risk.stop_points
    ));
    out.push_str(&format!(
        "Setup \"{}\": Mult={:.1}\n",
        winner.tag, risk.multiplier
    ));
    out.push_str(&format!(
        "TP: {:.2} | Reward: {:.2} pts | RR: 1:{:.2} -> {}\n",
        risk.target_price,
        risk.target_points,
        risk.reward_ratio,
        if risk.meets_min_ratio { "MEETS 1:2" } else { "BELOW 1:2" }
    ));
    out
}

fn rationale(winner: &ZoneCandidate, state: &MarketState) -> String {
    let mut text = format!(
        "Zone hierarchy winner: {} ({:.2}).",
        winner.zone, winner.value
    );
    if state.rupture != Rupture::None {
        text.push_str(&format!(
            " {} context ({} {}).",
            state.context(),
            state.rupture,
            pct(state.rupture_distance)
        ));
    }
    text
}

pub fn render_signal_block(
    request: &SignalRequest,
    state: &MarketState,
    direction: Direction,
    winner: &ZoneCandidate,
    risk: &RiskPlan,
) -> String {
    let mut out = String::new();
    out.push_str("STEP 10 - SIGNAL\n");
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("SIGNAL {} - {}\n", direction, request.instrument));
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("ID: {}\n", request.id_signal));
    out.push_str(&format!("TAG: {}\n", winner.tag));
    out.push_str(&format!("TERRITORY: {}\n", state.territory));
    out.push_str(&format!("CONTEXT: {}\n", state.context()));
    out.push_str(&format!("ENTRY: {:.2} (market execution)\n", risk.entry_price));
    out.push_str(&format!(
        "STOP LOSS: {:.2} ({:.2} pts = {})\n",
        risk.stop_price,
        risk.stop_points,
        pct(risk.stop_pct)
    ));
    out.push_str(&format!(
        "TAKE PROFIT: {:.2} ({:.2} pts = {})\n",
        risk.target_price,
        risk.target_points,
        pct(risk.target_pct)
    ));
    out.push_str(&format!("R:R: 1:{:.2}\n", risk.reward_ratio));
    out.push_str(&format!("MAX DURATION: {MAX_DURATION}\n"));
    out.push_str(&format!("RATIONALE: {}\n", rationale(winner, state)));
    out.push_str(RULE);
    out.push('\n');
    out
}

/// Everything the full report needs. Only built for an approved veto.
pub struct SignalParts<'a> {
    pub request: &'a SignalRequest,
    pub zones: &'a ZoneSet,
    pub state: &'a MarketState,
    pub direction: Direction,
    pub checklist: &'a Checklist,
    pub veto: &'a VetoOutcome,
    pub winner: &'a ZoneCandidate,
    pub risk: &'a RiskPlan,
}

pub fn render_signal_report(parts: &SignalParts<'_>) -> String {
    let sections = [
        render_zones(parts.zones),
        render_state(parts.state),
        render_direction(parts.direction),
        render_checklist(parts.checklist, parts.request, parts.zones),
        render_veto(parts.veto, parts.request, parts.state),
        render_final(parts.winner, parts.direction),
        render_risk(parts.risk, parts.winner),
        render_signal_block(
            parts.request,
            parts.state,
            parts.direction,
            parts.winner,
            parts.risk,
        ),
    ];

    let mut out = String::new();
    out.push_str(BANNER);
    out.push_str("\n\n");
    out.push_str(&sections.join("\n"));
    out.push_str(FOOTER);
    out
}

/// Short report when the checklist stops the run.
pub fn render_neutral_report(checklist: &Checklist) -> String {
    format!(
        "{BANNER}\n\nSTEP 4 - CHECKLIST: Total: {}/4 -> NEUTRAL\n{FOOTER}",
        checklist.score()
    )
}

/// Short report when no zone survives the veto.
pub fn render_rejected_report(veto: &VetoOutcome) -> String {
    format!(
        "{BANNER}\n\nSTEP 5-7 - VETO AND HIERARCHY: Veto limit {} -> REJECTED\n\
         STEP 8 - FINAL RESULT: NEUTRAL\n{FOOTER}",
        pct(veto.limit)
    )
}

/// Ledger entry for a generated signal, status ABIERTA.
pub fn build_record(parts: &SignalParts<'_>) -> TradeRecord {
    TradeRecord {
        id_signal: parts.request.id_signal.clone(),
        instrument: parts.request.instrument.name().to_string(),
        direction: parts.direction,
        entry_price: parts.risk.entry_price,
        sl_price: parts.risk.stop_price,
        tp_price: parts.risk.target_price,
        setup_tag: parts.winner.tag.as_str().to_string(),
        atr_5d: parts.request.atr_5d,
        context: parts.state.context().to_string(),
        status: TradeStatus::Abierta,
        close_price: None,
        p_g_points: None,
    }
}

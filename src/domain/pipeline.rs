//! Runs the seven stages for one request and short-circuits on the
//! checklist (NEUTRAL) or the veto (REJECTED).

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::domain::checklist::Checklist;
use crate::domain::composer::{self, SignalParts};
use crate::domain::direction::{Direction, resolve_direction};
use crate::domain::error::MiloError;
use crate::domain::market_state::MarketState;
use crate::domain::risk::{DEFAULT_REWARD_MULTIPLIER, RiskPlan, plan_risk};
use crate::domain::signal_request::SignalRequest;
use crate::domain::trade_record::TradeRecord;
use crate::domain::veto::{VetoOutcome, evaluate_veto};
use crate::domain::zones::ZoneSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProtocolParams {
    /// Target distance as a multiple of the stop distance.
    pub reward_multiplier: f64,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        ProtocolParams {
            reward_multiplier: DEFAULT_REWARD_MULTIPLIER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    SignalGenerated,
    /// Stopped by the checklist.
    Neutral,
    /// No zone survived the veto.
    Rejected,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::SignalGenerated => "SIGNAL GENERATED",
            Verdict::Neutral => "NEUTRAL",
            Verdict::Rejected => "REJECTED",
        })
    }
}

#[derive(Debug, Clone)]
pub struct SignalAnalysis {
    pub zones: ZoneSet,
    pub state: MarketState,
    pub direction: Direction,
    pub checklist: Checklist,
    /// Absent when the checklist stopped the run.
    pub veto: Option<VetoOutcome>,
    pub risk: Option<RiskPlan>,
    pub verdict: Verdict,
    pub report: String,
    /// Only present for [`Verdict::SignalGenerated`].
    pub record: Option<TradeRecord>,
}

pub fn evaluate(request: &SignalRequest, params: &ProtocolParams) -> SignalAnalysis {
    let zones = ZoneSet::compute(request);
    let state = MarketState::classify(request.price, &zones);
    let direction = resolve_direction(&state);
    let checklist = Checklist::evaluate(request, &zones);

    tracing::debug!(
        id_signal = %request.id_signal,
        case = %state.case,
        %direction,
        score = checklist.score(),
        "state classified"
    );

    if !checklist.passes() {
        tracing::info!(id_signal = %request.id_signal, "checklist failed, NEUTRAL");
        return SignalAnalysis {
            report: composer::render_neutral_report(&checklist),
            zones,
            state,
            direction,
            checklist,
            veto: None,
            risk: None,
            verdict: Verdict::Neutral,
            record: None,
        };
    }

    let veto = evaluate_veto(direction, &zones, request.price, &request.instrument);
    let Some(winner) = veto.winner().cloned() else {
        tracing::info!(id_signal = %request.id_signal, "veto rejected every zone");
        return SignalAnalysis {
            report: composer::render_rejected_report(&veto),
            zones,
            state,
            direction,
            checklist,
            veto: Some(veto),
            risk: None,
            verdict: Verdict::Rejected,
            record: None,
        };
    };

    let risk = plan_risk(
        direction,
        winner.value,
        request.price,
        veto.class,
        params.reward_multiplier,
    );

    let parts = SignalParts {
        request,
        zones: &zones,
        state: &state,
        direction,
        checklist: &checklist,
        veto: &veto,
        winner: &winner,
        risk: &risk,
    };
    let report = composer::render_signal_report(&parts);
    let record = composer::build_record(&parts);

    tracing::info!(
        id_signal = %request.id_signal,
        setup_tag = %winner.tag,
        %direction,
        "signal generated"
    );

    SignalAnalysis {
        zones,
        state,
        direction,
        checklist,
        veto: Some(veto),
        risk: Some(risk),
        verdict: Verdict::SignalGenerated,
        report,
        record: Some(record),
    }
}

/// [`evaluate`] with any panic turned into [`MiloError::Internal`].
pub fn evaluate_guarded(
    request: &SignalRequest,
    params: &ProtocolParams,
) -> Result<SignalAnalysis, MiloError> {
    guard(|| evaluate(request, params))
}

fn guard<T>(f: impl FnOnce() -> T) -> Result<T, MiloError> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        tracing::error!(%reason, "signal evaluation panicked");
        MiloError::Internal { reason }
    })
}

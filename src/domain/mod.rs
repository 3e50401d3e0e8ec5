//! Core domain types and logic.
//!
//! Pipeline stages in order: [`zones`], [`market_state`], [`direction`],
//! [`checklist`], [`veto`], [`risk`], [`composer`]; [`pipeline`] runs them.

pub mod candle;
pub mod checklist;
pub mod composer;
pub mod config_validation;
pub mod direction;
pub mod error;
pub mod instrument;
pub mod market_state;
pub mod metrics;
pub mod pipeline;
pub mod registry;
pub mod risk;
pub mod setup_tag;
pub mod signal_request;
pub mod toxicity;
pub mod trade_record;
pub mod veto;
pub mod zones;

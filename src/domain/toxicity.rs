//! Toxicity audit over closed trades.
//!
//! A setup tag (or the high-volatility context bucket) is toxic when it has
//! at least `min_sample` closed trades and its loss rate is strictly above
//! `max_loss_rate`.

use std::collections::BTreeMap;

use crate::domain::trade_record::TradeRecord;

pub const DEFAULT_MIN_SAMPLE: usize = 20;
pub const DEFAULT_MAX_LOSS_RATE: f64 = 0.80;
pub const DEFAULT_ATR_CONTEXT_THRESHOLD: f64 = 4500.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ToxicityConfig {
    pub min_sample: usize,
    pub max_loss_rate: f64,
    pub atr_context_threshold: f64,
}

impl Default for ToxicityConfig {
    fn default() -> Self {
        ToxicityConfig {
            min_sample: DEFAULT_MIN_SAMPLE,
            max_loss_rate: DEFAULT_MAX_LOSS_RATE,
            atr_context_threshold: DEFAULT_ATR_CONTEXT_THRESHOLD,
        }
    }
}

impl ToxicityConfig {
    /// Label of the high-volatility context bucket, e.g. `ATR 5D > 4500`.
    pub fn context_label(&self) -> String {
        format!("ATR 5D > {}", self.atr_context_threshold)
    }

    fn is_toxic(&self, bucket: &Bucket) -> Option<ToxicStats> {
        if bucket.total < self.min_sample || bucket.total == 0 {
            return None;
        }
        let loss_rate = bucket.losses as f64 / bucket.total as f64;
        (loss_rate > self.max_loss_rate).then_some(ToxicStats {
            total: bucket.total,
            loss_rate,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToxicStats {
    pub total: usize,
    pub loss_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToxicityReport {
    pub setups: BTreeMap<String, ToxicStats>,
    pub contexts: BTreeMap<String, ToxicStats>,
}

impl ToxicityReport {
    pub fn is_clean(&self) -> bool {
        self.setups.is_empty() && self.contexts.is_empty()
    }

    /// Warnings that apply to a freshly generated trade.
    pub fn warnings_for(&self, record: &TradeRecord, config: &ToxicityConfig) -> Vec<ToxicityWarning> {
        let mut warnings = Vec::new();
        if let Some(stats) = self.setups.get(&record.setup_tag) {
            warnings.push(ToxicityWarning {
                label: record.setup_tag.clone(),
                stats: *stats,
            });
        }
        if record.atr_5d > config.atr_context_threshold {
            let context = config.context_label();
            if let Some(stats) = self.contexts.get(&context) {
                warnings.push(ToxicityWarning {
                    label: context,
                    stats: *stats,
                });
            }
        }
        warnings
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToxicityWarning {
    pub label: String,
    pub stats: ToxicStats,
}

#[derive(Debug, Default)]
struct Bucket {
    total: usize,
    losses: usize,
}

impl Bucket {
    fn add(&mut self, record: &TradeRecord) {
        self.total += 1;
        if record.is_loss() {
            self.losses += 1;
        }
    }
}

pub fn audit(records: &[TradeRecord], config: &ToxicityConfig) -> ToxicityReport {
    let closed = records.iter().filter(|r| !r.is_open());

    let mut by_tag: BTreeMap<&str, Bucket> = BTreeMap::new();
    let mut high_atr = Bucket::default();
    for record in closed {
        by_tag.entry(record.setup_tag.as_str()).or_default().add(record);
        if record.atr_5d > config.atr_context_threshold {
            high_atr.add(record);
        }
    }

    let setups = by_tag
        .iter()
        .filter_map(|(tag, bucket)| config.is_toxic(bucket).map(|s| (tag.to_string(), s)))
        .collect();

    let mut contexts = BTreeMap::new();
    if let Some(stats) = config.is_toxic(&high_atr) {
        contexts.insert(config.context_label(), stats);
    }

    ToxicityReport { setups, contexts }
}

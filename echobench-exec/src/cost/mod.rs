//! Pluggable per-call cost attribution.
//!
//! Vendors price recognition by audio duration or size and synthesis by
//! character count, with per-model rate tables that change often. The
//! pipeline only needs a number per call, so pricing stays behind a trait
//! and hosts supply their own tables.

/// Computes the cost of one call. `usage_amount` is characters for
/// synthesis input and bytes for recognition input.
pub trait CostModel: Send + Sync {
    fn calculate_cost(&self, vendor_id: &str, model_id: Option<&str>, usage_amount: f64) -> f64;
}

/// Attributes zero cost to every call.
pub struct NoCost;

impl CostModel for NoCost {
    fn calculate_cost(&self, _vendor_id: &str, _model_id: Option<&str>, _usage_amount: f64) -> f64 {
        0.0
    }
}

/// A single rate applied to every vendor and model.
pub struct FlatRate {
    pub per_unit: f64,
}

impl CostModel for FlatRate {
    fn calculate_cost(&self, _vendor_id: &str, _model_id: Option<&str>, usage_amount: f64) -> f64 {
        self.per_unit * usage_amount
    }
}

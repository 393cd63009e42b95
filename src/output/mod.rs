mod format;
mod markdown;
mod report;

use crate::pricing::{CostBreakdown, PriceTable, TokenUsage};

pub(crate) use markdown::{default_output_path, write_post};
pub(crate) use report::{print_history_json, print_history_table, print_run_json, print_run_report};

/// Everything known about one completed generation run, for reporting
#[derive(Debug)]
pub(crate) struct RunReport<'a> {
    pub(crate) origin: &'a str,
    pub(crate) model: &'a str,
    pub(crate) response_id: Option<&'a str>,
    pub(crate) stop_reason: Option<&'a str>,
    pub(crate) simulated: bool,
    pub(crate) cache_enabled: bool,
    pub(crate) usage: &'a TokenUsage,
    pub(crate) costs: &'a CostBreakdown,
    pub(crate) prices: &'a PriceTable,
    pub(crate) exchange_rate: f64,
    pub(crate) currency: &'a str,
}

impl RunReport<'_> {
    /// Share of all input tokens that were served from the prompt cache
    pub(crate) fn cache_hit_percent(&self) -> f64 {
        let total = self.usage.total_input_tokens();
        if total > 0 {
            self.usage.cache_read_input_tokens as f64 / total as f64 * 100.0
        } else {
            0.0
        }
    }
}

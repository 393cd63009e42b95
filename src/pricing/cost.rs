//! Cache-aware cost accounting for a single Messages API call.
//!
//! Pure arithmetic over a `TokenUsage` and a `PriceTable`; no I/O and no
//! hidden state, so repeated calls with the same inputs are bit-identical.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Assumed generation runs per month for the savings projection
pub(crate) const ASSUMED_MONTHLY_RUNS: f64 = 50.0;

const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// Rates in USD per million tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct PriceTable {
    pub(crate) input: f64,
    pub(crate) output: f64,
    pub(crate) cache_write: f64,
    pub(crate) cache_read: f64,
}

impl PriceTable {
    pub(crate) fn validate(&self) -> Result<(), AppError> {
        let rates = [
            ("input", self.input),
            ("output", self.output),
            ("cache_write", self.cache_write),
            ("cache_read", self.cache_read),
        ];
        for (rate, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::InvalidPriceTable { rate, value });
            }
        }
        Ok(())
    }
}

/// Token counts reported for one API call
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct TokenUsage {
    pub(crate) input_tokens: i64,
    pub(crate) output_tokens: i64,
    pub(crate) cache_creation_input_tokens: i64,
    pub(crate) cache_read_input_tokens: i64,
}

impl TokenUsage {
    /// All input categories summed: non-cached + cache writes + cache reads
    pub(crate) fn total_input_tokens(&self) -> i64 {
        self.input_tokens + self.cache_creation_input_tokens + self.cache_read_input_tokens
    }

    pub(crate) fn total_tokens(&self) -> i64 {
        self.total_input_tokens() + self.output_tokens
    }

    fn validate(&self) -> Result<(), AppError> {
        let counts = [
            ("input_tokens", self.input_tokens),
            ("output_tokens", self.output_tokens),
            (
                "cache_creation_input_tokens",
                self.cache_creation_input_tokens,
            ),
            ("cache_read_input_tokens", self.cache_read_input_tokens),
        ];
        for (field, value) in counts {
            if value < 0 {
                return Err(AppError::InvalidUsage { field, value });
            }
        }
        Ok(())
    }
}

/// Counterfactual comparison against a run without prompt caching
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct CacheSavings {
    pub(crate) cost_without_cache: f64,
    pub(crate) cost_reduction: f64,
    pub(crate) cost_reduction_percent: f64,
    pub(crate) monthly_savings: f64,
    pub(crate) yearly_savings: f64,
}

/// Per-component cost of one call, in USD
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CostBreakdown {
    pub(crate) cache_read_cost: f64,
    pub(crate) cache_write_cost: f64,
    pub(crate) input_cost: f64,
    pub(crate) output_cost: f64,
    pub(crate) total_cost: f64,
    /// Present only when the run used prompt caching
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) savings: Option<CacheSavings>,
}

impl CostBreakdown {
    /// Total converted at a fixed exchange rate (no live lookup)
    pub(crate) fn total_in_currency(&self, exchange_rate: f64) -> f64 {
        self.total_cost * exchange_rate
    }
}

/// Convert a `TokenUsage` plus a `PriceTable` into a `CostBreakdown`.
///
/// With caching enabled, cache reads and writes are charged at their own
/// rates and only the genuinely non-cached input at the full input rate;
/// the savings block compares against charging every input token at the
/// full rate. With caching disabled, all three input categories are
/// charged at the full input rate and no savings block is produced.
pub(crate) fn compute_cost(
    usage: &TokenUsage,
    prices: &PriceTable,
    cache_enabled: bool,
) -> Result<CostBreakdown, AppError> {
    usage.validate()?;
    prices.validate()?;

    let output_cost = usage.output_tokens as f64 * prices.output / TOKENS_PER_MILLION;

    let (cache_read_cost, cache_write_cost, input_cost) = if cache_enabled {
        (
            usage.cache_read_input_tokens as f64 * prices.cache_read / TOKENS_PER_MILLION,
            usage.cache_creation_input_tokens as f64 * prices.cache_write / TOKENS_PER_MILLION,
            usage.input_tokens as f64 * prices.input / TOKENS_PER_MILLION,
        )
    } else {
        (
            0.0,
            0.0,
            usage.total_input_tokens() as f64 * prices.input / TOKENS_PER_MILLION,
        )
    };

    let total_cost = cache_read_cost + cache_write_cost + input_cost + output_cost;

    let savings = cache_enabled.then(|| {
        let cost_without_cache =
            usage.total_input_tokens() as f64 * prices.input / TOKENS_PER_MILLION + output_cost;
        let cost_reduction = cost_without_cache - total_cost;
        let cost_reduction_percent = if cost_without_cache > 0.0 {
            cost_reduction / cost_without_cache * 100.0
        } else {
            0.0
        };
        let monthly_savings = cost_reduction * ASSUMED_MONTHLY_RUNS;
        CacheSavings {
            cost_without_cache,
            cost_reduction,
            cost_reduction_percent,
            monthly_savings,
            yearly_savings: monthly_savings * 12.0,
        }
    });

    Ok(CostBreakdown {
        cache_read_cost,
        cache_write_cost,
        input_cost,
        output_cost,
        total_cost,
        savings,
    })
}

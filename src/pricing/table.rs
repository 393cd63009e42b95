use crate::error::AppError;

use super::cost::PriceTable;

// Official Anthropic list prices, USD per million tokens.
const SONNET: PriceTable = PriceTable {
    input: 3.00,
    output: 15.00,
    cache_write: 3.75,
    cache_read: 0.30,
};

const OPUS: PriceTable = PriceTable {
    input: 15.00,
    output: 75.00,
    cache_write: 18.75,
    cache_read: 1.50,
};

const OPUS_4_5: PriceTable = PriceTable {
    input: 5.00,
    output: 25.00,
    cache_write: 6.25,
    cache_read: 0.50,
};

const HAIKU: PriceTable = PriceTable {
    input: 0.80,
    output: 4.00,
    cache_write: 1.00,
    cache_read: 0.08,
};

/// Resolve the price table for a model name by family substring.
///
/// Unknown models are an error rather than a silent fallback: a wrong price
/// table produces a plausible-looking but incorrect report.
pub(crate) fn resolve_price_table(model: &str) -> Result<PriceTable, AppError> {
    let model_lower = model.to_ascii_lowercase();
    if model_lower.contains("opus-4-5") || model_lower.contains("opus-4.5") {
        Ok(OPUS_4_5)
    } else if model_lower.contains("opus") {
        Ok(OPUS)
    } else if model_lower.contains("sonnet") {
        Ok(SONNET)
    } else if model_lower.contains("haiku") {
        Ok(HAIKU)
    } else {
        Err(AppError::UnknownModel {
            model: model.to_string(),
        })
    }
}

mod cost;
mod table;

pub(crate) use cost::{
    ASSUMED_MONTHLY_RUNS, CacheSavings, CostBreakdown, PriceTable, TokenUsage, compute_cost,
};
pub(crate) use table::resolve_price_table;

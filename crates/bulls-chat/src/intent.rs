//! Topic flags for a query.
//!
//! Each flag is set when any of its keywords occurs as a case-insensitive
//! substring of the query. Flags are independent; several may be set.

use bulls_core::QueryIntent;

const FINANCIAL_KEYWORDS: &[&str] = &[
    "revenue",
    "profit",
    "earnings",
    "pe",
    "ratio",
    "financial",
    "balance sheet",
    "income",
];
const NEWS_KEYWORDS: &[&str] = &["news", "latest", "recent", "announcement", "update"];
const TECHNICAL_KEYWORDS: &[&str] = &[
    "chart",
    "technical",
    "resistance",
    "support",
    "trend",
    "pattern",
];
const COMPARISON_KEYWORDS: &[&str] = &["compare", "versus", "vs", "peer", "competitor"];
const FORECAST_KEYWORDS: &[&str] = &[
    "forecast",
    "predict",
    "future",
    "target",
    "potential",
    "growth",
];

fn mentions(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

/// Derive topic flags from raw query text.
pub fn analyze_intent(query: &str) -> QueryIntent {
    let lower = query.to_lowercase();
    QueryIntent {
        needs_financial_data: mentions(&lower, FINANCIAL_KEYWORDS),
        needs_news: mentions(&lower, NEWS_KEYWORDS),
        needs_technical: mentions(&lower, TECHNICAL_KEYWORDS),
        needs_comparison: mentions(&lower, COMPARISON_KEYWORDS),
        needs_forecast: mentions(&lower, FORECAST_KEYWORDS),
    }
}

//! Built-in answer tables and knowledge-base passages.
//!
//! The canned answers double as passages for the retriever, so the keyword
//! matcher and the retriever agree on wording for the same topic.

/// Canned answer for the financial keyword group.
pub const FINANCIAL_ANSWER: &str = "Tata Power's Q3 FY24 results indicate robust performance with revenue growth of 12% YoY, driven by improved operational efficiency and strategic expansion in renewable energy sectors.";

/// Canned answer for the sustainability keyword group.
pub const SUSTAINABILITY_ANSWER: &str = "The company's sustainability initiatives include a commitment to achieve net-zero emissions by 2045, with significant investments in solar and wind energy projects across India.";

/// Canned answer for the market keyword group.
pub const MARKET_ANSWER: &str = "Tata Power's market position remains strong with a diversified portfolio spanning conventional and renewable energy, transmission, and distribution networks across multiple states.";

const RENEWABLE_GROWTH_ANSWER: &str = "Based on Tata Power's latest financial reports, the company has shown strong growth in renewable energy investments, with a 25% increase in clean energy capacity over the past year.";

const EV_CHARGING_ANSWER: &str = "Recent developments show Tata Power's focus on electric vehicle charging infrastructure, with plans to install 10,000 charging points by 2025, positioning the company well for the EV transition.";

/// An ordered keyword group and the answer it selects.
#[derive(Debug, Clone)]
pub struct KeywordGroup {
    /// Lowercase substrings; any one of them selects the group.
    pub keywords: Vec<String>,
    pub answer: String,
}

impl KeywordGroup {
    pub fn new(keywords: &[&str], answer: &str) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            answer: answer.to_string(),
        }
    }
}

/// A retrievable knowledge-base passage.
#[derive(Debug, Clone)]
pub struct Passage {
    /// Stable reference id reported as an answer source.
    pub id: String,
    pub text: String,
}

impl Passage {
    pub fn new(id: &str, text: &str) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
        }
    }
}

/// Keyword groups in priority order.
pub fn default_keyword_groups() -> Vec<KeywordGroup> {
    vec![
        KeywordGroup::new(&["financial", "revenue"], FINANCIAL_ANSWER),
        KeywordGroup::new(&["sustainability", "renewable"], SUSTAINABILITY_ANSWER),
        KeywordGroup::new(&["market", "position"], MARKET_ANSWER),
    ]
}

/// Answers the legacy pool policy draws from.
pub fn default_answer_pool() -> Vec<String> {
    [
        RENEWABLE_GROWTH_ANSWER,
        FINANCIAL_ANSWER,
        SUSTAINABILITY_ANSWER,
        MARKET_ANSWER,
        EV_CHARGING_ANSWER,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Passages for the retriever: the canned answers plus the dashboard's key metrics.
pub fn default_passages() -> Vec<Passage> {
    vec![
        Passage::new("kb/renewable-capacity", RENEWABLE_GROWTH_ANSWER),
        Passage::new("kb/q3-fy24-results", FINANCIAL_ANSWER),
        Passage::new("kb/sustainability", SUSTAINABILITY_ANSWER),
        Passage::new("kb/market-position", MARKET_ANSWER),
        Passage::new("kb/ev-charging", EV_CHARGING_ANSWER),
        Passage::new(
            "kb/valuation",
            "Tata Power trades at a stock P/E of 31.4 against an industry P/E of 27.7, with a price to book value of 3.54, price to sales of 1.94 and EV/EBITDA of 11.7 on a market cap of Rs 1,26,775 Cr.",
        ),
        Passage::new(
            "kb/profitability",
            "Profitability ratios: ROCE of 11.3%, ROE of 11.9%, operating profit margin (OPM) of 19.8% and net profit margin of 7.43% last year, with profit after tax of Rs 4,048 Cr and EPS of Rs 12.4.",
        ),
        Passage::new(
            "kb/balance-sheet",
            "On the balance sheet, Tata Power carries debt of Rs 62,866 Cr against an enterprise value of Rs 1,77,890 Cr and a book value of Rs 112 per share.",
        ),
        Passage::new(
            "kb/quarterly-variation",
            "Quarterly sales variation stands at 7.88% and quarterly profit variation at 18.2%, on annual sales of Rs 65,478 Cr and EBIT of Rs 11,144 Cr.",
        ),
        Passage::new(
            "kb/dividend",
            "Tata Power pays a dividend yield of 0.57% on a face value of Rs 1.00 per share.",
        ),
    ]
}

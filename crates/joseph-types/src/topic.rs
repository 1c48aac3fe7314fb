//! Assistant topics (dashboard modules).
//!
//! A topic selects which persona framing the assistant uses. The set is
//! closed: any token outside it maps to [`Topic::General`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// A dashboard module the assistant can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    EconomicForecasting,
    BusinessForecast,
    TaxCompliance,
    PricingStrategy,
    RevenueStrategy,
    MarketAnalysis,
    LoanFunding,
    InventorySupply,
    FinancialAdvisory,
    PolicyEconomic,
    /// Catch-all for tokens outside the enumerated set.
    General,
}

impl Topic {
    /// Every named module, in dashboard order. Excludes [`Topic::General`].
    pub const ALL: [Topic; 10] = [
        Topic::EconomicForecasting,
        Topic::BusinessForecast,
        Topic::TaxCompliance,
        Topic::PricingStrategy,
        Topic::RevenueStrategy,
        Topic::MarketAnalysis,
        Topic::LoanFunding,
        Topic::InventorySupply,
        Topic::FinancialAdvisory,
        Topic::PolicyEconomic,
    ];

    /// Parse a topic token strictly.
    ///
    /// Accepts snake_case or kebab-case, case-insensitive, surrounding
    /// whitespace ignored. Returns `None` for anything outside the set.
    pub fn parse(token: &str) -> Option<Topic> {
        let normalized = token.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "economic_forecasting" => Some(Topic::EconomicForecasting),
            "business_forecast" => Some(Topic::BusinessForecast),
            "tax_compliance" => Some(Topic::TaxCompliance),
            "pricing_strategy" => Some(Topic::PricingStrategy),
            "revenue_strategy" => Some(Topic::RevenueStrategy),
            "market_analysis" => Some(Topic::MarketAnalysis),
            "loan_funding" => Some(Topic::LoanFunding),
            "inventory_supply" => Some(Topic::InventorySupply),
            "financial_advisory" => Some(Topic::FinancialAdvisory),
            "policy_economic" => Some(Topic::PolicyEconomic),
            "general" => Some(Topic::General),
            _ => None,
        }
    }

    /// Parse a topic token, mapping unknown tokens to [`Topic::General`].
    pub fn from_token(token: &str) -> Topic {
        Self::parse(token).unwrap_or(Topic::General)
    }

    /// Canonical snake_case token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::EconomicForecasting => "economic_forecasting",
            Topic::BusinessForecast => "business_forecast",
            Topic::TaxCompliance => "tax_compliance",
            Topic::PricingStrategy => "pricing_strategy",
            Topic::RevenueStrategy => "revenue_strategy",
            Topic::MarketAnalysis => "market_analysis",
            Topic::LoanFunding => "loan_funding",
            Topic::InventorySupply => "inventory_supply",
            Topic::FinancialAdvisory => "financial_advisory",
            Topic::PolicyEconomic => "policy_economic",
            Topic::General => "general",
        }
    }

    /// Human-readable module name. Also used as the lazily derived
    /// conversation title.
    pub fn display_name(&self) -> &'static str {
        match self {
            Topic::EconomicForecasting => "Economic Forecasting",
            Topic::BusinessForecast => "Business Forecast",
            Topic::TaxCompliance => "Tax Compliance",
            Topic::PricingStrategy => "Pricing Strategy",
            Topic::RevenueStrategy => "Revenue Strategy",
            Topic::MarketAnalysis => "Market Analysis",
            Topic::LoanFunding => "Loan & Funding",
            Topic::InventorySupply => "Inventory & Supply Chain",
            Topic::FinancialAdvisory => "Financial Advisory",
            Topic::PolicyEconomic => "Policy & Economic Impact",
            Topic::General => "General Business",
        }
    }

    /// One-line scope description of the module.
    pub fn description(&self) -> &'static str {
        match self {
            Topic::EconomicForecasting => "Economic indicators, forecasts, and market analysis",
            Topic::BusinessForecast => "Business performance predictions and scenarios",
            Topic::TaxCompliance => "Tax obligations and regulatory compliance",
            Topic::PricingStrategy => "Pricing models and competitive analysis",
            Topic::RevenueStrategy => "Revenue optimization and growth strategies",
            Topic::MarketAnalysis => "Market research and competitive intelligence",
            Topic::LoanFunding => "Financing options and investment analysis",
            Topic::InventorySupply => "Supply chain optimization and inventory management",
            Topic::FinancialAdvisory => "Financial planning and strategic budgeting",
            Topic::PolicyEconomic => "Policy analysis and economic impact assessment",
            Topic::General => "General business and economic analysis",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary row for topic listings (`GET /topics`, `joseph topics`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<Topic> for TopicInfo {
    fn from(topic: Topic) -> Self {
        Self {
            id: topic.as_str().to_string(),
            name: topic.display_name().to_string(),
            description: topic.description().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_both_separators() {
        assert_eq!(Topic::parse("revenue_strategy"), Some(Topic::RevenueStrategy));
        assert_eq!(Topic::parse("revenue-strategy"), Some(Topic::RevenueStrategy));
        assert_eq!(Topic::parse("  Market-Analysis "), Some(Topic::MarketAnalysis));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(Topic::parse("foobar"), None);
        assert_eq!(Topic::parse(""), None);
    }

    #[test]
    fn test_from_token_maps_unknown_to_general() {
        assert_eq!(Topic::from_token("foobar"), Topic::General);
        assert_eq!(Topic::from_token("tax_compliance"), Topic::TaxCompliance);
    }

    #[test]
    fn test_as_str_parses_back() {
        for topic in Topic::ALL {
            assert_eq!(Topic::parse(topic.as_str()), Some(topic));
        }
        assert_eq!(Topic::parse(Topic::General.as_str()), Some(Topic::General));
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Topic::LoanFunding).unwrap();
        assert_eq!(json, "\"loan_funding\"");
    }

    #[test]
    fn test_all_excludes_general() {
        assert!(!Topic::ALL.contains(&Topic::General));
        assert_eq!(Topic::ALL.len(), 10);
    }
}

//! Market-capitalization listings feed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsdQuote {
    pub market_cap: Option<f64>,
    pub fully_diluted_market_cap: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapQuote {
    #[serde(rename = "USD")]
    pub usd: UsdQuote,
}

/// One listed asset with its USD capitalization quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapListing {
    pub name: String,
    pub symbol: String,
    pub quote: CapQuote,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapResponse {
    #[serde(default)]
    pub data: Vec<CapListing>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_listing_with_null_market_cap() {
        let raw = r#"{"data": [{
            "name": "Testcoin",
            "symbol": "TST",
            "quote": {"USD": {"market_cap": null, "fully_diluted_market_cap": 12000000.0}}
        }]}"#;
        let response: CapResponse = serde_json::from_str(raw).unwrap();
        let listing = &response.data[0];
        assert_eq!(listing.symbol, "TST");
        assert_eq!(listing.quote.usd.market_cap, None);
        assert_eq!(listing.quote.usd.fully_diluted_market_cap, Some(12_000_000.0));
    }
}

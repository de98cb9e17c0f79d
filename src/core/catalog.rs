//! Known tickers and their display names.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerInfo {
    pub name: String,
}

/// Ticker -> company mapping, keyed by upper-cased ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, TickerInfo>", into = "BTreeMap<String, TickerInfo>")]
pub struct TickerCatalog {
    entries: BTreeMap<String, TickerInfo>,
}

impl TickerCatalog {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, ticker: &str, name: &str) {
        self.entries.insert(
            ticker.to_uppercase(),
            TickerInfo {
                name: name.to_string(),
            },
        );
    }

    pub fn get(&self, ticker: &str) -> Option<&TickerInfo> {
        self.entries.get(&ticker.to_uppercase())
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.get(ticker).is_some()
    }

    /// Company name for `ticker`, or the ticker itself when unknown.
    pub fn display_name(&self, ticker: &str) -> String {
        self.get(ticker)
            .map_or_else(|| ticker.to_uppercase(), |info| info.name.clone())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TickerInfo)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TickerCatalog {
    fn default() -> Self {
        let mut catalog = Self::new();
        for (ticker, name) in [
            ("AAPL", "Apple Inc."),
            ("MSFT", "Microsoft Corporation"),
            ("GOOGL", "Alphabet Inc."),
            ("AMZN", "Amazon.com, Inc."),
            ("TSLA", "Tesla, Inc."),
            ("META", "Meta Platforms, Inc."),
            ("NFLX", "Netflix, Inc."),
            ("NVDA", "NVIDIA Corporation"),
            ("PETR4.SA", "Petróleo Brasileiro S.A. - Petrobras"),
            ("VALE3.SA", "Vale S.A."),
            ("ITUB4.SA", "Itaú Unibanco Holding S.A."),
        ] {
            catalog.insert(ticker, name);
        }
        catalog
    }
}

impl From<BTreeMap<String, TickerInfo>> for TickerCatalog {
    fn from(map: BTreeMap<String, TickerInfo>) -> Self {
        Self {
            entries: map
                .into_iter()
                .map(|(ticker, info)| (ticker.to_uppercase(), info))
                .collect(),
        }
    }
}

impl From<TickerCatalog> for BTreeMap<String, TickerInfo> {
    fn from(catalog: TickerCatalog) -> Self {
        catalog.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = TickerCatalog::default();
        assert_eq!(catalog.len(), 11);
        assert_eq!(catalog.display_name("AAPL"), "Apple Inc.");
        assert!(catalog.contains("petr4.sa"));
    }

    #[test]
    fn test_unknown_ticker_falls_back_to_symbol() {
        let catalog = TickerCatalog::default();
        assert_eq!(catalog.display_name("ibm"), "IBM");
        assert!(catalog.get("IBM").is_none());
    }

    #[test]
    fn test_catalog_from_yaml() {
        let yaml = r#"
ibm:
  name: "International Business Machines"
VALE3.SA:
  name: "Vale"
"#;
        let catalog: TickerCatalog = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.display_name("IBM"), "International Business Machines");
        let tickers: Vec<&str> = catalog.iter().map(|(t, _)| t).collect();
        assert_eq!(tickers, vec!["IBM", "VALE3.SA"]);
    }
}

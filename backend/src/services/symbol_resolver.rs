use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use tracing::info;

const EMBEDDED_TABLE: &str = include_str!("../../config/company_symbols.json");

#[derive(Debug, Error)]
pub enum SymbolTableError {
    #[error("failed to read symbol table: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse symbol table: {0}")]
    Json(#[from] serde_json::Error),
}

/// Company name to ticker lookup backed by a JSON table.
#[derive(Debug, Clone)]
pub struct SymbolResolver {
    table: HashMap<String, String>,
}

impl SymbolResolver {
    /// Loads the table at `path`, or the table shipped with the binary when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, SymbolTableError> {
        let resolver = match path {
            Some(path) => Self::from_json(&std::fs::read_to_string(path)?)?,
            None => Self::from_json(EMBEDDED_TABLE)?,
        };
        info!(
            "Loaded {} company symbols from {}",
            resolver.len(),
            path.map_or_else(|| "embedded table".to_string(), |p| p.display().to_string())
        );
        Ok(resolver)
    }

    pub fn from_json(raw: &str) -> Result<Self, SymbolTableError> {
        let entries: HashMap<String, String> = serde_json::from_str(raw)?;
        let table = entries
            .into_iter()
            .map(|(name, ticker)| (normalize(&name), ticker))
            .collect();
        Ok(Self { table })
    }

    pub fn resolve(&self, company: &str) -> Option<&str> {
        self.table.get(&normalize(company)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_table_resolves_known_companies() {
        let resolver = SymbolResolver::load(None).unwrap();

        assert_eq!(resolver.resolve("apple"), Some("AAPL"));
        assert_eq!(resolver.resolve("alphabet"), Some("GOOG"));
        assert_eq!(resolver.resolve("state bank of india"), Some("SBIN.NS"));
        assert_eq!(resolver.len(), 28);
    }

    #[test]
    fn test_lookup_ignores_case_and_padding() {
        let resolver = SymbolResolver::load(None).unwrap();
        assert_eq!(resolver.resolve("  Tata Motors "), Some("TATAMOTORS.NS"));
        assert_eq!(resolver.resolve("NVIDIA"), Some("NVDA"));
    }

    #[test]
    fn test_unknown_company() {
        let resolver = SymbolResolver::from_json(r#"{"Acme Corp": "ACME"}"#).unwrap();
        assert_eq!(resolver.resolve("acme corp"), Some("ACME"));
        assert_eq!(resolver.resolve("globex"), None);
    }

    #[test]
    fn test_malformed_table() {
        assert!(matches!(
            SymbolResolver::from_json(r#"["apple"]"#),
            Err(SymbolTableError::Json(_))
        ));
    }
}

//! Symbol-to-presentation lookup table for alert notifications.
//!
//! Supporting a new currency is a data change: add a [`SymbolProfile`] to the catalog (or to
//! the `catalog` list of [`crate::NotifierConfig`]).

use serde::{Deserialize, Serialize};

use crate::CurrencySymbol;

/// Icon used for the confirmation notification and for unrecognized symbols.
pub const DEFAULT_ICON: &str = "assets/btc.png";
/// Title used for unrecognized symbols.
pub const FALLBACK_TITLE: &str = "Crypto Alert";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Presentation for alerts about one currency code.
pub struct SymbolProfile {
    /// Exact currency code, for example `BTC`.
    pub code: String,
    /// Notification title.
    pub title: String,
    /// Relative icon asset path.
    pub icon: String,
}

impl SymbolProfile {
    /// Builds a profile.
    pub fn new(code: impl Into<String>, title: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            icon: icon.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Ordered symbol table with a fallback entry for every code it does not list.
pub struct AlertCatalog {
    entries: Vec<SymbolProfile>,
    fallback: SymbolProfile,
}

impl AlertCatalog {
    /// Builds a catalog from explicit entries and fallback presentation.
    ///
    /// When two entries share a code, the first one wins.
    pub fn new(
        entries: Vec<SymbolProfile>,
        fallback_title: impl Into<String>,
        default_icon: impl Into<String>,
    ) -> Self {
        Self {
            entries,
            fallback: SymbolProfile::new("", fallback_title, default_icon),
        }
    }

    /// The four built-in dashboard currencies.
    pub fn builtin_entries() -> Vec<SymbolProfile> {
        vec![
            SymbolProfile::new("BTC", "Bitcoin Alert", "assets/btc.png"),
            SymbolProfile::new("ETH", "Ethereum Alert", "assets/eth.png"),
            SymbolProfile::new("USDD", "Digital Dollar Alert", "assets/usdd.png"),
            SymbolProfile::new("SOL", "Solana Alert", "assets/sol.png"),
        ]
    }

    /// Resolves the presentation for `symbol`, falling back to the generic entry.
    pub fn resolve(&self, symbol: &CurrencySymbol) -> &SymbolProfile {
        let code = symbol.code();
        self.entries
            .iter()
            .find(|entry| entry.code == code)
            .unwrap_or(&self.fallback)
    }

    /// Fallback presentation for unrecognized symbols.
    pub fn fallback(&self) -> &SymbolProfile {
        &self.fallback
    }

    /// Listed entries in lookup order.
    pub fn entries(&self) -> &[SymbolProfile] {
        &self.entries
    }
}

impl Default for AlertCatalog {
    fn default() -> Self {
        Self::new(Self::builtin_entries(), FALLBACK_TITLE, DEFAULT_ICON)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn builtin_symbols_resolve_to_their_profiles() {
        let catalog = AlertCatalog::default();
        let resolved: Vec<(&str, &str)> = [
            CurrencySymbol::Btc,
            CurrencySymbol::Eth,
            CurrencySymbol::Usdd,
            CurrencySymbol::Sol,
        ]
        .iter()
        .map(|symbol| {
            let profile = catalog.resolve(symbol);
            (profile.title.as_str(), profile.icon.as_str())
        })
        .collect();

        assert_eq!(
            resolved,
            vec![
                ("Bitcoin Alert", "assets/btc.png"),
                ("Ethereum Alert", "assets/eth.png"),
                ("Digital Dollar Alert", "assets/usdd.png"),
                ("Solana Alert", "assets/sol.png"),
            ]
        );
    }

    #[test]
    fn unknown_symbol_uses_generic_title_and_default_icon() {
        let catalog = AlertCatalog::default();
        let profile = catalog.resolve(&CurrencySymbol::from("XRP"));
        assert_eq!(profile.title, FALLBACK_TITLE);
        assert_eq!(profile.icon, DEFAULT_ICON);
    }

    #[test]
    fn added_entry_extends_lookup_without_code_changes() {
        let mut entries = AlertCatalog::builtin_entries();
        entries.push(SymbolProfile::new("XRP", "Ripple Alert", "assets/xrp.png"));
        let catalog = AlertCatalog::new(entries, FALLBACK_TITLE, DEFAULT_ICON);

        assert_eq!(
            catalog.resolve(&CurrencySymbol::from("XRP")).title,
            "Ripple Alert"
        );
        assert_eq!(catalog.resolve(&CurrencySymbol::Sol).title, "Solana Alert");
    }
}

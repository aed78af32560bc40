use lazy_static::lazy_static;
use std::collections::HashMap;

pub const FALLBACK_CURRENCY: &str = "USD";

lazy_static! {
    // Country-of-origin to display currency. Matching is exact, like the
    // stored country field it is looked up against.
    static ref CURRENCY_MAPPING: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("USA", "USD");
        m.insert("United States", "USD");
        m.insert("Canada", "CAD");
        m.insert("UK", "GBP");
        m.insert("United Kingdom", "GBP");
        m.insert("Australia", "AUD");
        m.insert("India", "INR");
        m.insert("Germany", "EUR");
        m.insert("France", "EUR");
        m.insert("Italy", "EUR");
        m.insert("Spain", "EUR");
        m.insert("Japan", "JPY");
        m.insert("China", "CNY");
        m.insert("South Korea", "KRW");
        m.insert("Singapore", "SGD");
        m.insert("Thailand", "THB");
        m.insert("Malaysia", "MYR");
        m.insert("Philippines", "PHP");
        m.insert("Indonesia", "IDR");
        m.insert("Vietnam", "VND");
        m.insert("Bangladesh", "BDT");
        m.insert("Pakistan", "PKR");
        m.insert("Sri Lanka", "LKR");
        m
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCurrency {
    pub code: String,
    // True when the country was not in the mapping and USD was substituted.
    // The generated guide must then carry a currency_note disclaimer.
    pub fallback: bool,
}

/// Resolves the display currency for a user's home country.
pub fn resolve_currency(country: &str) -> ResolvedCurrency {
    match CURRENCY_MAPPING.get(country) {
        Some(code) => ResolvedCurrency {
            code: (*code).to_string(),
            fallback: false,
        },
        None => ResolvedCurrency {
            code: FALLBACK_CURRENCY.to_string(),
            fallback: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapped_countries() {
        assert_eq!(resolve_currency("USA").code, "USD");
        assert_eq!(resolve_currency("United States").code, "USD");
        assert_eq!(resolve_currency("Canada").code, "CAD");
        assert_eq!(resolve_currency("United Kingdom").code, "GBP");
        assert_eq!(resolve_currency("India").code, "INR");
        assert_eq!(resolve_currency("Germany").code, "EUR");
        assert_eq!(resolve_currency("Sri Lanka").code, "LKR");
        assert!(!resolve_currency("Japan").fallback);
    }

    #[test]
    fn test_unmapped_country_falls_back_with_disclaimer() {
        let resolved = resolve_currency("Brazil");
        assert_eq!(resolved.code, "USD");
        assert!(resolved.fallback);
    }

    #[test]
    fn test_matching_is_exact() {
        // Lowercase is not in the table, so it takes the fallback path
        let resolved = resolve_currency("usa");
        assert_eq!(resolved.code, "USD");
        assert!(resolved.fallback);
    }

    #[test]
    fn test_empty_country() {
        let resolved = resolve_currency("");
        assert_eq!(resolved.code, FALLBACK_CURRENCY);
        assert!(resolved.fallback);
    }
}

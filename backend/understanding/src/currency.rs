//! Currency amounts in model output.
//!
//! Only `$`, `€` and `£` prefixed amounts are recognised. Amounts are kept as
//! the literal matched text (thousands separators included), never parsed.

use once_cell::sync::Lazy;
use regex::Regex;

use sightmate_core::DetectedAmounts;

// Symbol, optional whitespace, digits with optional `,ddd` groups and an
// optional two-digit fraction. Group 1 is the amount.
static CURRENCY_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("USD", r"\$\s*(\d+(?:,\d{3})*(?:\.\d{2})?)"),
        ("EUR", r"€\s*(\d+(?:,\d{3})*(?:\.\d{2})?)"),
        ("GBP", r"£\s*(\d+(?:,\d{3})*(?:\.\d{2})?)"),
    ]
    .into_iter()
    .map(|(code, pattern)| (code, Regex::new(pattern).unwrap()))
    .collect()
});

/// Extract currency-prefixed amounts from free text.
///
/// Currencies without a match are left out; no match at all yields an empty map.
pub fn extract_amounts(text: &str) -> DetectedAmounts {
    let mut detected = DetectedAmounts::new();
    for (code, pattern) in CURRENCY_PATTERNS.iter() {
        let amounts: Vec<String> = pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect();
        if !amounts.is_empty() {
            detected.insert((*code).to_string(), amounts);
        }
    }
    detected
}

/// Currency codes recognised by [`extract_amounts`].
pub fn supported_currencies() -> impl Iterator<Item = &'static str> {
    CURRENCY_PATTERNS.iter().map(|(code, _)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_currencies() {
        let amounts = extract_amounts("Price: $12,345.67 and also €5.00");

        assert_eq!(amounts.len(), 2);
        assert_eq!(amounts["USD"], vec!["12,345.67"]);
        assert_eq!(amounts["EUR"], vec!["5.00"]);
    }

    #[test]
    fn test_no_symbols_is_empty_not_error() {
        assert!(extract_amounts("Two paper bills, denomination unclear.").is_empty());
        assert!(extract_amounts("").is_empty());
    }

    #[test]
    fn test_repeated_matches_keep_order() {
        let amounts = extract_amounts("A £10 note, a £5 note and £ 2.50 in coins");
        assert_eq!(amounts["GBP"], vec!["10", "5", "2.50"]);
    }

    #[test]
    fn test_partial_formats_match_literally() {
        // A single fractional digit and a short thousands group are not part of the amount.
        let amounts = extract_amounts("$1234.5 and $1,00");
        assert_eq!(amounts["USD"], vec!["1234", "1"]);
    }

    #[test]
    fn test_bare_symbol_or_code_is_ignored() {
        let amounts = extract_amounts("Costs 20 USD, paid in $ and €");
        assert!(amounts.is_empty());
    }

    #[test]
    fn test_supported_currencies() {
        let codes: Vec<_> = supported_currencies().collect();
        assert_eq!(codes, vec!["USD", "EUR", "GBP"]);
    }
}

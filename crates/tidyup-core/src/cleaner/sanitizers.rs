//! Text normalization for categorical and free-text cells.

use crate::config::TextNullPolicy;
use crate::utils::string_values;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex pattern"));

static EDGE_NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\w]+|[^\w]+$").expect("Invalid regex pattern"));

/// Literal a null cell becomes under [`TextNullPolicy::Stringify`].
const STRINGIFIED_NULL: &str = "None";

/// Normalize a single text value.
///
/// Lowercases, trims, collapses whitespace runs to a single space and strips
/// leading/trailing runs of non-word characters. Applying it twice gives the
/// same result as applying it once.
///
/// ```
/// use tidyup_core::text_standardize;
/// assert_eq!(text_standardize("  Hello   WORLD!! "), "hello world");
/// ```
pub fn text_standardize(value: &str) -> String {
    let lowered = value.to_lowercase();
    let collapsed = WHITESPACE_RUN.replace_all(lowered.trim(), " ");
    EDGE_NON_WORD.replace_all(&collapsed, "").into_owned()
}

/// Normalize every cell of a text series according to `policy`.
pub fn standardize_text_series(series: &Series, policy: TextNullPolicy) -> PolarsResult<Series> {
    let cleaned: Vec<Option<String>> = string_values(series)?
        .into_iter()
        .map(|opt_val| match (opt_val, policy) {
            (Some(val), _) => Some(text_standardize(&val)),
            (None, TextNullPolicy::Stringify) => Some(text_standardize(STRINGIFIED_NULL)),
            (None, TextNullPolicy::Preserve) => None,
        })
        .collect();

    Ok(Series::new(series.name().clone(), cleaned))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_standardize_basic() {
        assert_eq!(text_standardize("  Hello   WORLD!! "), "hello world");
        assert_eq!(text_standardize("TeSt  "), "test");
        assert_eq!(text_standardize("WORLD!!"), "world");
    }

    #[test]
    fn test_text_standardize_keeps_inner_punctuation() {
        assert_eq!(text_standardize("--New-York--"), "new-york");
        assert_eq!(text_standardize("(a, b)"), "a, b");
    }

    #[test]
    fn test_text_standardize_collapses_tabs_and_newlines() {
        assert_eq!(text_standardize("a\t\tb\n c"), "a b c");
    }

    #[test]
    fn test_text_standardize_all_punctuation_becomes_empty() {
        assert_eq!(text_standardize("!!!"), "");
        assert_eq!(text_standardize(""), "");
        assert_eq!(text_standardize("   "), "");
    }

    #[test]
    fn test_text_standardize_unicode_letters_are_word_chars() {
        assert_eq!(text_standardize(" ¡Café! "), "café");
        assert_eq!(text_standardize("_id_"), "_id_");
    }

    #[test]
    fn test_text_standardize_idempotent() {
        let inputs = ["  Hello   WORLD!! ", "..x..", " A  b\tC ", "Ünïcode  Tëxt?"];
        for input in inputs {
            let once = text_standardize(input);
            assert_eq!(text_standardize(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_standardize_series_stringifies_nulls_by_default() {
        let series = Series::new("notes".into(), &[Some("  Hello "), None]);
        let cleaned = standardize_text_series(&series, TextNullPolicy::default()).unwrap();
        let values = string_values(&cleaned).unwrap();
        assert_eq!(
            values,
            vec![Some("hello".to_string()), Some("none".to_string())]
        );
    }

    #[test]
    fn test_standardize_series_preserves_nulls() {
        let series = Series::new("notes".into(), &[Some("WORLD!!"), None]);
        let cleaned = standardize_text_series(&series, TextNullPolicy::Preserve).unwrap();
        assert_eq!(cleaned.null_count(), 1);
        assert_eq!(
            string_values(&cleaned).unwrap()[0],
            Some("world".to_string())
        );
    }
}

//! Anchor-pattern extraction of single values from scraped HTML.

use regex::Regex;

use crate::error::{FetchError, FetchResult};

/// Last traded price on the futures quote page.
pub const FUTURES_ANCHOR: &str = r#"last_price">([\d,]+\.?\d*)"#;

/// Share of index members above their 50-day average on the technicals page.
pub const BREADTH_ANCHOR: &str = r"(?s)% Above 50-Day Average.*?(\d+\.\d+)%";

/// First capture of `pattern` in `html`, parsed as a number with thousands
/// separators removed.
pub fn extract_number(html: &str, pattern: &'static str) -> FetchResult<f64> {
    let re = Regex::new(pattern).map_err(|e| FetchError::Parse(e.to_string()))?;
    let raw = re
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().replace(',', ""))
        .ok_or(FetchError::AnchorNotFound(pattern))?;
    raw.parse::<f64>()
        .map_err(|e| FetchError::Parse(format!("{:?}: {}", raw, e)))
}

pub fn futures_price(html: &str) -> FetchResult<f64> {
    extract_number(html, FUTURES_ANCHOR)
}

pub fn breadth_pct(html: &str) -> FetchResult<f64> {
    extract_number(html, BREADTH_ANCHOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_futures_price_strips_commas() {
        let html = r#"<div><span data-test="instrument-price-last" class="last_price">5,312.75</span></div>"#;
        assert_eq!(futures_price(html).unwrap(), 5312.75);
    }

    #[test]
    fn test_futures_price_integer_quote() {
        let html = r#"<span class="last_price">5300</span>"#;
        assert_eq!(futures_price(html).unwrap(), 5300.0);
    }

    #[test]
    fn test_breadth_spans_lines() {
        let html = "<tr><td>% Above 50-Day Average</td>\n<td class=\"x\">\n  63.40%</td></tr>";
        assert_eq!(breadth_pct(html).unwrap(), 63.4);
    }

    #[test]
    fn test_missing_anchor() {
        let err = breadth_pct("<html>Access denied</html>").unwrap_err();
        assert!(matches!(err, FetchError::AnchorNotFound(_)));
        let err = futures_price("").unwrap_err();
        assert!(matches!(err, FetchError::AnchorNotFound(_)));
    }
}

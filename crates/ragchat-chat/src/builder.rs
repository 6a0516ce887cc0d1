//! Turns raw user input into a [`QueryRequest`].

use ragchat_core::config::DEFAULT_RESULT_COUNT;

use crate::error::ValidationError;
use crate::types::QueryRequest;

/// Validates and normalizes raw input. No I/O, no state.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder {
    default_result_count: u32,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_RESULT_COUNT)
    }
}

impl QueryBuilder {
    /// Create a builder that substitutes `default_result_count` for unusable
    /// counts. A zero default is bumped to 1 so built requests stay valid.
    pub fn new(default_result_count: u32) -> Self {
        Self {
            default_result_count: default_result_count.max(1),
        }
    }

    pub fn default_result_count(&self) -> u32 {
        self.default_result_count
    }

    /// Build a request from the raw question and raw result count.
    ///
    /// The text is trimmed and must not be empty. The count is soft: anything
    /// that does not parse to a positive integer becomes the default.
    pub fn build(
        &self,
        raw_text: &str,
        raw_result_count: &str,
    ) -> Result<QueryRequest, ValidationError> {
        let text = raw_text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyInput);
        }
        let result_count = parse_result_count(raw_result_count).unwrap_or(self.default_result_count);
        Ok(QueryRequest::new(text.to_string(), result_count))
    }

    /// Build a request when the count is already numeric.
    pub fn build_with_count(
        &self,
        raw_text: &str,
        result_count: Option<i64>,
    ) -> Result<QueryRequest, ValidationError> {
        let text = raw_text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyInput);
        }
        let result_count = result_count
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n >= 1)
            .unwrap_or(self.default_result_count);
        Ok(QueryRequest::new(text.to_string(), result_count))
    }
}

/// Lenient integer parse: leading whitespace, an optional sign, then the
/// leading run of digits ("12abc" -> 12, "3.9" -> 3). Returns `None` for
/// anything without leading digits, non-positive values, or overflow.
fn parse_result_count(raw: &str) -> Option<u32> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() || negative {
        return None;
    }
    digits.parse::<u32>().ok().filter(|n| *n >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_trims_text() {
        let builder = QueryBuilder::default();
        let req = builder.build("  What is the capital of France?\n", "3").unwrap();
        assert_eq!(req.text(), "What is the capital of France?");
        assert_eq!(req.result_count(), 3);
    }

    #[test]
    fn test_build_keeps_valid_count() {
        let builder = QueryBuilder::default();
        for n in [1u32, 2, 5, 10, 250] {
            let req = builder.build("question", &n.to_string()).unwrap();
            assert_eq!(req.result_count(), n);
            assert_eq!(req.text(), "question");
        }
    }

    #[test]
    fn test_empty_input_rejected() {
        let builder = QueryBuilder::default();
        for raw in ["", " ", "\t\n", "   \r\n  "] {
            assert_eq!(builder.build(raw, "3"), Err(ValidationError::EmptyInput));
        }
    }

    #[test]
    fn test_bad_count_falls_back_to_default() {
        let builder = QueryBuilder::default();
        for raw in ["", "abc", "0", "-2", "-0", "  ", "NaN", "99999999999"] {
            let req = builder.build("q", raw).unwrap();
            assert_eq!(req.result_count(), 3, "raw count {:?}", raw);
        }
    }

    #[test]
    fn test_count_parses_leading_digits() {
        let builder = QueryBuilder::default();
        assert_eq!(builder.build("q", "12abc").unwrap().result_count(), 12);
        assert_eq!(builder.build("q", "3.9").unwrap().result_count(), 3);
        assert_eq!(builder.build("q", " 7 ").unwrap().result_count(), 7);
        assert_eq!(builder.build("q", "+4").unwrap().result_count(), 4);
    }

    #[test]
    fn test_custom_default() {
        let builder = QueryBuilder::new(5);
        assert_eq!(builder.build("q", "nope").unwrap().result_count(), 5);
        assert_eq!(builder.default_result_count(), 5);
    }

    #[test]
    fn test_zero_default_is_bumped() {
        let builder = QueryBuilder::new(0);
        assert_eq!(builder.build("q", "").unwrap().result_count(), 1);
    }

    #[test]
    fn test_build_with_count() {
        let builder = QueryBuilder::default();
        assert_eq!(builder.build_with_count("q", Some(4)).unwrap().result_count(), 4);
        assert_eq!(builder.build_with_count("q", Some(0)).unwrap().result_count(), 3);
        assert_eq!(builder.build_with_count("q", Some(-1)).unwrap().result_count(), 3);
        assert_eq!(builder.build_with_count("q", None).unwrap().result_count(), 3);
        assert_eq!(
            builder.build_with_count("q", Some(i64::MAX)).unwrap().result_count(),
            3
        );
        assert_eq!(
            builder.build_with_count(" ", Some(4)),
            Err(ValidationError::EmptyInput)
        );
    }

    #[test]
    fn test_unicode_text_preserved() {
        let builder = QueryBuilder::default();
        let req = builder.build(" Qu'est-ce qui s'est pass\u{00e9}? ", "2").unwrap();
        assert_eq!(req.text(), "Qu'est-ce qui s'est pass\u{00e9}?");
    }
}

//! Shared constants and lazily compiled regular expressions.

use regex::Regex;
use std::sync::OnceLock;

/// OWASP password special characters.
pub const SYMBOLS: &str = " !\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Returns the compiled token delimiter used to split lines into words.
pub fn word_splitter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| Regex::new(r#"[,:; '"\\]+"#).expect("Invalid word splitter pattern"))
}

/// Returns the compiled grammar a whole token must match to be attempted as
/// standard-alphabet base64.
pub fn base64_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9+/]{4})+([A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?$")
            .expect("Invalid base64 token pattern")
    })
}

/// Returns the date and timestamp shapes dismissed by the entropy classifier.
///
/// Multi-token forms (syslog `Aug 15 12:30:45`) never survive the word
/// splitter, so only single-token date shapes appear here.
pub fn date_patterns() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RES.get_or_init(|| {
        [
            r"^\d{4}-\d{2}-\d{2}$",
            r"^\d{4}/\d{2}/\d{2}$",
            r"^\d{2}-\d{2}-\d{4}$",
            r"^\d{2}/\d{2}/\d{4}$",
            r"^\d{4}-\d{2}-\d{2}T\d{2}",
            r"(?i)^\d{1,2}[-/](jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[-/]\d{2,4}$",
            r"(?i)^(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[-/]?\d{1,2}$",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("Invalid date pattern"))
        .collect()
    })
}

/// Default path exclusion patterns used when the user provides none.
pub fn default_exclusions() -> &'static [&'static str] {
    &[
        r".*/(man|docs?|examples?|python[23]\..+|perl5)(/|$).*",
        r"^/home(/|$)",
        r"^/proc(/|$)",
        r"^/sys(/|$)",
        r"^/usr/share(/|$)",
        r"^/usr/lib(/|$)",
        r"^/.+(\.pem|\.crt)$",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_splitter_delimiters() {
        let words: Vec<&str> = word_splitter()
            .split(r#"key: value, token;next 'quoted' path\seg"#)
            .collect();
        assert_eq!(
            words,
            vec!["key", "value", "token", "next", "quoted", "path", "seg"]
        );
    }

    #[test]
    fn test_base64_token_grammar() {
        assert!(base64_token().is_match("cGFzc3dvcmQxMjM="));
        assert!(base64_token().is_match("AAAAAAAAAAAA"));
        assert!(base64_token().is_match("aGVsbG8="));
        // wrong padding positions and foreign characters
        assert!(!base64_token().is_match("cGFzc3dvcmQxMjM"));
        assert!(!base64_token().is_match("abc"));
        assert!(!base64_token().is_match("abcd!efg"));
        assert!(!base64_token().is_match("=abcd"));
    }

    #[test]
    fn test_date_patterns_match_common_forms() {
        let dates = ["2023-08-15", "2023/08/15", "15-08-2023", "2023-08-15T12", "15-Aug-2023", "Aug15"];
        for date in dates {
            assert!(
                date_patterns().iter().any(|re| re.is_match(date)),
                "expected {date} to be recognized as a date"
            );
        }
        assert!(!date_patterns().iter().any(|re| re.is_match("Xk7#mQ9!pZ@4vB2")));
    }

    #[test]
    fn test_default_exclusions_compile() {
        for pattern in default_exclusions() {
            assert!(Regex::new(pattern).is_ok(), "pattern {pattern} must compile");
        }
    }
}

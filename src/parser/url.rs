// Absolute URL recognizer for tool payload validation

use nom::{
    bytes::complete::{tag, take_while},
    character::complete::{char, satisfy},
    combinator::{all_consuming, opt, recognize},
    sequence::{pair, preceded, terminated},
    IResult,
};

/// Pieces of an absolute URL, borrowed from the input
#[derive(Debug, Clone, PartialEq)]
pub struct UrlParts<'a> {
    pub scheme: &'a str,
    pub host: Option<&'a str>,
    pub rest: &'a str,
}

/// Schemes that always carry an authority section
const SPECIAL_SCHEMES: [&str; 6] = ["http", "https", "ftp", "ws", "wss", "file"];

fn scheme(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic()),
        take_while(|c: char| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
    ))(input)
}

fn authority(input: &str) -> IResult<&str, &str> {
    preceded(
        tag("//"),
        take_while(|c: char| !matches!(c, '/' | '?' | '#') && !c.is_whitespace()),
    )(input)
}

fn url_parts(input: &str) -> IResult<&str, UrlParts<'_>> {
    let (input, scheme) = terminated(scheme, char(':'))(input)?;
    let (input, host) = opt(authority)(input)?;
    let (input, rest) = take_while(|c: char| !c.is_whitespace())(input)?;
    Ok((input, UrlParts { scheme, host, rest }))
}

/// Parse an absolute URL. Relative references and strings containing
/// whitespace are rejected.
pub fn parse_url(input: &str) -> Option<UrlParts<'_>> {
    let (_, parts) = all_consuming(url_parts)(input).ok()?;

    let special = SPECIAL_SCHEMES
        .iter()
        .any(|s| parts.scheme.eq_ignore_ascii_case(s));

    let valid = if special && !parts.scheme.eq_ignore_ascii_case("file") {
        parts.host.is_some_and(|h| !h.is_empty())
    } else {
        parts.host.is_some() || !parts.rest.is_empty()
    };

    valid.then_some(parts)
}

pub fn is_url(input: &str) -> bool {
    parse_url(input).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_url() {
        let parts = parse_url("https://images.example.com/cat.png?w=400").unwrap();
        assert_eq!(parts.scheme, "https");
        assert_eq!(parts.host, Some("images.example.com"));
        assert_eq!(parts.rest, "/cat.png?w=400");
    }

    #[test]
    fn test_non_special_scheme() {
        assert!(is_url("mailto:someone@example.com"));
        assert!(is_url("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_rejects_relative_paths() {
        assert!(!is_url("/images/cat.png"));
        assert!(!is_url("cat.png"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_rejects_missing_host() {
        assert!(!is_url("https://"));
        assert!(!is_url("http:/path"));
    }

    #[test]
    fn test_rejects_whitespace() {
        assert!(!is_url("https://example.com/a b.png"));
    }

    #[test]
    fn test_rejects_bare_scheme() {
        assert!(!is_url("mailto:"));
    }
}

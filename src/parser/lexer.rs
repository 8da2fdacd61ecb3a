// Shared token helpers for the color and URL parsers

use nom::{character::complete::multispace0, sequence::delimited, IResult};

/// Wrap a parser so it tolerates surrounding whitespace
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nom::bytes::complete::tag;

    #[test]
    fn test_ws_strips_both_sides() {
        let result = ws(tag("rgb"))("  rgb  (");
        assert_eq!(result, Ok(("(", "rgb")));
    }

    #[test]
    fn test_ws_without_whitespace() {
        let result = ws(tag("hsl"))("hsl(");
        assert_eq!(result, Ok(("(", "hsl")));
    }
}

// CSS color parser for chart and theme colors
//
// Accepts the forms that show up in chart configs emitted by agents:
// `#RGB`, `#RRGGBB`, `#RRGGBBAA`, `rgb()/rgba()`, `hsl()/hsla()`,
// theme tokens (`hsl(var(--chart-3))`, `var(--chart-3)`) and a small set
// of named colors. Alpha components are parsed and dropped.

use super::lexer::ws;
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while_m_n},
    character::complete::{alpha1, char, digit1, multispace0},
    combinator::{all_consuming, map, map_opt, map_res, opt},
    number::complete::double,
    sequence::{delimited, preceded, tuple},
    IResult,
};

/// A parsed CSS color, before theme resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CssColor {
    Rgb(u8, u8, u8),
    Hsl {
        hue: f64,
        saturation: f64,
        lightness: f64,
    },
    /// `--chart-N` theme token (1-based as written)
    ChartToken(u8),
}

/// Parse a complete CSS color string
pub fn parse_css_color(input: &str) -> Option<CssColor> {
    all_consuming(ws(alt((
        hex_color,
        rgb_function,
        hsl_token,
        hsl_function,
        var_token,
        named_color,
    ))))(input)
    .ok()
    .map(|(_, color)| color)
}

fn hex_color(input: &str) -> IResult<&str, CssColor> {
    map_opt(
        preceded(
            char('#'),
            take_while_m_n(3, 8, |c: char| c.is_ascii_hexdigit()),
        ),
        decode_hex,
    )(input)
}

fn decode_hex(hex: &str) -> Option<CssColor> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => Some(CssColor::Rgb(
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
        )),
        6 | 8 => Some(CssColor::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

/// Comma is optional so both legacy and space-separated syntax parse
fn separator(input: &str) -> IResult<&str, Option<char>> {
    delimited(multispace0, opt(char(',')), multispace0)(input)
}

fn alpha_component(input: &str) -> IResult<&str, f64> {
    preceded(
        ws(alt((char(','), char('/')))),
        map(tuple((double, opt(char('%')))), |(v, _)| v),
    )(input)
}

fn rgb_channel(input: &str) -> IResult<&str, u8> {
    map(tuple((double, opt(char('%')))), |(v, percent)| {
        let v = if percent.is_some() { v * 2.55 } else { v };
        v.clamp(0.0, 255.0).round() as u8
    })(input)
}

fn rgb_function(input: &str) -> IResult<&str, CssColor> {
    let (input, _) = tag_no_case("rgb")(input)?;
    let (input, _) = opt(tag_no_case("a"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, r) = rgb_channel(input)?;
    let (input, _) = separator(input)?;
    let (input, g) = rgb_channel(input)?;
    let (input, _) = separator(input)?;
    let (input, b) = rgb_channel(input)?;
    let (input, _) = opt(alpha_component)(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((input, CssColor::Rgb(r, g, b)))
}

fn percentage(input: &str) -> IResult<&str, f64> {
    map(tuple((double, opt(char('%')))), |(v, _)| v.clamp(0.0, 100.0))(input)
}

fn hsl_function(input: &str) -> IResult<&str, CssColor> {
    let (input, _) = tag_no_case("hsl")(input)?;
    let (input, _) = opt(tag_no_case("a"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, hue) = double(input)?;
    let (input, _) = opt(tag_no_case("deg"))(input)?;
    let (input, _) = separator(input)?;
    let (input, saturation) = percentage(input)?;
    let (input, _) = separator(input)?;
    let (input, lightness) = percentage(input)?;
    let (input, _) = opt(alpha_component)(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((
        input,
        CssColor::Hsl {
            hue,
            saturation,
            lightness,
        },
    ))
}

fn var_token(input: &str) -> IResult<&str, CssColor> {
    map(
        tuple((
            tag("var"),
            ws(char('(')),
            tag("--chart-"),
            map_res(digit1, |d: &str| d.parse::<u8>()),
            ws(char(')')),
        )),
        |(_, _, _, n, _)| CssColor::ChartToken(n),
    )(input)
}

/// `hsl(var(--chart-N))`, optionally with an alpha suffix
fn hsl_token(input: &str) -> IResult<&str, CssColor> {
    let (input, _) = tag_no_case("hsl")(input)?;
    let (input, _) = opt(tag_no_case("a"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, token) = var_token(input)?;
    let (input, _) = opt(alpha_component)(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((input, token))
}

fn named_color(input: &str) -> IResult<&str, CssColor> {
    map_opt(alpha1, |name: &str| {
        let (r, g, b) = match name.to_ascii_lowercase().as_str() {
            "white" => (255, 255, 255),
            "black" => (0, 0, 0),
            "red" => (255, 0, 0),
            "green" => (0, 128, 0),
            "blue" => (0, 0, 255),
            "yellow" => (255, 255, 0),
            "cyan" => (0, 255, 255),
            "magenta" => (255, 0, 255),
            "orange" => (255, 165, 0),
            "purple" => (128, 0, 128),
            "pink" => (255, 192, 203),
            "brown" => (139, 69, 19),
            "teal" => (0, 128, 128),
            "navy" => (0, 0, 128),
            "gray" | "grey" => (128, 128, 128),
            "slategray" | "slategrey" => (112, 128, 144),
            "lightgray" | "lightgrey" => (211, 211, 211),
            "darkgray" | "darkgrey" => (169, 169, 169),
            _ => return None,
        };
        Some(CssColor::Rgb(r, g, b))
    })(input)
}

/// Convert HSL (degrees, percent, percent) into 8-bit RGB
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let h = hue.rem_euclid(360.0) / 360.0;
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let l = (lightness / 100.0).clamp(0.0, 1.0);

    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return (v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    let channel = |t: f64| {
        let t = t.rem_euclid(1.0);
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (v * 255.0).round() as u8
    };

    (channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_long() {
        assert_eq!(parse_css_color("#3B82F6"), Some(CssColor::Rgb(59, 130, 246)));
    }

    #[test]
    fn test_parse_hex_short() {
        assert_eq!(parse_css_color("#fff"), Some(CssColor::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_with_alpha() {
        assert_eq!(parse_css_color("#10B981CC"), Some(CssColor::Rgb(16, 185, 129)));
    }

    #[test]
    fn test_parse_hex_bad_length() {
        assert_eq!(parse_css_color("#12345"), None);
        assert_eq!(parse_css_color("#"), None);
    }

    #[test]
    fn test_parse_rgb_legacy_and_modern() {
        assert_eq!(parse_css_color("rgb(16, 185, 129)"), Some(CssColor::Rgb(16, 185, 129)));
        assert_eq!(parse_css_color("rgb(16 185 129 / 0.5)"), Some(CssColor::Rgb(16, 185, 129)));
        assert_eq!(parse_css_color("rgba(0,0,0,0.2)"), Some(CssColor::Rgb(0, 0, 0)));
    }

    #[test]
    fn test_parse_rgb_clamps_channels() {
        assert_eq!(parse_css_color("rgb(300, -5, 12)"), Some(CssColor::Rgb(255, 0, 12)));
    }

    #[test]
    fn test_parse_hsl() {
        let parsed = parse_css_color("hsl(217, 91%, 60%)");
        assert_eq!(
            parsed,
            Some(CssColor::Hsl {
                hue: 217.0,
                saturation: 91.0,
                lightness: 60.0
            })
        );
    }

    #[test]
    fn test_parse_chart_token() {
        assert_eq!(parse_css_color("hsl(var(--chart-3))"), Some(CssColor::ChartToken(3)));
        assert_eq!(parse_css_color("var(--chart-5)"), Some(CssColor::ChartToken(5)));
        assert_eq!(parse_css_color("hsl(var(--chart-1) / 0.45)"), Some(CssColor::ChartToken(1)));
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(parse_css_color("Red"), Some(CssColor::Rgb(255, 0, 0)));
        assert_eq!(parse_css_color("chartreuse-ish"), None);
    }

    #[test]
    fn test_parse_rejects_trailing_garbage() {
        assert_eq!(parse_css_color("#fff fff"), None);
        assert_eq!(parse_css_color("rgb(1,2,3) x"), None);
    }

    #[test]
    fn test_hsl_to_rgb_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 100.0, 50.0), (255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 100.0, 50.0), (0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 100.0, 50.0), (0, 0, 255));
        assert_eq!(hsl_to_rgb(0.0, 0.0, 100.0), (255, 255, 255));
    }
}

// Small nom parsers for the string formats carried inside tool payloads

pub mod color;
pub mod lexer;
pub mod url;

// Public API re-exports
pub use color::{parse_css_color, CssColor};
pub use url::{is_url, parse_url};

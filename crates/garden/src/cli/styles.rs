//! Terminal styles for the garden CLI.
//!
//! Renderers refer to styles by what the text *is* (a title, a time, an active
//! tag), never by color. `console` drops the escape codes when stdout is not a
//! terminal, so piped output stays plain.

use console::Style;
use once_cell::sync::Lazy;

/// Style identifiers, shared by renderers and tests.
pub mod names {
    pub const MUTED: &str = "muted";
    pub const FAINT: &str = "faint";
    pub const HIGHLIGHT: &str = "highlight";
    pub const WARNING: &str = "warning";
    pub const SUCCESS: &str = "success";
    pub const TITLE: &str = "title";
    pub const TIME: &str = "time";
    pub const KIND: &str = "kind";
    pub const HEADER: &str = "header";
}

pub static MUTED: Lazy<Style> = Lazy::new(|| Style::new().color256(245));
pub static FAINT: Lazy<Style> = Lazy::new(|| Style::new().color256(240));
pub static HIGHLIGHT: Lazy<Style> = Lazy::new(|| Style::new().black().on_yellow());
pub static WARNING: Lazy<Style> = Lazy::new(|| Style::new().yellow().bold());
pub static SUCCESS: Lazy<Style> = Lazy::new(|| Style::new().green());
pub static TITLE: Lazy<Style> = Lazy::new(|| Style::new().bold());
pub static TIME: Lazy<Style> = Lazy::new(|| Style::new().color256(245).italic());
pub static KIND: Lazy<Style> = Lazy::new(|| Style::new().cyan());
pub static HEADER: Lazy<Style> = Lazy::new(|| Style::new().yellow().bold().underlined());

/// Looks a style up by name.
pub fn style(name: &str) -> Option<&'static Style> {
    let style: &'static Lazy<Style> = match name {
        names::MUTED => &MUTED,
        names::FAINT => &FAINT,
        names::HIGHLIGHT => &HIGHLIGHT,
        names::WARNING => &WARNING,
        names::SUCCESS => &SUCCESS,
        names::TITLE => &TITLE,
        names::TIME => &TIME,
        names::KIND => &KIND,
        names::HEADER => &HEADER,
        _ => return None,
    };
    Some(Lazy::force(style))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_resolves() {
        for name in [
            names::MUTED,
            names::FAINT,
            names::HIGHLIGHT,
            names::WARNING,
            names::SUCCESS,
            names::TITLE,
            names::TIME,
            names::KIND,
            names::HEADER,
        ] {
            assert!(style(name).is_some(), "missing style {}", name);
        }
        assert!(style("sparkly").is_none());
    }
}

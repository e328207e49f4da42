//! Terminal styles.
//!
//! Renderers ask for styles by meaning (a title, a timestamp, a deleted row),
//! never by color, so the palette can change in one place. `console` drops the
//! escape codes when stdout is not a terminal or `NO_COLOR` is set.

use console::Style;
use folioapp::commands::MessageLevel;

pub fn title() -> Style {
    Style::new().bold()
}

pub fn muted() -> Style {
    Style::new().color256(245)
}

pub fn time() -> Style {
    muted().italic()
}

pub fn index() -> Style {
    Style::new().color256(178)
}

pub fn deleted() -> Style {
    Style::new().color256(167)
}

pub fn header() -> Style {
    Style::new().color256(178).bold()
}

/// Status keys (draft, published, scheduled...) get a fixed color each.
pub fn status(key: &str) -> Style {
    match key {
        "published" => Style::new().green(),
        "scheduled" => Style::new().cyan(),
        "draft" => muted(),
        "inactive" => deleted(),
        _ => Style::new(),
    }
}

pub fn message(level: MessageLevel) -> Style {
    match level {
        MessageLevel::Info => muted(),
        MessageLevel::Success => Style::new().green(),
        MessageLevel::Warning => Style::new().yellow().bold(),
        MessageLevel::Error => Style::new().red().bold(),
    }
}

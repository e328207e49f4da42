use super::helpers::require_text;
use super::{CmdMessage, CmdResult};
use crate::error::{FolioError, Result};
use crate::model::{SiteSettings, ThemeMode};
use crate::store::DataStore;
use chrono::Utc;

pub const MAX_POSTS_PER_PAGE: usize = 100;

#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub site_title: Option<String>,
    pub tagline: Option<String>,
    pub theme: Option<ThemeMode>,
    pub accent_color: Option<String>,
    pub posts_per_page: Option<usize>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.site_title.is_none()
            && self.tagline.is_none()
            && self.theme.is_none()
            && self.accent_color.is_none()
            && self.posts_per_page.is_none()
    }
}

/// Normalises `#rgb` / `#rrggbb` (case-insensitive) to lowercase `#rrggbb`.
pub fn parse_accent_color(raw: &str) -> Result<String> {
    let hex = raw
        .trim()
        .strip_prefix('#')
        .filter(|h| h.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| FolioError::validation(format!("Invalid color: {}", raw)))?
        .to_ascii_lowercase();

    match hex.len() {
        6 => Ok(format!("#{}", hex)),
        3 => Ok(hex.chars().fold(String::from("#"), |mut out, c| {
            out.push(c);
            out.push(c);
            out
        })),
        _ => Err(FolioError::validation(format!("Invalid color: {}", raw))),
    }
}

pub fn show<S: DataStore>(store: &S) -> Result<SiteSettings> {
    store.settings()
}

pub fn update<S: DataStore>(
    store: &mut S,
    changes: SettingsUpdate,
) -> Result<CmdResult<SiteSettings>> {
    let mut settings = store.settings()?;
    if changes.is_empty() {
        return Ok(CmdResult::default()
            .with_message(CmdMessage::info("Nothing to change"))
            .with_affected(vec![settings]));
    }

    if let Some(title) = changes.site_title {
        settings.site_title = require_text(&title, "Site title")?;
    }
    if let Some(tagline) = changes.tagline {
        settings.tagline = tagline.trim().to_string();
    }
    if let Some(theme) = changes.theme {
        settings.theme = theme;
    }
    if let Some(color) = changes.accent_color {
        settings.accent_color = parse_accent_color(&color)?;
    }
    if let Some(per_page) = changes.posts_per_page {
        if per_page == 0 || per_page > MAX_POSTS_PER_PAGE {
            return Err(FolioError::validation(format!(
                "Posts per page must be between 1 and {}",
                MAX_POSTS_PER_PAGE
            )));
        }
        settings.posts_per_page = per_page;
    }
    settings.updated_at = Some(Utc::now());

    store.save_settings(&settings)?;
    tracing::info!(theme = %settings.theme, "settings updated");

    Ok(CmdResult::default()
        .with_message(CmdMessage::success("Settings saved"))
        .with_affected(vec![settings]))
}

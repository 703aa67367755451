use clarity_types::theme::Theme;

use crate::ports::StoragePort;

pub const THEME_KEY: &str = "theme";

/// Stored theme, or `None` when nothing valid was saved.
pub async fn load_theme(storage: &dyn StoragePort) -> Option<Theme> {
    match storage.get(THEME_KEY).await {
        Ok(Some(bytes)) => {
            let raw = String::from_utf8_lossy(&bytes);
            match raw.parse::<Theme>() {
                Ok(theme) => Some(theme),
                Err(e) => {
                    log::warn!("Ignoring saved theme: {}", e);
                    None
                }
            }
        }
        Ok(None) => None,
        Err(e) => {
            log::warn!("Theme preference unavailable: {}", e);
            None
        }
    }
}

pub async fn save_theme(storage: &dyn StoragePort, theme: Theme) {
    if let Err(e) = storage.set(THEME_KEY, theme.as_str().as_bytes()).await {
        log::warn!("Failed to persist theme: {}", e);
    }
}

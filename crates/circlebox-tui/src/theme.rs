use circlebox_core::config::ThemeConfig;
use circlebox_core::Rgb;
use ratatui::style::Color;
use tracing::warn;

/// Runtime colors for the stage and the status bar
#[derive(Debug, Clone)]
pub struct Theme {
    /// Stage background
    pub back: Color,
    pub status_fg: Color,
    pub status_bg: Color,
    pub hint: Color,
    /// Mode label while a node animates; follows the stroke color
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

impl Theme {
    /// Build a theme from config, falling back per color on bad hex values
    pub fn from_config(config: &ThemeConfig) -> Self {
        let fore = parse_or(&config.fore_color, Rgb(0x67, 0x3a, 0xb7));
        let back = parse_or(&config.back_color, Rgb(0xbd, 0xbd, 0xbd));
        Self {
            back: to_color(back),
            status_fg: Color::Rgb(0xd4, 0xbe, 0x98),
            status_bg: Color::Rgb(0x45, 0x40, 0x3d),
            hint: Color::Rgb(0xa8, 0x99, 0x84),
            accent: to_color(fore),
        }
    }
}

fn parse_or(hex: &str, fallback: Rgb) -> Rgb {
    Rgb::from_hex(hex).unwrap_or_else(|| {
        warn!("Invalid theme color '{}', using default", hex);
        fallback
    })
}

#[inline]
pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_from_default_config() {
        let theme = Theme::default();
        assert_eq!(theme.back, Color::Rgb(0xbd, 0xbd, 0xbd));
        assert_eq!(theme.accent, Color::Rgb(0x67, 0x3a, 0xb7));
    }

    #[test]
    fn test_bad_color_falls_back() {
        let config = ThemeConfig {
            fore_color: "#".to_string(),
            back_color: "#000".to_string(),
        };
        let theme = Theme::from_config(&config);
        assert_eq!(theme.accent, Color::Rgb(0x67, 0x3a, 0xb7));
        assert_eq!(theme.back, Color::Rgb(0, 0, 0));
    }
}

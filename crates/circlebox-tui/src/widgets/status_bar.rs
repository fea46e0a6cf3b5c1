use circlebox_core::config::KeymapConfig;
use circlebox_core::{Heading, TimerSource};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render<S: TimerSource>(frame: &mut Frame, area: Rect, app: &App<S>) {
        let theme = &app.theme;
        let cursor = app.controller.cursor();
        let base = Style::default().fg(theme.status_fg).bg(theme.status_bg);

        let mut spans = if let Some(msg) = &app.status_message {
            vec![Span::styled(format!(" {}", msg), base)]
        } else {
            let (mode_str, mode_style) = if app.is_animating() {
                (
                    " ANIMATING",
                    base.fg(theme.accent).add_modifier(Modifier::BOLD),
                )
            } else {
                (" IDLE", base)
            };
            let heading_str = match cursor.traversal() {
                Heading::Forward => "->",
                Heading::Reverse => "<-",
            };
            vec![
                Span::styled(mode_str, mode_style),
                Span::styled(
                    format!(
                        " | Node {}/{} {} | {:>3.0}% | Settled: {}",
                        cursor.current() + 1,
                        cursor.chain().len(),
                        heading_str,
                        (app.current_progress() * 100.0).clamp(0.0, 100.0),
                        app.settled_count
                    ),
                    base,
                ),
            ]
        };

        let help_hint = key_hint(&app.config.keymap);
        let used: usize = spans.iter().map(|s| s.width()).sum::<usize>() + help_hint.len();
        let padding_len = (area.width as usize).saturating_sub(used);

        spans.push(Span::styled(
            " ".repeat(padding_len),
            Style::default().bg(theme.status_bg),
        ));
        spans.push(Span::styled(
            help_hint,
            Style::default().fg(theme.hint).bg(theme.status_bg),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Hint listing the configured tap and quit keys
pub fn key_hint(keymap: &KeymapConfig) -> String {
    format!(
        " {}:tap {}:quit ",
        display_key(&keymap.tap),
        display_key(&keymap.quit)
    )
}

/// "<Space>" -> "space", "<C-t>" -> "c-t", "q" -> "q"
fn display_key(key: &str) -> String {
    let key = key.trim();
    match key.strip_prefix('<').and_then(|k| k.strip_suffix('>')) {
        Some(inner) if !inner.is_empty() => inner.to_lowercase(),
        _ => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hint() {
        assert_eq!(key_hint(&KeymapConfig::default()), " space:tap q:quit ");
    }

    #[test]
    fn test_hint_follows_remapped_keys() {
        let keymap = KeymapConfig {
            tap: "t".to_string(),
            quit: "<Esc>".to_string(),
        };
        assert_eq!(key_hint(&keymap), " t:tap esc:quit ");
    }

    #[test]
    fn test_display_key_keeps_plain_chars() {
        assert_eq!(display_key("G"), "G");
        assert_eq!(display_key("<C-t>"), "c-t");
        assert_eq!(display_key("<>"), "<>");
    }
}

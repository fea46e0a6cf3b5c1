use circlebox_core::TimerSource;
use ratatui::{
    layout::Rect,
    symbols::Marker,
    widgets::canvas::{Canvas, Line},
    Frame,
};

use crate::app::App;

/// Braille dots per terminal cell, horizontally and vertically
const DOTS_X: f64 = 2.0;
const DOTS_Y: f64 = 4.0;

pub struct ChainWidget;

impl ChainWidget {
    pub fn render<S: TimerSource>(frame: &mut Frame, area: Rect, app: &mut App<S>) {
        // Stage units are braille dots so circles stay round
        let width = area.width as f64 * DOTS_X;
        let height = area.height as f64 * DOTS_Y;
        let surface = app.render_surface(width, height);
        let background = surface.background().unwrap_or(app.theme.back);

        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .background_color(background)
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                for segment in surface.segments() {
                    ctx.draw(&Line {
                        x1: segment.x1,
                        y1: segment.y1,
                        x2: segment.x2,
                        y2: segment.y2,
                        color: segment.color,
                    });
                }
            });

        frame.render_widget(canvas, area);
    }
}

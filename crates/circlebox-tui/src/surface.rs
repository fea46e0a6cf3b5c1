//! Drawing surface that turns engine primitives into canvas line segments
//!
//! Engine coordinates have y pointing down; ratatui's canvas has y pointing
//! up, so every point is flipped against the stage height on the way out.
//! A braille canvas draws one-dot lines, so line width and cap are tracked
//! for save/restore but do not change the output.

use circlebox_core::render::{PathBuffer, StateStack};
use circlebox_core::{DrawingSurface, LineCap, Rgb};
use ratatui::style::Color;

use crate::theme::to_color;

/// Straight line in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub color: Color,
}

#[derive(Debug, Clone)]
pub struct CanvasSurface {
    height: f64,
    state: StateStack,
    path: PathBuffer,
    segments: Vec<Segment>,
    background: Option<Color>,
}

impl CanvasSurface {
    /// Surface for a stage `height` units tall
    pub fn new(height: f64) -> Self {
        Self {
            height,
            state: StateStack::new(),
            path: PathBuffer::default(),
            segments: Vec::new(),
            background: None,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Color of the last full fill, used as the canvas background
    pub fn background(&self) -> Option<Color> {
        self.background
    }

    fn push_line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgb) {
        self.segments.push(Segment {
            x1: from.0,
            y1: self.height - from.1,
            x2: to.0,
            y2: self.height - to.1,
            color: to_color(color),
        });
    }
}

impl DrawingSurface for CanvasSurface {
    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.translate(dx, dy);
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.move_to(self.state.apply(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.path.line_to(self.state.apply(x, y));
    }

    fn stroke(&mut self) {
        let color = self.state.current().stroke_color;
        let segments: Vec<_> = self.path.segments().collect();
        for (from, to) in segments {
            self.push_line(from, to, color);
        }
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let color = self.state.current().stroke_color;
        let corners = [
            self.state.apply(x, y),
            self.state.apply(x + width, y),
            self.state.apply(x + width, y + height),
            self.state.apply(x, y + height),
        ];
        for i in 0..corners.len() {
            self.push_line(corners[i], corners[(i + 1) % corners.len()], color);
        }
    }

    fn fill_rect(&mut self, _x: f64, _y: f64, _width: f64, _height: f64) {
        // Only full-stage clears are issued; the fill becomes the background
        self.background = Some(to_color(self.state.current().fill_color));
    }

    fn set_stroke_color(&mut self, color: Rgb) {
        self.state.current_mut().stroke_color = color;
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.state.current_mut().fill_color = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.current_mut().line_width = width;
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.current_mut().line_cap = cap;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_becomes_four_flipped_segments() {
        let mut surface = CanvasSurface::new(100.0);
        surface.set_stroke_color(Rgb(1, 2, 3));
        surface.translate(10.0, 10.0);
        surface.stroke_rect(0.0, 0.0, 20.0, 30.0);

        let segments = surface.segments();
        assert_eq!(segments.len(), 4);
        assert_eq!((segments[0].x1, segments[0].y1), (10.0, 90.0));
        assert_eq!((segments[0].x2, segments[0].y2), (30.0, 90.0));
        assert_eq!((segments[1].x2, segments[1].y2), (30.0, 60.0));
        assert_eq!(segments[0].color, Color::Rgb(1, 2, 3));
    }

    #[test]
    fn test_path_segments_follow_transform() {
        let mut surface = CanvasSurface::new(50.0);
        surface.save();
        surface.translate(5.0, 0.0);
        surface.begin_path();
        surface.move_to(0.0, 0.0);
        surface.line_to(1.0, 0.0);
        surface.line_to(1.0, 1.0);
        surface.stroke();
        surface.restore();

        let segments = surface.segments();
        assert_eq!(segments.len(), 2);
        assert_eq!((segments[1].x1, segments[1].y1), (6.0, 50.0));
        assert_eq!((segments[1].x2, segments[1].y2), (6.0, 49.0));
    }

    #[test]
    fn test_fill_sets_background() {
        let mut surface = CanvasSurface::new(10.0);
        assert_eq!(surface.background(), None);
        surface.set_fill_color(Rgb(0xbd, 0xbd, 0xbd));
        surface.fill_rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(surface.background(), Some(Color::Rgb(0xbd, 0xbd, 0xbd)));
    }
}

//! Drawing contract and shape geometry
//!
//! The engine never touches pixels. It issues primitive calls against a
//! [`DrawingSurface`], which a front end implements on top of whatever it
//! renders to. Coordinates use a canvas convention: origin top-left, y
//! pointing down.

use serde::Serialize;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::scale::phase_scale;

/// Number of sequential phases in one node transition (box, then circles)
pub const PHASE_COUNT: usize = 2;

/// 24-bit color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse a hex color string
    /// Accepts formats: "#RRGGBB", "RRGGBB", "#RGB", "RGB"
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        match hex.len() {
            // Short form: RGB -> RRGGBB
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
                Some(Rgb(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Rgb(r, g, b))
            }
            _ => None,
        }
    }

    /// Like [`Rgb::from_hex`] but reports the offending string
    pub fn parse(hex: &str) -> Result<Self> {
        Self::from_hex(hex).ok_or_else(|| Error::InvalidColor(hex.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Primitive operations a host surface must support
pub trait DrawingSurface {
    /// Push the transform and stroke/fill settings
    fn save(&mut self);
    /// Pop back to the last `save`; ignored when nothing was saved
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Stroke the current path with the current stroke settings
    fn stroke(&mut self);

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn set_stroke_color(&mut self, color: Rgb);
    fn set_fill_color(&mut self, color: Rgb);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: LineCap);
}

/// Drawing settings captured by `save`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceState {
    pub offset: (f64, f64),
    pub stroke_color: Rgb,
    pub fill_color: Rgb,
    pub line_width: f64,
    pub line_cap: LineCap,
}

/// Save/restore stack shared by the surface implementations
#[derive(Debug, Clone, Default)]
pub struct StateStack {
    current: SurfaceState,
    saved: Vec<SurfaceState>,
}

impl StateStack {
    pub fn new() -> Self {
        Self {
            current: SurfaceState {
                line_width: 1.0,
                ..Default::default()
            },
            saved: Vec::new(),
        }
    }

    #[inline]
    pub fn current(&self) -> &SurfaceState {
        &self.current
    }

    #[inline]
    pub fn current_mut(&mut self) -> &mut SurfaceState {
        &mut self.current
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.current = state;
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.current.offset.0 += dx;
        self.current.offset.1 += dy;
    }

    /// Map a local point to surface coordinates
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (x + self.current.offset.0, y + self.current.offset.1)
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

/// Path under construction, already in surface coordinates
#[derive(Debug, Clone, Default)]
pub struct PathBuffer {
    subpaths: Vec<Vec<(f64, f64)>>,
}

impl PathBuffer {
    pub fn clear(&mut self) {
        self.subpaths.clear();
    }

    pub fn move_to(&mut self, point: (f64, f64)) {
        self.subpaths.push(vec![point]);
    }

    /// Extends the open subpath, or starts one when there is none
    pub fn line_to(&mut self, point: (f64, f64)) {
        match self.subpaths.last_mut() {
            Some(subpath) => subpath.push(point),
            None => self.subpaths.push(vec![point]),
        }
    }

    pub fn subpaths(&self) -> &[Vec<(f64, f64)>] {
        &self.subpaths
    }

    /// Straight segments making up every subpath
    pub fn segments(&self) -> impl Iterator<Item = ((f64, f64), (f64, f64))> + '_ {
        self.subpaths
            .iter()
            .flat_map(|subpath| subpath.windows(2).map(|w| (w[0], w[1])))
    }
}

/// Stage geometry for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub node_count: usize,
    pub size_factor: f64,
    pub stroke_factor: f64,
    pub fore_color: Rgb,
    pub back_color: Rgb,
}

impl Layout {
    /// Build a layout for a surface of the given size
    pub fn new(width: f64, height: f64, config: &AppConfig) -> Result<Self> {
        Ok(Self {
            width,
            height,
            node_count: config.chain.node_count,
            size_factor: config.stage.size_factor,
            stroke_factor: config.stage.stroke_factor,
            fore_color: Rgb::parse(&config.theme.fore_color)?,
            back_color: Rgb::parse(&config.theme.back_color)?,
        })
    }

    /// Layout with the same settings on a differently sized surface
    pub fn resized(&self, width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..self.clone()
        }
    }

    /// Horizontal distance between node centers
    #[inline]
    pub fn gap(&self) -> f64 {
        self.width / (self.node_count as f64 + 1.0)
    }

    #[inline]
    pub fn node_size(&self) -> f64 {
        self.gap() / self.size_factor
    }

    #[inline]
    pub fn stroke_width(&self) -> f64 {
        self.width.min(self.height) / self.stroke_factor
    }

    /// Center of node `index`
    #[inline]
    pub fn node_origin(&self, index: usize) -> (f64, f64) {
        (self.gap() * (index as f64 + 1.0), self.height / 2.0)
    }
}

/// Fill the whole stage with the background color
pub fn draw_background<S: DrawingSurface + ?Sized>(surface: &mut S, layout: &Layout) {
    surface.set_fill_color(layout.back_color);
    surface.fill_rect(0.0, 0.0, layout.width, layout.height);
}

/// Stroke an arc of radius `r` starting at 12 o'clock, clockwise, covering
/// `sc` of a full turn in one-degree steps
pub fn draw_stroked_circle<S: DrawingSurface + ?Sized>(surface: &mut S, r: f64, sc: f64) {
    let end = -90.0 + 360.0 * sc;
    surface.begin_path();
    let mut deg = -90i32;
    while deg as f64 <= end {
        let rad = (deg as f64).to_radians();
        let (x, y) = (r * rad.cos(), r * rad.sin());
        if deg == -90 {
            surface.move_to(x, y);
        } else {
            surface.line_to(x, y);
        }
        deg += 1;
    }
    surface.stroke();
}

/// Box that grows downward with `sc2`, holding two arcs that fill with `sc1`
/// and separate with `sc2`
pub fn draw_box_circle<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    size: f64,
    sc1: f64,
    sc2: f64,
) {
    let r = size / 2.0;
    surface.stroke_rect(-size / 2.0, -size / 2.0, size, size + size * sc2);
    for i in 0..2 {
        surface.save();
        surface.translate(0.0, -r + 2.0 * r * sc2 * i as f64);
        draw_stroked_circle(surface, r, sc1);
        surface.restore();
    }
}

/// Draw node `index` at overall transition progress `scale`
pub fn draw_node<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    layout: &Layout,
    index: usize,
    scale: f64,
) {
    let sc1 = phase_scale(scale, 0, PHASE_COUNT);
    let sc2 = phase_scale(scale, 1, PHASE_COUNT);
    let (x, y) = layout.node_origin(index);

    surface.save();
    surface.translate(x, y);
    surface.set_stroke_color(layout.fore_color);
    surface.set_line_width(layout.stroke_width());
    surface.set_line_cap(LineCap::Round);
    draw_box_circle(surface, layout.node_size(), sc1, sc2);
    surface.restore();
}

/// A primitive recorded by [`RecordingSurface`], in surface coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Path {
        points: Vec<(f64, f64)>,
        color: Rgb,
        width: f64,
        cap: LineCap,
    },
    StrokeRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgb,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgb,
    },
}

/// Surface that records what was drawn instead of rasterizing it
///
/// Used by the headless renderer and by tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    state: StateStack,
    path: PathBuffer,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            state: StateStack::new(),
            ..Default::default()
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
        self.path.clear();
    }

    pub fn stroke_rects(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::StrokeRect { .. }))
    }

    pub fn paths(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Path { .. }))
    }

    /// Unbalanced `save` calls so far
    pub fn save_depth(&self) -> usize {
        self.state.depth()
    }
}

impl DrawingSurface for RecordingSurface {
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
        let current = self.state.current();
        for subpath in self.path.subpaths() {
            self.ops.push(DrawOp::Path {
                points: subpath.clone(),
                color: current.stroke_color,
                width: current.line_width,
                cap: current.line_cap,
            });
        }
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (x, y) = self.state.apply(x, y);
        self.ops.push(DrawOp::StrokeRect {
            x,
            y,
            width,
            height,
            color: self.state.current().stroke_color,
        });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (x, y) = self.state.apply(x, y);
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color: self.state.current().fill_color,
        });
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

//! Function plotting
//!
//! Samples a function over an x-range and maps the samples onto a canvas
//! with a 10% margin on every side.

use glam::Vec2;

pub const DEFAULT_X_MIN: f32 = -2.0;
pub const DEFAULT_X_MAX: f32 = 2.0;
/// Intervals between samples (the curve has one more point than this)
pub const SAMPLE_INTERVALS: usize = 1000;
/// Number of axis tick intervals
pub const TICK_INTERVALS: usize = 10;

/// The plotted function: y = 1 - x²
pub fn parabola(x: f32) -> f32 {
    1.0 - x * x
}

/// Closed x-interval to plot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotRange {
    pub x_min: f32,
    pub x_max: f32,
}

impl Default for PlotRange {
    fn default() -> Self {
        Self {
            x_min: DEFAULT_X_MIN,
            x_max: DEFAULT_X_MAX,
        }
    }
}

impl PlotRange {
    /// Build a range from user text. Unparseable bounds use the defaults and
    /// reversed bounds are swapped.
    pub fn parse(min_text: &str, max_text: &str) -> Self {
        let x_min = min_text
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(DEFAULT_X_MIN);
        let x_max = max_text
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(DEFAULT_X_MAX);
        Self::new(x_min, x_max)
    }

    pub fn new(a: f32, b: f32) -> Self {
        Self {
            x_min: a.min(b),
            x_max: a.max(b),
        }
    }

    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }
}

/// Evenly spaced samples of a function plus the padded y-range
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    pub range: PlotRange,
    pub points: Vec<Vec2>,
    pub y_min: f32,
    pub y_max: f32,
}

impl Plot {
    /// Sample `f` at `SAMPLE_INTERVALS + 1` points across `range`
    pub fn sample(range: PlotRange, f: impl Fn(f32) -> f32) -> Self {
        Self::sample_n(range, SAMPLE_INTERVALS, f)
    }

    /// Sample `f` at `intervals + 1` points across `range`
    pub fn sample_n(range: PlotRange, intervals: usize, f: impl Fn(f32) -> f32) -> Self {
        let intervals = intervals.max(1);
        let step = range.width() / intervals as f32;
        let points: Vec<Vec2> = (0..=intervals)
            .map(|i| {
                let x = range.x_min + i as f32 * step;
                Vec2::new(x, f(x))
            })
            .collect();

        let (lo, hi) = points
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        let pad = (hi - lo) * 0.1;

        Self {
            range,
            points,
            y_min: lo - pad,
            y_max: hi + pad,
        }
    }

    /// Map the samples into a `width × height` canvas (y grows downward).
    ///
    /// The plot occupies the central 80% of the canvas.
    pub fn to_canvas(&self, width: f32, height: f32) -> Vec<Vec2> {
        let x_span = self.range.width();
        let y_span = self.y_max - self.y_min;
        let scale_x = if x_span > 0.0 { width * 0.8 / x_span } else { 0.0 };
        let scale_y = if y_span > 0.0 { height * 0.8 / y_span } else { 0.0 };
        let left = width * 0.1;
        let bottom = height * 0.9;

        self.points
            .iter()
            .map(|p| {
                Vec2::new(
                    left + (p.x - self.range.x_min) * scale_x,
                    bottom - (p.y - self.y_min) * scale_y,
                )
            })
            .collect()
    }

    /// Tick values along x
    pub fn x_ticks(&self) -> Vec<f32> {
        ticks(self.range.x_min, self.range.x_max)
    }

    /// Tick values along y
    pub fn y_ticks(&self) -> Vec<f32> {
        ticks(self.y_min, self.y_max)
    }
}

fn ticks(lo: f32, hi: f32) -> Vec<f32> {
    let step = (hi - lo) / TICK_INTERVALS as f32;
    (0..=TICK_INTERVALS).map(|i| lo + i as f32 * step).collect()
}

//! Custom `genpdf` elements used by the handout.
//!
//! `genpdf` ships text, tables and images but no vector drawing element, so
//! the revenue curve and the accent rules are drawn here with plain line
//! strokes.

use genpdf::error::Error;
use genpdf::style::{Color, Style, StyledString};
use genpdf::{render, Element, Mm, Position, RenderResult, Size};
use log::debug;

use crate::model::{Rgb, TrendSeries};

const DEFAULT_SKETCH_HEIGHT_MM: f64 = 45.0;
const MARKER_HALF_SIZE_MM: f64 = 0.8;
const LABEL_GAP_MM: f64 = 1.0;
const SIDE_MARGIN: f64 = 0.05;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

pub(crate) fn color(rgb: Rgb) -> Color {
    let Rgb(r, g, b) = rgb;
    Color::Rgb(r, g, b)
}

/// A line chart of a [`TrendSeries`] with a value label above each point and
/// the period below.
///
/// Points keep their input order and are spread evenly across the width.
pub struct SeriesSketch {
    points: Vec<(String, f64, String)>,
    y_range: (f64, f64),
    height: Mm,
    color: Color,
    axis_color: Color,
}

impl SeriesSketch {
    /// Creates a sketch of `series` stroked in `accent`.
    pub fn new(series: &TrendSeries, accent: Rgb, axis: Rgb) -> Self {
        Self {
            points: series
                .points()
                .iter()
                .map(|p| (p.period().to_owned(), p.value(), series.format_value(p.value())))
                .collect(),
            y_range: series.effective_y_range(),
            height: mm_from_f64(DEFAULT_SKETCH_HEIGHT_MM),
            color: color(accent),
            axis_color: color(axis),
        }
    }

    /// Sets the total height, labels included.
    pub fn with_height(mut self, height: Mm) -> Self {
        self.height = height;
        self
    }

    /// Horizontal position of point `index` as a fraction of the width.
    fn x_fraction(&self, index: usize) -> f64 {
        match self.points.len() {
            0 | 1 => 0.5,
            n => SIDE_MARGIN + (1.0 - 2.0 * SIDE_MARGIN) * index as f64 / (n - 1) as f64,
        }
    }

    /// Vertical position of `value` as a fraction of the plot height, from the top.
    fn y_fraction(&self, value: f64) -> f64 {
        let (lo, hi) = self.y_range;
        if (hi - lo).abs() < f64::EPSILON {
            0.5
        } else {
            ((hi - value) / (hi - lo)).clamp(0.0, 1.0)
        }
    }
}

impl Element for SeriesSketch {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let available = area.size();
        if available.height < self.height {
            result.has_more = true;
            return Ok(result);
        }

        let label_style = style.with_font_size(8);
        let value_style = label_style.bold().with_color(self.color);
        let line_height = mm_to_f64(label_style.line_height(&context.font_cache));
        let width = mm_to_f64(available.width);
        let gap = LABEL_GAP_MM;
        let plot_top = line_height + gap;
        let plot_bottom = mm_to_f64(self.height) - line_height - gap;
        let plot_height = (plot_bottom - plot_top).max(0.0);

        let at = |x: f64, y: f64| Position::new(mm_from_f64(x), mm_from_f64(y));
        let axis = Style::new().with_color(self.axis_color);
        let stroke = Style::new().with_color(self.color);

        area.draw_line(vec![at(0.0, plot_bottom), at(width, plot_bottom)], axis);

        let coords: Vec<(f64, f64)> = (0..self.points.len())
            .map(|i| {
                (
                    width * self.x_fraction(i),
                    plot_top + plot_height * self.y_fraction(self.points[i].1),
                )
            })
            .collect();

        if coords.len() > 1 {
            area.draw_line(coords.iter().map(|&(x, y)| at(x, y)).collect::<Vec<_>>(), stroke);
        }

        let h = MARKER_HALF_SIZE_MM;
        for ((period, _, label), &(x, y)) in self.points.iter().zip(&coords) {
            area.draw_line(
                vec![
                    at(x - h, y - h),
                    at(x + h, y - h),
                    at(x + h, y + h),
                    at(x - h, y + h),
                    at(x - h, y - h),
                ],
                stroke,
            );

            let label_at = |width: f64| at(x - width / 2.0, y - h - gap - line_height);
            print_centered(&area, context, label, value_style, label_at)?;
            print_centered(&area, context, period, label_style, |width| {
                at(x - width / 2.0, plot_bottom + gap)
            })?;
        }

        result.size = Size::new(available.width, self.height);
        Ok(result)
    }
}

/// Prints `text` at the position `place` computes from its width.
///
/// Text that does not fit into `area` is skipped and logged.
fn print_centered(
    area: &render::Area<'_>,
    context: &genpdf::Context,
    text: &str,
    style: Style,
    place: impl Fn(f64) -> Position,
) -> Result<bool, Error> {
    let width = mm_to_f64(StyledString::new(text.to_owned(), style).width(&context.font_cache));
    let printed = area.print_str(&context.font_cache, place(width), style, text)?;
    if !printed {
        debug!("sketch label {text:?} does not fit and was skipped");
    }
    Ok(printed)
}

/// A full-width horizontal rule in a single colour.
pub struct AccentRule {
    color: Color,
    spacing: Mm,
}

impl AccentRule {
    /// Creates a rule with `spacing` millimetres of room below the stroke.
    pub fn new(accent: Rgb, spacing: f64) -> Self {
        Self {
            color: color(accent),
            spacing: mm_from_f64(spacing),
        }
    }
}

impl Element for AccentRule {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let available = area.size();
        if available.height < self.spacing {
            result.has_more = true;
            return Ok(result);
        }
        area.draw_line(
            vec![Position::new(0, 0), Position::new(available.width, 0)],
            Style::new().with_color(self.color),
        );
        result.size = Size::new(available.width, self.spacing);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TimeSeriesPoint;

    fn sketch(values: &[f64]) -> SeriesSketch {
        let points: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(i, v)| TimeSeriesPoint::new(format!("{}", 2026 + i), *v))
            .collect();
        SeriesSketch::new(
            &TrendSeries::new(points).with_y_range(Some((0.0, 20.0))),
            Rgb(6, 182, 212),
            Rgb(100, 116, 139),
        )
    }

    #[test]
    fn points_keep_input_order_across_the_width() {
        let sketch = sketch(&[20.0, 10.0, 0.0]);
        assert!((sketch.x_fraction(0) - 0.05).abs() < 1e-9);
        assert!((sketch.x_fraction(1) - 0.5).abs() < 1e-9);
        assert!((sketch.x_fraction(2) - 0.95).abs() < 1e-9);
    }

    #[test]
    fn higher_values_sit_closer_to_the_top() {
        let sketch = sketch(&[20.0, 10.0, 0.0]);
        assert!(sketch.y_fraction(20.0) < sketch.y_fraction(10.0));
        assert!((sketch.y_fraction(0.0) - 1.0).abs() < 1e-9);
        assert_eq!(sketch.y_fraction(50.0), 0.0);
    }

    #[test]
    fn height_defaults_and_can_be_overridden() {
        let sketch = sketch(&[1.0, 2.0]);
        assert!((mm_to_f64(sketch.height) - DEFAULT_SKETCH_HEIGHT_MM).abs() < 1e-9);
        let sketch = sketch.with_height(mm_from_f64(30.0));
        assert!((mm_to_f64(sketch.height) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn single_point_is_centred() {
        assert_eq!(sketch(&[3.0]).x_fraction(0), 0.5);
    }

    #[test]
    fn millimetre_conversions_round_trip() {
        assert!((mm_to_f64(mm_from_f64(12.5)) - 12.5).abs() < 1e-9);
    }
}

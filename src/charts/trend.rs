//! Trend chart: a thick line over evenly spaced periods with filled area,
//! hollow markers and a value label above every point.

use crate::model::TrendSeries;
use crate::style::ChartStyle;

use super::svg::{Frame, SvgDocument, TextStyle};

const FIGURE_INCHES: (f64, f64) = (10.0, 5.0);
const LINE_WIDTH: f64 = 4.0;
const MARKER_RADIUS: f64 = 7.5;
const MARKER_EDGE: f64 = 3.0;
const AREA_OPACITY: f64 = 0.1;
const LABEL_OFFSET: f64 = 20.0;
const LABEL_SIZE: f64 = 14.0;
const X_MARGIN: f64 = 0.05;

/// Horizontal data range for `count` evenly spaced points.
fn x_range(count: usize) -> (f64, f64) {
    if count <= 1 {
        return (-0.5, 0.5);
    }
    let span = (count - 1) as f64;
    (-span * X_MARGIN, span * (1.0 + X_MARGIN))
}

pub(crate) fn render(series: &TrendSeries, style: &ChartStyle) -> String {
    let (width, height) = style.canvas_size(FIGURE_INCHES);
    let points = series.points();
    let (y_lo, y_hi) = series.effective_y_range();
    let frame = Frame::new(x_range(points.len()), (y_lo, y_hi), width, height);
    let mut doc = SvgDocument::new(width, height, style.font_family.as_str());

    let pixels: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, point)| (frame.x(i as f64), frame.y(point.value())))
        .collect();

    if let (Some(first), Some(last)) = (pixels.first(), pixels.last()) {
        let baseline = frame.y(y_lo.max(0.0).min(y_hi));
        let mut area = pixels.clone();
        area.push((last.0, baseline));
        area.push((first.0, baseline));
        doc.open_group("trend-area");
        doc.polygon(&area, style.accent, AREA_OPACITY);
        doc.close_group();

        doc.open_group("trend-line");
        doc.polyline(&pixels, style.accent, LINE_WIDTH);
        doc.close_group();
    }

    doc.open_group("data-points");
    for (point, &(x, y)) in points.iter().zip(&pixels) {
        let value = point.value().to_string();
        doc.circle(
            x,
            y,
            MARKER_RADIUS,
            Some((style.background, 1.0)),
            Some((style.accent, MARKER_EDGE)),
            &[
                ("class", "data-point"),
                ("data-period", point.period()),
                ("data-value", value.as_str()),
            ],
        );
    }
    doc.close_group();

    doc.open_group("value-labels");
    let label_style = TextStyle::new(LABEL_SIZE, style.text).bold();
    for (point, &(x, y)) in points.iter().zip(&pixels) {
        doc.text(
            x,
            y - LABEL_OFFSET,
            &series.format_value(point.value()),
            &label_style,
            LABEL_SIZE,
        );
    }
    doc.close_group();

    doc.finish()
}

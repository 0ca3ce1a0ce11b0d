//! Milestone timeline: markers on alternating stems above and below a
//! horizontal date axis, each with a boxed label.

use chrono::Datelike;

use crate::model::{milestone_level, Milestone};
use crate::style::ChartStyle;

use super::svg::{Frame, SvgDocument, TextStyle};

const FIGURE_INCHES: (f64, f64) = (12.0, 3.0);
const AXIS_WIDTH: f64 = 2.0;
const STEM_DASH: &str = "2,3";
const STEM_OPACITY: f64 = 0.5;
const MARKER_RADIUS: f64 = 5.0;
const LABEL_SIZE: f64 = 10.0;
const LABEL_PAD: f64 = 4.0;
const LABEL_FILL_OPACITY: f64 = 0.9;
const LABEL_ABOVE: f64 = 0.4;
const LABEL_BELOW: f64 = -0.6;
const Y_HEADROOM: f64 = 0.3;
const X_MARGIN: f64 = 0.05;
const SINGLE_DATE_MARGIN_DAYS: f64 = 15.0;

fn day_number(milestone: &Milestone) -> f64 {
    f64::from(milestone.date().num_days_from_ce())
}

fn x_range(days: &[f64]) -> (f64, f64) {
    let lo = days.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = days.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    let margin = if hi - lo > 0.0 {
        (hi - lo) * X_MARGIN
    } else {
        SINGLE_DATE_MARGIN_DAYS
    };
    (lo - margin, hi + margin)
}

fn y_range(levels: &[f64]) -> (f64, f64) {
    let lo = levels.iter().copied().fold(0.0, f64::min);
    let hi = levels.iter().copied().fold(0.0, f64::max);
    (lo + LABEL_BELOW - Y_HEADROOM, hi + LABEL_ABOVE + Y_HEADROOM)
}

/// Offset of a label from its marker: above for positive levels.
fn label_offset(level: f64) -> f64 {
    if level > 0.0 {
        LABEL_ABOVE
    } else {
        LABEL_BELOW
    }
}

/// Rough rendered width of a bold label; SVG has no text metrics.
fn estimated_text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * 0.6
}

pub(crate) fn render(milestones: &[Milestone], style: &ChartStyle) -> String {
    let (width, height) = style.canvas_size(FIGURE_INCHES);
    let days: Vec<f64> = milestones.iter().map(day_number).collect();
    let levels: Vec<f64> = (0..milestones.len()).map(milestone_level).collect();
    let frame = Frame::new(x_range(&days), y_range(&levels), width, height);
    let mut doc = SvgDocument::new(width, height, style.font_family.as_str());

    let first = days.iter().copied().fold(f64::INFINITY, f64::min);
    let last = days.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if first.is_finite() {
        doc.open_group("timeline-axis");
        doc.line(
            (frame.x(first), frame.y(0.0)),
            (frame.x(last), frame.y(0.0)),
            style.secondary,
            AXIS_WIDTH,
            None,
            1.0,
        );
        doc.close_group();
    }

    doc.open_group("stems");
    for (&day, &level) in days.iter().zip(&levels) {
        doc.line(
            (frame.x(day), frame.y(0.0)),
            (frame.x(day), frame.y(level)),
            style.secondary,
            1.0,
            Some(STEM_DASH),
            STEM_OPACITY,
        );
    }
    doc.close_group();

    doc.open_group("milestones");
    for ((milestone, &day), &level) in milestones.iter().zip(&days).zip(&levels) {
        let date = milestone.date().format("%Y-%m-%d").to_string();
        doc.circle(
            frame.x(day),
            frame.y(level),
            MARKER_RADIUS,
            Some((milestone.color(), 1.0)),
            None,
            &[
                ("class", "milestone-marker"),
                ("data-label", milestone.label()),
                ("data-date", date.as_str()),
            ],
        );
    }
    doc.close_group();

    doc.open_group("milestone-labels");
    let label_style = TextStyle::new(LABEL_SIZE, style.text).bold();
    for ((milestone, &day), &level) in milestones.iter().zip(&days).zip(&levels) {
        let x = frame.x(day);
        let baseline = frame.y(level + label_offset(level));
        let text_width = estimated_text_width(milestone.label(), LABEL_SIZE);
        doc.rect(
            x - text_width / 2.0 - LABEL_PAD,
            baseline - LABEL_SIZE * 0.9 - LABEL_PAD,
            text_width + 2.0 * LABEL_PAD,
            LABEL_SIZE * 1.2 + 2.0 * LABEL_PAD,
            LABEL_PAD,
            Some((style.label_fill, LABEL_FILL_OPACITY)),
            Some((milestone.color(), 1.0)),
        );
        doc.text(x, baseline, milestone.label(), &label_style, LABEL_SIZE);
    }
    doc.close_group();

    doc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rgb;
    use chrono::NaiveDate;

    fn milestone(label: &str, date: &str) -> Milestone {
        Milestone::new(
            label,
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            Rgb(0x3b, 0x82, 0xf6),
        )
    }

    #[test]
    fn labels_sit_above_or_below_the_axis() {
        assert_eq!(label_offset(1.5), LABEL_ABOVE);
        assert_eq!(label_offset(-1.0), LABEL_BELOW);
    }

    #[test]
    fn vertical_range_leaves_room_for_labels() {
        let (lo, hi) = y_range(&[1.0, -1.0, 1.5, -1.5]);
        assert!((lo + 2.4).abs() < 1e-9);
        assert!((hi - 2.2).abs() < 1e-9);
    }

    #[test]
    fn single_milestone_still_renders() {
        let svg = render(&[milestone("Solo", "2026-02-15")], &ChartStyle::default());
        assert_eq!(svg.matches(r#"class="milestone-marker""#).count(), 1);
        assert!(svg.contains(r#"data-date="2026-02-15""#));
    }

    #[test]
    fn empty_timeline_has_no_axis_line() {
        let svg = render(&[], &ChartStyle::default());
        assert!(!svg.contains("<line"));
    }

    #[test]
    fn markers_keep_input_order() {
        let svg = render(
            &[milestone("A", "2026-02-15"), milestone("B", "2026-11-15")],
            &ChartStyle::default(),
        );
        let a = svg.find(r#"data-label="A""#).unwrap();
        let b = svg.find(r#"data-label="B""#).unwrap();
        assert!(a < b);
    }
}

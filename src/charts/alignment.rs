//! Alignment diagram: side-by-side category boxes with a heading and body.

use crate::model::CategoryBox;
use crate::style::ChartStyle;

use super::svg::{Frame, SvgDocument, TextStyle};

const FIGURE_INCHES: (f64, f64) = (12.0, 6.0);
const X_RANGE: (f64, f64) = (0.0, 12.0);
const Y_RANGE: (f64, f64) = (0.0, 5.5);
const BOX_PAD: f64 = 0.2;
const BORDER_WIDTH: f64 = 2.0;
const FILL_OPACITY: f64 = 0.1;
const TITLE_Y: f64 = 4.0;
const TITLE_SIZE: f64 = 12.0;
const BODY_Y: f64 = 2.5;
const LINE_SPACING: f64 = 1.2;

pub(crate) fn render(boxes: &[CategoryBox], style: &ChartStyle) -> String {
    let (width, height) = style.canvas_size(FIGURE_INCHES);
    let frame = Frame::new(X_RANGE, Y_RANGE, width, height);
    let mut doc = SvgDocument::new(width, height, style.font_family.as_str());

    for category in boxes {
        draw_box(&mut doc, &frame, category, style);
    }

    doc.finish()
}

fn draw_box(doc: &mut SvgDocument, frame: &Frame, category: &CategoryBox, style: &ChartStyle) {
    let (x, y) = category.position();
    let (w, h) = category.size();
    let accent = category.accent();

    doc.open_group("category-box");
    doc.rect(
        frame.x(x - BOX_PAD),
        frame.y(y + h + BOX_PAD),
        frame.dx(w + 2.0 * BOX_PAD),
        frame.dy(h + 2.0 * BOX_PAD),
        frame.dx(BOX_PAD),
        Some((accent, FILL_OPACITY)),
        Some((accent, BORDER_WIDTH)),
    );

    let cx = frame.x(category.center_x());
    let title_style = TextStyle::new(TITLE_SIZE, accent).bold();
    doc.text(
        cx,
        frame.y(TITLE_Y),
        category.title(),
        &title_style,
        TITLE_SIZE * LINE_SPACING,
    );

    let body_size = category.body_font_size();
    let line_height = body_size * LINE_SPACING;
    let lines = category.body().split('\n').count() as f64;
    // Vertically centre the block: shift up by half its height, then drop by
    // roughly half an x-height so the middle line sits on the centre.
    let first_baseline = frame.y(BODY_Y) - (lines - 1.0) * line_height / 2.0 + body_size * 0.35;
    doc.text(
        cx,
        first_baseline,
        category.body(),
        &TextStyle::new(body_size, style.text),
        line_height,
    );
    doc.close_group();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rgb;

    #[test]
    fn draws_one_group_per_box() {
        let boxes = vec![
            CategoryBox::new("A", "uno\ndos", Rgb(16, 185, 129), (0.5, 0.5), (3.5, 4.0)),
            CategoryBox::new("B", "tres", Rgb(239, 68, 68), (4.5, 0.5), (3.0, 4.0)),
        ];
        let svg = render(&boxes, &ChartStyle::default());
        assert_eq!(svg.matches(r#"<g class="category-box">"#).count(), 2);
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains(r##"stroke="#10b981""##));
        assert!(svg.contains(r#"width="864.00" height="432.00""#));
    }

    #[test]
    fn box_is_padded_around_its_data_rectangle() {
        let boxes = vec![CategoryBox::new("A", "b", Rgb(0, 0, 0), (0.5, 0.5), (3.5, 4.0))];
        let svg = render(&boxes, &ChartStyle::default());
        // x = 0.3 units * 72 px; width = 3.9 units * 72 px
        assert!(svg.contains(r#"<rect x="21.60""#));
        assert!(svg.contains(r#"width="280.80""#));
    }
}

//! Minimal SVG writer used by the chart renderers.
//!
//! Elements are appended as XML text.  Attribute values and text content are
//! escaped; numbers are printed with two decimals so output is stable across
//! runs and platforms.

use std::fmt::Write as _;

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

use crate::model::Rgb;

static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new(["&", "<", ">", "\"", "'"]).expect("static XML escape patterns are valid")
});

/// Escapes the five XML special characters.
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Formats a coordinate or length.
fn num(value: f64) -> String {
    let rounded = format!("{value:.2}");
    // Avoid "-0.00" for values that round to zero.
    if rounded == "-0.00" {
        "0.00".to_owned()
    } else {
        rounded
    }
}

/// Horizontal text anchoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Maps a data-space rectangle onto the pixel canvas.
///
/// The y axis is flipped: larger data values are drawn higher up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    x_range: (f64, f64),
    y_range: (f64, f64),
    width: f64,
    height: f64,
}

impl Frame {
    pub fn new(x_range: (f64, f64), y_range: (f64, f64), width: f64, height: f64) -> Self {
        Self {
            x_range,
            y_range,
            width,
            height,
        }
    }

    pub fn x(&self, value: f64) -> f64 {
        let (lo, hi) = self.x_range;
        if (hi - lo).abs() < f64::EPSILON {
            return self.width / 2.0;
        }
        (value - lo) / (hi - lo) * self.width
    }

    pub fn y(&self, value: f64) -> f64 {
        let (lo, hi) = self.y_range;
        if (hi - lo).abs() < f64::EPSILON {
            return self.height / 2.0;
        }
        self.height - (value - lo) / (hi - lo) * self.height
    }

    /// Scales a horizontal data length to pixels.
    pub fn dx(&self, length: f64) -> f64 {
        self.x(self.x_range.0 + length)
    }

    /// Scales a vertical data length to pixels.
    pub fn dy(&self, length: f64) -> f64 {
        self.y(self.y_range.0) - self.y(self.y_range.0 + length)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

/// Text styling for [`SvgDocument::text`].
#[derive(Clone, Debug)]
pub struct TextStyle {
    pub size: f64,
    pub bold: bool,
    pub fill: Rgb,
    pub anchor: Anchor,
}

impl TextStyle {
    pub fn new(size: f64, fill: Rgb) -> Self {
        Self {
            size,
            bold: false,
            fill,
            anchor: Anchor::Middle,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// An SVG document under construction.
pub struct SvgDocument {
    width: f64,
    height: f64,
    font_family: String,
    body: String,
}

impl SvgDocument {
    pub fn new(width: f64, height: f64, font_family: impl Into<String>) -> Self {
        Self {
            width,
            height,
            font_family: font_family.into(),
            body: String::new(),
        }
    }

    /// Opens a `<g>` group with a class name.
    pub fn open_group(&mut self, class: &str) {
        let _ = writeln!(self.body, r#"<g class="{}">"#, escape_xml(class));
    }

    pub fn close_group(&mut self) {
        self.body.push_str("</g>\n");
    }

    #[allow(clippy::too_many_arguments)]
    pub fn rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
        fill: Option<(Rgb, f64)>,
        stroke: Option<(Rgb, f64)>,
    ) {
        let _ = write!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}""#,
            num(x),
            num(y),
            num(width),
            num(height),
            num(radius)
        );
        self.paint(fill, stroke);
        self.body.push_str("/>\n");
    }

    /// Draws a circle; `attrs` are extra `name="value"` pairs such as
    /// `class` or `data-*` metadata.
    pub fn circle(
        &mut self,
        cx: f64,
        cy: f64,
        r: f64,
        fill: Option<(Rgb, f64)>,
        stroke: Option<(Rgb, f64)>,
        attrs: &[(&str, &str)],
    ) {
        let _ = write!(
            self.body,
            r#"<circle cx="{}" cy="{}" r="{}""#,
            num(cx),
            num(cy),
            num(r)
        );
        self.paint(fill, stroke);
        self.attrs(attrs);
        self.body.push_str("/>\n");
    }

    pub fn line(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        stroke: Rgb,
        width: f64,
        dash: Option<&str>,
        opacity: f64,
    ) {
        let _ = write!(
            self.body,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}""#,
            num(from.0),
            num(from.1),
            num(to.0),
            num(to.1),
            stroke,
            num(width)
        );
        if let Some(dash) = dash {
            let _ = write!(self.body, r#" stroke-dasharray="{}""#, escape_xml(dash));
        }
        if opacity < 1.0 {
            let _ = write!(self.body, r#" stroke-opacity="{}""#, num(opacity));
        }
        self.body.push_str("/>\n");
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], stroke: Rgb, width: f64) {
        let _ = write!(
            self.body,
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round" stroke-linecap="round"/>"#,
            Self::point_list(points),
            stroke,
            num(width)
        );
        self.body.push('\n');
    }

    pub fn polygon(&mut self, points: &[(f64, f64)], fill: Rgb, opacity: f64) {
        let _ = write!(
            self.body,
            r#"<polygon points="{}" fill="{}" fill-opacity="{}" stroke="none"/>"#,
            Self::point_list(points),
            fill,
            num(opacity)
        );
        self.body.push('\n');
    }

    /// Writes text; each `\n` starts a new line one `line_height` below.
    pub fn text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle, line_height: f64) {
        let _ = write!(
            self.body,
            r#"<text x="{}" y="{}" font-size="{}" fill="{}" text-anchor="{}""#,
            num(x),
            num(y),
            num(style.size),
            style.fill,
            style.anchor.as_str()
        );
        if style.bold {
            self.body.push_str(r#" font-weight="bold""#);
        }
        self.body.push('>');

        let mut lines = content.split('\n');
        if let Some(first) = lines.next() {
            let _ = write!(self.body, r#"<tspan x="{}">{}</tspan>"#, num(x), escape_xml(first));
        }
        for line in lines {
            let _ = write!(
                self.body,
                r#"<tspan x="{}" dy="{}">{}</tspan>"#,
                num(x),
                num(line_height),
                escape_xml(line)
            );
        }
        self.body.push_str("</text>\n");
    }

    fn point_list(points: &[(f64, f64)]) -> String {
        points
            .iter()
            .map(|(x, y)| format!("{},{}", num(*x), num(*y)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn paint(&mut self, fill: Option<(Rgb, f64)>, stroke: Option<(Rgb, f64)>) {
        match fill {
            Some((color, opacity)) => {
                let _ = write!(self.body, r#" fill="{color}""#);
                if opacity < 1.0 {
                    let _ = write!(self.body, r#" fill-opacity="{}""#, num(opacity));
                }
            }
            None => self.body.push_str(r#" fill="none""#),
        }
        if let Some((color, width)) = stroke {
            let _ = write!(
                self.body,
                r#" stroke="{color}" stroke-width="{}""#,
                num(width)
            );
        }
    }

    fn attrs(&mut self, attrs: &[(&str, &str)]) {
        for (name, value) in attrs {
            let _ = write!(self.body, r#" {}="{}""#, name, escape_xml(value));
        }
    }

    /// Serialises the document with its XML prolog.
    pub fn finish(self) -> String {
        let mut out = String::with_capacity(self.body.len() + 256);
        out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"no\"?>\n");
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{font}">"#,
            w = num(self.width),
            h = num(self.height),
            font = escape_xml(&self.font_family)
        );
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_xml("R&D <\"x\">"), "R&amp;D &lt;&quot;x&quot;&gt;");
    }

    #[test]
    fn frame_flips_vertical_axis() {
        let frame = Frame::new((0.0, 12.0), (0.0, 5.5), 864.0, 396.0);
        assert!((frame.x(6.0) - 432.0).abs() < 1e-9);
        assert!((frame.y(0.0) - 396.0).abs() < 1e-9);
        assert!(frame.y(5.5).abs() < 1e-9);
        assert!((frame.dx(1.0) - 72.0).abs() < 1e-9);
        assert!((frame.dy(1.0) - 72.0).abs() < 1e-9);
    }

    #[test]
    fn multiline_text_uses_tspans() {
        let mut doc = SvgDocument::new(100.0, 50.0, "Arial");
        doc.text(50.0, 10.0, "a\nb", &TextStyle::new(10.0, Rgb(255, 255, 255)), 12.0);
        let svg = doc.finish();
        assert_eq!(svg.matches("<tspan").count(), 2);
        assert!(svg.contains(r#"dy="12.00""#));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn negative_zero_is_normalised() {
        assert_eq!(num(-0.0001), "0.00");
        assert_eq!(num(1.005), format!("{:.2}", 1.005_f64));
    }
}

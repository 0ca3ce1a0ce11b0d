//! Data structures describing the content of the generated charts.
//!
//! The types in this module form a serialization-friendly model of what gets
//! drawn.  They do not know about SVG, HTML or PDF so the same values can
//! drive every renderer and can be dumped to (or loaded from) JSON.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An opaque 8-bit RGB colour written as `#rrggbb`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parses a `#rrggbb` literal written in source code.
    ///
    /// Malformed literals yield black; use [`str::parse`] for untrusted input.
    pub fn hex(literal: &str) -> Self {
        literal.parse().unwrap_or_default()
    }
}

/// Error returned when a colour literal is not `#rrggbb`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidColor(String);

impl fmt::Display for InvalidColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid colour {:?}; expected #rrggbb", self.0)
    }
}

impl std::error::Error for InvalidColor {}

impl FromStr for Rgb {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .filter(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| InvalidColor(s.to_owned()))?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| InvalidColor(s.to_owned()))
        };
        Ok(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// A labelled box of the alignment diagram.
///
/// Position and size are expressed in data units of the diagram frame
/// (12 x 5.5).  Layout is decided by whoever builds the boxes; nothing checks
/// that boxes do not overlap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryBox {
    title: String,
    body: String,
    accent: Rgb,
    position: (f64, f64),
    size: (f64, f64),
    #[serde(default = "default_body_font_size")]
    body_font_size: f64,
}

fn default_body_font_size() -> f64 {
    10.0
}

impl CategoryBox {
    /// Creates a box whose lower-left corner sits at `position`.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        accent: Rgb,
        position: (f64, f64),
        size: (f64, f64),
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            accent,
            position,
            size,
            body_font_size: default_body_font_size(),
        }
    }

    /// Returns the heading; `\n` separates lines.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the body text; `\n` separates lines.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the accent colour used for the border and the heading.
    pub fn accent(&self) -> Rgb {
        self.accent
    }

    /// Returns the lower-left corner in data units.
    pub fn position(&self) -> (f64, f64) {
        self.position
    }

    /// Returns the width and height in data units.
    pub fn size(&self) -> (f64, f64) {
        self.size
    }

    /// Returns the body font size in points.
    pub fn body_font_size(&self) -> f64 {
        self.body_font_size
    }

    /// Horizontal centre of the box in data units.
    pub fn center_x(&self) -> f64 {
        self.position.0 + self.size.0 / 2.0
    }

    /// Sets the body font size and returns the updated box.
    pub fn with_body_font_size(mut self, size: f64) -> Self {
        self.body_font_size = size;
        self
    }
}

/// One value of a time series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    period: String,
    value: f64,
}

impl TimeSeriesPoint {
    /// Creates a point for the given period label.
    pub fn new(period: impl Into<String>, value: f64) -> Self {
        Self {
            period: period.into(),
            value,
        }
    }

    /// Returns the period label, e.g. `2026`.
    pub fn period(&self) -> &str {
        &self.period
    }

    /// Returns the value.
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// An ordered series plotted by the trend chart.
///
/// Points are drawn in the order given; the series is never sorted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    points: Vec<TimeSeriesPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    y_range: Option<(f64, f64)>,
    #[serde(default)]
    value_prefix: String,
    #[serde(default)]
    value_suffix: String,
    #[serde(default = "default_decimals")]
    decimals: usize,
}

fn default_decimals() -> usize {
    1
}

impl TrendSeries {
    /// Creates a series without label decorations.
    pub fn new(points: impl Into<Vec<TimeSeriesPoint>>) -> Self {
        Self {
            points: points.into(),
            y_range: None,
            value_prefix: String::new(),
            value_suffix: String::new(),
            decimals: default_decimals(),
        }
    }

    /// Returns the points in plotting order.
    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    /// Returns the fixed vertical range, if any.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.y_range
    }

    /// Fixes the vertical axis and returns the updated series.
    pub fn with_y_range(mut self, y_range: impl Into<Option<(f64, f64)>>) -> Self {
        self.y_range = y_range.into();
        self
    }

    /// Sets the text around each value label and returns the updated series.
    pub fn with_label_affixes(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.value_prefix = prefix.into();
        self.value_suffix = suffix.into();
        self
    }

    /// Sets the number of decimals shown in value labels.
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    /// Formats a value the way it is annotated on the chart.
    pub fn format_value(&self, value: f64) -> String {
        format!(
            "{}{:.*}{}",
            self.value_prefix, self.decimals, value, self.value_suffix
        )
    }

    /// Returns the vertical range used for plotting.
    ///
    /// Without a fixed range the data extent is padded by 10% on both sides;
    /// a flat series is padded by one unit.
    pub fn effective_y_range(&self) -> (f64, f64) {
        if let Some(range) = self.y_range {
            return range;
        }
        let (min, max) = self
            .points
            .iter()
            .map(TimeSeriesPoint::value)
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .unwrap_or((0.0, 1.0));
        let pad = if (max - min).abs() < f64::EPSILON {
            1.0
        } else {
            (max - min) * 0.1
        };
        (min - pad, max + pad)
    }
}

/// A dated event on the timeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    label: String,
    date: NaiveDate,
    color: Rgb,
}

impl Milestone {
    /// Creates a milestone.
    pub fn new(label: impl Into<String>, date: NaiveDate, color: Rgb) -> Self {
        Self {
            label: label.into(),
            date,
            color,
        }
    }

    /// Returns the label drawn next to the marker.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the milestone date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the marker colour.
    pub fn color(&self) -> Rgb {
        self.color
    }
}

/// Vertical offset of the `index`-th milestone: `+1, -1, +1.5, -1.5, ...`.
pub fn milestone_level(index: usize) -> f64 {
    let magnitude = if (index / 2) % 2 == 0 { 1.0 } else { 1.5 };
    if index % 2 == 0 {
        magnitude
    } else {
        -magnitude
    }
}

/// The three charts the generator knows how to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Category boxes showing where the plan focuses.
    Alignment,
    /// Revenue projection curve.
    Trend,
    /// Milestone timeline.
    Timeline,
}

impl ChartKind {
    /// All chart kinds in rendering order.
    pub const ALL: [ChartKind; 3] = [ChartKind::Alignment, ChartKind::Trend, ChartKind::Timeline];

    /// Filename used when the configuration does not override it.
    pub fn default_file_name(self) -> &'static str {
        match self {
            ChartKind::Alignment => "chart_directorio.svg",
            ChartKind::Trend => "chart_vision.svg",
            ChartKind::Timeline => "chart_roadmap.svg",
        }
    }

    /// Lower-case identifier used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Alignment => "alignment",
            ChartKind::Trend => "trend",
            ChartKind::Timeline => "timeline",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File format of a generated artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// Scalable vector graphics.
    Svg,
    /// Hypertext document.
    Html,
    /// Portable document format.
    Pdf,
}

/// A file produced by a generation step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedArtifact {
    chart: Option<ChartKind>,
    path: PathBuf,
    format: ArtifactFormat,
}

impl RenderedArtifact {
    /// Records a rendered chart.
    pub fn chart(kind: ChartKind, path: impl Into<PathBuf>) -> Self {
        Self {
            chart: Some(kind),
            path: path.into(),
            format: ArtifactFormat::Svg,
        }
    }

    /// Records a rendered document.
    pub fn document(path: impl Into<PathBuf>, format: ArtifactFormat) -> Self {
        Self {
            chart: None,
            path: path.into(),
            format,
        }
    }

    /// Returns the chart kind for chart artifacts.
    pub fn chart_kind(&self) -> Option<ChartKind> {
        self.chart
    }

    /// Returns the path the artifact was written to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file format.
    pub fn format(&self) -> ArtifactFormat {
        self.format
    }

    /// Returns the filename component used for relative references.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

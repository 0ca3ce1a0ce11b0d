//! Rendering of the three presentation charts to SVG files.
//!
//! Each chart is produced from a [`ChartSpec`] by direct geometric placement:
//! data coordinates are mapped onto a fixed canvas, there is no layout engine.
//! Files are written atomically and silently replace earlier renders.

mod alignment;
pub mod svg;
mod timeline;
mod trend;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::Result;
use crate::model::{CategoryBox, ChartKind, Milestone, RenderedArtifact, TrendSeries};
use crate::output;
use crate::style::ChartStyle;

/// Data for one chart.
#[derive(Clone, Copy, Debug)]
pub enum ChartSpec<'a> {
    /// Category boxes of the alignment diagram.
    Alignment(&'a [CategoryBox]),
    /// Revenue projection.
    Trend(&'a TrendSeries),
    /// Dated milestones.
    Timeline(&'a [Milestone]),
}

impl ChartSpec<'_> {
    /// Returns which chart this spec draws.
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartSpec::Alignment(_) => ChartKind::Alignment,
            ChartSpec::Trend(_) => ChartKind::Trend,
            ChartSpec::Timeline(_) => ChartKind::Timeline,
        }
    }

    /// Renders the chart to SVG text without touching the filesystem.
    pub fn to_svg(&self, style: &ChartStyle) -> String {
        match self {
            ChartSpec::Alignment(boxes) => alignment::render(boxes, style),
            ChartSpec::Trend(series) => trend::render(series, style),
            ChartSpec::Timeline(milestones) => timeline::render(milestones, style),
        }
    }
}

/// Writes charts into an output directory under fixed filenames.
#[derive(Clone, Debug)]
pub struct ChartRenderer {
    output_dir: PathBuf,
    style: ChartStyle,
    file_names: BTreeMap<ChartKind, String>,
}

impl ChartRenderer {
    /// Creates a renderer using the default filenames and style.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            style: ChartStyle::default(),
            file_names: BTreeMap::new(),
        }
    }

    /// Sets the style and returns the updated renderer.
    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    /// Overrides the filename of one chart.
    pub fn with_file_name(mut self, kind: ChartKind, name: impl Into<String>) -> Self {
        self.file_names.insert(kind, name.into());
        self
    }

    /// Returns the directory charts are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the path a chart of `kind` is written to.
    pub fn path_for(&self, kind: ChartKind) -> PathBuf {
        let name = self
            .file_names
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_file_name());
        self.output_dir.join(name)
    }

    /// Renders `spec` and writes it, replacing any existing file.
    ///
    /// The only failure is a filesystem error, which is returned unchanged to
    /// the caller; nothing is retried.
    pub fn render(&self, spec: ChartSpec<'_>) -> Result<RenderedArtifact> {
        let kind = spec.kind();
        let path = self.path_for(kind);
        output::write_atomic(&path, spec.to_svg(&self.style))?;
        info!("rendered {kind} chart to {}", path.display());
        Ok(RenderedArtifact::chart(kind, path))
    }

    /// Renders the alignment diagram, the trend curve and the timeline, in
    /// that order.
    pub fn render_all(
        &self,
        boxes: &[CategoryBox],
        series: &TrendSeries,
        milestones: &[Milestone],
    ) -> Result<Vec<RenderedArtifact>> {
        [
            ChartSpec::Alignment(boxes),
            ChartSpec::Trend(series),
            ChartSpec::Timeline(milestones),
        ]
        .into_iter()
        .map(|spec| self.render(spec))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_use_fixed_names() {
        let renderer = ChartRenderer::new("out");
        assert_eq!(
            renderer.path_for(ChartKind::Trend),
            Path::new("out").join("chart_vision.svg")
        );
    }

    #[test]
    fn file_names_can_be_overridden() {
        let renderer = ChartRenderer::new("out").with_file_name(ChartKind::Timeline, "roadmap.svg");
        assert_eq!(
            renderer.path_for(ChartKind::Timeline),
            Path::new("out").join("roadmap.svg")
        );
        assert_eq!(
            renderer.path_for(ChartKind::Alignment),
            Path::new("out").join("chart_directorio.svg")
        );
    }

    #[test]
    fn render_reports_the_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ChartRenderer::new(dir.path());
        let artifact = renderer.render(ChartSpec::Timeline(&[])).unwrap();
        assert_eq!(artifact.chart_kind(), Some(ChartKind::Timeline));
        assert!(artifact.path().is_file());
    }
}

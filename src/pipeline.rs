//! The end-to-end generation run.
//!
//! Steps run strictly one after another: charts, deck, optional handout,
//! optional viewer.  The first failing step aborts the run; artifacts written
//! by earlier steps stay on disk.

use std::fmt;
use std::io;
use std::path::Path;

use log::{info, warn};

use crate::config::GeneratorConfig;
use crate::content::ReportContent;
use crate::deck::DeckAssembler;
use crate::error::Result;
use crate::handout::HandoutRenderer;
use crate::launcher;
use crate::model::{ChartKind, RenderedArtifact};
use crate::output;

/// What a run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    charts: Vec<RenderedArtifact>,
    deck: RenderedArtifact,
    handout: Option<RenderedArtifact>,
    launched: bool,
}

impl RunSummary {
    /// Returns the rendered charts in rendering order.
    pub fn charts(&self) -> &[RenderedArtifact] {
        &self.charts
    }

    /// Returns the assembled deck.
    pub fn deck(&self) -> &RenderedArtifact {
        &self.deck
    }

    /// Returns the handout, when one was requested.
    pub fn handout(&self) -> Option<&RenderedArtifact> {
        self.handout.as_ref()
    }

    /// Returns whether the deck was handed to the default viewer.
    pub fn launched(&self) -> bool {
        self.launched
    }

    /// Iterates over every written file.
    pub fn artifacts(&self) -> impl Iterator<Item = &RenderedArtifact> {
        self.charts
            .iter()
            .chain(Some(&self.deck))
            .chain(self.handout.as_ref())
    }
}

/// Hands a written document to a viewer.
pub type Opener = fn(&Path) -> io::Result<()>;

/// Runs the generation steps for one configuration and content set.
#[derive(Clone)]
pub struct Pipeline {
    config: GeneratorConfig,
    content: ReportContent,
    opener: Opener,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("content", &self.content)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn new(config: GeneratorConfig, content: ReportContent) -> Self {
        Self {
            config,
            content,
            opener: launcher::open_document,
        }
    }

    /// Replaces the viewer used after the deck is written.
    pub fn with_opener(mut self, opener: Opener) -> Self {
        self.opener = opener;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn content(&self) -> &ReportContent {
        &self.content
    }

    fn output_dir(&self) -> Result<&Path> {
        let dir = self.config.output_dir.as_path();
        output::ensure_dir(dir)?;
        Ok(dir)
    }

    /// Renders the three charts.
    pub fn render_charts(&self) -> Result<Vec<RenderedArtifact>> {
        self.output_dir()?;
        self.config.chart_renderer().render_all(
            &self.content.boxes,
            &self.content.revenue,
            &self.content.milestones,
        )
    }

    /// The chart artifacts this configuration produces, without rendering them.
    pub fn planned_charts(&self) -> Vec<RenderedArtifact> {
        let renderer = self.config.chart_renderer();
        ChartKind::ALL
            .into_iter()
            .map(|kind| RenderedArtifact::chart(kind, renderer.path_for(kind)))
            .collect()
    }

    /// Writes the deck referencing `charts`.
    pub fn assemble_deck(&self, charts: &[RenderedArtifact]) -> Result<RenderedArtifact> {
        self.output_dir()?;
        DeckAssembler::new(self.config.deck_path()).assemble(&self.content.deck, charts)
    }

    /// Writes the PDF handout.
    pub fn render_handout(&self) -> Result<RenderedArtifact> {
        self.output_dir()?;
        HandoutRenderer::new(self.config.handout_path(), self.config.style.clone())
            .write(&self.content)
    }

    /// Runs every enabled step.
    pub fn run(&self) -> Result<RunSummary> {
        let charts = self.render_charts()?;
        let deck = self.assemble_deck(&charts)?;
        let handout = if self.config.handout {
            Some(self.render_handout()?)
        } else {
            None
        };

        let launched = self.config.open_viewer && self.launch(deck.path());

        let summary = RunSummary {
            charts,
            deck,
            handout,
            launched,
        };
        info!(
            "generated {} artifacts in {}",
            summary.artifacts().count(),
            self.config.output_dir.display()
        );
        Ok(summary)
    }

    fn launch(&self, path: &Path) -> bool {
        match (self.opener)(path) {
            Ok(()) => true,
            Err(err) => {
                warn!("deck is ready at {} but could not be opened: {err}", path.display());
                false
            }
        }
    }
}

//! Assembly of the HTML slide deck.
//!
//! The deck references chart images by relative filename.  Filenames come
//! from the [`RenderedArtifact`]s returned by the chart renderer, which keeps
//! the document and the images consistent; whether the files still exist is
//! not checked.

mod html;
pub mod template;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::Result;
use crate::model::{ArtifactFormat, ChartKind, RenderedArtifact};
use crate::output;

pub use self::template::{fill_placeholders, Block, DeckTemplate, DeckTheme, Slide};

/// Default filename of the deck.
pub const DEFAULT_DECK_FILE: &str = "Presentacion_Final_Casia.html";

/// Writes a [`DeckTemplate`] as a single HTML document.
#[derive(Clone, Debug)]
pub struct DeckAssembler {
    path: PathBuf,
}

impl DeckAssembler {
    /// Creates an assembler writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the generated document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Renders the document in memory.
    pub fn render(&self, template: &DeckTemplate, artifacts: &[RenderedArtifact]) -> Result<String> {
        let hrefs = self.chart_hrefs(artifacts);
        html::HtmlRenderer::new(template, &hrefs).render()
    }

    /// Renders the document and writes it, replacing any previous version.
    pub fn assemble(
        &self,
        template: &DeckTemplate,
        artifacts: &[RenderedArtifact],
    ) -> Result<RenderedArtifact> {
        let document = self.render(template, artifacts)?;
        output::write_atomic(&self.path, document)?;
        info!(
            "assembled deck with {} slides at {}",
            template.slides.len(),
            self.path.display()
        );
        Ok(RenderedArtifact::document(&self.path, ArtifactFormat::Html))
    }

    fn chart_hrefs(&self, artifacts: &[RenderedArtifact]) -> BTreeMap<ChartKind, String> {
        let deck_dir = self.path.parent().unwrap_or_else(|| Path::new(""));
        artifacts
            .iter()
            .filter_map(|artifact| {
                let kind = artifact.chart_kind()?;
                Some((kind, relative_href(deck_dir, artifact.path())))
            })
            .collect()
    }
}

/// Builds the `src` used to reference `target` from a document in `base`.
///
/// Targets inside `base` become relative paths with `/` separators; anything
/// else is referenced by its full path.
fn relative_href(base: &Path, target: &Path) -> String {
    let Ok(relative) = target.strip_prefix(base) else {
        return target.to_string_lossy().into_owned();
    };
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_artifacts_are_referenced_by_file_name() {
        assert_eq!(
            relative_href(Path::new("out"), Path::new("out/chart_vision.svg")),
            "chart_vision.svg"
        );
        assert_eq!(
            relative_href(Path::new(""), Path::new("chart_vision.svg")),
            "chart_vision.svg"
        );
        assert_eq!(
            relative_href(Path::new("out"), Path::new("out/img/a.svg")),
            "img/a.svg"
        );
    }

    #[test]
    fn missing_chart_artifact_is_an_error() {
        let template = DeckTemplate {
            lang: "es".to_owned(),
            title: "t".to_owned(),
            variables: Default::default(),
            theme: DeckTheme::default(),
            slides: vec![Slide {
                blocks: vec![Block::chart(ChartKind::Trend)],
                ..Slide::default()
            }],
        };
        let err = DeckAssembler::new("deck.html")
            .render(&template, &[])
            .unwrap_err();
        assert!(err.to_string().contains("trend"));
    }

    fn builtin_charts() -> Vec<RenderedArtifact> {
        ChartKind::ALL
            .into_iter()
            .map(|kind| RenderedArtifact::chart(kind, kind.default_file_name()))
            .collect()
    }

    #[test]
    fn document_title_has_placeholders_filled() {
        let deck = crate::content::ReportContent::builtin().deck;
        let html = DeckAssembler::new("deck.html")
            .render(&deck, &builtin_charts())
            .unwrap();
        assert!(html.contains("<title>Sesión Validación CASIA</title>"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn unknown_placeholder_in_document_title_is_an_error() {
        let mut deck = crate::content::ReportContent::builtin().deck;
        deck.title = "{{nope}}".to_owned();
        let err = DeckAssembler::new("deck.html")
            .render(&deck, &builtin_charts())
            .unwrap_err();
        assert!(matches!(err, crate::error::DeckError::UnknownPlaceholder { name } if name == "nope"));
    }
}

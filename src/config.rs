//! Generator settings.
//!
//! Defaults write everything to the current directory under fixed names
//! and open the deck afterwards.
//! A JSON file can override any subset of the fields.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::charts::ChartRenderer;
use crate::deck::DEFAULT_DECK_FILE;
use crate::error::{DeckError, Result};
use crate::model::ChartKind;
use crate::style::ChartStyle;

/// Default filename of the PDF handout.
pub const DEFAULT_HANDOUT_FILE: &str = "Presentacion_Final_Casia.pdf";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory receiving every artifact.
    pub output_dir: PathBuf,
    /// Filename of the HTML deck inside `output_dir`.
    pub deck_file: String,
    /// Filename of the PDF handout inside `output_dir`.
    pub handout_file: String,
    /// Chart filename overrides; missing kinds use their default name.
    pub chart_files: BTreeMap<ChartKind, String>,
    pub style: ChartStyle,
    /// Open the deck in the default browser after writing it.
    pub open_viewer: bool,
    /// Also render the PDF handout.
    pub handout: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            deck_file: DEFAULT_DECK_FILE.to_owned(),
            handout_file: DEFAULT_HANDOUT_FILE.to_owned(),
            chart_files: BTreeMap::new(),
            style: ChartStyle::default(),
            open_viewer: true,
            handout: false,
        }
    }
}

impl GeneratorConfig {
    /// Loads settings from a JSON file; absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| DeckError::ConfigRead {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| DeckError::ConfigParse {
            path: path.to_owned(),
            source,
        })
    }

    /// Path of the HTML deck.
    pub fn deck_path(&self) -> PathBuf {
        self.output_dir.join(&self.deck_file)
    }

    /// Path of the PDF handout.
    pub fn handout_path(&self) -> PathBuf {
        self.output_dir.join(&self.handout_file)
    }

    /// Builds the chart renderer described by these settings.
    pub fn chart_renderer(&self) -> ChartRenderer {
        self.chart_files.iter().fold(
            ChartRenderer::new(&self.output_dir).with_style(self.style.clone()),
            |renderer, (kind, name)| renderer.with_file_name(*kind, name.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_write_into_the_working_directory() {
        let config = GeneratorConfig::default();
        assert_eq!(
            config.deck_path(),
            Path::new(".").join("Presentacion_Final_Casia.html")
        );
        assert!(config.open_viewer);
        assert!(!config.handout);
    }

    #[test]
    fn json_overrides_selected_fields() {
        let config: GeneratorConfig = serde_json::from_str(
            r#"{"output_dir": "out", "open_viewer": false, "chart_files": {"trend": "revenue.svg"}}"#,
        )
        .unwrap();
        assert_eq!(config.deck_file, DEFAULT_DECK_FILE);
        assert!(!config.open_viewer);
        assert_eq!(
            config.chart_renderer().path_for(ChartKind::Trend),
            Path::new("out").join("revenue.svg")
        );
    }
}

//! Generates the charts, the HTML slide deck and the optional PDF handout of
//! a strategy presentation.
//!
//! [`Pipeline`] runs the whole generation; the individual steps are exposed
//! through [`charts::ChartRenderer`], [`deck::DeckAssembler`] and
//! [`handout::HandoutRenderer`].

pub mod charts;
pub mod config;
pub mod content;
pub mod deck;
pub mod error;
pub mod handout;
pub mod launcher;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod richtext;
pub mod style;

pub use config::GeneratorConfig;
pub use content::ReportContent;
pub use error::{DeckError, Result};
pub use pipeline::{Pipeline, RunSummary};

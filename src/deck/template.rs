//! Serializable description of the slide deck.
//!
//! A [`DeckTemplate`] is plain data: slide titles and blocks whose text uses
//! the inline markup from [`crate::richtext`] plus `{{name}}` placeholders
//! resolved from [`DeckTemplate::variables`].  Chart blocks only name a
//! [`ChartKind`]; the filename is filled in when the deck is assembled.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DeckError, Result};
use crate::model::ChartKind;
use crate::richtext::{parse_markup, Span};

const REVEAL_CDN: &str = "https://cdnjs.cloudflare.com/ajax/libs/reveal.js/4.5.0";
const FONTS_CSS: &str =
    "https://fonts.googleapis.com/css2?family=Inter:wght@300;600;800&family=Montserrat:wght@700&display=swap";

const DEFAULT_STYLESHEET: &str = r#"
:root { --bg-dark: #0f172a; --glass: rgba(30, 41, 59, 0.8); --accent: #06b6d4; --gold: #f59e0b; }
body { background-color: var(--bg-dark); font-family: 'Inter', sans-serif; }
.reveal h1, .reveal h2 { font-family: 'Montserrat', sans-serif; text-transform: uppercase; }
.reveal h1 { background: -webkit-linear-gradient(0deg, #fff, var(--accent)); -webkit-background-clip: text; -webkit-text-fill-color: transparent; }
.reveal h2 { color: var(--accent); border-bottom: 2px solid var(--accent); display: inline-block; }
.kicker { color: var(--accent); font-weight: bold; letter-spacing: 3px; }
.card { background: var(--glass); border: 1px solid rgba(255,255,255,0.1); border-radius: 16px; padding: 20px; box-shadow: 0 10px 30px rgba(0,0,0,0.4); margin: 10px; }
.card-inline { display: inline-block; margin-top: 30px; }
.card-heading { color: var(--accent); }
.card ul { font-size: 0.7em; text-align: left; }
.decision { border-left: 5px solid var(--gold); background: rgba(245, 158, 11, 0.1); padding: 15px; text-align: left; margin-top: 20px; }
.grid { display: grid; gap: 20px; margin-top: 20px; align-items: center; }
ul.bare { list-style: none; padding: 0; }
img.chart { width: 100%; filter: drop-shadow(0 0 10px rgba(6,182,212,0.3)); }
"#;

/// The whole presentation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeckTemplate {
    /// Value of the `<html lang>` attribute.
    pub lang: String,
    /// Document title shown in the browser tab.
    pub title: String,
    /// Values for `{{name}}` placeholders.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    #[serde(default)]
    pub theme: DeckTheme,
    pub slides: Vec<Slide>,
}

/// reveal.js assets and presentation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckTheme {
    /// Base URL of the reveal.js distribution.
    pub reveal_cdn: String,
    /// reveal.js theme name, e.g. `black`.
    pub theme: String,
    pub transition: String,
    pub background_transition: String,
    /// Extra stylesheet URLs (web fonts).
    pub stylesheets: Vec<String>,
    /// Inline CSS placed in the document head.
    pub css: String,
}

impl Default for DeckTheme {
    fn default() -> Self {
        Self {
            reveal_cdn: REVEAL_CDN.to_owned(),
            theme: "black".to_owned(),
            transition: "convex".to_owned(),
            background_transition: "zoom".to_owned(),
            stylesheets: vec![FONTS_CSS.to_owned()],
            css: DEFAULT_STYLESHEET.trim().to_owned(),
        }
    }
}

/// One slide; every heading is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Slide {
    /// Small accent line above the title.
    pub kicker: Option<String>,
    /// Large `h1` title, used on the cover.
    pub title: Option<String>,
    /// `h3` under the title.
    pub subtitle: Option<String>,
    /// `h2` section heading.
    pub heading: Option<String>,
    pub blocks: Vec<Block>,
    /// Speaker notes.
    pub notes: Option<String>,
}

/// Content placed on a slide.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        text: String,
        /// CSS font size such as `0.8em`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<String>,
    },
    Card {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        heading: Option<String>,
        body: Vec<Block>,
        /// Shrink-wrap the card instead of filling the row.
        #[serde(default)]
        inline: bool,
    },
    Grid {
        columns: usize,
        items: Vec<Block>,
    },
    List {
        items: Vec<String>,
        /// Hide bullets.
        #[serde(default)]
        bare: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<String>,
    },
    Chart {
        chart: ChartKind,
        /// Reveal the chart on the next step.
        #[serde(default)]
        fragment: bool,
        /// CSS height such as `150px`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<String>,
    },
    /// A highlighted question the audience has to answer.
    Decision {
        text: String,
        #[serde(default)]
        centered: bool,
    },
}

impl Block {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph {
            text: text.into(),
            size: None,
        }
    }

    pub fn small_paragraph(text: impl Into<String>, size: impl Into<String>) -> Self {
        Self::Paragraph {
            text: text.into(),
            size: Some(size.into()),
        }
    }

    pub fn chart(chart: ChartKind) -> Self {
        Self::Chart {
            chart,
            fragment: false,
            height: None,
        }
    }

    pub fn decision(text: impl Into<String>) -> Self {
        Self::Decision {
            text: text.into(),
            centered: false,
        }
    }

    /// Calls `visit` for this block and every nested block, depth first.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Block)) {
        visit(self);
        match self {
            Block::Card { body, .. } => body.iter().for_each(|b| b.walk(visit)),
            Block::Grid { items, .. } => items.iter().for_each(|b| b.walk(visit)),
            _ => {}
        }
    }
}

impl DeckTemplate {
    /// Returns the charts referenced anywhere in the deck, in order of
    /// appearance and without duplicates.
    pub fn referenced_charts(&self) -> Vec<ChartKind> {
        let mut charts = Vec::new();
        for block in self.slides.iter().flat_map(|slide| &slide.blocks) {
            block.walk(&mut |b| {
                if let Block::Chart { chart, .. } = b {
                    if !charts.contains(chart) {
                        charts.push(*chart);
                    }
                }
            });
        }
        charts
    }

    /// Substitutes placeholders in `text` and parses its inline markup.
    pub fn spans(&self, text: &str) -> Result<Vec<Span>> {
        let filled = fill_placeholders(text, &self.variables)?;
        parse_markup(&filled).map_err(|source| DeckError::Markup {
            text: filled,
            source,
        })
    }
}

/// Replaces every `{{name}}` in `text` with its value from `variables`.
///
/// Whitespace around the name is ignored.  An opening `{{` without a closing
/// `}}` is kept literally; a name without a value is an error.
pub fn fill_placeholders(text: &str, variables: &BTreeMap<String, String>) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start + 2..].find("}}") else {
            break;
        };
        let name = rest[start + 2..start + 2 + len].trim();
        let value = variables
            .get(name)
            .ok_or_else(|| DeckError::UnknownPlaceholder {
                name: name.to_owned(),
            })?;
        out.push_str(&rest[..start]);
        out.push_str(value);
        rest = &rest[start + 2 + len + 2..];
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> BTreeMap<String, String> {
        BTreeMap::from([("client".to_owned(), "CASIA".to_owned())])
    }

    #[test]
    fn placeholders_are_substituted() {
        let text = fill_placeholders("Plan {{ client }} / {{client}}", &vars()).unwrap();
        assert_eq!(text, "Plan CASIA / CASIA");
    }

    #[test]
    fn unknown_placeholder_is_reported() {
        let err = fill_placeholders("{{missing}}", &vars()).unwrap_err();
        assert!(matches!(err, DeckError::UnknownPlaceholder { name } if name == "missing"));
    }

    #[test]
    fn unterminated_placeholder_is_literal() {
        assert_eq!(fill_placeholders("a {{ b", &vars()).unwrap(), "a {{ b");
    }

    #[test]
    fn referenced_charts_include_nested_blocks() {
        let template = DeckTemplate {
            lang: "es".to_owned(),
            title: "t".to_owned(),
            variables: BTreeMap::new(),
            theme: DeckTheme::default(),
            slides: vec![Slide {
                blocks: vec![
                    Block::Grid {
                        columns: 2,
                        items: vec![Block::paragraph("x"), Block::chart(ChartKind::Timeline)],
                    },
                    Block::chart(ChartKind::Alignment),
                    Block::chart(ChartKind::Timeline),
                ],
                ..Slide::default()
            }],
        };
        assert_eq!(
            template.referenced_charts(),
            vec![ChartKind::Timeline, ChartKind::Alignment]
        );
    }

    #[test]
    fn blocks_deserialize_from_tagged_json() {
        let block: Block =
            serde_json::from_str(r#"{"type": "chart", "chart": "trend", "height": "150px"}"#)
                .unwrap();
        assert_eq!(
            block,
            Block::Chart {
                chart: ChartKind::Trend,
                fragment: false,
                height: Some("150px".to_owned()),
            }
        );
    }
}

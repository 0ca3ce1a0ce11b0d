//! The printable PDF handout.
//!
//! The handout carries the same narrative as the HTML deck, one slide per
//! page, with the charts redrawn natively: the category boxes become coloured
//! columns, the revenue series a line sketch and the milestones a dated table.

pub mod builder;
pub mod elements;
pub mod fonts;

use std::path::{Path, PathBuf};

use genpdf::elements::{Break, LinearLayout, PageBreak, Paragraph, TableLayout, UnorderedList};
use genpdf::style::{Style, StyledString};
use genpdf::{Alignment, Element, Margins, PaperSize};
use log::info;

use crate::content::ReportContent;
use crate::deck::{Block, DeckTemplate, Slide};
use crate::error::Result;
use crate::model::{ArtifactFormat, ChartKind, RenderedArtifact};
use crate::output;
use crate::richtext::{plain_text, split_lines};
use crate::style::ChartStyle;

use self::builder::DocumentBuilder;
use self::elements::{color, mm_from_f64, AccentRule, SeriesSketch};

pub use self::fonts::fonts_available;

/// Body text size in points; `em` sizes in the deck scale from it.
const BASE_FONT_SIZE: u8 = 11;

/// Below this a sketch has no room between its labels.
const MIN_SKETCH_HEIGHT_MM: f64 = 20.0;

/// CSS reference pixels per inch.
const CSS_PX_PER_INCH: f64 = 96.0;

/// Renders a [`ReportContent`] as a PDF document.
#[derive(Clone, Debug)]
pub struct HandoutRenderer {
    path: PathBuf,
    style: ChartStyle,
}

impl HandoutRenderer {
    /// Creates a renderer writing to `path` with the given palette.
    pub fn new(path: impl Into<PathBuf>, style: ChartStyle) -> Self {
        Self {
            path: path.into(),
            style,
        }
    }

    /// Returns the path of the generated handout.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Renders the handout in memory.
    pub fn render(&self, content: &ReportContent) -> Result<Vec<u8>> {
        let layout = HandoutLayout {
            deck: &content.deck,
            content,
            style: &self.style,
        };
        let title = plain_text(&content.deck.spans(&content.deck.title)?);
        let slides = content
            .deck
            .slides
            .iter()
            .map(|slide| layout.slide(slide))
            .collect::<Result<Vec<_>>>()?;

        let mut document = DocumentBuilder::new()
            .with_title(title.clone())
            .with_paper_size(PaperSize::A4)
            .with_margins(Margins::trbl(15, 15, 10, 15))
            .with_font_size(BASE_FONT_SIZE)
            .with_line_spacing(1.25)
            .with_footer(title)
            .build()?;

        for (index, slide) in slides.into_iter().enumerate() {
            if index > 0 {
                document.push(PageBreak::new());
            }
            document.push(slide);
        }

        let mut bytes = Vec::new();
        document.render(&mut bytes)?;
        Ok(bytes)
    }

    /// Renders the handout and writes it, replacing any previous version.
    pub fn write(&self, content: &ReportContent) -> Result<RenderedArtifact> {
        let bytes = self.render(content)?;
        output::write_atomic(&self.path, &bytes)?;
        info!(
            "wrote {} byte handout to {}",
            bytes.len(),
            self.path.display()
        );
        Ok(RenderedArtifact::document(&self.path, ArtifactFormat::Pdf))
    }
}

struct HandoutLayout<'a> {
    deck: &'a DeckTemplate,
    content: &'a ReportContent,
    style: &'a ChartStyle,
}

impl HandoutLayout<'_> {
    /// Lays out deck text, one paragraph per line.
    fn text(&self, text: &str, style: Style, alignment: Alignment) -> Result<LinearLayout> {
        let spans = self.deck.spans(text)?;
        let mut layout = LinearLayout::vertical();
        for line in split_lines(&spans) {
            if line.is_empty() {
                layout.push(Break::new(0.5));
                continue;
            }
            let mut paragraph = Paragraph::default();
            for span in &line {
                paragraph.push(span.to_styled_string());
            }
            paragraph.set_alignment(alignment);
            layout.push(paragraph.styled(style));
        }
        Ok(layout)
    }

    fn slide(&self, slide: &Slide) -> Result<LinearLayout> {
        let accent = color(self.style.accent);
        let mut layout = LinearLayout::vertical();

        if let Some(kicker) = &slide.kicker {
            let style = Style::new()
                .italic()
                .with_font_size(10)
                .with_color(color(self.style.secondary));
            layout.push(self.text(kicker, style, Alignment::Left)?);
        }
        if let Some(title) = &slide.title {
            layout.push(self.text(title, Style::new().bold().with_font_size(22), Alignment::Left)?);
        }
        if let Some(subtitle) = &slide.subtitle {
            let style = Style::new().bold().with_font_size(16).with_color(accent);
            layout.push(self.text(subtitle, style, Alignment::Left)?);
        }
        if let Some(heading) = &slide.heading {
            layout.push(self.text(heading, Style::new().bold().with_font_size(18), Alignment::Left)?);
        }
        layout.push(AccentRule::new(self.style.accent, 4.0));

        for block in &slide.blocks {
            self.block(block, &mut layout)?;
            layout.push(Break::new(0.5));
        }

        if let Some(notes) = &slide.notes {
            let style = Style::new().italic().with_font_size(9);
            layout.push(self.text(notes, style, Alignment::Left)?);
        }
        Ok(layout)
    }

    fn block(&self, block: &Block, layout: &mut LinearLayout) -> Result<()> {
        match block {
            Block::Paragraph { text, size } => {
                let style = Style::new().with_font_size(scaled_font_size(size.as_deref()));
                layout.push(self.text(text, style, Alignment::Left)?);
            }
            Block::Card { heading, body, .. } => {
                let mut card = LinearLayout::vertical();
                if let Some(heading) = heading {
                    let style = Style::new().bold().with_color(color(self.style.accent));
                    card.push(self.text(heading, style, Alignment::Left)?);
                }
                for block in body {
                    self.block(block, &mut card)?;
                }
                layout.push(card.padded(Margins::trbl(1, 2, 1, 2)));
            }
            Block::Grid { columns, items } => {
                let columns = (*columns).max(1);
                let mut table = TableLayout::new(vec![1; columns]);
                for chunk in items.chunks(columns) {
                    let mut row = table.row();
                    for item in chunk {
                        let mut cell = LinearLayout::vertical();
                        self.block(item, &mut cell)?;
                        row = row.element(cell.padded(1));
                    }
                    for _ in chunk.len()..columns {
                        row = row.element(Paragraph::default());
                    }
                    row.push()?;
                }
                layout.push(table);
            }
            Block::List { items, bare, size } => {
                let style = Style::new().with_font_size(scaled_font_size(size.as_deref()));
                if *bare {
                    for item in items {
                        layout.push(self.text(item, style, Alignment::Left)?);
                    }
                } else {
                    let mut list = UnorderedList::new();
                    for item in items {
                        list.push(self.text(item, style, Alignment::Left)?);
                    }
                    layout.push(list);
                }
            }
            Block::Chart { chart, height, .. } => {
                self.chart(*chart, height.as_deref(), layout)?;
            }
            Block::Decision { text, centered } => {
                let alignment = if *centered {
                    Alignment::Center
                } else {
                    Alignment::Left
                };
                let style = Style::new().with_font_size(BASE_FONT_SIZE + 1);
                layout.push(self.text(text, style, alignment)?.padded(Margins::trbl(2, 0, 0, 0)));
            }
        }
        Ok(())
    }

    fn chart(&self, kind: ChartKind, height: Option<&str>, layout: &mut LinearLayout) -> Result<()> {
        match kind {
            ChartKind::Alignment => {
                let boxes = &self.content.boxes;
                if boxes.is_empty() {
                    return Ok(());
                }
                let weights = boxes
                    .iter()
                    .map(|b| (b.size().0 * 10.0).round().max(1.0) as usize)
                    .collect();
                let mut table = TableLayout::new(weights);
                let mut row = table.row();
                for category in boxes {
                    let accent = color(category.accent());
                    let mut cell = LinearLayout::vertical();
                    for line in category.title().split('\n') {
                        cell.push(Paragraph::new(StyledString::new(
                            line.to_owned(),
                            Style::new().bold().with_color(accent),
                        )));
                    }
                    cell.push(AccentRule::new(category.accent(), 2.0));
                    let body_size = category.body_font_size().round().clamp(6.0, 40.0) as u8;
                    let body_style = Style::new().with_font_size(body_size);
                    for line in category.body().split('\n') {
                        if line.is_empty() {
                            cell.push(Break::new(0.5));
                        } else {
                            cell.push(Paragraph::new(line.to_owned()).styled(body_style));
                        }
                    }
                    row = row.element(cell.padded(2));
                }
                row.push()?;
                layout.push(table);
            }
            ChartKind::Trend => {
                let mut sketch = SeriesSketch::new(
                    &self.content.revenue,
                    self.style.accent,
                    self.style.secondary,
                );
                if let Some(mm) = height.and_then(css_length_mm) {
                    sketch = sketch.with_height(mm_from_f64(mm.max(MIN_SKETCH_HEIGHT_MM)));
                }
                layout.push(sketch);
            }
            ChartKind::Timeline => {
                let mut table = TableLayout::new(vec![1, 3]);
                for milestone in &self.content.milestones {
                    let date = StyledString::new(
                        milestone.date().format("%d/%m/%Y").to_string(),
                        Style::new().bold().with_color(color(milestone.color())),
                    );
                    table
                        .row()
                        .element(Paragraph::new(date))
                        .element(Paragraph::new(milestone.label().to_owned()))
                        .push()?;
                }
                layout.push(table);
            }
        }
        Ok(())
    }
}

/// Converts a CSS `em` size to points; anything else uses the body size.
fn scaled_font_size(size: Option<&str>) -> u8 {
    size.and_then(|s| s.trim().strip_suffix("em"))
        .and_then(|factor| factor.trim().parse::<f64>().ok())
        .map(|factor| (f64::from(BASE_FONT_SIZE) * factor).round().clamp(6.0, 40.0) as u8)
        .unwrap_or(BASE_FONT_SIZE)
}

/// Converts an absolute CSS length (`px`, `mm`, `cm`, `in`) to millimetres.
fn css_length_mm(length: &str) -> Option<f64> {
    let length = length.trim();
    let units = [("px", 25.4 / CSS_PX_PER_INCH), ("mm", 1.0), ("cm", 10.0), ("in", 25.4)];
    units.iter().find_map(|(unit, factor)| {
        let value: f64 = length.strip_suffix(unit)?.trim().parse().ok()?;
        (value.is_finite() && value > 0.0).then_some(value * factor)
    })
}

//! HTML rendering of a [`DeckTemplate`] with `maud`.

use std::collections::BTreeMap;

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::error::{DeckError, Result};
use crate::model::ChartKind;
use crate::richtext::{plain_text, Span};

use super::template::{Block, DeckTemplate, Slide};

/// Renders templates once the chart hrefs are known.
pub(crate) struct HtmlRenderer<'a> {
    template: &'a DeckTemplate,
    chart_hrefs: &'a BTreeMap<ChartKind, String>,
}

impl<'a> HtmlRenderer<'a> {
    pub(crate) fn new(
        template: &'a DeckTemplate,
        chart_hrefs: &'a BTreeMap<ChartKind, String>,
    ) -> Self {
        Self {
            template,
            chart_hrefs,
        }
    }

    pub(crate) fn render(&self) -> Result<String> {
        let theme = &self.template.theme;
        let title = plain_text(&self.template.spans(&self.template.title)?);
        let slides = self
            .template
            .slides
            .iter()
            .map(|slide| self.slide(slide))
            .collect::<Result<Vec<_>>>()?;

        let markup = html! {
            (DOCTYPE)
            html lang=(self.template.lang) {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (title) }
                    link rel="stylesheet" href=(format!("{}/reset.min.css", theme.reveal_cdn));
                    link rel="stylesheet" href=(format!("{}/reveal.min.css", theme.reveal_cdn));
                    link rel="stylesheet" href=(format!("{}/theme/{}.min.css", theme.reveal_cdn, theme.theme));
                    @for sheet in &theme.stylesheets {
                        link rel="stylesheet" href=(sheet);
                    }
                    style { (PreEscaped(&theme.css)) }
                }
                body {
                    div class="reveal" {
                        div class="slides" {
                            @for slide in &slides {
                                (slide)
                            }
                        }
                    }
                    script src=(format!("{}/reveal.min.js", theme.reveal_cdn)) {}
                    script { (PreEscaped(self.init_script())) }
                }
            }
        };

        Ok(markup.into_string())
    }

    fn init_script(&self) -> String {
        let options = serde_json::json!({
            "hash": true,
            "transition": self.template.theme.transition,
            "backgroundTransition": self.template.theme.background_transition,
        });
        // Keep configured strings from closing the script element.
        format!("Reveal.initialize({});", options).replace("</", "<\\/")
    }

    fn text(&self, text: &str) -> Result<Markup> {
        Ok(spans_markup(&self.template.spans(text)?))
    }

    fn optional_text(&self, text: Option<&String>) -> Result<Option<Markup>> {
        text.map(|t| self.text(t)).transpose()
    }

    fn slide(&self, slide: &Slide) -> Result<Markup> {
        let kicker = self.optional_text(slide.kicker.as_ref())?;
        let title = self.optional_text(slide.title.as_ref())?;
        let subtitle = self.optional_text(slide.subtitle.as_ref())?;
        let heading = self.optional_text(slide.heading.as_ref())?;
        let notes = self.optional_text(slide.notes.as_ref())?;
        let blocks = self.blocks(&slide.blocks)?;

        Ok(html! {
            section {
                @if let Some(kicker) = kicker { p class="kicker" { (kicker) } }
                @if let Some(title) = title { h1 { (title) } }
                @if let Some(subtitle) = subtitle { h3 { (subtitle) } }
                @if let Some(heading) = heading { h2 { (heading) } }
                (blocks)
                @if let Some(notes) = notes { aside class="notes" { (notes) } }
            }
        })
    }

    fn blocks(&self, blocks: &[Block]) -> Result<Markup> {
        let rendered = blocks
            .iter()
            .map(|block| self.block(block))
            .collect::<Result<Vec<_>>>()?;
        Ok(html! { @for block in &rendered { (block) } })
    }

    fn block(&self, block: &Block) -> Result<Markup> {
        let markup = match block {
            Block::Paragraph { text, size } => {
                let text = self.text(text)?;
                html! { p style=[size.as_ref().map(|s| format!("font-size:{s}"))] { (text) } }
            }
            Block::Card {
                heading,
                body,
                inline,
            } => {
                let heading = self.optional_text(heading.as_ref())?;
                let body = self.blocks(body)?;
                let class = if *inline { "card card-inline" } else { "card" };
                html! {
                    div class=(class) {
                        @if let Some(heading) = heading { h4 class="card-heading" { (heading) } }
                        (body)
                    }
                }
            }
            Block::Grid { columns, items } => {
                let items = self.blocks(items)?;
                let columns = (*columns).max(1);
                html! {
                    div class="grid" style=(format!("grid-template-columns:repeat({columns},1fr)")) {
                        (items)
                    }
                }
            }
            Block::List { items, bare, size } => {
                let items = items
                    .iter()
                    .map(|item| self.text(item))
                    .collect::<Result<Vec<_>>>()?;
                html! {
                    ul class=[bare.then_some("bare")] style=[size.as_ref().map(|s| format!("font-size:{s}"))] {
                        @for item in &items { li { (item) } }
                    }
                }
            }
            Block::Chart {
                chart,
                fragment,
                height,
            } => {
                let href = self
                    .chart_hrefs
                    .get(chart)
                    .ok_or_else(|| DeckError::MissingArtifact {
                        kind: chart.to_string(),
                    })?;
                let image = html! {
                    img src=(href) class="chart" alt=(chart.as_str())
                        style=[height.as_ref().map(|h| format!("height:{h}"))];
                };
                if *fragment {
                    html! { div class="fragment fade-up" { (image) } }
                } else {
                    image
                }
            }
            Block::Decision { text, centered } => {
                let text = self.text(text)?;
                html! {
                    div class="decision fragment" style=[centered.then_some("text-align:center")] {
                        (text)
                    }
                }
            }
        };
        Ok(markup)
    }
}

/// Renders spans as inline HTML; `\n` becomes `<br>`.
pub(crate) fn spans_markup(spans: &[Span]) -> Markup {
    html! {
        @for span in spans {
            (span_markup(span))
        }
    }
}

fn span_markup(span: &Span) -> Markup {
    let mut inner = html! {
        @for (i, line) in span.text().split('\n').enumerate() {
            @if i > 0 { br; }
            (line)
        }
    };
    if span.is_italic() {
        inner = html! { i { (inner) } };
    }
    if span.is_bold() {
        inner = html! { b { (inner) } };
    }
    match span.color() {
        Some(color) => html! { span style=(format!("color:{color}")) { (inner) } },
        None => inner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rgb;

    #[test]
    fn spans_become_inline_elements() {
        let spans = vec![
            Span::new("DECISIÓN:").bold().colored(Rgb(0xf5, 0x9e, 0x0b)),
            Span::new("\n¿Luz verde?"),
        ];
        assert_eq!(
            spans_markup(&spans).into_string(),
            r#"<span style="color:#f59e0b"><b>DECISIÓN:</b></span><br>¿Luz verde?"#
        );
    }

    #[test]
    fn text_is_escaped() {
        let spans = vec![Span::new("<script>")];
        assert_eq!(spans_markup(&spans).into_string(), "&lt;script&gt;");
    }
}

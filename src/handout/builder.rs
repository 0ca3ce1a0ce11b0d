//! Construction of pre-configured `genpdf` documents for the handout.

use genpdf::elements::Paragraph;
use genpdf::error::Error;
use genpdf::style::Style;
use genpdf::{self, Alignment, Element, Margins, PageDecorator, Position, Size};

use super::elements::mm_from_f64;
use super::fonts;

/// Builder for `genpdf::Document`s with the handout fonts, margins and footer.
#[derive(Default)]
pub struct DocumentBuilder {
    title: Option<String>,
    paper_size: Option<Size>,
    margins: Option<Margins>,
    font_size: Option<u8>,
    line_spacing: Option<f64>,
    footer: Option<String>,
}

impl DocumentBuilder {
    /// Creates a builder with `genpdf` defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the document title stored in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the paper size.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = Some(paper_size.into());
        self
    }

    /// Sets the margins applied on every page.
    pub fn with_margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = Some(margins.into());
        self
    }

    /// Sets the default font size in points.
    pub fn with_font_size(mut self, size: u8) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Sets the line spacing factor.
    pub fn with_line_spacing(mut self, spacing: f64) -> Self {
        self.line_spacing = Some(spacing);
        self
    }

    /// Prints `title` and the page number in a band at the bottom of every page.
    pub fn with_footer(mut self, title: impl Into<String>) -> Self {
        self.footer = Some(title.into());
        self
    }

    /// Loads the fonts and builds the document.
    pub fn build(self) -> Result<genpdf::Document, Error> {
        let mut document = genpdf::Document::new(fonts::font_family()?);
        document.set_minimal_conformance();

        if let Some(title) = self.title {
            document.set_title(title);
        }
        if let Some(paper_size) = self.paper_size {
            document.set_paper_size(paper_size);
        }
        if let Some(size) = self.font_size {
            document.set_font_size(size);
        }
        if let Some(spacing) = self.line_spacing {
            document.set_line_spacing(spacing);
        }

        document.set_page_decorator(HandoutPageDecorator::new(self.margins, self.footer));
        Ok(document)
    }
}

/// Height of the footer band.
const FOOTER_HEIGHT_MM: f64 = 10.0;

fn footer_line(title: &str, page: usize) -> String {
    format!("{title} · {page}")
}

struct HandoutPageDecorator {
    page: usize,
    margins: Option<Margins>,
    footer: Option<String>,
}

impl HandoutPageDecorator {
    fn new(margins: Option<Margins>, footer: Option<String>) -> Self {
        Self {
            page: 0,
            margins,
            footer,
        }
    }
}

impl PageDecorator for HandoutPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        self.page += 1;

        if let Some(margins) = self.margins {
            area.add_margins(margins);
        }

        if let Some(title) = &self.footer {
            let band = mm_from_f64(FOOTER_HEIGHT_MM);
            let available = area.size().height;
            let mut footer_area = area.clone();
            footer_area.add_offset(Position::new(0, available - band));
            let mut footer = Paragraph::new(footer_line(title, self.page))
                .aligned(Alignment::Center)
                .styled(Style::new().with_font_size(8));
            footer.render(context, footer_area, style)?;
            area.set_height(available - band);
        }

        Ok(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footer_line_carries_title_and_page() {
        assert_eq!(footer_line("Sesión CASIA", 3), "Sesión CASIA · 3");
    }
}

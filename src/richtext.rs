//! Inline-styled text used by slide narratives.
//!
//! Deck text is authored as plain strings with a tiny markup language and is
//! parsed into [`Span`]s once.  The HTML deck turns spans into `<b>`, `<i>`
//! and coloured `<span>` elements; the PDF handout turns them into
//! [`genpdf`] styled strings.
//!
//! Supported markup:
//!
//! - `**bold**`
//! - `*italic*`
//! - `[color=#RRGGBB]{text}`
//!
//! Markers nest, e.g. `[color=#f59e0b]{**CHECK 1:**}`.

use std::fmt;

use genpdf::style::{Color, Style, StyledString};

use crate::model::Rgb;

/// A run of text sharing one set of inline styles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
    color: Option<Rgb>,
}

impl Span {
    /// Creates an unstyled span.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the span is bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Returns whether the span is italic.
    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Returns the span colour, if any.
    pub fn color(&self) -> Option<Rgb> {
        self.color
    }

    /// Marks the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Marks the span as italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Assigns a colour to the span.
    pub fn colored(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    fn to_style(&self) -> Style {
        let mut style = Style::new();
        if let Some(Rgb(r, g, b)) = self.color {
            style.set_color(Color::Rgb(r, g, b));
        }
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        style
    }

    /// Converts the span into a string the PDF renderer can lay out.
    pub fn to_styled_string(&self) -> StyledString {
        StyledString::new(self.text.clone(), self.to_style())
    }
}

impl From<&Span> for StyledString {
    fn from(span: &Span) -> Self {
        span.to_styled_string()
    }
}

/// Concatenates the text of `spans`, dropping all styles.
pub fn plain_text(spans: &[Span]) -> String {
    spans.iter().map(Span::text).collect()
}

/// Splits spans at every `\n`, keeping each piece's style.
///
/// Always yields at least one line; empty pieces are dropped from a line.
pub fn split_lines(spans: &[Span]) -> Vec<Vec<Span>> {
    let mut lines = vec![Vec::new()];
    for span in spans {
        for (i, piece) in span.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Vec::new());
            }
            if !piece.is_empty() {
                if let Some(line) = lines.last_mut() {
                    line.push(Span {
                        text: piece.to_owned(),
                        ..span.clone()
                    });
                }
            }
        }
    }
    lines
}

/// Error describing malformed markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    index: usize,
    message: String,
}

impl ParseError {
    fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }

    /// Byte offset of the problem in the input.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Human-readable description of the problem.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.index)
    }
}

impl std::error::Error for ParseError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Marker {
    Bold,
    Italic,
    Color,
}

impl Marker {
    fn closing_token(self) -> &'static str {
        match self {
            Marker::Bold => "**",
            Marker::Italic => "*",
            Marker::Color => "}",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Marker::Bold => "bold span",
            Marker::Italic => "italic span",
            Marker::Color => "color span",
        }
    }
}

const COLOR_PREFIX: &str = "[color=";

struct Parser<'a> {
    input: &'a str,
    index: usize,
    spans: Vec<Span>,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.index..]
    }

    fn flush(&mut self, buffer: &mut String, style: &Span) {
        if buffer.is_empty() {
            return;
        }
        let mut span = style.clone();
        span.text = std::mem::take(buffer);
        self.spans.push(span);
    }

    /// Consumes input until `closing` (or the end of input at top level).
    fn run(&mut self, style: Span, closing: Option<Marker>) -> Result<(), ParseError> {
        let mut buffer = String::new();

        while let Some(ch) = self.rest().chars().next() {
            if let Some(marker) = closing {
                if self.rest().starts_with(marker.closing_token()) {
                    self.flush(&mut buffer, &style);
                    self.index += marker.closing_token().len();
                    return Ok(());
                }
            }

            if self.rest().starts_with("**") {
                self.flush(&mut buffer, &style);
                self.index += 2;
                self.run(style.clone().bold(), Some(Marker::Bold))?;
            } else if ch == '*' {
                self.flush(&mut buffer, &style);
                self.index += 1;
                self.run(style.clone().italic(), Some(Marker::Italic))?;
            } else if self.rest().starts_with(COLOR_PREFIX) {
                let color = self.color_directive()?;
                self.flush(&mut buffer, &style);
                self.run(style.clone().colored(color), Some(Marker::Color))?;
            } else if ch == '}' {
                return Err(ParseError::new(
                    self.index,
                    "unexpected closing token `}` without matching opening `[color=...]`",
                ));
            } else {
                buffer.push(ch);
                self.index += ch.len_utf8();
            }
        }

        match closing {
            Some(marker) => Err(ParseError::new(
                self.index,
                format!("unterminated {}", marker.description()),
            )),
            None => {
                self.flush(&mut buffer, &style);
                Ok(())
            }
        }
    }

    /// Parses `[color=#RRGGBB]{` and leaves the cursor after the brace.
    fn color_directive(&mut self) -> Result<Rgb, ParseError> {
        let hash = self.index + COLOR_PREFIX.len();
        let hex_start = hash + 1;
        let hex_end = hex_start + 6;

        if !self.input[hash..].starts_with('#') {
            return Err(ParseError::new(
                hash,
                "expected `#` followed by a hexadecimal RGB value",
            ));
        }
        let hex = self.input.get(hex_start..hex_end).ok_or_else(|| {
            ParseError::new(
                hex_start,
                "incomplete color specification; expected 6 hexadecimal digits",
            )
        })?;
        let color: Rgb = format!("#{hex}").parse().map_err(|_| {
            ParseError::new(
                hex_start,
                "invalid RGB specification; use hexadecimal digits only",
            )
        })?;
        if !self.input[hex_end..].starts_with("]{") {
            return Err(ParseError::new(
                hex_end,
                "expected `]{` after the color value",
            ));
        }

        self.index = hex_end + 2;
        Ok(color)
    }
}

/// Parses inline markup into spans.
pub fn parse_markup(input: &str) -> Result<Vec<Span>, ParseError> {
    let mut parser = Parser {
        input,
        index: 0,
        spans: Vec::new(),
    };
    parser.run(Span::default(), None)?;
    Ok(parser.spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_to_style_reflects_flags() {
        let span = Span::new("Hola").bold().italic().colored(Rgb(10, 20, 30));
        let styled = span.to_styled_string();
        assert_eq!(styled.s, "Hola");
        assert!(styled.style.is_bold());
        assert!(styled.style.is_italic());
        assert_eq!(styled.style.color(), Some(Color::Rgb(10, 20, 30)));
    }

    #[test]
    fn parse_plain_text() {
        let spans = parse_markup("Sesión de validación").unwrap();
        assert_eq!(spans, vec![Span::new("Sesión de validación")]);
    }

    #[test]
    fn parse_nested_styles() {
        let spans = parse_markup("aprobar la **forma de *gobernar***!").unwrap();
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].text(), "aprobar la ");
        assert!(spans[1].is_bold() && !spans[1].is_italic());
        assert_eq!(spans[1].text(), "forma de ");
        assert!(spans[2].is_bold() && spans[2].is_italic());
        assert_eq!(spans[3].text(), "!");
        assert!(!spans[3].is_bold());
    }

    #[test]
    fn parse_colored_bold_label() {
        let spans = parse_markup("[color=#f59e0b]{**CHECK 1:**} ¿De acuerdo?").unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text(), "CHECK 1:");
        assert!(spans[0].is_bold());
        assert_eq!(spans[0].color(), Some(Rgb(0xf5, 0x9e, 0x0b)));
        assert_eq!(spans[1].color(), None);
        assert_eq!(plain_text(&spans), "CHECK 1: ¿De acuerdo?");
    }

    #[test]
    fn error_on_unterminated_bold() {
        let err = parse_markup("**oops").unwrap_err();
        assert!(err.message().contains("unterminated bold"));
        assert_eq!(err.index(), 6);
    }

    #[test]
    fn error_on_invalid_color() {
        let err = parse_markup("[color=#12FG34]{x}").unwrap_err();
        assert!(err.message().contains("invalid RGB"));
    }

    #[test]
    fn error_on_stray_closing_brace() {
        assert!(parse_markup("a } b").is_err());
    }

    #[test]
    fn split_lines_keeps_styles_per_line() {
        let spans = vec![
            Span::new("DECISIÓN:").bold(),
            Span::new("\n¿Luz verde?\n\nfin"),
        ];
        let lines = split_lines(&spans);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], vec![Span::new("DECISIÓN:").bold()]);
        assert_eq!(lines[1], vec![Span::new("¿Luz verde?")]);
        assert!(lines[2].is_empty());
        assert_eq!(plain_text(&lines[3]), "fin");
    }

    #[test]
    fn brackets_outside_directives_are_text() {
        let spans = parse_markup("Caja [13] semanas").unwrap();
        assert_eq!(plain_text(&spans), "Caja [13] semanas");
    }
}

//! PDF serialization of laid-out report pages through `printpdf`.
//!
//! Text is set in the built-in Helvetica font, so only WinAnsi characters
//! render; anything else is substituted by the PDF encoder.

use super::layout::Page;
use crate::constants::{PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::errors::{AppError, AppResult};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect, Rgb,
};
use tracing::debug;

const LAYER_NAME: &str = "Report";

/// Background colour of dark-mode pages.
const DARK_BACKGROUND: (f32, f32, f32) = (0.067, 0.094, 0.153);

/// Serializes `pages` into a complete PDF file.
///
/// Layout coordinates are measured from the top of the page; PDF measures
/// from the bottom.
pub fn render_pdf(title: &str, pages: &[Page], dark_mode: bool) -> AppResult<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        LAYER_NAME,
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::Report(format!("could not load Helvetica: {}", e)))?;

    for (i, page) in pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
            doc.get_page(page_index).get_layer(layer_index)
        };
        draw_page(&layer, page, &font, dark_mode);
    }

    debug!(pages = pages.len(), dark_mode, "Serializing PDF");
    doc.save_to_bytes()
        .map_err(|e| AppError::Report(format!("could not serialize PDF: {}", e)))
}

fn draw_page(layer: &PdfLayerReference, page: &Page, font: &IndirectFontRef, dark_mode: bool) {
    if dark_mode {
        let (r, g, b) = DARK_BACKGROUND;
        layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
        layer.add_rect(Rect::new(
            Mm(0.0),
            Mm(0.0),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
        ));
        layer.set_fill_color(Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None)));
    }

    for line in &page.lines {
        layer.use_text(
            line.text.as_str(),
            line.font_size,
            Mm(line.x),
            Mm(PAGE_HEIGHT_MM - line.y),
            font,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::layout::TextLine;

    fn page(texts: &[&str]) -> Page {
        Page {
            lines: texts
                .iter()
                .enumerate()
                .map(|(i, t)| TextLine {
                    x: 10.0,
                    y: 20.0 + i as f32 * 6.0,
                    font_size: 12.0,
                    text: (*t).to_string(),
                })
                .collect(),
        }
    }

    fn page_count(bytes: &[u8]) -> usize {
        lopdf::Document::load_mem(bytes).unwrap().get_pages().len()
    }

    #[test]
    fn test_one_pdf_page_per_layout_page() {
        let pdf = render_pdf("Diario", &[page(&["uno"]), page(&["dos"]), page(&["tres"])], false)
            .unwrap();

        assert!(pdf.starts_with(b"%PDF-"));
        assert_eq!(page_count(&pdf), 3);
    }

    #[test]
    fn test_dark_mode_renders_the_same_pages() {
        let pages = [page(&["hola", "Apático (10:00:00)"])];
        let light = render_pdf("Diario", &pages, false).unwrap();
        let dark = render_pdf("Diario", &pages, true).unwrap();

        assert_eq!(page_count(&light), 1);
        assert_eq!(page_count(&dark), 1);
    }

    #[test]
    fn test_text_outside_winansi_does_not_fail() {
        let pdf = render_pdf("Diario", &[page(&["\"hoy 😀 bien\" (10:00:00)"])], false).unwrap();
        assert_eq!(page_count(&pdf), 1);
    }
}

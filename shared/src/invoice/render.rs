//! PDF rendering of an [`InvoiceLayout`] with `printpdf`

use std::io::BufWriter;

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Polygon,
};

use super::layout::{text_width_mm, Align, DrawOp, FontStyle, InvoiceLayout, Rgb, PAGE_HEIGHT, PAGE_WIDTH};
use super::InvoiceError;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Normal => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        f32::from(rgb.0) / 255.0,
        f32::from(rgb.1) / 255.0,
        f32::from(rgb.2) / 255.0,
        None,
    ))
}

/// Layout coordinates grow downward, PDF coordinates grow upward
fn point(x: f32, y: f32) -> Point {
    Point::new(Mm(x), Mm(PAGE_HEIGHT - y))
}

/// Render every page of the layout into a PDF byte buffer
pub fn render_pdf(layout: &InvoiceLayout) -> Result<Vec<u8>, InvoiceError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(&layout.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| InvoiceError::Render(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| InvoiceError::Render(e.to_string()))?,
        italic: doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(|e| InvoiceError::Render(e.to_string()))?,
    };

    for (idx, page) in layout.pages.iter().enumerate() {
        let layer = if idx == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            doc.get_page(page_idx).get_layer(layer_idx)
        };

        for op in &page.ops {
            draw(&layer, &fonts, op);
        }
    }

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| InvoiceError::Render(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| InvoiceError::Render(e.to_string()))
}

fn draw(layer: &PdfLayerReference, fonts: &Fonts, op: &DrawOp) {
    match op {
        DrawOp::Text {
            text,
            x,
            y,
            size,
            style,
            align,
            color: rgb,
        } => {
            let width = text_width_mm(text, *size, *style);
            let left = match align {
                Align::Left => *x,
                Align::Center => *x - width / 2.0,
                Align::Right => *x - width,
            };
            layer.set_fill_color(color(*rgb));
            layer.use_text(text.as_str(), *size, Mm(left), Mm(PAGE_HEIGHT - *y), fonts.get(*style));
        }
        DrawOp::Line { x1, y1, x2, y2, width } => {
            layer.set_outline_color(color(Rgb::BLACK));
            // Layout widths are millimetres, printpdf expects points
            layer.set_outline_thickness(*width / 0.3528);
            layer.add_line(Line {
                points: vec![(point(*x1, *y1), false), (point(*x2, *y2), false)],
                is_closed: false,
            });
        }
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
        } => {
            layer.set_fill_color(color(*fill));
            layer.add_polygon(Polygon {
                rings: vec![vec![
                    (point(*x, *y), false),
                    (point(*x + *width, *y), false),
                    (point(*x + *width, *y + *height), false),
                    (point(*x, *y + *height), false),
                ]],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            });
        }
    }
}

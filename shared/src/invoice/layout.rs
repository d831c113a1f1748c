//! Page layout for sales invoices
//!
//! Produces a list of pages, each a list of drawing operations in millimetres
//! measured from the top-left corner. Rendering to PDF happens in
//! [`super::render`]; keeping the layout separate lets it be inspected in
//! tests without parsing PDF output.

use rust_decimal::Decimal;

use crate::models::{CompanyInfo, InvoiceData, InvoiceItem};
use crate::types::{format_display_date, format_money};

/// A4 portrait
pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;

const MARGIN: f32 = 15.0;
const TOP_MARGIN: f32 = 20.0;
/// Table rows and the summary must end above this line to keep the footer clear
const CONTENT_BOTTOM: f32 = PAGE_HEIGHT - 30.0;

const CELL_PADDING: f32 = 1.8;
const HEADER_FONT_SIZE: f32 = 10.0;
const BODY_FONT_SIZE: f32 = 9.0;

const PT_TO_MM: f32 = 0.3528;
const LINE_HEIGHT_FACTOR: f32 = 1.15;

const HEADER_FILL: Rgb = Rgb(41, 128, 185);
const STRIPE_FILL: Rgb = Rgb(245, 245, 245);
const FOOTER_TEXT: Rgb = Rgb(100, 100, 100);

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One drawing instruction
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `y` is the text baseline
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        style: FontStyle,
        align: Align,
        color: Rgb,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
    },
    /// Filled rectangle, `y` is the top edge
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutPage {
    pub ops: Vec<DrawOp>,
}

/// Laid-out invoice, ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceLayout {
    pub title: String,
    pub pages: Vec<LayoutPage>,
}

impl InvoiceLayout {
    /// All text strings in drawing order, across pages
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|p| p.ops.iter()).filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t == needle)
    }

    /// Baseline of the first text equal to `needle`
    pub fn text_y(&self, needle: &str) -> Option<f32> {
        self.pages
            .iter()
            .flat_map(|p| p.ops.iter())
            .find_map(|op| match op {
                DrawOp::Text { text, y, .. } if text == needle => Some(*y),
                _ => None,
            })
    }
}

/// Approximate Helvetica advance width in millimetres
pub fn text_width_mm(text: &str, size: f32, style: FontStyle) -> f32 {
    let em = match style {
        FontStyle::Bold => 0.56,
        _ => 0.52,
    };
    text.chars().count() as f32 * size * em * PT_TO_MM
}

fn line_height_mm(size: f32) -> f32 {
    size * LINE_HEIGHT_FACTOR * PT_TO_MM
}

/// Greedy word wrap to `max_width` millimetres; over-long words are split.
pub fn wrap_text(text: &str, max_width: f32, size: f32, style: FontStyle) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if text_width_mm(&candidate, size, style) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            // Break words that cannot fit on a line of their own
            let mut chunk = String::new();
            for ch in word.chars() {
                chunk.push(ch);
                if text_width_mm(&chunk, size, style) > max_width && chunk.chars().count() > 1 {
                    chunk.pop();
                    lines.push(std::mem::take(&mut chunk));
                    chunk.push(ch);
                }
            }
            current = chunk;
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Table column: width in mm and horizontal alignment
struct Column {
    title: &'static str,
    width: f32,
    align: Align,
}

fn columns() -> [Column; 6] {
    let fixed = 10.0 + 20.0 + 30.0 + 25.0 + 30.0;
    let auto = PAGE_WIDTH - 2.0 * MARGIN - fixed;
    [
        Column { title: "#", width: 10.0, align: Align::Center },
        Column { title: "Item Description", width: auto, align: Align::Left },
        Column { title: "Qty", width: 20.0, align: Align::Center },
        Column { title: "Unit Price", width: 30.0, align: Align::Right },
        Column { title: "Discount", width: 25.0, align: Align::Right },
        Column { title: "Total", width: 30.0, align: Align::Right },
    ]
}

fn item_cells(index: usize, item: &InvoiceItem) -> [String; 6] {
    let discount = match item.discount {
        Some(d) if d > Decimal::ZERO => format_money(d),
        _ => "-".to_string(),
    };
    [
        (index + 1).to_string(),
        item.product_name.clone(),
        item.quantity.normalize().to_string(),
        format_money(item.unit_price),
        discount,
        format_money(item.total),
    ]
}

/// Builds pages while tracking the vertical cursor
struct PageBuilder {
    pages: Vec<LayoutPage>,
}

impl PageBuilder {
    fn new() -> Self {
        Self {
            pages: vec![LayoutPage::default()],
        }
    }

    fn new_page(&mut self) {
        self.pages.push(LayoutPage::default());
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn text(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, style: FontStyle, align: Align, color: Rgb) {
        self.push(DrawOp::Text {
            text: text.into(),
            x,
            y,
            size,
            style,
            align,
            color,
        });
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32) {
        self.push(DrawOp::Line { x1, y1, x2, y2, width });
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Rgb) {
        self.push(DrawOp::Rect { x, y, width, height, fill });
    }
}

/// Lay out an invoice.
///
/// Optional blocks (bill-to, discount, tax, payment) are only emitted when
/// their fields are present; later blocks move up accordingly.
pub fn layout_invoice(data: &InvoiceData, company: &CompanyInfo) -> InvoiceLayout {
    let mut pb = PageBuilder::new();
    let center = PAGE_WIDTH / 2.0;

    draw_header(&mut pb, data, company, center);
    let address_end = draw_bill_to(&mut pb, data);

    let base_start = if data.customer_address().is_some() { 100.0 } else { 85.0 };
    let table_start = address_end.map_or(base_start, |end| f32::max(base_start, end + 6.0));
    let final_y = draw_items_table(&mut pb, &data.items, table_start);

    draw_summary(&mut pb, data, final_y + 10.0);

    let total_pages = pb.pages.len();
    for (idx, page) in pb.pages.iter_mut().enumerate() {
        draw_footer(page, idx + 1, total_pages);
    }

    InvoiceLayout {
        title: format!("Invoice {}", data.invoice_no),
        pages: pb.pages,
    }
}

fn draw_header(pb: &mut PageBuilder, data: &InvoiceData, company: &CompanyInfo, center: f32) {
    pb.text(&company.name, center, 20.0, 22.0, FontStyle::Bold, Align::Center, Rgb::BLACK);
    pb.text(&company.address, center, 28.0, 10.0, FontStyle::Normal, Align::Center, Rgb::BLACK);
    pb.text(
        format!("Phone: {} | Email: {}", company.phone, company.email),
        center,
        34.0,
        10.0,
        FontStyle::Normal,
        Align::Center,
        Rgb::BLACK,
    );

    pb.line(MARGIN, 40.0, PAGE_WIDTH - MARGIN, 40.0, 0.5);

    pb.text("SALES INVOICE", center, 50.0, 18.0, FontStyle::Bold, Align::Center, Rgb::BLACK);

    pb.text("Invoice No:", MARGIN, 62.0, 11.0, FontStyle::Bold, Align::Left, Rgb::BLACK);
    pb.text("Date:", MARGIN, 70.0, 11.0, FontStyle::Bold, Align::Left, Rgb::BLACK);
    pb.text(&data.invoice_no, 50.0, 62.0, 11.0, FontStyle::Normal, Align::Left, Rgb::BLACK);
    pb.text(format_display_date(&data.date), 50.0, 70.0, 11.0, FontStyle::Normal, Align::Left, Rgb::BLACK);
}

/// Returns the baseline of the last address line when an address was drawn
fn draw_bill_to(pb: &mut PageBuilder, data: &InvoiceData) -> Option<f32> {
    let name = data.bill_to()?;
    let x = PAGE_WIDTH - 85.0;

    pb.text("Bill To:", x, 62.0, 11.0, FontStyle::Bold, Align::Left, Rgb::BLACK);
    pb.text(name, x, 70.0, 11.0, FontStyle::Normal, Align::Left, Rgb::BLACK);

    if let Some(phone) = data.customer_phone() {
        pb.text(format!("Phone: {}", phone), x, 78.0, 11.0, FontStyle::Normal, Align::Left, Rgb::BLACK);
    }

    let address = data.customer_address()?;
    let mut y = 86.0;
    let mut last = y;
    for line in wrap_text(address, 70.0, 11.0, FontStyle::Normal) {
        pb.text(line, x, y, 11.0, FontStyle::Normal, Align::Left, Rgb::BLACK);
        last = y;
        y += line_height_mm(11.0);
    }
    Some(last)
}

fn cell_x(col_left: f32, col: &Column) -> f32 {
    match col.align {
        Align::Left => col_left + CELL_PADDING,
        Align::Center => col_left + col.width / 2.0,
        Align::Right => col_left + col.width - CELL_PADDING,
    }
}

fn header_height() -> f32 {
    line_height_mm(HEADER_FONT_SIZE) + 2.0 * CELL_PADDING
}

fn draw_table_header(pb: &mut PageBuilder, cols: &[Column], top: f32) -> f32 {
    let height = header_height();
    pb.rect(MARGIN, top, PAGE_WIDTH - 2.0 * MARGIN, height, HEADER_FILL);

    let baseline = top + CELL_PADDING + line_height_mm(HEADER_FONT_SIZE) * 0.8;
    let mut left = MARGIN;
    for col in cols {
        pb.text(col.title, cell_x(left, col), baseline, HEADER_FONT_SIZE, FontStyle::Bold, col.align, Rgb::WHITE);
        left += col.width;
    }
    top + height
}

/// Draws the item table and returns the y position of its bottom edge
fn draw_items_table(pb: &mut PageBuilder, items: &[InvoiceItem], start_y: f32) -> f32 {
    let cols = columns();
    let line_h = line_height_mm(BODY_FONT_SIZE);
    let mut y = draw_table_header(pb, &cols, start_y);
    let page_capacity = lines_fitting(TOP_MARGIN + header_height(), line_h).max(1);

    for (index, item) in items.iter().enumerate() {
        let cells = item_cells(index, item);
        let wrapped: Vec<Vec<String>> = cells
            .iter()
            .zip(cols.iter())
            .map(|(cell, col)| wrap_text(cell, col.width - 2.0 * CELL_PADDING, BODY_FONT_SIZE, FontStyle::Normal))
            .collect();
        let line_count = wrapped.iter().map(Vec::len).max().unwrap_or(1);

        // Rows that fit on a fresh page move whole; taller rows are split
        // line by line with the header repeated on every page.
        let mut from = 0;
        while from < line_count {
            let remaining = line_count - from;
            let fits_here = lines_fitting(y, line_h);

            let take = if remaining <= fits_here {
                remaining
            } else if fits_here == 0 || remaining <= page_capacity {
                pb.new_page();
                y = draw_table_header(pb, &cols, TOP_MARGIN);
                continue;
            } else {
                fits_here
            };

            let chunk_height = take as f32 * line_h + 2.0 * CELL_PADDING;
            if index % 2 == 1 {
                pb.rect(MARGIN, y, PAGE_WIDTH - 2.0 * MARGIN, chunk_height, STRIPE_FILL);
            }

            let mut left = MARGIN;
            for (lines, col) in wrapped.iter().zip(cols.iter()) {
                let mut baseline = y + CELL_PADDING + line_h * 0.8;
                for line in lines.iter().skip(from).take(take) {
                    pb.text(line.clone(), cell_x(left, col), baseline, BODY_FONT_SIZE, FontStyle::Normal, col.align, Rgb::BLACK);
                    baseline += line_h;
                }
                left += col.width;
            }

            y += chunk_height;
            from += take;
        }
    }

    y
}

/// Body lines that fit in a row starting at `top` before the content bottom
fn lines_fitting(top: f32, line_h: f32) -> usize {
    let space = CONTENT_BOTTOM - top - 2.0 * CELL_PADDING;
    if space <= 0.0 {
        return 0;
    }
    ((space + 1e-3) / line_h).floor() as usize
}

fn summary_height(data: &InvoiceData) -> f32 {
    let mut height = 8.0 + 6.0 + 4.0;
    if data.discount_amount().is_some() {
        height += 8.0;
    }
    if data.tax_amount().is_some() {
        height += 8.0;
    }
    if data.payment_type().is_some() || data.payment_status().is_some() {
        height += 12.0 + 6.0;
    }
    height
}

fn draw_summary(pb: &mut PageBuilder, data: &InvoiceData, start_y: f32) {
    let x = PAGE_WIDTH - 70.0;
    let value_x = x + 40.0;
    let mut y = start_y;

    if y + summary_height(data) > CONTENT_BOTTOM {
        pb.new_page();
        y = TOP_MARGIN + 10.0;
    }

    pb.text("Subtotal:", x, y, 10.0, FontStyle::Normal, Align::Left, Rgb::BLACK);
    pb.text(format_money(data.subtotal), value_x, y, 10.0, FontStyle::Normal, Align::Right, Rgb::BLACK);
    y += 8.0;

    if let Some(discount) = data.discount_amount() {
        pb.text("Discount:", x, y, 10.0, FontStyle::Normal, Align::Left, Rgb::BLACK);
        pb.text(format!("-{}", format_money(discount)), value_x, y, 10.0, FontStyle::Normal, Align::Right, Rgb::BLACK);
        y += 8.0;
    }

    if let Some(tax) = data.tax_amount() {
        pb.text("Tax:", x, y, 10.0, FontStyle::Normal, Align::Left, Rgb::BLACK);
        pb.text(format_money(tax), value_x, y, 10.0, FontStyle::Normal, Align::Right, Rgb::BLACK);
        y += 8.0;
    }

    pb.line(x, y, value_x, y, 0.3);
    y += 6.0;

    pb.text("Total:", x, y, 12.0, FontStyle::Bold, Align::Left, Rgb::BLACK);
    pb.text(format_money(data.total), value_x, y, 12.0, FontStyle::Bold, Align::Right, Rgb::BLACK);

    let payment_type = data.payment_type();
    let payment_status = data.payment_status();
    if payment_type.is_some() || payment_status.is_some() {
        y += 12.0;
        if let Some(method) = payment_type {
            pb.text(format!("Payment Method: {}", method), x, y, 10.0, FontStyle::Normal, Align::Left, Rgb::BLACK);
            y += 6.0;
        }
        if let Some(status) = payment_status {
            pb.text(format!("Status: {}", status), x, y, 10.0, FontStyle::Normal, Align::Left, Rgb::BLACK);
        }
    }
}

fn draw_footer(page: &mut LayoutPage, number: usize, total: usize) {
    let footer_y = PAGE_HEIGHT - 20.0;
    let center = PAGE_WIDTH / 2.0;
    let lines = [
        ("Thank you for your business!".to_string(), center, footer_y, Align::Center),
        (
            "This is a computer-generated invoice and does not require a signature.".to_string(),
            center,
            footer_y + 5.0,
            Align::Center,
        ),
        (format!("Page {} of {}", number, total), PAGE_WIDTH - 20.0, footer_y + 10.0, Align::Right),
    ];

    for (text, x, y, align) in lines {
        page.ops.push(DrawOp::Text {
            text,
            x,
            y,
            size: 9.0,
            style: FontStyle::Italic,
            align,
            color: FOOTER_TEXT,
        });
    }
}

use std::io::BufWriter;

use printpdf::*;

use crate::error::{Result, TrialBalError};
use crate::fmt::money;
use crate::reports::{BalanceSheet, ProfitLoss, ReportItem};

// A4 dimensions (mm)
const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN_TOP: f32 = 20.0;
const MARGIN_BOTTOM: f32 = 20.0;
const MARGIN_LEFT: f32 = 18.0;
const MARGIN_RIGHT: f32 = 18.0;
const ROW_H: f32 = 5.0;
const FONT_SIZE: f32 = 10.0;
const TITLE_SIZE: f32 = 16.0;
const SUBTITLE_SIZE: f32 = 10.0;

fn approx_text_width(text: &str, size: f32) -> f32 {
    text.len() as f32 * size * 0.18
}

fn pdf_err(e: impl std::fmt::Debug) -> TrialBalError {
    TrialBalError::Pdf(format!("{e:?}"))
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

struct Col {
    width: f32,
    align: Align,
}

const ITEM_COLS: &[Col] = &[
    Col { width: 124.0, align: Align::Left },
    Col { width: 50.0, align: Align::Right },
];

struct PdfWriter {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    current_page: PdfPageIndex,
    current_layer: PdfLayerIndex,
    y: f32,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
        let font_bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?;
        Ok(Self {
            doc,
            font,
            font_bold,
            current_page: page,
            current_layer: layer,
            y: MARGIN_TOP,
        })
    }

    fn pdf_y(&self) -> f32 {
        PAGE_H - self.y
    }

    fn layer(&self) -> PdfLayerReference {
        self.doc.get_page(self.current_page).get_layer(self.current_layer)
    }

    fn ensure_space(&mut self, needed: f32) {
        if self.y + needed > PAGE_H - MARGIN_BOTTOM {
            let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer");
            self.current_page = page;
            self.current_layer = layer;
            self.y = MARGIN_TOP;
        }
    }

    fn text(&self, s: &str, x: f32, size: f32, bold: bool) {
        let font = if bold { &self.font_bold } else { &self.font };
        self.layer().use_text(s, size, Mm(x), Mm(self.pdf_y()), font);
    }

    fn hline(&self) {
        let layer = self.layer();
        layer.set_outline_thickness(0.5);
        layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN_LEFT), Mm(self.pdf_y())), false),
                (Point::new(Mm(PAGE_W - MARGIN_RIGHT), Mm(self.pdf_y())), false),
            ],
            is_closed: false,
        });
    }

    fn header(&mut self, title: &str, company: &str, period: &str) {
        self.text(title, MARGIN_LEFT, TITLE_SIZE, true);
        self.y += 7.0;
        if !company.is_empty() {
            self.text(company, MARGIN_LEFT, SUBTITLE_SIZE, false);
            self.y += 5.0;
        }
        if !period.is_empty() {
            self.text(period, MARGIN_LEFT, SUBTITLE_SIZE, false);
            self.y += 5.0;
        }
        let ts = chrono::Local::now().format("Generated %Y-%m-%d %H:%M").to_string();
        self.text(&ts, MARGIN_LEFT, 8.0, false);
        self.y += 5.0;
        self.hline();
        self.y += 5.0;
    }

    fn row(&mut self, cols: &[Col], values: &[&str], bold: bool) {
        self.ensure_space(ROW_H);
        let mut x = MARGIN_LEFT;
        for (col, value) in cols.iter().zip(values) {
            match col.align {
                Align::Left => self.text(value, x, FONT_SIZE, bold),
                Align::Right => {
                    let tw = approx_text_width(value, FONT_SIZE);
                    self.text(value, x + col.width - tw, FONT_SIZE, bold);
                }
            }
            x += col.width;
        }
        self.y += ROW_H;
    }

    fn table_header(&mut self, cols: &[Col], headers: &[&str]) {
        self.ensure_space(ROW_H * 2.0);
        self.row(cols, headers, true);
        self.hline();
        self.y += 2.0;
    }

    fn section(&mut self, label: &str, items: &[ReportItem], total_label: &str, total: f64) {
        self.ensure_space(ROW_H * 2.0);
        self.text(label, MARGIN_LEFT, FONT_SIZE, true);
        self.y += ROW_H;
        for item in items {
            let amt = money(item.amount);
            self.row(ITEM_COLS, &[&format!("  {}", item.name), &amt], false);
        }
        let total = money(total);
        self.row(ITEM_COLS, &[total_label, &total], true);
        self.y += ROW_H;
    }

    fn separator(&mut self) {
        self.hline();
        self.y += 2.0;
    }

    fn to_bytes(self) -> Result<Vec<u8>> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc.save(&mut buf).map_err(pdf_err)?;
        buf.into_inner().map_err(|e| TrialBalError::Pdf(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Render functions
// ---------------------------------------------------------------------------

pub fn render_pnl(report: &ProfitLoss, company: &str, period: &str) -> Result<Vec<u8>> {
    let mut pdf = PdfWriter::new("Profit & Loss Account")?;
    pdf.header("Profit & Loss Account", company, period);
    pdf.table_header(ITEM_COLS, &["Particulars", "Amount"]);

    pdf.section("INCOME", &report.incomes, "Total Income", report.total_income);
    pdf.section("EXPENSES", &report.expenses, "Total Expenses", report.total_expenses);

    pdf.separator();
    let label = if report.net_profit >= 0.0 { "NET PROFIT" } else { "NET LOSS" };
    let net = money(report.net_profit.abs());
    pdf.row(ITEM_COLS, &[label, &net], true);

    pdf.to_bytes()
}

pub fn render_balance_sheet(report: &BalanceSheet, company: &str, period: &str) -> Result<Vec<u8>> {
    let mut pdf = PdfWriter::new("Balance Sheet")?;
    pdf.header("Balance Sheet", company, period);
    pdf.table_header(ITEM_COLS, &["Particulars", "Amount"]);

    pdf.section("LIABILITIES", &report.liabilities, "Total Liabilities", report.total_liabilities);
    pdf.section("ASSETS", &report.assets, "Total Assets", report.total_assets);

    pdf.separator();
    let diff = report.total_assets - report.total_liabilities;
    let diff_str = money(diff);
    pdf.row(ITEM_COLS, &["DIFFERENCE", &diff_str], true);

    pdf.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports;
    use crate::sample::sample_rows;

    #[test]
    fn test_render_pnl_produces_pdf() {
        let r = reports::generate(&sample_rows());
        let bytes = render_pnl(&r.profit_loss, "Acme Traders", "Year ended 31.12.2008").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_balance_sheet_paginates() {
        let mut r = reports::generate(&sample_rows());
        let extra: Vec<ReportItem> = (0..120)
            .map(|i| ReportItem { name: format!("Debtor {i}"), amount: 10.0 })
            .collect();
        r.balance_sheet.assets.extend(extra);
        let bytes = render_balance_sheet(&r.balance_sheet, "", "").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}

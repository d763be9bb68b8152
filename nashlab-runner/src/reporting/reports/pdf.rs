//! PDF report generator.
//!
//! Writes an uncompressed PDF 1.4 document: A4 pages, the built-in
//! Helvetica font, one text line per report line, as many pages as the
//! report needs. Text outside printable ASCII is replaced with `?`.

use chrono::{DateTime, Utc};

use crate::reporting::Report;

const PAGE_WIDTH: f64 = 595.0;
const PAGE_HEIGHT: f64 = 842.0;
const MARGIN: f64 = 56.0;
const LEADING: f64 = 16.0;
const TITLE_SIZE: u32 = 16;
const BODY_SIZE: u32 = 12;

// Fixed object numbers; page objects and their content streams follow in pairs.
const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FONT_ID: usize = 3;
const INFO_ID: usize = 4;
const FIRST_PAGE_ID: usize = 5;

pub struct PdfReportGenerator;

#[derive(Debug, Clone, PartialEq)]
struct Line {
    text: String,
    size: u32,
}

impl PdfReportGenerator {
    pub fn generate(&self, report: &Report) -> Vec<u8> {
        let pages = paginate(report);
        let page_ids: Vec<usize> = (0..pages.len()).map(|i| FIRST_PAGE_ID + 2 * i).collect();

        let mut doc = PdfWriter::new();
        doc.object(CATALOG_ID, &format!("<< /Type /Catalog /Pages {PAGES_ID} 0 R >>"));

        let kids: Vec<String> = page_ids.iter().map(|id| format!("{id} 0 R")).collect();
        doc.object(
            PAGES_ID,
            &format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                pages.len()
            ),
        );
        doc.object(
            FONT_ID,
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
        );
        doc.object(
            INFO_ID,
            &format!(
                "<< /Title ({}) /Producer (nashlab) /CreationDate ({}) >>",
                escape(&report.title()),
                pdf_date(&report.generated_at)
            ),
        );

        for (lines, &id) in pages.iter().zip(&page_ids) {
            doc.object(
                id,
                &format!(
                    "<< /Type /Page /Parent {PAGES_ID} 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                     /Resources << /Font << /F1 {FONT_ID} 0 R >> >> /Contents {} 0 R >>",
                    id + 1
                ),
            );
            doc.stream(id + 1, page_content(lines).as_bytes());
        }

        doc.finish()
    }
}

/// Split the title and body into page-sized chunks. Always at least one page.
fn paginate(report: &Report) -> Vec<Vec<Line>> {
    let per_page = ((PAGE_HEIGHT - 2.0 * MARGIN) / LEADING).floor() as usize;
    let mut lines = vec![Line {
        text: report.title(),
        size: TITLE_SIZE,
    }];
    lines.extend(report.body_lines().into_iter().map(|text| Line {
        text,
        size: BODY_SIZE,
    }));
    lines.chunks(per_page).map(<[Line]>::to_vec).collect()
}

fn page_content(lines: &[Line]) -> String {
    let mut out = format!(
        "BT\n/F1 {BODY_SIZE} Tf\n{LEADING} TL\n{MARGIN} {} Td\n",
        PAGE_HEIGHT - MARGIN
    );
    let mut size = BODY_SIZE;
    for line in lines {
        if line.size != size {
            size = line.size;
            out.push_str(&format!("/F1 {size} Tf\n"));
        }
        if !line.text.is_empty() {
            out.push_str(&format!("({}) Tj\n", escape(&line.text)));
        }
        out.push_str("T*\n");
    }
    out.push_str("ET\n");
    out
}

/// Escape a PDF literal string.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn pdf_date(at: &DateTime<Utc>) -> String {
    at.format("D:%Y%m%d%H%M%SZ").to_string()
}

/// Byte buffer that records object offsets for the cross-reference table.
/// Objects must be added in ascending id order starting at 1.
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    fn begin(&mut self, id: usize) {
        debug_assert_eq!(id, self.offsets.len() + 1);
        self.offsets.push(self.buf.len());
        self.buf.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
    }

    fn object(&mut self, id: usize, body: &str) {
        self.begin(id);
        self.buf.extend_from_slice(body.as_bytes());
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, id: usize, content: &[u8]) {
        self.begin(id);
        self.buf
            .extend_from_slice(format!("<< /Length {} >>\nstream\n", content.len()).as_bytes());
        self.buf.extend_from_slice(content);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn finish(mut self) -> Vec<u8> {
        let xref_offset = self.buf.len();
        let size = self.offsets.len() + 1;
        let mut xref = format!("xref\n0 {size}\n0000000000 65535 f \n");
        for offset in &self.offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {size} /Root {CATALOG_ID} 0 R /Info {INFO_ID} 0 R >>\n\
             startxref\n{xref_offset}\n%%EOF\n"
        ));
        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}

//! Report generators.

mod delimited;
mod markdown;
mod pdf;

pub use delimited::CsvReportGenerator;
pub use markdown::MarkdownReportGenerator;
pub use pdf::PdfReportGenerator;

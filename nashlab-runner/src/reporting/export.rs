//! Report export: render a report into a transient file and stream it out.
//!
//! The transient file lives only as long as its [`TransientReport`]. It is
//! removed after delivery whether or not streaming succeeded, and on drop if
//! the report is never delivered.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use tempfile::NamedTempFile;

use super::reports::{CsvReportGenerator, MarkdownReportGenerator, PdfReportGenerator};
use super::{ExportError, Report, ReportFormat};

/// `<scenario name with spaces as underscores>_Nash.<ext>`
pub fn suggested_file_name(scenario_name: &str, format: ReportFormat) -> String {
    format!(
        "{}_Nash.{}",
        scenario_name.replace(' ', "_"),
        format.extension()
    )
}

/// Renders reports in one format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportExporter {
    format: ReportFormat,
}

impl ReportExporter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Document bytes, without touching the filesystem.
    pub fn render(&self, report: &Report) -> Result<Vec<u8>, ExportError> {
        match self.format {
            ReportFormat::Pdf => Ok(PdfReportGenerator.generate(report)),
            ReportFormat::Markdown => Ok(MarkdownReportGenerator.generate(report).into_bytes()),
            ReportFormat::Json => Ok(serde_json::to_vec_pretty(report)?),
            ReportFormat::Csv => CsvReportGenerator.generate(report),
        }
    }

    /// Write the document to a uniquely named transient file.
    pub fn export(&self, report: &Report) -> Result<TransientReport, ExportError> {
        if report.equilibria.is_empty() {
            return Err(ExportError::Empty);
        }
        let bytes = self.render(report)?;
        let mut file = tempfile::Builder::new()
            .prefix("nashlab-")
            .suffix(&format!(".{}", self.format.extension()))
            .tempfile()
            .map_err(ExportError::Create)?;
        // On failure `file` is dropped here, which removes it.
        if let Err(source) = file.write_all(&bytes).and_then(|()| file.flush()) {
            return Err(ExportError::Io {
                action: "write",
                path: file.path().to_path_buf(),
                source,
            });
        }

        info!(
            "{:<32}{:<32}",
            format!("exported {} report", self.format),
            format!("{} bytes", bytes.len())
        );
        Ok(TransientReport {
            file,
            file_name: suggested_file_name(&report.scenario_name, self.format),
            format: self.format,
        })
    }
}

/// A rendered report waiting to be delivered exactly once.
#[derive(Debug)]
pub struct TransientReport {
    file: NamedTempFile,
    file_name: String,
    format: ReportFormat,
}

impl TransientReport {
    /// Suggested download name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Location of the transient file while it exists.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Stream the document into `sink`, then delete the transient file.
    ///
    /// Returns the number of bytes written. The file is removed even when
    /// streaming fails.
    pub fn deliver<W: Write + ?Sized>(self, sink: &mut W) -> Result<u64, ExportError> {
        let Self {
            file, file_name, ..
        } = self;
        let path = file.path().to_path_buf();

        let copied = copy_into(&file, sink);

        let cleanup = file.close();
        if let Err(err) = &cleanup {
            warn!("failed to remove transient report {}: {err}", path.display());
        }

        let bytes = copied.map_err(|source| ExportError::Io {
            action: "stream",
            path: path.clone(),
            source,
        })?;
        cleanup.map_err(|source| ExportError::Io {
            action: "remove",
            path,
            source,
        })?;

        info!("{:<32}{:<32}", format!("delivered {file_name}"), format!("{bytes} bytes"));
        Ok(bytes)
    }

    /// Deliver into a file. A directory destination gets [`Self::file_name`] appended.
    ///
    /// The document is staged next to the target and renamed into place, so a
    /// failed delivery leaves any existing file at the target untouched and
    /// no partial document behind.
    pub fn deliver_to_path(self, destination: &Path) -> Result<PathBuf, ExportError> {
        let target = if destination.is_dir() {
            destination.join(&self.file_name)
        } else {
            destination.to_path_buf()
        };
        let parent = match target.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut staged = tempfile::Builder::new()
            .prefix(".nashlab-")
            .tempfile_in(&parent)
            .map_err(|source| ExportError::Io {
                action: "create",
                path: target.clone(),
                source,
            })?;
        // `staged` is removed on drop if anything below fails.
        self.deliver(&mut staged).map_err(|err| match err {
            ExportError::Io {
                action: "stream",
                source,
                ..
            } => ExportError::Io {
                action: "write",
                path: target.clone(),
                source,
            },
            other => other,
        })?;
        staged.persist(&target).map_err(|err| ExportError::Io {
            action: "persist",
            path: target.clone(),
            source: err.error,
        })?;
        Ok(target)
    }
}

fn copy_into<W: Write + ?Sized>(file: &NamedTempFile, sink: &mut W) -> io::Result<u64> {
    let mut reader = file.reopen()?;
    let bytes = io::copy(&mut reader, sink)?;
    sink.flush()?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::format::FormattedEquilibrium;
    use nashlab_core::domain::{EnumerationMethod, GameFingerprint};

    fn report(equilibria: usize) -> Report {
        Report::new(
            "Battle of the Sexes",
            GameFingerprint("beef".into()),
            EnumerationMethod::SupportEnumeration,
            (1..=equilibria)
                .map(|index| FormattedEquilibrium {
                    index,
                    player_a: vec![0.6, 0.4],
                    player_b: vec![0.4, 0.6],
                    payoff_a: 1.2,
                    payoff_b: 1.2,
                })
                .collect(),
        )
    }

    /// A sink that always fails.
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn file_name_replaces_spaces() {
        assert_eq!(
            suggested_file_name("Battle of the Sexes", ReportFormat::Pdf),
            "Battle_of_the_Sexes_Nash.pdf"
        );
        assert_eq!(
            suggested_file_name("Custom Matrix", ReportFormat::Csv),
            "Custom_Matrix_Nash.csv"
        );
    }

    #[test]
    fn deliver_streams_and_removes_file() {
        let transient = ReportExporter::default().export(&report(1)).unwrap();
        let path = transient.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(transient.mime_type(), "application/pdf");

        let mut sink = Vec::new();
        let written = transient.deliver(&mut sink).unwrap();
        assert_eq!(written as usize, sink.len());
        assert!(sink.starts_with(b"%PDF-1.4"));
        assert!(!path.exists());
    }

    #[test]
    fn failed_delivery_still_removes_file() {
        let transient = ReportExporter::new(ReportFormat::Markdown)
            .export(&report(2))
            .unwrap();
        let path = transient.path().to_path_buf();
        let err = transient.deliver(&mut Broken).unwrap_err();
        assert!(matches!(err, ExportError::Io { action: "stream", .. }));
        assert!(!path.exists());
    }

    #[test]
    fn dropping_undelivered_report_removes_file() {
        let transient = ReportExporter::new(ReportFormat::Json)
            .export(&report(1))
            .unwrap();
        let path = transient.path().to_path_buf();
        drop(transient);
        assert!(!path.exists());
    }

    #[test]
    fn empty_report_is_rejected() {
        assert!(matches!(
            ReportExporter::default().export(&report(0)),
            Err(ExportError::Empty)
        ));
    }

    #[test]
    fn failed_delivery_to_path_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let transient = ReportExporter::default().export(&report(400)).unwrap();
        let transient_path = transient.path().to_path_buf();
        // A directory already sitting at the target name makes the final rename fail.
        let blocked = dir.path().join(transient.file_name());
        fs::create_dir(&blocked).unwrap();

        let err = transient.deliver_to_path(dir.path()).unwrap_err();
        match err {
            ExportError::Io { action, path, .. } => {
                assert_eq!(action, "persist");
                assert_eq!(path, blocked);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!transient_path.exists());
        let entries: Vec<PathBuf> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(entries, vec![blocked.clone()]);
        assert!(fs::read_dir(&blocked).unwrap().next().is_none());
    }

    #[test]
    fn delivery_to_path_replaces_existing_file_whole() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("report.pdf");
        fs::write(&target, b"stale").unwrap();

        let transient = ReportExporter::default().export(&report(3)).unwrap();
        let written = transient.deliver_to_path(&target).unwrap();
        assert_eq!(written, target);
        let bytes = fs::read(&target).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_destination_directory_is_reported_by_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("absent").join("out.md");
        let transient = ReportExporter::new(ReportFormat::Markdown)
            .export(&report(1))
            .unwrap();
        let transient_path = transient.path().to_path_buf();
        let err = transient.deliver_to_path(&target).unwrap_err();
        assert!(matches!(err, ExportError::Io { action: "create", ref path, .. } if *path == target));
        assert!(!transient_path.exists());
    }
}

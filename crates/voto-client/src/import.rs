//! Voter import: file selection, local preview and upload with progress

use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::api::ReportApi;
use crate::error::{ApiError, Result};
use crate::notify::{Notification, Notifier};
use crate::types::ImportReport;

/// Largest file accepted for import
pub const MAX_IMPORT_BYTES: usize = 5 * 1024 * 1024;

/// Lines shown by the preview, header excluded
pub const PREVIEW_ROWS: usize = 5;

const ACCEPTED: [(&str, &str); 3] = [
    ("csv", "text/csv"),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
];

/// A voter file ready to be uploaded
#[derive(Debug, Clone, PartialEq)]
pub struct VoterUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Bytes,
}

impl VoterUpload {
    /// Validate name and size of an in-memory file
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Result<Self> {
        let file_name = file_name.into();
        let bytes = bytes.into();

        let extension = Path::new(&file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let mime = ACCEPTED
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, mime)| mime.to_string())
            .ok_or_else(|| {
                ApiError::invalid_input("file", "Envie um arquivo .csv, .xls ou .xlsx.")
            })?;

        if bytes.is_empty() {
            return Err(ApiError::invalid_input("file", "O arquivo está vazio."));
        }
        if bytes.len() > MAX_IMPORT_BYTES {
            return Err(ApiError::invalid_input(
                "file",
                "O arquivo deve ter no máximo 5MB.",
            ));
        }

        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ApiError::invalid_input("file", format!("invalid path {:?}", path)))?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Self::from_bytes(file_name, bytes)
    }

    pub fn is_csv(&self) -> bool {
        self.mime == "text/csv"
    }

    pub fn size_kb(&self) -> usize {
        (self.bytes.len() + 512) / 1024
    }
}

/// Header plus the first `rows` lines, split on commas
///
/// This is a preview only; the server does the real parsing.
pub fn preview_csv(text: &str, rows: usize) -> Vec<Vec<String>> {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .take(rows + 1)
        .map(|line| line.split(',').map(|cell| cell.trim().to_string()).collect())
        .collect()
}

/// State of the voter import page
pub struct ImportPage {
    api: Arc<dyn ReportApi>,
    notifier: Arc<dyn Notifier>,
    progress: watch::Sender<u8>,
    report: Option<ImportReport>,
}

impl ImportPage {
    pub fn new(api: Arc<dyn ReportApi>, notifier: Arc<dyn Notifier>) -> Self {
        let (progress, _) = watch::channel(0);
        Self {
            api,
            notifier,
            progress,
            report: None,
        }
    }

    /// Upload progress in percent
    pub fn progress(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    pub fn report(&self) -> Option<&ImportReport> {
        self.report.as_ref()
    }

    /// Preview of a CSV upload; spreadsheets are not previewed
    pub fn preview(upload: &VoterUpload) -> Option<Vec<Vec<String>>> {
        upload
            .is_csv()
            .then(|| preview_csv(&String::from_utf8_lossy(&upload.bytes), PREVIEW_ROWS))
    }

    /// Send the whole file; a failure resets progress and leaves no report
    pub async fn upload(&mut self, upload: &VoterUpload) -> Option<&ImportReport> {
        self.progress.send_replace(0);
        self.report = None;
        debug!(
            "Importing {} ({} KB)",
            upload.file_name,
            upload.size_kb()
        );

        match self.api.import_voters(upload, &self.progress).await {
            Ok(report) => {
                self.progress.send_replace(100);
                info!(
                    "Import finished: {} imported, {} failed",
                    report.imported_count, report.failed_count
                );
                self.notifier.notify(Notification::success(
                    "Importação Concluída",
                    format!(
                        "{} eleitores importados, {} com erro.",
                        report.imported_count, report.failed_count
                    ),
                ));
                self.report = Some(report);
            }
            Err(e) => {
                self.progress.send_replace(0);
                self.notifier
                    .notify(Notification::from_error("Erro na Importação", &e));
            }
        }
        self.report.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_only_spreadsheets() {
        assert!(VoterUpload::from_bytes("eleitores.CSV", "nome,cpf\n").is_ok());
        assert!(VoterUpload::from_bytes("eleitores.xlsx", vec![1u8]).is_ok());
        assert!(VoterUpload::from_bytes("eleitores.txt", "x").is_err());
        assert!(VoterUpload::from_bytes("eleitores", "x").is_err());
        assert!(VoterUpload::from_bytes("eleitores.csv", "").is_err());
        assert!(VoterUpload::from_bytes("big.csv", vec![b'a'; MAX_IMPORT_BYTES + 1]).is_err());
    }

    #[test]
    fn test_preview_takes_header_and_five_rows() {
        let text = "nome,cpf,matricula\r\n\
                    A,1,10\r\nB,2,20\r\nC,3,30\r\nD,4,40\r\nE,5,50\r\nF,6,60\r\n";
        let preview = preview_csv(text, PREVIEW_ROWS);
        assert_eq!(preview.len(), 6);
        assert_eq!(preview[0], vec!["nome", "cpf", "matricula"]);
        assert_eq!(preview[5], vec!["E", "5", "50"]);
    }

    #[tokio::test]
    async fn test_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lote.csv");
        tokio::fs::write(&path, "nome,cpf\nAna,123\n").await.unwrap();

        let upload = VoterUpload::from_path(&path).await.unwrap();
        assert_eq!(upload.file_name, "lote.csv");
        assert!(upload.is_csv());
        assert_eq!(ImportPage::preview(&upload).map(|p| p.len()), Some(2));
    }
}

//! Document Loader: turns a resume file (path or uploaded bytes) into plain text.
//!
//! Format dispatch is by file extension, case-insensitive:
//! `.txt` → plain text, `.pdf` → pdf-extract, `.doc`/`.docx` → docx-rs.
//! The loader only reads; it never touches the source afterwards.
//! All I/O here is blocking. Async callers go through `spawn_blocking`.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};
use serde::Serialize;
use tracing::debug;

use crate::matching::error::{InputSide, MatchError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    PlainText,
    Pdf,
    /// Word-processor documents. `.doc` is routed through the same reader as
    /// `.docx`, so legacy binary files surface as `DocumentParse`.
    WordProcessor,
}

impl DocumentFormat {
    /// Maps a bare extension (with or without the leading dot) to a format.
    pub fn from_extension(extension: &str) -> Result<Self, MatchError> {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "txt" => Ok(DocumentFormat::PlainText),
            "pdf" => Ok(DocumentFormat::Pdf),
            "doc" | "docx" => Ok(DocumentFormat::WordProcessor),
            _ => Err(MatchError::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    /// Infers the format from a path or file name. A missing extension is unsupported.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MatchError> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(ext)
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::PlainText => f.write_str("plain-text"),
            DocumentFormat::Pdf => f.write_str("pdf"),
            DocumentFormat::WordProcessor => f.write_str("word-processor"),
        }
    }
}

/// Where the resume content lives.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    Path(PathBuf),
    Bytes(Bytes),
}

/// A resume handle for one match request. Consumed by `load`.
#[derive(Debug, Clone)]
pub struct Document {
    source: DocumentSource,
    format: DocumentFormat,
}

impl Document {
    /// Builds a path-backed document, inferring the format from the extension.
    /// A path that does not exist is `FileNotFound` whatever its extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, MatchError> {
        let path = path.into();
        if !path.try_exists()? {
            return Err(MatchError::FileNotFound { path });
        }
        let format = DocumentFormat::from_path(&path)?;
        Ok(Self {
            source: DocumentSource::Path(path),
            format,
        })
    }

    /// Builds an in-memory document with a declared format.
    pub fn from_bytes(bytes: impl Into<Bytes>, format: DocumentFormat) -> Self {
        Self {
            source: DocumentSource::Bytes(bytes.into()),
            format,
        }
    }

    /// Builds an in-memory document, inferring the format from the uploaded file name.
    pub fn from_upload(file_name: &str, bytes: impl Into<Bytes>) -> Result<Self, MatchError> {
        let format = DocumentFormat::from_path(file_name)?;
        Ok(Self::from_bytes(bytes, format))
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn source(&self) -> &DocumentSource {
        &self.source
    }
}

/// Plain text pulled out of a document. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub fn new(text: String) -> Result<Self, MatchError> {
        if text.trim().is_empty() {
            return Err(MatchError::EmptyInput {
                input: InputSide::Resume,
            });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Reads the document and extracts its text according to its format.
pub fn load(document: Document) -> Result<ExtractedText, MatchError> {
    let Document { source, format } = document;

    let raw = match source {
        DocumentSource::Path(path) => read_source(&path)?,
        DocumentSource::Bytes(bytes) => bytes,
    };

    let text = match format {
        DocumentFormat::PlainText => String::from_utf8_lossy(&raw).into_owned(),
        DocumentFormat::Pdf => extract_pdf(&raw)?,
        DocumentFormat::WordProcessor => extract_word(&raw)?,
    };

    debug!(
        "Extracted {} chars from {} document",
        text.chars().count(),
        format
    );
    ExtractedText::new(text)
}

fn read_source(path: &Path) -> Result<Bytes, MatchError> {
    match std::fs::read(path) {
        Ok(raw) => Ok(Bytes::from(raw)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(MatchError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(MatchError::Io(e)),
    }
}

fn extract_pdf(raw: &[u8]) -> Result<String, MatchError> {
    let pages =
        pdf_extract::extract_text_from_mem_by_pages(raw).map_err(|e| MatchError::DocumentParse {
            format: DocumentFormat::Pdf,
            message: e.to_string(),
        })?;
    Ok(join_pages(pages))
}

/// Joins per-page text with one space. Pages without text contribute nothing.
fn join_pages(pages: Vec<String>) -> String {
    pages
        .into_iter()
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_word(raw: &[u8]) -> Result<String, MatchError> {
    let docx = docx_rs::read_docx(raw).map_err(|e| MatchError::DocumentParse {
        format: DocumentFormat::WordProcessor,
        message: format!("{e:?}"),
    })?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join(" "))
}

/// Concatenates the text runs of one paragraph. Runs are fragments of the same
/// sentence, so no separator goes between them.
fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                if let RunChild::Text(t) = rc {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::normalizer::normalize;
    use std::io::{Cursor, Write};

    fn write_temp(suffix: &str, content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(content).unwrap();
        file
    }

    /// Minimal PDF with one page per entry. `None` is a page without text.
    fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                (0..pages.len())
                    .map(|i| format!("{} 0 R", 4 + 2 * i))
                    .collect::<Vec<_>>()
                    .join(" "),
                pages.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];
        for (i, page) in pages.iter().enumerate() {
            let content = match page {
                Some(text) => format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET"),
                None => "q Q".to_string(),
            };
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                5 + 2 * i
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ));
        }

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }
        let xref_start = pdf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for off in offsets {
            xref.push_str(&format!("{off:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_start}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(xref.as_bytes());
        pdf
    }

    fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = docx_rs::Docx::new();
        for p in paragraphs {
            docx = docx.add_paragraph(
                docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text(*p)),
            );
        }
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_format_from_extension_is_case_insensitive() {
        assert_eq!(
            DocumentFormat::from_extension("TXT").unwrap(),
            DocumentFormat::PlainText
        );
        assert_eq!(
            DocumentFormat::from_extension(".Pdf").unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_extension("DOC").unwrap(),
            DocumentFormat::WordProcessor
        );
        assert_eq!(
            DocumentFormat::from_path("cv.DocX").unwrap(),
            DocumentFormat::WordProcessor
        );
    }

    #[test]
    fn test_rtf_is_unsupported() {
        let file = write_temp(".rtf", b"{\\rtf1 Rust}");
        let err = Document::from_path(file.path()).unwrap_err();
        assert!(
            matches!(err, MatchError::UnsupportedFormat { ref extension } if extension == "rtf")
        );
    }

    #[test]
    fn test_missing_file_wins_over_unknown_extension() {
        for path in ["/definitely/not/here/resume.rtf", "/definitely/not/here/resume"] {
            let err = Document::from_path(path).unwrap_err();
            assert!(
                matches!(err, MatchError::FileNotFound { path: ref p } if p.as_os_str() == path),
                "expected FileNotFound for {path}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_missing_extension_is_unsupported() {
        let err = DocumentFormat::from_path("resume").unwrap_err();
        assert!(matches!(err, MatchError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = Document::from_path("/definitely/not/here/resume.txt").unwrap_err();
        assert!(matches!(err, MatchError::FileNotFound { .. }));
    }

    #[test]
    fn test_loads_plain_text_file() {
        let file = write_temp(".txt", b"Python Engineer\nwith 5 years experience");
        let text = load(Document::from_path(file.path()).unwrap()).unwrap();
        assert_eq!(text.as_str(), "Python Engineer\nwith 5 years experience");
        // The loader must leave the source in place.
        assert!(file.path().exists());
    }

    #[test]
    fn test_uppercase_extension_loads() {
        let file = write_temp(".TXT", b"Rust developer");
        let text = load(Document::from_path(file.path()).unwrap()).unwrap();
        assert_eq!(text.as_str(), "Rust developer");
    }

    #[test]
    fn test_whitespace_only_text_is_empty_input() {
        let doc = Document::from_bytes(Bytes::from_static(b"  \n\t "), DocumentFormat::PlainText);
        let err = load(doc).unwrap_err();
        assert!(matches!(
            err,
            MatchError::EmptyInput {
                input: InputSide::Resume
            }
        ));
    }

    #[test]
    fn test_upload_infers_format_from_file_name() {
        let doc = Document::from_upload("resume.txt", Bytes::from_static(b"hello")).unwrap();
        assert_eq!(doc.format(), DocumentFormat::PlainText);
        assert_eq!(load(doc).unwrap().as_str(), "hello");
    }

    #[test]
    fn test_docx_paragraphs_joined_with_spaces() {
        let raw = build_docx(&["Senior Engineer", "Rust and Python"]);
        let doc = Document::from_bytes(raw, DocumentFormat::WordProcessor);
        let text = load(doc).unwrap();
        assert_eq!(text.as_str(), "Senior Engineer Rust and Python");
    }

    #[test]
    fn test_doc_extension_reads_docx_content() {
        let file = write_temp(".doc", &build_docx(&["Data Scientist"]));
        let text = load(Document::from_path(file.path()).unwrap()).unwrap();
        assert_eq!(text.as_str(), "Data Scientist");
    }

    #[test]
    fn test_corrupt_docx_is_parse_error() {
        let doc = Document::from_bytes(
            Bytes::from_static(b"not a zip archive"),
            DocumentFormat::WordProcessor,
        );
        assert!(matches!(
            load(doc).unwrap_err(),
            MatchError::DocumentParse {
                format: DocumentFormat::WordProcessor,
                ..
            }
        ));
    }

    #[test]
    fn test_corrupt_pdf_is_parse_error() {
        let doc = Document::from_bytes(Bytes::from_static(b"plain bytes"), DocumentFormat::Pdf);
        assert!(matches!(
            load(doc).unwrap_err(),
            MatchError::DocumentParse {
                format: DocumentFormat::Pdf,
                ..
            }
        ));
    }

    #[test]
    fn test_join_pages_skips_blank_pages() {
        let pages = vec![
            "Page one".to_string(),
            "   ".to_string(),
            String::new(),
            "Page three".to_string(),
        ];
        assert_eq!(join_pages(pages), "Page one Page three");
    }

    #[test]
    fn test_pdf_pages_joined_and_blank_pages_skipped() {
        let pdf = build_pdf(&[
            Some("Senior Rust Engineer"),
            None,
            Some("Kubernetes and Kafka"),
        ]);
        let text = load(Document::from_bytes(pdf, DocumentFormat::Pdf)).unwrap();
        assert_eq!(
            normalize(text.as_str()).as_str(),
            "senior rust engineer kubernetes and kafka"
        );
    }

    #[test]
    fn test_pdf_file_loads_from_path() {
        let file = write_temp(".PDF", &build_pdf(&[Some("Distributed systems")]));
        let text = load(Document::from_path(file.path()).unwrap()).unwrap();
        assert_eq!(normalize(text.as_str()).as_str(), "distributed systems");
    }
}

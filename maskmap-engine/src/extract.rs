//! Text extraction from uploaded documents
//!
//! Formats are chosen by file extension. DOCX extraction includes table
//! cell text as well as body paragraphs.

use crate::error::{EngineError, Result};
use std::fmt;
use std::path::Path;

/// Document formats with a built-in extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// Plain UTF-8 text
    Txt,
    /// Office Open XML word processing document
    Docx,
    /// Portable Document Format
    Pdf,
}

impl DocumentFormat {
    /// Format for `path`, from its extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match extension.as_str() {
            "txt" => Ok(DocumentFormat::Txt),
            "docx" => Ok(DocumentFormat::Docx),
            "pdf" => Ok(DocumentFormat::Pdf),
            _ => Err(EngineError::UnsupportedFormat { extension }),
        }
    }

    /// Canonical file extension
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Txt => "txt",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Turns a document into plain text
pub trait TextExtractor: Send + Sync {
    /// Plain text of the document at `path`
    fn extract(&self, path: &Path, format: DocumentFormat) -> Result<String>;
}

/// Extractor for every [`DocumentFormat`] enabled at build time
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExtractor;

impl TextExtractor for DefaultExtractor {
    fn extract(&self, path: &Path, format: DocumentFormat) -> Result<String> {
        log::debug!("Extracting {} text from {}", format, path.display());
        match format {
            DocumentFormat::Txt => extract_txt(path),
            DocumentFormat::Docx => extract_docx(path),
            DocumentFormat::Pdf => extract_pdf(path),
        }
    }
}

fn failure(path: &Path, reason: impl fmt::Display) -> EngineError {
    EngineError::ExtractionFailure {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn extract_txt(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| failure(path, e))
}

#[cfg(feature = "docx")]
fn extract_docx(path: &Path) -> Result<String> {
    use std::io::Read;

    let file = std::fs::File::open(path).map_err(|e| failure(path, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| failure(path, e))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| failure(path, e))?
        .read_to_string(&mut xml)
        .map_err(|e| failure(path, e))?;

    docx_text(&xml).map_err(|e| failure(path, e))
}

#[cfg(not(feature = "docx"))]
fn extract_docx(_path: &Path) -> Result<String> {
    Err(EngineError::UnsupportedFormat {
        extension: "docx".to_string(),
    })
}

/// Body paragraphs first, then the text of every table cell, one per line.
#[cfg(feature = "docx")]
pub(crate) fn docx_text(xml: &str) -> std::result::Result<String, String> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut cells: Vec<String> = Vec::new();
    let mut cell: Option<Vec<String>> = None;
    let mut paragraph = String::new();
    let mut table_depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:tc" if table_depth == 1 => cell = Some(Vec::new()),
                b"w:p" => paragraph.clear(),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => paragraph.push('\t'),
                b"w:br" | b"w:cr" => paragraph.push('\n'),
                b"w:p" if table_depth == 0 => paragraphs.push(String::new()),
                b"w:p" => {
                    if let Some(cell) = cell.as_mut() {
                        cell.push(String::new());
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_text => {
                paragraph.push_str(&t.unescape().map_err(|e| e.to_string())?)
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" if table_depth == 0 => paragraphs.push(std::mem::take(&mut paragraph)),
                b"w:p" => {
                    if let Some(cell) = cell.as_mut() {
                        cell.push(std::mem::take(&mut paragraph));
                    }
                }
                b"w:tc" if table_depth == 1 => {
                    if let Some(lines) = cell.take() {
                        cells.push(lines.join("\n"));
                    }
                }
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    paragraphs.extend(cells);
    Ok(paragraphs.join("\n"))
}

#[cfg(feature = "pdf")]
fn extract_pdf(path: &Path) -> Result<String> {
    let document = lopdf::Document::load(path).map_err(|e| failure(path, e))?;
    let mut pages = Vec::new();
    for page_number in document.get_pages().keys() {
        pages.push(
            document
                .extract_text(&[*page_number])
                .map_err(|e| failure(path, e))?,
        );
    }
    Ok(pages.join("\n"))
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_path: &Path) -> Result<String> {
    Err(EngineError::UnsupportedFormat {
        extension: "pdf".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("a/b/Report.PDF")).unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("notes.txt")).unwrap(),
            DocumentFormat::Txt
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("letter.docx")).unwrap(),
            DocumentFormat::Docx
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let err = DocumentFormat::from_path(&PathBuf::from("sheet.xlsx")).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedFormat { extension } if extension == "xlsx"));

        let err = DocumentFormat::from_path(&PathBuf::from("no_extension")).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedFormat { extension } if extension.is_empty()));
    }

    #[test]
    fn test_extract_txt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("note.txt");
        std::fs::write(&path, "Call Ann at 555-0100").unwrap();

        let text = DefaultExtractor.extract(&path, DocumentFormat::Txt).unwrap();
        assert_eq!(text, "Call Ann at 555-0100");
    }

    #[test]
    fn test_extract_missing_file_fails() {
        let err = DefaultExtractor
            .extract(Path::new("/nonexistent/note.txt"), DocumentFormat::Txt)
            .unwrap_err();
        assert!(matches!(err, EngineError::ExtractionFailure { .. }));
    }

    #[cfg(feature = "docx")]
    #[test]
    fn test_docx_text_includes_table_cells() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Dear </w:t></w:r><w:r><w:t>John Smith,</w:t></w:r></w:p>
    <w:tbl>
      <w:tr>
        <w:tc><w:p><w:r><w:t>Email</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t>john@x.com</w:t></w:r></w:p><w:p><w:r><w:t>backup</w:t></w:r></w:p></w:tc>
      </w:tr>
    </w:tbl>
    <w:p><w:r><w:t>Regards &amp; thanks</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

        let text = docx_text(xml).unwrap();
        assert_eq!(
            text,
            "Dear John Smith,\nRegards & thanks\nEmail\njohn@x.com\nbackup"
        );
    }
}

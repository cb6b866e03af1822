//! Turns uploaded study material into plain text.
//!
//! Dispatch is by filename extension. Plain text and markdown decode
//! lossily: undecodable byte sequences become replacement characters
//! instead of rejecting the whole file. PDF and DOCX support are cargo
//! features (both on by default); a build without one reports
//! [`ExtractionError::DependencyMissing`] for that format instead of
//! silently treating the bytes as text.

use crate::error::ExtractionError;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Text,
    Pdf,
    Docx,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Text => "text",
            SourceFormat::Pdf => "PDF",
            SourceFormat::Docx => "DOCX",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plain text pulled out of one uploaded file, plus whatever structural
/// counts the format exposes.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedContent {
    pub text: String,
    pub format: SourceFormat,
    pub filename: String,
    pub pages: Option<usize>,
    pub paragraphs: Option<usize>,
    pub tables: Option<usize>,
}

impl ExtractedContent {
    fn new(text: String, format: SourceFormat, filename: &str) -> Self {
        Self {
            text,
            format,
            filename: filename.to_string(),
            pages: None,
            paragraphs: None,
            tables: None,
        }
    }
}

/// Extract plain text from an uploaded file.
///
/// Returns [`ExtractionError::UnsupportedFormat`] for extensions outside
/// txt/md/pdf/docx and [`ExtractionError::EmptyContent`] when a supported
/// file yields only whitespace.
pub fn extract(bytes: &[u8], filename: &str) -> Result<ExtractedContent, ExtractionError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let content = match extension.as_str() {
        "txt" | "md" => extract_plain(bytes, filename),
        "pdf" => extract_pdf(bytes, filename),
        "docx" => extract_docx(bytes, filename),
        _ => return Err(ExtractionError::UnsupportedFormat { extension }),
    }?;

    if content.text.trim().is_empty() {
        return Err(ExtractionError::EmptyContent {
            format: content.format,
        });
    }
    Ok(content)
}

fn extract_plain(bytes: &[u8], filename: &str) -> Result<ExtractedContent, ExtractionError> {
    let text = String::from_utf8_lossy(bytes).into_owned();
    Ok(ExtractedContent::new(text, SourceFormat::Text, filename))
}

#[cfg(feature = "pdf")]
fn extract_pdf(bytes: &[u8], filename: &str) -> Result<ExtractedContent, ExtractionError> {
    let decode_failure = |detail: String| ExtractionError::DecodeFailure {
        format: SourceFormat::Pdf,
        detail,
    };

    let doc = lopdf::Document::load_mem(bytes).map_err(|e| decode_failure(e.to_string()))?;
    if doc.is_encrypted() {
        return Err(decode_failure("the file is password-protected".to_string()));
    }

    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(ExtractionError::EmptyContent {
            format: SourceFormat::Pdf,
        });
    }

    // Pages are extracted one at a time so a single unreadable page does
    // not throw away the rest of the document.
    let page_count = pages.len();
    let mut parts: Vec<String> = Vec::with_capacity(page_count);
    for &number in pages.keys() {
        match doc.extract_text(&[number]) {
            Ok(text) => parts.push(text),
            Err(err) => {
                tracing::warn!(page = number, error = %err, "skipping unreadable PDF page");
            }
        }
    }

    let mut content = ExtractedContent::new(parts.join("\n"), SourceFormat::Pdf, filename);
    content.pages = Some(page_count);
    Ok(content)
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_bytes: &[u8], _filename: &str) -> Result<ExtractedContent, ExtractionError> {
    Err(ExtractionError::DependencyMissing {
        format: SourceFormat::Pdf,
    })
}

#[cfg(feature = "docx")]
mod docx {
    use regex::Regex;
    use std::sync::LazyLock;

    // w:pPr / w:trPr / w:tcPr never match: after the tag name the pattern
    // requires whitespace or `>`.
    static PARA_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)<w:p(?:\s[^>]*)?>.*?</w:p>").expect("static pattern"));
    static RUN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)<w:t(?:\s[^>]*)?>([^<]*)</w:t>").expect("static pattern"));
    static TABLE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)<w:tbl(?:\s[^>]*)?>.*?</w:tbl>").expect("static pattern"));
    static ROW_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)<w:tr(?:\s[^>]*)?>.*?</w:tr>").expect("static pattern"));
    static CELL_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)<w:tc(?:\s[^>]*)?>.*?</w:tc>").expect("static pattern"));

    /// Concatenated text runs of one XML fragment, entity-decoded.
    pub(super) fn runs(fragment: &str) -> String {
        RUN_RE
            .captures_iter(fragment)
            .map(|c| decode_entities(&c[1]))
            .collect::<Vec<_>>()
            .join("")
    }

    pub(super) fn paragraphs(xml: &str) -> Vec<String> {
        // Strip tables first; their cell paragraphs are rendered separately.
        let body = TABLE_RE.replace_all(xml, "");
        PARA_RE
            .find_iter(&body)
            .map(|p| runs(p.as_str()).trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// Table rows rendered as `cell | cell | cell`, blank rows dropped.
    /// Returns the rows and the number of tables seen.
    pub(super) fn table_rows(xml: &str) -> (Vec<String>, usize) {
        let mut rows = Vec::new();
        let mut table_count = 0;
        for table in TABLE_RE.find_iter(xml) {
            table_count += 1;
            for row in ROW_RE.find_iter(table.as_str()) {
                let cells: Vec<String> = CELL_RE
                    .find_iter(row.as_str())
                    .map(|c| runs(c.as_str()).trim().to_string())
                    .collect();
                let row_text = cells.join(" | ");
                if !row_text.trim_matches(|c| c == ' ' || c == '|').is_empty() {
                    rows.push(row_text);
                }
            }
        }
        (rows, table_count)
    }

    fn decode_entities(text: &str) -> String {
        // `&amp;` last so already-decoded ampersands are not decoded twice.
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&")
    }
}

#[cfg(feature = "docx")]
fn extract_docx(bytes: &[u8], filename: &str) -> Result<ExtractedContent, ExtractionError> {
    use std::io::Read;

    let decode_failure = |detail: String| ExtractionError::DecodeFailure {
        format: SourceFormat::Docx,
        detail,
    };

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| decode_failure(e.to_string()))?;
    let mut xml = String::new();
    {
        let mut entry = archive
            .by_name("word/document.xml")
            .map_err(|e| decode_failure(e.to_string()))?;
        entry
            .read_to_string(&mut xml)
            .map_err(|e| decode_failure(e.to_string()))?;
    }

    let paragraphs = docx::paragraphs(&xml);
    let paragraph_count = paragraphs.len();
    let (rows, table_count) = docx::table_rows(&xml);

    let mut text = paragraphs.join("\n");
    if !rows.is_empty() {
        text.push_str("\n\nTables:\n");
        text.push_str(&rows.join("\n"));
    }

    let mut content = ExtractedContent::new(text, SourceFormat::Docx, filename);
    content.paragraphs = Some(paragraph_count);
    content.tables = Some(table_count);
    Ok(content)
}

#[cfg(not(feature = "docx"))]
fn extract_docx(_bytes: &[u8], _filename: &str) -> Result<ExtractedContent, ExtractionError> {
    Err(ExtractionError::DependencyMissing {
        format: SourceFormat::Docx,
    })
}


#[cfg(all(test, feature = "docx"))]
mod docx_tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", FileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    fn wrap_body(body: &str) -> String {
        format!(
            "<?xml version=\"1.0\"?><w:document xmlns:w=\"wordml\"><w:body>{body}</w:body></w:document>"
        )
    }

    #[test]
    fn reads_paragraphs() {
        let xml = wrap_body(
            "<w:p><w:r><w:t>Cells divide by mitosis.</w:t></w:r></w:p>\
             <w:p><w:pPr></w:pPr></w:p>\
             <w:p><w:r><w:t xml:space=\"preserve\">Meiosis makes </w:t></w:r>\
             <w:r><w:t>gametes.</w:t></w:r></w:p>",
        );
        let content = extract(&docx_bytes(&xml), "bio.docx").unwrap();
        assert_eq!(
            content.text,
            "Cells divide by mitosis.\nMeiosis makes gametes."
        );
        assert_eq!(content.paragraphs, Some(2));
        assert_eq!(content.tables, Some(0));
    }

    #[test]
    fn renders_tables_after_paragraphs() {
        let xml = wrap_body(
            "<w:p><w:r><w:t>Kingdoms of life.</w:t></w:r></w:p>\
             <w:tbl>\
             <w:tr><w:tc><w:p><w:r><w:t>Animalia</w:t></w:r></w:p></w:tc>\
             <w:tc><w:p><w:r><w:t>Multicellular</w:t></w:r></w:p></w:tc></w:tr>\
             <w:tr><w:tc><w:p><w:r><w:t>Fungi</w:t></w:r></w:p></w:tc>\
             <w:tc><w:p><w:r><w:t>Decomposers</w:t></w:r></w:p></w:tc></w:tr>\
             <w:tr><w:tc><w:p></w:p></w:tc><w:tc><w:p></w:p></w:tc></w:tr>\
             </w:tbl>",
        );
        let content = extract(&docx_bytes(&xml), "table.docx").unwrap();
        assert_eq!(
            content.text,
            "Kingdoms of life.\n\nTables:\nAnimalia | Multicellular\nFungi | Decomposers"
        );
        assert_eq!(content.paragraphs, Some(1));
        assert_eq!(content.tables, Some(1));
    }

    #[test]
    fn table_with_only_blank_rows_adds_no_tables_section() {
        let xml = wrap_body(
            "<w:p><w:r><w:t>Just prose.</w:t></w:r></w:p>\
             <w:tbl>\
             <w:tr><w:tc><w:p></w:p></w:tc><w:tc><w:p></w:p></w:tc></w:tr>\
             </w:tbl>",
        );
        let content = extract(&docx_bytes(&xml), "sparse.docx").unwrap();
        assert_eq!(content.text, "Just prose.");
        assert_eq!(content.tables, Some(1));
    }

    #[test]
    fn decodes_xml_entities() {
        let xml = wrap_body("<w:p><w:r><w:t>Salt &amp; water: Na &lt; K</w:t></w:r></w:p>");
        let content = extract(&docx_bytes(&xml), "chem.docx").unwrap();
        assert_eq!(content.text, "Salt & water: Na < K");
    }

    #[test]
    fn docx_without_document_xml_is_decode_failure() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other/part.xml", FileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = extract(&bytes, "weird.docx").unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::DecodeFailure {
                format: SourceFormat::Docx,
                ..
            }
        ));
    }

    #[test]
    fn non_zip_docx_is_decode_failure() {
        let err = extract(b"this is not a zip archive", "fake.docx").unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::DecodeFailure {
                format: SourceFormat::Docx,
                ..
            }
        ));
    }

    #[test]
    fn docx_with_no_text_is_empty_content() {
        let xml = wrap_body("<w:p><w:pPr></w:pPr></w:p>");
        let err = extract(&docx_bytes(&xml), "empty.docx").unwrap_err();
        assert_eq!(
            err,
            ExtractionError::EmptyContent {
                format: SourceFormat::Docx
            }
        );
    }
}

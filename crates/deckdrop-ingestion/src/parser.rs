//! Presentation parsing
//!
//! A `.pptx` file is a ZIP container of OOXML parts. Each slide lives in
//! `ppt/slides/slideN.xml` and its visible text is held in `<a:t>` runs.

use async_trait::async_trait;
use deckdrop_core::{RawFile, Slide, StructuredDocument};
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use regex::Regex;
use std::io::{Cursor, Read};
use tracing::debug;

use crate::{IngestionError, Result};

static SLIDE_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ppt/slides/slide(\d+)\.xml$").expect("valid slide part pattern"));

/// Converts raw file bytes into a [`StructuredDocument`].
#[async_trait]
pub trait DocumentParser: Send + Sync {
    /// Parse a file; fails on malformed or unsupported content
    async fn parse(&self, file: &RawFile) -> Result<StructuredDocument>;

    /// Get parser name
    fn name(&self) -> &'static str;
}

/// Parser for Office Open XML presentations
#[derive(Debug, Clone, Default)]
pub struct PptxParser;

impl PptxParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse synchronously. Used from a blocking task by [`DocumentParser::parse`].
    pub fn parse_bytes(content: &[u8]) -> Result<StructuredDocument> {
        let mut archive = zip::ZipArchive::new(Cursor::new(content))
            .map_err(|e| IngestionError::ParseFailed(format!("Not a presentation container: {}", e)))?;

        let mut parts: Vec<(usize, String)> = archive
            .file_names()
            .filter_map(|name| {
                let number = SLIDE_PART.captures(name)?.get(1)?.as_str().parse::<usize>().ok()?;
                Some((number, name.to_string()))
            })
            .collect();

        if parts.is_empty() {
            return Err(IngestionError::ParseFailed(
                "Container holds no slides".to_string(),
            ));
        }

        parts.sort_by_key(|(number, _)| *number);

        let mut slides = Vec::with_capacity(parts.len());
        for (index, (_, part)) in parts.iter().enumerate() {
            let mut xml = String::new();
            archive
                .by_name(part)
                .map_err(|e| IngestionError::ParseFailed(format!("{}: {}", part, e)))?
                .read_to_string(&mut xml)
                .map_err(|e| IngestionError::ParseFailed(format!("{}: {}", part, e)))?;

            slides.push(Slide::new(index + 1, extract_text_runs(part, &xml)?));
        }

        debug!(slides = slides.len(), "Presentation parsed");

        Ok(StructuredDocument::new(slides))
    }
}

#[async_trait]
impl DocumentParser for PptxParser {
    async fn parse(&self, file: &RawFile) -> Result<StructuredDocument> {
        let file = file.clone();

        tokio::task::spawn_blocking(move || Self::parse_bytes(file.bytes()))
            .await
            .map_err(|e| IngestionError::ParseFailed(format!("Parser task failed: {}", e)))?
    }

    fn name(&self) -> &'static str {
        "pptx"
    }
}

/// Namespace of the DrawingML `t` (text run) element
const DRAWINGML_NS: &[u8] = b"http://schemas.openxmlformats.org/drawingml/2006/main";

fn is_text_run(ns: &ResolveResult, local_name: &[u8]) -> bool {
    local_name == b"t" && matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == DRAWINGML_NS)
}

/// Text runs of one slide part, in document order, skipping empty runs.
///
/// Runs are matched by namespace, not prefix, so `<a:t>` and any rebound
/// prefix both count.
fn extract_text_runs(part: &str, xml: &str) -> Result<Vec<String>> {
    let malformed = |e: quick_xml::Error| IngestionError::ParseFailed(format!("{}: {}", part, e));

    let mut reader = NsReader::from_str(xml);
    let mut runs = Vec::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_resolved_event().map_err(malformed)? {
            (ns, Event::Start(e)) if is_text_run(&ns, e.local_name().as_ref()) => {
                current = Some(String::new());
            }
            (ns, Event::End(e)) if is_text_run(&ns, e.local_name().as_ref()) => {
                if let Some(text) = current.take().filter(|t| !t.is_empty()) {
                    runs.push(text);
                }
            }
            (_, Event::Text(text)) => {
                if let Some(run) = current.as_mut() {
                    run.push_str(&text.unescape().map_err(malformed)?);
                }
            }
            (_, Event::CData(data)) => {
                if let Some(run) = current.as_mut() {
                    run.push_str(&String::from_utf8_lossy(&data));
                }
            }
            (_, Event::Eof) => break,
            _ => {}
        }
    }

    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{pptx_bytes, slide_xml};
    use pretty_assertions::assert_eq;

    const NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

    #[test]
    fn test_extract_text_runs() {
        let xml = format!(
            r#"<p:sld xmlns:a="{NS}" xmlns:p="urn:p"><a:p><a:r><a:t>Hello</a:t></a:r><a:r><a:t xml:space="preserve"> world</a:t></a:r><a:r><a:t></a:t></a:r><a:r><a:t/></a:r></a:p></p:sld>"#
        );

        assert_eq!(
            extract_text_runs("slide1.xml", &xml).unwrap(),
            vec!["Hello", " world"]
        );
    }

    #[test]
    fn test_extract_text_runs_decodes_entities_and_cdata() {
        let xml = slide_xml(&[
            "R&amp;D &lt;2024&gt;",
            "&quot;q&quot; &apos;a&apos;",
            "&#65;&#x42;",
            "<![CDATA[fish & chips]]>",
        ]);

        assert_eq!(
            extract_text_runs("slide1.xml", &xml).unwrap(),
            vec!["R&D <2024>", "\"q\" 'a'", "AB", "fish & chips"]
        );
    }

    #[test]
    fn test_extract_text_runs_matches_namespace_not_prefix() {
        let xml = format!(
            r#"<sld xmlns:d="{NS}" xmlns:x="urn:other"><d:t>Kept</d:t><x:t>Dropped</x:t><t>Unbound</t></sld>"#
        );

        assert_eq!(extract_text_runs("slide1.xml", &xml).unwrap(), vec!["Kept"]);
    }

    #[test]
    fn test_extract_text_runs_rejects_malformed_xml() {
        let xml = format!(r#"<p:sld xmlns:a="{NS}" xmlns:p="urn:p"><a:t>open</a:p></p:sld>"#);

        let err = extract_text_runs("ppt/slides/slide3.xml", &xml).unwrap_err();
        assert!(matches!(err, IngestionError::ParseFailed(ref msg) if msg.starts_with("ppt/slides/slide3.xml")));
    }

    #[test]
    fn test_parse_bytes_orders_slides_numerically() {
        let bytes = pptx_bytes(&[
            ("ppt/slides/slide10.xml", slide_xml(&["Ten"]).as_str()),
            ("ppt/slides/slide2.xml", slide_xml(&["Two"]).as_str()),
            ("ppt/slides/slide1.xml", slide_xml(&["One", "Intro"]).as_str()),
            ("ppt/slides/_rels/slide1.xml.rels", "<Relationships/>"),
            ("ppt/presentation.xml", "<p:presentation/>"),
        ]);

        let doc = PptxParser::parse_bytes(&bytes).unwrap();

        assert_eq!(
            doc,
            StructuredDocument::new(vec![
                Slide::new(1, vec!["One".to_string(), "Intro".to_string()]),
                Slide::new(2, vec!["Two".to_string()]),
                Slide::new(3, vec!["Ten".to_string()]),
            ])
        );
    }

    #[test]
    fn test_parse_rejects_non_zip() {
        let err = PptxParser::parse_bytes(b"just some text").unwrap_err();
        assert!(matches!(err, IngestionError::ParseFailed(_)));
    }

    #[test]
    fn test_parse_rejects_zip_without_slides() {
        let bytes = pptx_bytes(&[("word/document.xml", "<w:document/>")]);

        let err = PptxParser::parse_bytes(&bytes).unwrap_err();
        assert!(err.to_string().contains("no slides"));
    }

    #[tokio::test]
    async fn test_parse_raw_file() {
        let bytes = pptx_bytes(&[("ppt/slides/slide1.xml", slide_xml(&["Agenda"]).as_str())]);
        let file = RawFile::new("agenda.pptx", bytes);

        let doc = PptxParser::new().parse(&file).await.unwrap();

        assert_eq!(doc.slide_count(), 1);
        assert_eq!(doc.text(), "Agenda");
    }
}

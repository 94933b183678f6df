use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// The slot a presentation fills in the application flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// The baseline deck
    #[default]
    Original,
    /// The revised deck compared against the baseline
    Modified,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Original => "original",
            FileType::Modified => "modified",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "original" => Ok(FileType::Original),
            "modified" => Ok(FileType::Modified),
            _ => Err(format!("Unknown file type: {}", s)),
        }
    }
}

/// An unparsed file handle obtained from a file picker or a drop.
///
/// The content is shared and never mutated, so clones are cheap.
#[derive(Clone)]
pub struct RawFile {
    name: String,
    content: Arc<Vec<u8>>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: Arc::new(content.into()),
        }
    }

    /// Read a file from disk, keeping only its final path component as the name
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("Path has no usable file name: {}", path.display()),
                )
            })?
            .to_string();

        let content = tokio::fs::read(path).await?;
        Ok(Self::new(name, content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// MIME type guessed from the file name
    pub fn content_type(&self) -> String {
        mime_guess::from_path(&self.name)
            .first_or_octet_stream()
            .to_string()
    }
}

impl std::fmt::Debug for RawFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawFile")
            .field("name", &self.name)
            .field("len", &self.content.len())
            .finish()
    }
}

/// A single slide and the text runs found on it, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// 1-based slide number
    pub number: usize,
    pub texts: Vec<String>,
}

impl Slide {
    pub fn new(number: usize, texts: Vec<String>) -> Self {
        Self { number, texts }
    }
}

/// Parsed form of a presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StructuredDocument {
    pub slides: Vec<Slide>,
}

impl StructuredDocument {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self { slides }
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// All text runs joined slide by slide
    pub fn text(&self) -> String {
        self.slides
            .iter()
            .map(|s| s.texts.join(" "))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Identifier the remote store assigned to a saved document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentIdentifier(String);

impl DocumentIdentifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-attempt values, created when an attempt starts and dropped when it ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionContext {
    /// Correlates log lines of one attempt
    pub attempt_id: Uuid,
    pub file_type: FileType,
    /// The raw file name without its extension marker
    pub derived_file_name: String,
}

impl IngestionContext {
    pub fn new(file_type: FileType, derived_file_name: impl Into<String>) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            file_type,
            derived_file_name: derived_file_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_parse_and_display() {
        assert_eq!("original".parse::<FileType>(), Ok(FileType::Original));
        assert_eq!("Modified".parse::<FileType>(), Ok(FileType::Modified));
        assert!("draft".parse::<FileType>().is_err());
        assert_eq!(FileType::Modified.to_string(), "modified");
    }

    #[test]
    fn test_file_type_serde() {
        let json = serde_json::to_string(&FileType::Original).unwrap();
        assert_eq!(json, "\"original\"");

        let parsed: FileType = serde_json::from_str("\"modified\"").unwrap();
        assert_eq!(parsed, FileType::Modified);
    }

    #[test]
    fn test_raw_file_accessors() {
        let file = RawFile::new("deck.pptx", vec![1u8, 2, 3]);

        assert_eq!(file.name(), "deck.pptx");
        assert_eq!(file.bytes(), &[1, 2, 3]);
        assert_eq!(file.len(), 3);
        assert!(!file.is_empty());
        assert_eq!(
            file.content_type(),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        );
    }

    #[test]
    fn test_raw_file_debug_hides_content() {
        let file = RawFile::new("deck.pptx", vec![0u8; 16]);
        let debug = format!("{:?}", file);

        assert!(debug.contains("deck.pptx"));
        assert!(debug.contains("16"));
    }

    #[tokio::test]
    async fn test_raw_file_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("review.pptx");
        std::fs::write(&path, b"payload").unwrap();

        let file = RawFile::from_path(&path).await.unwrap();

        assert_eq!(file.name(), "review.pptx");
        assert_eq!(file.bytes(), b"payload");
    }

    #[tokio::test]
    async fn test_raw_file_from_missing_path() {
        let result = RawFile::from_path("/definitely/not/here.pptx").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_structured_document_serializes_camel_case() {
        let doc = StructuredDocument::new(vec![Slide::new(1, vec!["Hello".to_string()])]);
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["slides"][0]["number"], 1);
        assert_eq!(value["slides"][0]["texts"][0], "Hello");
        assert_eq!(doc.slide_count(), 1);
    }

    #[test]
    fn test_structured_document_text() {
        let doc = StructuredDocument::new(vec![
            Slide::new(1, vec!["Q3".to_string(), "Review".to_string()]),
            Slide::new(2, vec!["Numbers".to_string()]),
        ]);

        assert_eq!(doc.text(), "Q3 Review\nNumbers");
    }

    #[test]
    fn test_document_identifier_is_transparent() {
        let id = DocumentIdentifier::new("64f1c2");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"64f1c2\"");
        assert_eq!(id.to_string(), "64f1c2");
    }

    #[test]
    fn test_ingestion_context_has_unique_attempt_ids() {
        let a = IngestionContext::new(FileType::Original, "deck");
        let b = IngestionContext::new(FileType::Original, "deck");

        assert_ne!(a.attempt_id, b.attempt_id);
        assert_eq!(a.derived_file_name, "deck");
    }
}

//! Knowledge base of plant facts and canned Q&A pairs.
//!
//! Loaded once at startup and shared read-only with every request.
//! A missing file is not an error (the service then answers everything
//! through the model), but a malformed one is.

use crate::error::AgriError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Plant entry; every field may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hindi_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hindi_description: Option<String>,
}

/// Canned question/answer pair; every field may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaRecord {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub hindi_question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub hindi_answer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Introduction {
    #[serde(default)]
    pub basic_qa: Vec<QaRecord>,
}

/// Root knowledge document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default)]
    pub plants: Vec<PlantRecord>,
    #[serde(default)]
    pub introduction: Introduction,
}

impl KnowledgeBase {
    /// Load from disk. Absent file yields an empty knowledge base.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AgriError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("Knowledge base {} not found, starting empty", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let kb: KnowledgeBase =
            serde_json::from_str(&content).map_err(|source| AgriError::KnowledgeParse {
                path: path.display().to_string(),
                source,
            })?;

        info!(
            "Loaded knowledge base from {}: {} plants, {} Q&A pairs",
            path.display(),
            kb.plant_count(),
            kb.qa_count()
        );
        Ok(kb)
    }

    /// Parse an in-memory document
    pub fn from_json(content: &str) -> Result<Self, AgriError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn plants(&self) -> &[PlantRecord] {
        &self.plants
    }

    pub fn basic_qa(&self) -> &[QaRecord] {
        &self.introduction.basic_qa
    }

    pub fn plant_count(&self) -> usize {
        self.plants.len()
    }

    pub fn qa_count(&self) -> usize {
        self.introduction.basic_qa.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let kb = KnowledgeBase::load(dir.path().join("nope.json")).unwrap();
        assert_eq!(kb.plant_count(), 0);
        assert_eq!(kb.qa_count(), 0);
    }

    #[test]
    fn test_malformed_file_fails() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ this is not json").unwrap();

        let err = KnowledgeBase::load(file.path()).unwrap_err();
        assert!(matches!(err, AgriError::KnowledgeParse { .. }));
    }

    #[test]
    fn test_load_full_document() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "plants": [
                    {{"name": "Wheat", "hindi_name": "गेहूं", "description": "A cereal grain."}}
                ],
                "introduction": {{
                    "basic_qa": [
                        {{"question": "what is soil", "answer": "The top layer of earth."}}
                    ]
                }}
            }}"#
        )
        .unwrap();

        let kb = KnowledgeBase::load(file.path()).unwrap();
        assert_eq!(kb.plant_count(), 1);
        assert_eq!(kb.plants()[0].hindi_name.as_deref(), Some("गेहूं"));
        assert_eq!(kb.plants()[0].hindi_description, None);
        assert_eq!(kb.basic_qa()[0].answer.as_deref(), Some("The top layer of earth."));
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let kb = KnowledgeBase::from_json(r#"{"plants": [{"name": null}]}"#).unwrap();
        assert_eq!(kb.plant_count(), 1);
        assert_eq!(kb.plants()[0].name, None);
        assert_eq!(kb.qa_count(), 0);

        let kb = KnowledgeBase::from_json(r#"{"introduction": {}}"#).unwrap();
        assert_eq!(kb.plant_count(), 0);
        assert_eq!(kb.qa_count(), 0);
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryBlock {
    pub theme_key: String,
    pub theme_title: String,
    pub theme_ru: String,
    pub story_number: u32,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    #[serde(rename = "_id")]
    pub id: String,
    pub planet: String,
    pub planet_ru: String,
    pub element: String,
    pub element_ru: String,
    pub element_type: String,
    #[serde(default)]
    pub stories: Vec<StoryBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planet_ru: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_ru: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stories: Option<Vec<StoryBlock>>,
}

/// The backend reports `deleted_count` either as a number or as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Count {
    Number(u64),
    Text(String),
}

impl Default for Count {
    fn default() -> Self {
        Self::Number(0)
    }
}

/// Outcome of a bulk replace. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkUpdateResult {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub deleted_count: Count,
    #[serde(default)]
    pub added_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BulkUpdateResult {
    pub const UPLOAD_ERROR: &'static str = "UploadError";

    /// Failed upload: the message plus zeroed counters.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            deleted_count: Count::default(),
            added_count: 0,
            error: Some(Self::UPLOAD_ERROR.to_owned()),
        }
    }
}

mod link_preview;

pub use link_preview::LinkPreview;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display};

// ============================================================================
// Content Models
// ============================================================================

/// The user and tenant a preview job runs on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub user_id: String,
    pub tenant_alias: String,
}

/// Read-only view of a link content item.
///
/// Until someone picks a title, `display_name` holds the same string as `link`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: String,
    pub display_name: String,
    pub link: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Content {
    /// A freshly shared link: the display name is still the URL itself.
    pub fn new_link(id: impl Into<String>, link: impl Into<String>) -> Self {
        let link = link.into();
        Content {
            id: id.into(),
            display_name: link.clone(),
            link,
            description: None,
        }
    }

    pub fn has_custom_display_name(&self) -> bool {
        self.display_name != self.link
    }

    pub fn has_description(&self) -> bool {
        self.description.as_deref().is_some_and(|d| !d.is_empty())
    }
}

/// Content fields a preview job may stage for the pipeline to persist.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ContentMetadataField {
    DisplayName,
    Description,
}

// ============================================================================
// Link Metadata
// ============================================================================

/// Metadata discovered for a link that may be copied onto its content item.
///
/// Deserializing is permissive: unknown keys are dropped and a recognised key
/// holding anything other than a string is read as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkMetadata {
    #[serde(default, deserialize_with = "string_or_none")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub description: Option<String>,
}

impl LinkMetadata {
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

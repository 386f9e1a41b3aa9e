use serde::{Deserialize, Serialize};

/// Author class reported by the chat source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorType {
    Owner,
    Moderator,
    Member,
    /// Anyone without a special role. Unknown source values land here.
    #[default]
    #[serde(other)]
    Viewer,
}

/// A chat message normalized by the comment source.
///
/// The engine never looks at message markup; it only needs who wrote the
/// message (for style and stacking exemption) and how wide the rendered
/// banner is along the travel axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    #[serde(default)]
    pub author_type: AuthorType,
    #[serde(default)]
    pub author_name: String,
    /// Written by the viewer running the overlay.
    #[serde(default)]
    pub is_self: bool,
    /// Carries a purchase amount (super chat).
    #[serde(default)]
    pub is_paid: bool,
    /// Rendered banner width, if the renderer could measure it.
    #[serde(default)]
    pub content_width: Option<f64>,
}

impl CommentRecord {
    pub fn new(author_type: AuthorType, content_width: f64) -> Self {
        Self {
            author_type,
            author_name: String::new(),
            is_self: false,
            is_paid: false,
            content_width: Some(content_width),
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::comment::AuthorType;

/// How a banner from one class of author is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleStyle {
    /// CSS color of the banner text.
    pub color: String,
    /// Whether the banner carries the author's avatar badge.
    pub avatar: bool,
}

impl RoleStyle {
    pub fn new(color: impl Into<String>, avatar: bool) -> Self {
        Self {
            color: color.into(),
            avatar,
        }
    }
}

/// Per-role banner styles, resolved in order own > paid > author type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Palette {
    pub viewer: RoleStyle,
    pub owner: RoleStyle,
    pub moderator: RoleStyle,
    pub member: RoleStyle,
    #[serde(rename = "self")]
    pub own: RoleStyle,
    pub paid: RoleStyle,
}

impl Palette {
    /// Style for a plain author of the given type.
    pub fn for_author(&self, author_type: AuthorType) -> &RoleStyle {
        match author_type {
            AuthorType::Owner => &self.owner,
            AuthorType::Moderator => &self.moderator,
            AuthorType::Member => &self.member,
            AuthorType::Viewer => &self.viewer,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            viewer: RoleStyle::new("#ffffff", false),
            owner: RoleStyle::new("#ffd600", true),
            moderator: RoleStyle::new("#5e84f1", true),
            member: RoleStyle::new("#2ba640", false),
            own: RoleStyle::new("#ffffff", false),
            paid: RoleStyle::new("#ff5722", true),
        }
    }
}

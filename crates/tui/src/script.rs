use std::path::Path;

use anyhow::{Context, Result};
use danmaku_core::resolve_style;
use danmaku_protocol::{AuthorType, CommentRecord, Palette};
use serde::Deserialize;

/// Marker drawn in front of banners that carry an avatar badge.
pub const AVATAR: &str = "● ";

/// One chat message in a replay script, posted `at` seconds after start.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptedComment {
    pub at: f64,
    pub text: String,
    #[serde(default)]
    pub author_type: AuthorType,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub is_self: bool,
    #[serde(default)]
    pub is_paid: bool,
}

impl ScriptedComment {
    fn unmeasured(&self) -> CommentRecord {
        CommentRecord {
            author_type: self.author_type,
            author_name: self.author_name.clone(),
            is_self: self.is_self,
            is_paid: self.is_paid,
            content_width: None,
        }
    }

    /// The text as drawn, including the avatar marker when the palette
    /// gives this author one.
    pub fn label(&self, palette: &Palette) -> String {
        if resolve_style(&self.unmeasured(), palette).avatar {
            format!("{AVATAR}{}", self.text)
        } else {
            self.text.clone()
        }
    }

    /// Normalized record, measured in terminal cells.
    pub fn record(&self, palette: &Palette) -> CommentRecord {
        CommentRecord {
            content_width: Some(self.label(palette).chars().count() as f64),
            ..self.unmeasured()
        }
    }
}

/// Load a JSON array of scripted comments, ordered by posting time.
pub fn load(path: &Path) -> Result<Vec<ScriptedComment>> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    parse(&data)
}

fn parse(data: &[u8]) -> Result<Vec<ScriptedComment>> {
    let mut script: Vec<ScriptedComment> =
        serde_json::from_slice(data).context("parsing comment script")?;
    script.sort_by(|a, b| a.at.total_cmp(&b.at));
    Ok(script)
}

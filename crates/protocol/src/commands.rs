use serde::{Deserialize, Serialize};

use crate::types::CommentId;

/// A single instruction from the engine to the renderer.
///
/// The engine owns scheduling only. Renderers own the visual handle `H`
/// (a DOM element key, a terminal label, ...) and perform the actual
/// positioning, animation and removal each command describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OverlayCommand<H> {
    /// Place an admitted banner and start its motion from `from_x` to
    /// `to_x` over `duration` seconds.
    #[serde(rename_all = "camelCase")]
    Start {
        id: CommentId,
        handle: H,
        lane: usize,
        row: u32,
        top: f64,
        opacity: f64,
        from_x: f64,
        to_x: f64,
        duration: f64,
    },

    /// The banner finished crossing; release its handle.
    Retire { id: CommentId, handle: H },

    /// The comment was not admitted; release its handle without showing it.
    Discard { handle: H },

    /// Freeze every moving banner at once.
    PauseAll,

    /// Continue every frozen banner from where it stopped.
    ResumeAll,

    /// Release every live handle.
    Clear,
}

impl<H> OverlayCommand<H> {
    /// The handle this command refers to, if it targets a single banner.
    pub fn handle(&self) -> Option<&H> {
        match self {
            Self::Start { handle, .. } | Self::Retire { handle, .. } | Self::Discard { handle } => {
                Some(handle)
            }
            Self::PauseAll | Self::ResumeAll | Self::Clear => None,
        }
    }
}

pub mod comment;
pub mod commands;
pub mod settings;
pub mod theme;
pub mod types;

pub use comment::{AuthorType, CommentRecord};
pub use commands::OverlayCommand;
pub use settings::{Overflow, Settings};
pub use theme::{Palette, RoleStyle};
pub use types::{CommentId, Viewport};

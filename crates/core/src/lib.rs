//! Scrolling comment layout engine.
//!
//! Comments enter at the right edge of a video surface and travel left
//! in lanes. The engine decides which lane each comment may use without
//! catching up with the banner ahead of it, fades lanes beyond the
//! visible row count, and retires banners when their crossing completes,
//! all against a playback clock that stops while the video is paused.

pub mod clock;
pub mod config;
pub mod engine;
pub mod kinematics;
pub mod lanes;
pub mod scheduler;
pub mod stacking;
pub mod style;

pub use clock::PlaybackClock;
pub use config::SettingsError;
pub use engine::{Admission, Engine, EngineError, Geometry, Stats};
pub use lanes::{Banner, LaneAllocator};
pub use stacking::Placement;
pub use style::resolve_style;

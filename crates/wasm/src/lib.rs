use std::sync::Mutex;

use danmaku_core::{Engine, resolve_style};
use danmaku_protocol::{CommentRecord, Viewport};
use log::info;
use wasm_bindgen::prelude::*;

/// The page's single engine. Every entry point takes the lock, so chat
/// admissions and animation-frame retirements never interleave.
static ENGINE: Mutex<Option<Engine<u32>>> = Mutex::new(None);

fn with_engine<T>(f: impl FnOnce(&mut Engine<u32>) -> Result<T, JsError>) -> Result<T, JsError> {
    let mut guard = ENGINE
        .lock()
        .map_err(|_| JsError::new("engine lock poisoned"))?;
    let engine = guard
        .as_mut()
        .ok_or_else(|| JsError::new("engine not initialised"))?;
    f(engine)
}

fn seconds(now_ms: f64) -> f64 {
    now_ms / 1000.0
}

/// Create (or replace) the engine from a JSON settings snapshot.
#[wasm_bindgen]
pub fn init(settings_json: &str) -> Result<(), JsError> {
    let mut engine = Engine::new();
    engine.update_settings_json(settings_json)?;
    let mut guard = ENGINE
        .lock()
        .map_err(|_| JsError::new("engine lock poisoned"))?;
    *guard = Some(engine);
    info!("danmaku engine initialised");
    Ok(())
}

/// Replace the settings snapshot. A rejected snapshot leaves the engine
/// refusing comments until a valid one arrives.
#[wasm_bindgen]
pub fn update_settings(settings_json: &str) -> Result<(), JsError> {
    with_engine(|engine| Ok(engine.update_settings_json(settings_json)?))
}

/// Offer a chat message. `handle` is the caller's key for the banner
/// element it already built and measured. Returns the admission outcome
/// as JSON; the element's fate is reported through `take_commands`.
#[wasm_bindgen]
pub fn offer_comment(
    record_json: &str,
    handle: u32,
    now_ms: f64,
    container_width: f64,
    container_height: f64,
) -> Result<String, JsError> {
    let record: CommentRecord = serde_json::from_str(record_json)?;
    let geometry = (container_width > 0.0 && container_height > 0.0)
        .then(|| Viewport::new(container_width, container_height));
    with_engine(|engine| {
        let admission = engine.offer(&record, handle, seconds(now_ms), &geometry)?;
        Ok(serde_json::to_string(&admission)?)
    })
}

/// Advance to `now_ms` and retire finished banners.
#[wasm_bindgen]
pub fn tick(now_ms: f64) -> Result<(), JsError> {
    with_engine(|engine| {
        engine.tick(seconds(now_ms));
        Ok(())
    })
}

/// Mirror the video's play/pause state. Returns whether it changed.
#[wasm_bindgen]
pub fn set_playing(playing: bool, now_ms: f64) -> Result<bool, JsError> {
    with_engine(|engine| Ok(engine.set_playing(playing, seconds(now_ms))))
}

#[wasm_bindgen]
pub fn set_disabled(disabled: bool, now_ms: f64) -> Result<(), JsError> {
    with_engine(|engine| {
        engine.set_disabled(disabled, seconds(now_ms));
        Ok(())
    })
}

/// Drain pending overlay commands as a JSON array.
#[wasm_bindgen]
pub fn take_commands() -> Result<String, JsError> {
    with_engine(|engine| Ok(serde_json::to_string(&engine.take_commands())?))
}

/// Admission counters as JSON.
#[wasm_bindgen]
pub fn stats() -> Result<String, JsError> {
    with_engine(|engine| Ok(serde_json::to_string(engine.stats())?))
}

/// Colour and avatar for a message, so the element can be built and
/// measured before it is offered.
#[wasm_bindgen]
pub fn banner_style(record_json: &str) -> Result<String, JsError> {
    let record: CommentRecord = serde_json::from_str(record_json)?;
    with_engine(|engine| {
        let settings = engine
            .settings()
            .ok_or_else(|| JsError::new("no valid settings snapshot"))?;
        Ok(serde_json::to_string(resolve_style(&record, &settings.palette))?)
    })
}

/// Font size for banners on a surface `container_height` tall.
#[wasm_bindgen]
pub fn font_size(container_height: f64) -> Result<f64, JsError> {
    with_engine(|engine| {
        let settings = engine
            .settings()
            .ok_or_else(|| JsError::new("no valid settings snapshot"))?;
        Ok(Viewport::new(0.0, container_height).font_size(settings.rows))
    })
}

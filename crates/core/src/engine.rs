//! Comment lifecycle: admission, motion start, retirement, pause/resume.

use danmaku_protocol::{CommentId, CommentRecord, Overflow, OverlayCommand, Settings, Viewport};
use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use crate::clock::PlaybackClock;
use crate::config::{self, SettingsError};
use crate::lanes::{Banner, LaneAllocator};
use crate::scheduler::Scheduler;
use crate::stacking::{self, Placement};
use crate::style;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no valid settings snapshot")]
    NoSettings,
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Live surface geometry, measured once per admission.
pub trait Geometry {
    /// The current surface, or `None` if it cannot be measured yet.
    fn viewport(&self) -> Option<Viewport>;
}

impl Geometry for Viewport {
    fn viewport(&self) -> Option<Viewport> {
        Some(*self)
    }
}

impl Geometry for Option<Viewport> {
    fn viewport(&self) -> Option<Viewport> {
        *self
    }
}

/// Outcome of offering a comment to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Admission {
    /// The comment is moving in `placement.lane`.
    Admitted { id: CommentId, placement: Placement },
    /// Every visible row was taken and the overflow policy is hidden.
    Overflowed { lane: usize },
    /// Playback is paused; the comment is dropped, not queued.
    Paused,
    /// The overlay is disabled.
    Disabled,
    /// Surface or banner width is not measurable yet.
    Deferred,
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }

    pub fn lane(&self) -> Option<usize> {
        match self {
            Self::Admitted { placement, .. } => Some(placement.lane),
            _ => None,
        }
    }
}

/// Running counters, one per admission outcome plus retirements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub admitted: u64,
    /// Admitted into a lane beyond the visible rows.
    pub stacked: u64,
    pub overflowed: u64,
    pub dropped_paused: u64,
    pub dropped_disabled: u64,
    pub deferred: u64,
    pub retired: u64,
    /// Removed by a clear or disable before finishing.
    pub cleared: u64,
}

#[derive(Debug, Clone, Copy)]
struct Retirement {
    id: CommentId,
    lane: usize,
}

/// The overlay engine.
///
/// All methods take the host time in seconds; the engine derives its
/// playback clock from it. Every handle passed to [`Engine::offer`] comes
/// back to the renderer exactly once, through `Discard`, `Retire` or
/// `Clear`.
///
/// The engine is single-owner. Callers with several producers must put
/// it behind one lock so that admission and retirement never interleave.
#[derive(Debug)]
pub struct Engine<H> {
    settings: Option<Settings>,
    clock: PlaybackClock,
    lanes: LaneAllocator<H>,
    retirements: Scheduler<Retirement>,
    commands: Vec<OverlayCommand<H>>,
    next_id: u64,
    disabled: bool,
    stats: Stats,
}

impl<H: Clone> Engine<H> {
    /// An engine with no settings yet. Offers fail until
    /// [`Engine::update_settings`] succeeds.
    pub fn new() -> Self {
        Self {
            settings: None,
            clock: PlaybackClock::new(),
            lanes: LaneAllocator::new(),
            retirements: Scheduler::new(),
            commands: Vec::new(),
            next_id: 0,
            disabled: false,
            stats: Stats::default(),
        }
    }

    pub fn with_settings(settings: Settings) -> Result<Self, EngineError> {
        let mut engine = Self::new();
        engine.update_settings(settings)?;
        Ok(engine)
    }

    /// Replace the settings snapshot.
    ///
    /// An invalid snapshot is refused and also drops the current one, so
    /// no comment is admitted under settings the provider has moved away
    /// from.
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), EngineError> {
        if let Err(err) = config::validate(&settings) {
            self.settings = None;
            return Err(err.into());
        }
        info!(
            "settings: {} rows, {}s crossing, {:?} overflow, opacity {}",
            settings.rows, settings.speed, settings.overflow, settings.opacity
        );
        self.settings = Some(settings);
        Ok(())
    }

    pub fn update_settings_json(&mut self, json: &str) -> Result<(), EngineError> {
        match config::from_json(json) {
            Ok(settings) => self.update_settings(settings),
            Err(err) => {
                self.settings = None;
                Err(err.into())
            }
        }
    }

    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_ref()
    }

    /// Offer a comment for admission at host time `host_now`.
    pub fn offer(
        &mut self,
        record: &CommentRecord,
        handle: H,
        host_now: f64,
        geometry: &impl Geometry,
    ) -> Result<Admission, EngineError> {
        self.advance(host_now);

        if self.disabled {
            self.stats.dropped_disabled += 1;
            return Ok(self.discard(handle, Admission::Disabled));
        }
        let Some(settings) = self.settings.as_ref() else {
            self.commands.push(OverlayCommand::Discard { handle });
            return Err(EngineError::NoSettings);
        };
        if self.clock.is_paused() {
            self.stats.dropped_paused += 1;
            return Ok(self.discard(handle, Admission::Paused));
        }
        let (Some(viewport), Some(width)) = (geometry.viewport(), record.content_width) else {
            self.stats.deferred += 1;
            return Ok(self.discard(handle, Admission::Deferred));
        };

        let now = self.clock.now();
        let rows = settings.rows;
        let speed = settings.speed;
        let lane = self.lanes.find_lane(width, viewport.width, speed, now);
        let beyond_rows = lane >= rows as usize;

        if beyond_rows && settings.overflow == Overflow::Hidden {
            debug!("overflow: lane {lane} is past {rows} rows, discarding");
            self.stats.overflowed += 1;
            return Ok(self.discard(handle, Admission::Overflowed { lane }));
        }

        let exempt = style::is_exempt(record, &settings.palette);
        let placement = stacking::place(
            lane,
            rows,
            viewport.row_height(rows),
            exempt,
            settings.opacity,
        );

        let id = CommentId(self.next_id);
        self.next_id += 1;

        self.lanes.push(
            lane,
            Banner {
                id,
                handle: handle.clone(),
                width,
                inserted_at: now,
                duration: speed,
                placement,
            },
        );
        let due = self
            .retirements
            .schedule_after(now, speed, Retirement { id, lane });
        self.commands.push(OverlayCommand::Start {
            id,
            handle,
            lane,
            row: placement.row,
            top: placement.top,
            opacity: placement.opacity,
            from_x: viewport.width,
            to_x: -width,
            duration: speed,
        });

        self.stats.admitted += 1;
        if beyond_rows {
            self.stats.stacked += 1;
        }
        debug!(
            "admitted {id} into lane {lane} (row {}, depth {}), retires at {due:.3}",
            placement.row, placement.depth
        );
        Ok(Admission::Admitted { id, placement })
    }

    /// Advance to host time `host_now` and retire every banner whose
    /// crossing has completed.
    pub fn tick(&mut self, host_now: f64) {
        self.advance(host_now);
    }

    /// Freeze every banner. Returns `false` if already paused.
    pub fn pause(&mut self, host_now: f64) -> bool {
        self.advance(host_now);
        let changed = self.clock.pause(host_now);
        if changed {
            debug!("paused at {:.3} with {} in flight", self.clock.now(), self.lanes.len());
            self.commands.push(OverlayCommand::PauseAll);
        }
        changed
    }

    /// Continue every banner. Returns `false` if already playing.
    pub fn resume(&mut self, host_now: f64) -> bool {
        let changed = self.clock.resume(host_now);
        if changed {
            debug!("resumed at {:.3}", self.clock.now());
            self.commands.push(OverlayCommand::ResumeAll);
        }
        changed
    }

    /// Follow the video's playing state.
    pub fn set_playing(&mut self, playing: bool, host_now: f64) -> bool {
        if playing {
            self.resume(host_now)
        } else {
            self.pause(host_now)
        }
    }

    /// Turn the overlay off or back on. Disabling clears every lane.
    pub fn set_disabled(&mut self, disabled: bool, host_now: f64) {
        self.advance(host_now);
        if disabled == self.disabled {
            return;
        }
        self.disabled = disabled;
        if disabled {
            let cleared = self.clear();
            info!("disabled, cleared {cleared} banners");
        } else {
            info!("enabled");
        }
    }

    /// Drop every banner in flight and cancel their retirements. Returns
    /// how many were removed.
    pub fn clear(&mut self) -> usize {
        let cleared = self.lanes.clear().len();
        self.retirements.clear();
        self.stats.cleared += cleared as u64;
        self.commands.push(OverlayCommand::Clear);
        cleared
    }

    /// Drain the commands produced since the last call.
    pub fn take_commands(&mut self) -> Vec<OverlayCommand<H>> {
        std::mem::take(&mut self.commands)
    }

    /// Current playback-clock time.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn is_playing(&self) -> bool {
        !self.clock.is_paused()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn lanes(&self) -> &LaneAllocator<H> {
        &self.lanes
    }

    /// Playback time of the next retirement.
    pub fn next_retirement(&self) -> Option<f64> {
        self.retirements.next_due()
    }

    /// Playback time at which banner `id` is due to retire.
    pub fn retirement_of(&self, id: CommentId) -> Option<f64> {
        self.retirements
            .pending()
            .find(|(_, retirement)| retirement.id == id)
            .map(|(due, _)| due)
    }

    /// Every banner in flight with its leading-edge x position now.
    pub fn positions(&self, container_width: f64) -> impl Iterator<Item = (&Banner<H>, f64)> {
        let now = self.clock.now();
        self.lanes
            .banners()
            .map(move |banner| (banner, banner.position(container_width, now)))
    }

    fn advance(&mut self, host_now: f64) {
        let now = self.clock.advance_to(host_now);
        while let Some((due, Retirement { id, lane })) = self.retirements.pop_due(now) {
            if let Some(banner) = self.lanes.retire(lane, id) {
                debug!("retired {id} from lane {lane} at {due:.3}");
                self.stats.retired += 1;
                self.commands.push(OverlayCommand::Retire {
                    id,
                    handle: banner.handle,
                });
            }
        }
    }

    fn discard(&mut self, handle: H, admission: Admission) -> Admission {
        self.commands.push(OverlayCommand::Discard { handle });
        admission
    }
}

impl<H: Clone> Default for Engine<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Playing,
    /// Paused since the given host time, or since before the first host
    /// time was seen.
    Paused(Option<f64>),
}

/// Pausable virtual clock tracking video playback.
///
/// The clock is driven by host timestamps in seconds (`performance.now()`,
/// `Instant` elapsed, ...). While playing, virtual time advances by exactly
/// the host time that passed; while paused it stands still. Every banner
/// position and retirement deadline is expressed in virtual time, so one
/// pause freezes all of them together and a resume continues them with no
/// jump.
///
/// Virtual time is always `host - origin - total paused`.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    origin: Option<f64>,
    last_host: f64,
    paused_total: f64,
    state: State,
}

impl PlaybackClock {
    /// A playing clock at virtual time zero.
    pub fn new() -> Self {
        Self {
            origin: None,
            last_host: 0.0,
            paused_total: 0.0,
            state: State::Playing,
        }
    }

    /// A clock that starts paused.
    pub fn paused() -> Self {
        Self {
            state: State::Paused(None),
            ..Self::new()
        }
    }

    /// Current virtual time in seconds.
    pub fn now(&self) -> f64 {
        let Some(origin) = self.origin else {
            return 0.0;
        };
        let host = match self.state {
            State::Paused(Some(since)) => since,
            _ => self.last_host,
        };
        host - origin - self.paused_total
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, State::Paused(_))
    }

    /// Move the clock to host time `host` and return the virtual time.
    ///
    /// The first observed host time anchors the clock at zero. A host time
    /// earlier than the last one is treated as no progress.
    pub fn advance_to(&mut self, host: f64) -> f64 {
        match self.origin {
            None => {
                self.origin = Some(host);
                self.last_host = host;
                if self.state == State::Paused(None) {
                    self.state = State::Paused(Some(host));
                }
            }
            Some(_) => self.last_host = self.last_host.max(host),
        }
        self.now()
    }

    /// Stop virtual time at host time `host`. Returns `false` if the clock
    /// was already paused.
    pub fn pause(&mut self, host: f64) -> bool {
        self.advance_to(host);
        if self.is_paused() {
            return false;
        }
        self.state = State::Paused(Some(self.last_host));
        true
    }

    /// Let virtual time run again from host time `host`. Returns `false`
    /// if the clock was already playing.
    pub fn resume(&mut self, host: f64) -> bool {
        self.advance_to(host);
        let State::Paused(since) = self.state else {
            return false;
        };
        if let Some(since) = since {
            self.paused_total += self.last_host - since;
        }
        self.state = State::Playing;
        true
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

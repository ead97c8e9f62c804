use crate::error::TimelineError;

/// How many times playback runs through its range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Iterations {
    Finite(u32),
    Infinite,
}

/// Parameters for [`Sequence::play`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlaybackOptions {
    /// Playback range in seconds. `None` plays the whole sheet.
    pub range: Option<(f64, f64)>,
    pub iteration_count: Iterations,
    /// Sequence seconds per wall-clock second.
    pub rate: f64,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            range: None,
            iteration_count: Iterations::Finite(1),
            rate: 1.0,
        }
    }
}

impl PlaybackOptions {
    pub fn range(mut self, start: f64, end: f64) -> Self {
        self.range = Some((start, end));
        self
    }

    pub fn iterations(mut self, iteration_count: Iterations) -> Self {
        self.iteration_count = iteration_count;
        self
    }

    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Playback {
    start: f64,
    end: f64,
    iterations: Iterations,
    rate: f64,
    /// Sequence seconds already covered when playback was requested.
    offset: f64,
    /// Host timestamp (ms) of the first advance after `play`.
    origin_ms: Option<f64>,
    last_ms: Option<f64>,
}

/// Playhead of a sheet.
///
/// The sequence has no clock of its own: the host feeds it timestamps through
/// [`advance`](Self::advance). The first advance after `play` anchors the
/// playback origin; repeated or earlier timestamps are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequence {
    position: f64,
    playback: Option<Playback>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current playhead in seconds.
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_some()
    }

    /// Moves the playhead. Any running playback is paused.
    pub fn set_position(&mut self, position: f64) {
        self.playback = None;
        self.position = position.max(0.0);
    }

    /// Starts playback over the options' range, or `[0, length]` when unset.
    ///
    /// Resumes from the current position when it lies inside the range.
    pub fn play(&mut self, options: PlaybackOptions, length: f64) -> Result<(), TimelineError> {
        let (start, end) = options.range.unwrap_or((0.0, length));
        if !start.is_finite() || !end.is_finite() || start < 0.0 || end < start {
            return Err(TimelineError::InvalidRange { start, end });
        }
        if !options.rate.is_finite() || options.rate <= 0.0 {
            return Err(TimelineError::InvalidRate(options.rate));
        }

        let offset = if (start..end).contains(&self.position) {
            self.position - start
        } else {
            0.0
        };

        self.position = start + offset;
        self.playback = Some(Playback {
            start,
            end,
            iterations: options.iteration_count,
            rate: options.rate,
            offset,
            origin_ms: None,
            last_ms: None,
        });
        Ok(())
    }

    /// Stops playback, keeping the playhead where it is.
    pub fn pause(&mut self) {
        self.playback = None;
    }

    /// Moves the playhead to host time `timestamp_ms`.
    ///
    /// Returns whether the position changed. Finite playback stops on the
    /// range end.
    pub fn advance(&mut self, timestamp_ms: f64) -> bool {
        let Some(playback) = self.playback.as_mut() else {
            return false;
        };
        if !timestamp_ms.is_finite() {
            return false;
        }
        if playback.last_ms.is_some_and(|last| timestamp_ms <= last) {
            return false;
        }
        playback.last_ms = Some(timestamp_ms);
        let origin = *playback.origin_ms.get_or_insert(timestamp_ms);

        let elapsed = playback.offset + (timestamp_ms - origin) / 1000.0 * playback.rate;
        let span = playback.end - playback.start;

        let (position, finished) = match playback.iterations {
            _ if span <= 0.0 => (playback.start, !matches!(playback.iterations, Iterations::Infinite)),
            Iterations::Finite(n) if elapsed >= span * f64::from(n) => (playback.end, true),
            _ => (playback.start + elapsed % span, false),
        };

        if finished {
            self.playback = None;
        }

        let changed = position != self.position;
        self.position = position;
        changed
    }
}

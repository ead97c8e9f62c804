/// A single keyframe: `value` at `time` seconds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Keyframe {
    pub time: f64,
    pub value: f64,
}

impl Keyframe {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Keyframes of one numeric prop, kept sorted by time.
///
/// Sampling interpolates linearly and holds the first/last value outside
/// the keyed span.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    keys: Vec<Keyframe>,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a track from `(time, value)` pairs in any order.
    pub fn from_keys(keys: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut track = Self::new();
        for (time, value) in keys {
            track.insert(time, value);
        }
        track
    }

    /// Inserts a keyframe, replacing any keyframe at the same time.
    /// Non-finite times are ignored.
    pub fn insert(&mut self, time: f64, value: f64) {
        if !time.is_finite() {
            return;
        }
        match self.keys.binary_search_by(|k| k.time.total_cmp(&time)) {
            Ok(i) => self.keys[i].value = value,
            Err(i) => self.keys.insert(i, Keyframe::new(time, value)),
        }
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Time of the last keyframe, or 0 for an empty track.
    pub fn end_time(&self) -> f64 {
        self.keys.last().map_or(0.0, |k| k.time)
    }

    /// Value at `time`, or `None` for an empty track.
    pub fn sample(&self, time: f64) -> Option<f64> {
        let first = self.keys.first()?;
        let last = self.keys.last()?;

        if time <= first.time {
            return Some(first.value);
        }
        if time >= last.time {
            return Some(last.value);
        }

        // `time` is strictly inside the keyed span, so both neighbours exist.
        let upper = self.keys.partition_point(|k| k.time <= time);
        let (a, b) = (self.keys[upper - 1], self.keys[upper]);
        let t = (time - a.time) / (b.time - a.time);
        Some(a.value + (b.value - a.value) * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_track_has_no_value() {
        assert_eq!(Track::new().sample(1.0), None);
        assert_eq!(Track::new().end_time(), 0.0);
    }

    #[test]
    fn keys_are_sorted_on_insert() {
        let track = Track::from_keys([(2.0, 20.0), (0.0, 0.0), (1.0, 10.0)]);
        let times: Vec<f64> = track.keys().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn same_time_replaces_value() {
        let mut track = Track::from_keys([(1.0, 10.0)]);
        track.insert(1.0, 42.0);
        assert_eq!(track.len(), 1);
        assert_eq!(track.sample(1.0), Some(42.0));
    }

    #[test]
    fn interpolates_linearly_between_keys() {
        let track = Track::from_keys([(0.0, 0.0), (2.0, 360.0)]);
        assert_eq!(track.sample(1.0), Some(180.0));
        assert_eq!(track.sample(0.5), Some(90.0));
    }

    #[test]
    fn holds_ends_outside_the_span() {
        let track = Track::from_keys([(1.0, 5.0), (3.0, 7.0)]);
        assert_eq!(track.sample(-1.0), Some(5.0));
        assert_eq!(track.sample(10.0), Some(7.0));
        assert_eq!(track.end_time(), 3.0);
    }

    #[test]
    fn non_finite_times_are_ignored() {
        let mut track = Track::new();
        track.insert(f64::NAN, 1.0);
        track.insert(f64::INFINITY, 1.0);
        assert!(track.is_empty());
    }
}

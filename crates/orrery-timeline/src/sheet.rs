use std::collections::BTreeMap;
use std::fmt;

use crate::error::TimelineError;
use crate::sequence::{PlaybackOptions, Sequence};
use crate::track::Track;

/// Declaration of one numeric prop.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PropSpec {
    pub default: f64,
    /// Inclusive bounds applied to every sampled value.
    pub range: Option<(f64, f64)>,
}

impl PropSpec {
    pub fn number(default: f64) -> Self {
        Self { default, range: None }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    fn clamp(&self, value: f64) -> f64 {
        match self.range {
            Some((min, max)) => value.clamp(min, max),
            None => value,
        }
    }
}

/// Snapshot of an object's props, keyed by dotted path (`"position.x"`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Values(BTreeMap<String, f64>);

impl Values {
    pub fn get(&self, path: &str) -> Option<f64> {
        self.0.get(path).copied()
    }

    /// Value at `path`, or 0 when the object has no such prop.
    pub fn number(&self, path: &str) -> f64 {
        self.get(path).unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

type Listener = Box<dyn FnMut(&Values)>;

#[derive(Debug, Clone)]
struct Prop {
    spec: PropSpec,
    track: Option<Track>,
}

impl Prop {
    fn value_at(&self, position: f64) -> f64 {
        let raw = self
            .track
            .as_ref()
            .and_then(|track| track.sample(position))
            .unwrap_or(self.spec.default);
        self.spec.clamp(raw)
    }
}

struct SheetObject {
    name: String,
    props: BTreeMap<String, Prop>,
    listeners: Vec<Listener>,
    last: Values,
}

impl SheetObject {
    fn values_at(&self, position: f64) -> Values {
        Values(
            self.props
                .iter()
                .map(|(path, prop)| (path.clone(), prop.value_at(position)))
                .collect(),
        )
    }

    fn prop_mut(&mut self, path: &str) -> Result<&mut Prop, TimelineError> {
        let object = &self.name;
        self.props
            .get_mut(path)
            .ok_or_else(|| TimelineError::UnknownProp {
                object: object.clone(),
                prop: path.to_string(),
            })
    }

    /// Re-evaluates at `position`, notifying listeners when anything changed.
    fn refresh(&mut self, position: f64) {
        let values = self.values_at(position);
        if values == self.last {
            return;
        }
        self.last = values;
        for listener in &mut self.listeners {
            listener(&self.last);
        }
    }
}

/// A set of animated objects sharing one [`Sequence`].
///
/// Objects hold numeric props. A prop without a track keeps its default.
/// Listeners registered with [`on_values_change`](Self::on_values_change)
/// run on the thread that calls [`advance`](Self::advance), and only when an
/// object's values actually change.
#[derive(Default)]
pub struct Sheet {
    name: String,
    objects: Vec<SheetObject>,
    sequence: Sequence,
}

impl fmt::Debug for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sheet")
            .field("name", &self.name)
            .field("objects", &self.objects.iter().map(|o| &o.name).collect::<Vec<_>>())
            .field("sequence", &self.sequence)
            .finish()
    }
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declares an object with the given props.
    pub fn object<'a>(
        &mut self,
        name: &str,
        props: impl IntoIterator<Item = (&'a str, PropSpec)>,
    ) -> Result<(), TimelineError> {
        if self.find(name).is_some() {
            return Err(TimelineError::DuplicateObject(name.to_string()));
        }

        let props = props
            .into_iter()
            .map(|(path, spec)| (path.to_string(), Prop { spec, track: None }))
            .collect();
        let mut object = SheetObject {
            name: name.to_string(),
            props,
            listeners: Vec::new(),
            last: Values::default(),
        };
        object.last = object.values_at(self.sequence.position());
        self.objects.push(object);
        Ok(())
    }

    /// Attaches keyframes to one prop, replacing any previous track.
    pub fn set_track(&mut self, object: &str, prop: &str, track: Track) -> Result<(), TimelineError> {
        let position = self.sequence.position();
        let object = self.object_mut(object)?;
        object.prop_mut(prop)?.track = Some(track);
        object.refresh(position);
        Ok(())
    }

    /// Registers `listener` and calls it once with the current values.
    pub fn on_values_change(
        &mut self,
        object: &str,
        mut listener: impl FnMut(&Values) + 'static,
    ) -> Result<(), TimelineError> {
        let object = self.object_mut(object)?;
        listener(&object.last);
        object.listeners.push(Box::new(listener));
        Ok(())
    }

    /// Number of listeners registered on `object`.
    pub fn listener_count(&self, object: &str) -> usize {
        self.find(object).map_or(0, |i| self.objects[i].listeners.len())
    }

    /// Current values of `object`.
    pub fn values(&self, object: &str) -> Option<&Values> {
        self.find(object).map(|i| &self.objects[i].last)
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Longest track end across all objects, in seconds.
    pub fn length(&self) -> f64 {
        self.objects
            .iter()
            .flat_map(|o| o.props.values())
            .filter_map(|p| p.track.as_ref())
            .map(Track::end_time)
            .fold(0.0, f64::max)
    }

    pub fn play(&mut self, options: PlaybackOptions) -> Result<(), TimelineError> {
        let length = self.length();
        self.sequence.play(options, length)?;
        self.refresh_all();
        Ok(())
    }

    pub fn pause(&mut self) {
        self.sequence.pause();
    }

    pub fn is_playing(&self) -> bool {
        self.sequence.is_playing()
    }

    pub fn position(&self) -> f64 {
        self.sequence.position()
    }

    /// Moves the playhead without playing.
    pub fn seek(&mut self, position: f64) {
        self.sequence.set_position(position);
        self.refresh_all();
    }

    /// Advances playback to host time `timestamp_ms` and notifies listeners.
    ///
    /// Repeated or earlier timestamps do nothing.
    pub fn advance(&mut self, timestamp_ms: f64) {
        if self.sequence.advance(timestamp_ms) {
            self.refresh_all();
        }
    }

    fn refresh_all(&mut self) {
        let position = self.sequence.position();
        for object in &mut self.objects {
            object.refresh(position);
        }
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.objects.iter().position(|o| o.name == name)
    }

    fn object_mut(&mut self, name: &str) -> Result<&mut SheetObject, TimelineError> {
        match self.find(name) {
            Some(i) => Ok(&mut self.objects[i]),
            None => Err(TimelineError::UnknownObject(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Iterations;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Seen = Rc<RefCell<Vec<Values>>>;

    fn spinning_sheet() -> Sheet {
        let mut sheet = Sheet::new("Scene");
        sheet
            .object(
                "Box",
                [
                    ("position.y", PropSpec::number(1.0)),
                    ("rotation.y", PropSpec::number(0.0).with_range(-180.0, 180.0)),
                ],
            )
            .unwrap();
        sheet
            .set_track("Box", "rotation.y", Track::from_keys([(0.0, 0.0), (4.0, 360.0)]))
            .unwrap();
        sheet
    }

    fn listen(sheet: &mut Sheet, object: &str) -> Seen {
        let seen: Seen = Rc::default();
        let sink = seen.clone();
        sheet
            .on_values_change(object, move |v| sink.borrow_mut().push(v.clone()))
            .unwrap();
        seen
    }

    // ── objects & props ───────────────────────────────────────────────────

    #[test]
    fn untracked_props_keep_their_default() {
        let sheet = spinning_sheet();
        let values = sheet.values("Box").unwrap();
        assert_eq!(values.get("position.y"), Some(1.0));
        assert_eq!(values.get("rotation.y"), Some(0.0));
        assert_eq!(values.get("missing"), None);
        assert_eq!(values.number("missing"), 0.0);
    }

    #[test]
    fn duplicate_and_unknown_names_are_errors() {
        let mut sheet = spinning_sheet();
        assert_eq!(
            sheet.object("Box", [("position.y", PropSpec::number(0.0))]),
            Err(TimelineError::DuplicateObject("Box".into()))
        );
        assert_eq!(
            sheet.set_track("Nope", "x", Track::new()),
            Err(TimelineError::UnknownObject("Nope".into()))
        );
        assert_eq!(
            sheet.set_track("Box", "scale", Track::new()),
            Err(TimelineError::UnknownProp { object: "Box".into(), prop: "scale".into() })
        );
    }

    #[test]
    fn length_is_the_longest_track() {
        assert_eq!(spinning_sheet().length(), 4.0);
        assert_eq!(Sheet::new("empty").length(), 0.0);
    }

    // ── listeners ─────────────────────────────────────────────────────────

    #[test]
    fn listener_sees_current_values_on_registration() {
        let mut sheet = spinning_sheet();
        let seen = listen(&mut sheet, "Box");
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].get("position.y"), Some(1.0));
        assert_eq!(sheet.listener_count("Box"), 1);
        assert_eq!(sheet.listener_count("Nope"), 0);
    }

    #[test]
    fn advance_notifies_only_on_change() {
        let mut sheet = spinning_sheet();
        let seen = listen(&mut sheet, "Box");
        sheet
            .play(PlaybackOptions::default().range(0.0, 4.0).iterations(Iterations::Infinite))
            .unwrap();

        sheet.advance(0.0);
        sheet.advance(0.0);
        assert_eq!(seen.borrow().len(), 1);

        sheet.advance(1000.0);
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[1].get("rotation.y"), Some(90.0));

        sheet.advance(1000.0);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn sampled_values_respect_the_prop_range() {
        let mut sheet = spinning_sheet();
        sheet.seek(3.0);
        // 270 degrees clamped to the declared [-180, 180].
        assert_eq!(sheet.values("Box").unwrap().get("rotation.y"), Some(180.0));
    }

    #[test]
    fn paused_sheet_ignores_advances() {
        let mut sheet = spinning_sheet();
        let seen = listen(&mut sheet, "Box");
        sheet.play(PlaybackOptions::default()).unwrap();
        sheet.advance(0.0);
        sheet.pause();
        sheet.advance(2000.0);
        assert!(!sheet.is_playing());
        assert_eq!(sheet.position(), 0.0);
        assert_eq!(seen.borrow().len(), 1);
    }
}

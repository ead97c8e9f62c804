use anyhow::Result;
use glam::Vec3;

use orrery_engine::driver::TimelineDriver;
use orrery_engine::scene::ContainerValues;
use orrery_timeline::{Iterations, PlaybackOptions, PropSpec, Sheet, TimelineError, Track, Values};

use crate::stage::CONTAINER;

/// Loop length of the container animation, in seconds.
pub const LOOP_SECONDS: f64 = 4.0;

const AXES: [&str; 3] = ["x", "y", "z"];

/// The "Scene" sheet with the container object and its keyframes.
///
/// Rotation props are degrees limited to [-180, 180]. Every track ends where
/// it starts so infinite playback loops without a jump.
pub fn scene_sheet() -> Result<Sheet, TimelineError> {
    let mut sheet = Sheet::new("Scene");

    let position = AXES.map(|axis| (format!("position.{axis}"), PropSpec::number(0.0)));
    let rotation = AXES.map(|axis| {
        (
            format!("rotation.{axis}"),
            PropSpec::number(0.0).with_range(-180.0, 180.0),
        )
    });
    sheet.object(
        CONTAINER,
        position
            .iter()
            .chain(rotation.iter())
            .map(|(path, spec)| (path.as_str(), *spec)),
    )?;

    let tracks = [
        ("position.y", Track::from_keys([(0.0, 0.0), (2.0, 2.0), (4.0, 0.0)])),
        ("position.z", Track::from_keys([(0.0, 0.0), (2.0, 20.0), (4.0, 0.0)])),
        ("rotation.x", Track::from_keys([(0.0, 0.0), (1.0, 8.0), (3.0, -8.0), (4.0, 0.0)])),
        ("rotation.y", Track::from_keys([(0.0, 0.0), (2.0, -30.0), (4.0, 0.0)])),
    ];
    for (prop, track) in tracks {
        sheet.set_track(CONTAINER, prop, track)?;
    }

    Ok(sheet)
}

/// Decodes container props into the engine's value record.
pub fn container_values(values: &Values) -> ContainerValues {
    let vec = |prefix: &str| {
        let [x, y, z] = AXES.map(|axis| values.number(&format!("{prefix}.{axis}")) as f32);
        Vec3::new(x, y, z)
    };
    ContainerValues {
        position: vec("position"),
        rotation_degrees: vec("rotation"),
    }
}

/// Drives a sheet's sequence from frame clock timestamps.
#[derive(Debug)]
pub struct SequencePlayer {
    sheet: Sheet,
}

impl SequencePlayer {
    pub fn new(sheet: Sheet) -> Self {
        Self { sheet }
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    pub fn sheet_mut(&mut self) -> &mut Sheet {
        &mut self.sheet
    }

    /// Plays the loop range forever.
    pub fn play_loop(&mut self) -> Result<(), TimelineError> {
        self.sheet.play(
            PlaybackOptions::default()
                .range(0.0, LOOP_SECONDS)
                .iterations(Iterations::Infinite),
        )
    }
}

impl TimelineDriver for SequencePlayer {
    fn advance(&mut self, timestamp: f64) -> Result<()> {
        self.sheet.advance(timestamp);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_declares_all_container_props() {
        let sheet = scene_sheet().unwrap();
        let values = sheet.values(CONTAINER).unwrap();
        assert_eq!(values.iter().count(), 6);
        assert_eq!(sheet.length(), LOOP_SECONDS);
    }

    #[test]
    fn tracks_loop_seamlessly() {
        let mut sheet = scene_sheet().unwrap();
        let start = sheet.values(CONTAINER).unwrap().clone();
        sheet.seek(LOOP_SECONDS);
        assert_eq!(sheet.values(CONTAINER).unwrap(), &start);
    }

    #[test]
    fn values_decode_into_the_container_record() {
        let mut sheet = scene_sheet().unwrap();
        sheet.seek(2.0);
        let decoded = container_values(sheet.values(CONTAINER).unwrap());
        assert_eq!(decoded.position, Vec3::new(0.0, 2.0, 20.0));
        assert_eq!(decoded.rotation_degrees.y, -30.0);
    }

    #[test]
    fn player_advances_the_sequence() {
        let mut player = SequencePlayer::new(scene_sheet().unwrap());
        player.play_loop().unwrap();
        player.advance(100.0).unwrap();
        player.advance(1100.0).unwrap();
        assert_eq!(player.sheet().position(), 1.0);
        assert!(player.sheet().is_playing());
    }
}

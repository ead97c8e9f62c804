//! Keyframe sheets and sequence playback.
//!
//! This crate is intentionally dependency-free so timelines can be authored
//! and tested without pulling in any engine or GPU code.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`track`] | `Track`, `Keyframe`: linear keyframe interpolation |
//! | [`sheet`] | `Sheet`, `PropSpec`, `Values`: animated objects + listeners |
//! | [`sequence`] | `Sequence`, `PlaybackOptions`, `Iterations`: the playhead |
//! | [`error`] | `TimelineError` |
//!
//! # Quick start
//!
//! ```rust
//! use orrery_timeline::{Iterations, PlaybackOptions, PropSpec, Sheet, Track};
//!
//! let mut sheet = Sheet::new("Scene");
//! sheet.object("Box", [("rotation.y", PropSpec::number(0.0))]).unwrap();
//! sheet
//!     .set_track("Box", "rotation.y", Track::from_keys([(0.0, 0.0), (4.0, 360.0)]))
//!     .unwrap();
//!
//! sheet
//!     .play(PlaybackOptions::default().range(0.0, 4.0).iterations(Iterations::Infinite))
//!     .unwrap();
//! sheet.advance(1000.0); // anchors the playback origin
//! sheet.advance(2000.0);
//! assert_eq!(sheet.values("Box").unwrap().get("rotation.y"), Some(90.0));
//! ```

pub mod error;
pub mod sequence;
pub mod sheet;
pub mod track;

pub use error::TimelineError;
pub use sequence::{Iterations, PlaybackOptions, Sequence};
pub use sheet::{PropSpec, Sheet, Values};
pub use track::{Keyframe, Track};

use std::fmt;

/// An error raised while building or playing a sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// An object with this name already exists on the sheet.
    DuplicateObject(String),
    UnknownObject(String),
    UnknownProp { object: String, prop: String },
    /// Playback range with `end < start` or non-finite bounds.
    InvalidRange { start: f64, end: f64 },
    /// Playback rate that is not finite and positive.
    InvalidRate(f64),
}

impl fmt::Display for TimelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimelineError::DuplicateObject(name) => write!(f, "sheet object `{name}` already exists"),
            TimelineError::UnknownObject(name) => write!(f, "no sheet object named `{name}`"),
            TimelineError::UnknownProp { object, prop } => {
                write!(f, "sheet object `{object}` has no prop `{prop}`")
            }
            TimelineError::InvalidRange { start, end } => {
                write!(f, "invalid playback range [{start}, {end}]")
            }
            TimelineError::InvalidRate(rate) => write!(f, "invalid playback rate {rate}"),
        }
    }
}

impl std::error::Error for TimelineError {}

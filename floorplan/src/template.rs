//! Room templates: fixed starter layouts that replace the current scene.

#[cfg(test)]
#[path = "template_test.rs"]
mod template_test;

use std::fmt;
use std::str::FromStr;

/// A named starter layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoomTemplate {
    /// Empty plan; the user places everything.
    #[default]
    Custom,
    Studio,
    OneBedroom,
    TwoBedroom,
}

/// Error for an unrecognized template name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown room template: {0}")]
pub struct UnknownTemplate(pub String);

impl RoomTemplate {
    /// Wire name (`custom`, `studio`, `1br`, `2br`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Custom => "custom",
            Self::Studio => "studio",
            Self::OneBedroom => "1br",
            Self::TwoBedroom => "2br",
        }
    }

    /// Furniture placements as `(type, left, top)`.
    #[must_use]
    pub fn layout(self) -> &'static [(&'static str, f64, f64)] {
        match self {
            Self::Custom => &[],
            Self::Studio => &[("bed", 50.0, 50.0), ("desk", 50.0, 150.0)],
            Self::OneBedroom => &[("bed", 50.0, 50.0), ("sofa", 200.0, 50.0), ("tv", 200.0, 150.0)],
            Self::TwoBedroom => &[
                ("bed", 50.0, 50.0),
                ("bed", 50.0, 150.0),
                ("sofa", 200.0, 100.0),
                ("tv", 200.0, 200.0),
            ],
        }
    }
}

impl fmt::Display for RoomTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomTemplate {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "custom" => Ok(Self::Custom),
            "studio" => Ok(Self::Studio),
            "1br" => Ok(Self::OneBedroom),
            "2br" => Ok(Self::TwoBedroom),
            other => Err(UnknownTemplate(other.to_owned())),
        }
    }
}

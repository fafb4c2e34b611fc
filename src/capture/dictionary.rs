//! Predefined ArUco marker dictionaries selectable from configuration.

use crate::{Error, Result};
use std::{fmt, str::FromStr};

/// Predefined ArUco dictionary, named like `4x4_100` in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerDictionary {
    Dict4x4_50,
    #[default]
    Dict4x4_100,
    Dict4x4_250,
    Dict4x4_1000,
    Dict5x5_50,
    Dict5x5_100,
    Dict5x5_250,
    Dict5x5_1000,
    Dict6x6_50,
    Dict6x6_100,
    Dict6x6_250,
    Dict6x6_1000,
    Dict7x7_50,
    Dict7x7_100,
    Dict7x7_250,
    Dict7x7_1000,
    /// The original ArUco library dictionary (5x5, 1024 markers)
    ArucoOriginal,
}

impl MarkerDictionary {
    /// Every supported dictionary
    pub const ALL: [Self; 17] = [
        Self::Dict4x4_50,
        Self::Dict4x4_100,
        Self::Dict4x4_250,
        Self::Dict4x4_1000,
        Self::Dict5x5_50,
        Self::Dict5x5_100,
        Self::Dict5x5_250,
        Self::Dict5x5_1000,
        Self::Dict6x6_50,
        Self::Dict6x6_100,
        Self::Dict6x6_250,
        Self::Dict6x6_1000,
        Self::Dict7x7_50,
        Self::Dict7x7_100,
        Self::Dict7x7_250,
        Self::Dict7x7_1000,
        Self::ArucoOriginal,
    ];

    /// Configuration name of the dictionary
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Dict4x4_50 => "4x4_50",
            Self::Dict4x4_100 => "4x4_100",
            Self::Dict4x4_250 => "4x4_250",
            Self::Dict4x4_1000 => "4x4_1000",
            Self::Dict5x5_50 => "5x5_50",
            Self::Dict5x5_100 => "5x5_100",
            Self::Dict5x5_250 => "5x5_250",
            Self::Dict5x5_1000 => "5x5_1000",
            Self::Dict6x6_50 => "6x6_50",
            Self::Dict6x6_100 => "6x6_100",
            Self::Dict6x6_250 => "6x6_250",
            Self::Dict6x6_1000 => "6x6_1000",
            Self::Dict7x7_50 => "7x7_50",
            Self::Dict7x7_100 => "7x7_100",
            Self::Dict7x7_250 => "7x7_250",
            Self::Dict7x7_1000 => "7x7_1000",
            Self::ArucoOriginal => "aruco_original",
        }
    }

    /// Number of markers in the dictionary
    #[must_use]
    pub fn size(self) -> u32 {
        match self {
            Self::Dict4x4_50 | Self::Dict5x5_50 | Self::Dict6x6_50 | Self::Dict7x7_50 => 50,
            Self::Dict4x4_100 | Self::Dict5x5_100 | Self::Dict6x6_100 | Self::Dict7x7_100 => 100,
            Self::Dict4x4_250 | Self::Dict5x5_250 | Self::Dict6x6_250 | Self::Dict7x7_250 => 250,
            Self::Dict4x4_1000 | Self::Dict5x5_1000 | Self::Dict6x6_1000 | Self::Dict7x7_1000 => 1000,
            Self::ArucoOriginal => 1024,
        }
    }
}

impl fmt::Display for MarkerDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MarkerDictionary {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        let wanted = wanted.strip_prefix("dict_").unwrap_or(&wanted);
        Self::ALL
            .into_iter()
            .find(|dict| dict.name() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown marker dictionary: {s}")))
    }
}

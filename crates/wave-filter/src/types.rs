//! Filter kinds and serialisable design settings

use crate::butterworth::Butterworth;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of the pass band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Pass below `corner1`
    #[default]
    Lowpass,
    /// Pass above `corner1`
    Highpass,
    /// Pass between `corner1` and `corner2`
    Bandpass,
    /// Reject between `corner1` and `corner2`
    Bandstop,
}

impl FilterType {
    /// Whether the design uses both corner frequencies
    pub fn is_band(self) -> bool {
        matches!(self, FilterType::Bandpass | FilterType::Bandstop)
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterType::Lowpass => write!(f, "Lowpass"),
            FilterType::Highpass => write!(f, "Highpass"),
            FilterType::Bandpass => write!(f, "Bandpass"),
            FilterType::Bandstop => write!(f, "Bandstop"),
        }
    }
}

/// Butterworth parameters as carried in caller configuration
///
/// `corner2` is ignored for lowpass and highpass designs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButterworthSettings {
    pub filter_type: FilterType,
    /// Number of poles of the analog prototype
    pub order: usize,
    /// Corner frequency in Hz (lower corner for band designs)
    pub corner1: f64,
    /// Upper corner frequency in Hz for band designs
    pub corner2: f64,
}

impl Default for ButterworthSettings {
    fn default() -> Self {
        Self {
            filter_type: FilterType::Lowpass,
            order: 4,
            corner1: 1.0,
            corner2: 0.0,
        }
    }
}

impl From<ButterworthSettings> for Butterworth {
    fn from(settings: ButterworthSettings) -> Self {
        Butterworth::new(
            settings.filter_type,
            settings.order,
            settings.corner1,
            settings.corner2,
        )
    }
}

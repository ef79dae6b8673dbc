use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::albums::PayloadStyle;

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserProfile {
    /// Inspects every response and logs what came back.
    #[default]
    Standard,
    /// Fires requests without reading bodies beyond draining them.
    Fast,
    /// Like `fast`, posting a fixed "Test Album" payload.
    Simple,
}

impl UserProfile {
    #[must_use]
    pub const fn inspects_responses(self) -> bool {
        matches!(self, UserProfile::Standard)
    }

    #[must_use]
    pub const fn payload_style(self) -> PayloadStyle {
        match self {
            UserProfile::Standard | UserProfile::Fast => PayloadStyle::Random,
            UserProfile::Simple => PayloadStyle::Fixed,
        }
    }

    /// Logged once when a user starts. `simple` users start silently.
    #[must_use]
    pub const fn start_message(self) -> Option<&'static str> {
        match self {
            UserProfile::Standard => Some("Starting album user simulation"),
            UserProfile::Fast => Some("Starting fast album user simulation"),
            UserProfile::Simple => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            UserProfile::Standard => "standard",
            UserProfile::Fast => "fast",
            UserProfile::Simple => "simple",
        }
    }
}

//! Nightscout entry types.

use serde::{Deserialize, Serialize};

/// One sensor glucose entry from `/api/v1/entries.json`.
///
/// Nightscout entries carry many more fields (`_id`, `date`, `device`, ...);
/// only these two are read, the rest are ignored. The same shape is used as
/// the cache payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Sensor glucose value, in the units the site is configured for.
    pub sgv: i64,

    /// Trend name, e.g. `"Flat"`. May be empty or something unrecognized.
    pub direction: String,
}

impl Reading {
    pub fn new(sgv: i64, direction: impl Into<String>) -> Self {
        Self {
            sgv,
            direction: direction.into(),
        }
    }

    /// The recognized trend, if any.
    pub fn trend(&self) -> Option<Trend> {
        Trend::parse(&self.direction)
    }
}

/// The trend directions Nightscout reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trend {
    DoubleUp,
    SingleUp,
    FortyFiveUp,
    Flat,
    FortyFiveDown,
    SingleDown,
    DoubleDown,
}

impl Trend {
    /// Every trend, steepest rise first.
    pub const ALL: [Trend; 7] = [
        Trend::DoubleUp,
        Trend::SingleUp,
        Trend::FortyFiveUp,
        Trend::Flat,
        Trend::FortyFiveDown,
        Trend::SingleDown,
        Trend::DoubleDown,
    ];

    /// Parse a wire direction name. Case-sensitive; anything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DoubleUp" => Some(Trend::DoubleUp),
            "SingleUp" => Some(Trend::SingleUp),
            "FortyFiveUp" => Some(Trend::FortyFiveUp),
            "Flat" => Some(Trend::Flat),
            "FortyFiveDown" => Some(Trend::FortyFiveDown),
            "SingleDown" => Some(Trend::SingleDown),
            "DoubleDown" => Some(Trend::DoubleDown),
            _ => None,
        }
    }

    /// The wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::DoubleUp => "DoubleUp",
            Trend::SingleUp => "SingleUp",
            Trend::FortyFiveUp => "FortyFiveUp",
            Trend::Flat => "Flat",
            Trend::FortyFiveDown => "FortyFiveDown",
            Trend::SingleDown => "SingleDown",
            Trend::DoubleDown => "DoubleDown",
        }
    }

    /// Property key overriding this trend's icon.
    pub fn icon_property(&self) -> &'static str {
        match self {
            Trend::DoubleUp => "doubleup_icon",
            Trend::SingleUp => "singleup_icon",
            Trend::FortyFiveUp => "fortyfiveup_icon",
            Trend::Flat => "flat_icon",
            Trend::FortyFiveDown => "fortyfivedown_icon",
            Trend::SingleDown => "singledown_icon",
            Trend::DoubleDown => "doubledown_icon",
        }
    }

    /// Built-in icon.
    pub fn default_icon(&self) -> &'static str {
        match self {
            Trend::DoubleUp => "↑↑",
            Trend::SingleUp => "↑",
            Trend::FortyFiveUp => "↗",
            Trend::Flat => "→",
            Trend::FortyFiveDown => "↘",
            Trend::SingleDown => "↓",
            Trend::DoubleDown => "↓↓",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

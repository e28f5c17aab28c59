//! Trend direction → display icon.

use crate::env::Properties;

use super::types::Trend;

/// Icons for each trend, after user overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendIcons {
    double_up: String,
    single_up: String,
    forty_five_up: String,
    flat: String,
    forty_five_down: String,
    single_down: String,
    double_down: String,
}

impl TrendIcons {
    /// Resolve icons from properties, falling back to the built-in ones.
    pub fn from_properties(props: &Properties) -> Self {
        let icon = |trend: Trend| props.get_string(trend.icon_property(), trend.default_icon());

        Self {
            double_up: icon(Trend::DoubleUp),
            single_up: icon(Trend::SingleUp),
            forty_five_up: icon(Trend::FortyFiveUp),
            flat: icon(Trend::Flat),
            forty_five_down: icon(Trend::FortyFiveDown),
            single_down: icon(Trend::SingleDown),
            double_down: icon(Trend::DoubleDown),
        }
    }

    /// The icon for a recognized trend.
    pub fn get(&self, trend: Trend) -> &str {
        match trend {
            Trend::DoubleUp => &self.double_up,
            Trend::SingleUp => &self.single_up,
            Trend::FortyFiveUp => &self.forty_five_up,
            Trend::Flat => &self.flat,
            Trend::FortyFiveDown => &self.forty_five_down,
            Trend::SingleDown => &self.single_down,
            Trend::DoubleDown => &self.double_down,
        }
    }
}

impl Default for TrendIcons {
    fn default() -> Self {
        Self::from_properties(&Properties::new())
    }
}

/// Map a wire direction to its icon; unrecognized or empty maps to `""`.
pub fn map_symbol<'a>(direction: &str, icons: &'a TrendIcons) -> &'a str {
    match Trend::parse(direction) {
        Some(trend) => icons.get(trend),
        None => "",
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical weather condition of a reading.
///
/// Variants are declared in alphabetical order so the derived `Ord` matches
/// the natural ordering of their labels, which the mode tie-break relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeatherCondition {
    Clear,
    Humid,
    Rain,
    Storm,
    Windy,
}

impl WeatherCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::Humid => "Humid",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Storm => "Storm",
            WeatherCondition::Windy => "Windy",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

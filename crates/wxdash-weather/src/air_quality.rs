//! Air-quality index levels and per-pollutant severity bands.

use serde::{Deserialize, Serialize};

use crate::types::PollutantConcentrations;

/// Overall air-quality level derived from the provider's 1..=5 ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AqiLevel {
    Good,
    Moderate,
    UnhealthyForSensitive,
    Unhealthy,
    VeryUnhealthy,
}

impl AqiLevel {
    /// Map the provider ordinal; anything outside 1..=5 reads as the worst level.
    pub fn from_ordinal(aqi: i64) -> Self {
        match aqi {
            1 => Self::Good,
            2 => Self::Moderate,
            3 => Self::UnhealthyForSensitive,
            4 => Self::Unhealthy,
            _ => Self::VeryUnhealthy,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitive => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Good => "Air quality is satisfactory, and air pollution poses little or no risk.",
            Self::Moderate => {
                "Air quality is acceptable. However, there may be a risk for some people."
            }
            Self::UnhealthyForSensitive => {
                "Members of sensitive groups may experience health effects."
            }
            Self::Unhealthy => "Everyone may begin to experience health effects.",
            Self::VeryUnhealthy => {
                "Health warnings of emergency conditions. The entire population is likely to be affected."
            }
        }
    }
}

/// Severity band of a single pollutant concentration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PollutantLevel {
    Good,
    Moderate,
    Unhealthy,
    VeryUnhealthy,
}

impl PollutantLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Moderate => "moderate",
            Self::Unhealthy => "unhealthy",
            Self::VeryUnhealthy => "very unhealthy",
        }
    }
}

/// Pollutants the dashboard reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pollutant {
    Pm2_5,
    Pm10,
    No2,
    O3,
    Co,
}

impl Pollutant {
    /// Display order in the air-quality panel.
    pub const ALL: [Pollutant; 5] = [
        Pollutant::Pm2_5,
        Pollutant::Pm10,
        Pollutant::No2,
        Pollutant::O3,
        Pollutant::Co,
    ];

    /// Provider component key, e.g. `pm2_5`.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Pm2_5 => "pm2_5",
            Self::Pm10 => "pm10",
            Self::No2 => "no2",
            Self::O3 => "o3",
            Self::Co => "co",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pm2_5 => "PM2.5",
            Self::Pm10 => "PM10",
            Self::No2 => "NO₂",
            Self::O3 => "O₃",
            Self::Co => "CO",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    /// Upper bounds (μg/m³) for good, moderate and unhealthy.
    fn breakpoints(&self) -> [f64; 3] {
        match self {
            Self::Pm2_5 => [10.0, 25.0, 50.0],
            Self::Pm10 => [20.0, 50.0, 100.0],
            Self::No2 => [40.0, 100.0, 200.0],
            Self::O3 => [100.0, 160.0, 215.0],
            Self::Co => [4400.0, 9400.0, 12400.0],
        }
    }

    pub fn severity(&self, value: f64) -> PollutantLevel {
        let [good, moderate, unhealthy] = self.breakpoints();
        if value <= good {
            PollutantLevel::Good
        } else if value <= moderate {
            PollutantLevel::Moderate
        } else if value <= unhealthy {
            PollutantLevel::Unhealthy
        } else {
            PollutantLevel::VeryUnhealthy
        }
    }

    pub fn concentration(&self, components: &PollutantConcentrations) -> f64 {
        match self {
            Self::Pm2_5 => components.pm2_5,
            Self::Pm10 => components.pm10,
            Self::No2 => components.no2,
            Self::O3 => components.o3,
            Self::Co => components.co,
        }
    }
}

/// Severity for a provider component key. Unknown keys are reported as good.
pub fn pollutant_severity(key: &str, value: f64) -> PollutantLevel {
    Pollutant::from_key(key)
        .map(|p| p.severity(value))
        .unwrap_or(PollutantLevel::Good)
}

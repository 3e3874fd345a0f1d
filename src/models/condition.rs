//! Discrete weather conditions and their display mapping

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// How widespread or likely a phenomenon is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Coverage {
    Areas,
    Brief,
    Chance,
    Definite,
    Few,
    Frequent,
    Intermittent,
    Isolated,
    Likely,
    Numerous,
    Occasional,
    Patchy,
    Periods,
    Scattered,
    SlightChance,
    Widespread,
    #[default]
    Unspecified,
    #[serde(other)]
    Other,
}

impl Coverage {
    fn label(self) -> Option<&'static str> {
        let label = match self {
            Coverage::Areas => "Areas Of",
            Coverage::Brief => "Brief",
            Coverage::Chance => "Chance",
            Coverage::Definite => "Definite",
            Coverage::Few => "Few",
            Coverage::Frequent => "Frequent",
            Coverage::Intermittent => "Intermittent",
            Coverage::Isolated => "Isolated",
            Coverage::Likely => "Likely",
            Coverage::Numerous => "Numerous",
            Coverage::Occasional => "Occasional",
            Coverage::Patchy => "Patchy",
            Coverage::Periods => "Periods Of",
            Coverage::Scattered => "Scattered",
            Coverage::SlightChance => "Slight Chance",
            Coverage::Widespread => "Widespread",
            Coverage::Unspecified | Coverage::Other => return None,
        };
        Some(label)
    }
}

/// The weather phenomenon itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phenomenon {
    BlowingDust,
    BlowingSand,
    BlowingSnow,
    Drizzle,
    Fog,
    FreezingFog,
    FreezingDrizzle,
    FreezingRain,
    FreezingSpray,
    Frost,
    Hail,
    Haze,
    IceCrystals,
    IceFog,
    Rain,
    RainShowers,
    Sleet,
    Smoke,
    Snow,
    SnowShowers,
    Thunderstorms,
    VolcanicAsh,
    WaterSpouts,
    /// Upstream published an entry with no phenomenon
    #[default]
    NoWeather,
    #[serde(other)]
    Other,
}

impl Phenomenon {
    fn label(self) -> &'static str {
        match self {
            Phenomenon::BlowingDust => "Blowing Dust",
            Phenomenon::BlowingSand => "Blowing Sand",
            Phenomenon::BlowingSnow => "Blowing Snow",
            Phenomenon::Drizzle => "Drizzle",
            Phenomenon::Fog => "Fog",
            Phenomenon::FreezingFog => "Freezing Fog",
            Phenomenon::FreezingDrizzle => "Freezing Drizzle",
            Phenomenon::FreezingRain => "Freezing Rain",
            Phenomenon::FreezingSpray => "Freezing Spray",
            Phenomenon::Frost => "Frost",
            Phenomenon::Hail => "Hail",
            Phenomenon::Haze => "Haze",
            Phenomenon::IceCrystals => "Ice Crystals",
            Phenomenon::IceFog => "Ice Fog",
            Phenomenon::Rain => "Rain",
            Phenomenon::RainShowers => "Rain Showers",
            Phenomenon::Sleet => "Sleet",
            Phenomenon::Smoke => "Smoke",
            Phenomenon::Snow => "Snow",
            Phenomenon::SnowShowers => "Snow Showers",
            Phenomenon::Thunderstorms => "Thunderstorms",
            Phenomenon::VolcanicAsh => "Volcanic Ash",
            Phenomenon::WaterSpouts => "Water Spouts",
            Phenomenon::NoWeather => "No Significant Weather",
            Phenomenon::Other => "Unknown Weather",
        }
    }
}

/// Strength of the phenomenon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    VeryLight,
    Light,
    Moderate,
    Heavy,
    #[default]
    Unspecified,
    #[serde(other)]
    Other,
}

impl Intensity {
    fn label(self) -> Option<&'static str> {
        match self {
            Intensity::VeryLight => Some("Very Light"),
            Intensity::Light => Some("Light"),
            Intensity::Moderate => Some("Moderate"),
            Intensity::Heavy => Some("Heavy"),
            Intensity::Unspecified | Intensity::Other => None,
        }
    }
}

/// Coarse condition code for display frontends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCode {
    Unknown,
    Clear,
    Fog,
    LightRain,
    HeavyRain,
    LightShowers,
    HeavyShowers,
    LightSleet,
    LightSnow,
    HeavySnow,
    Thunderstorm,
}

/// One weather description: coverage, phenomenon and intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Condition {
    pub coverage: Coverage,
    pub phenomenon: Phenomenon,
    pub intensity: Intensity,
}

impl Condition {
    #[must_use]
    pub fn new(coverage: Coverage, phenomenon: Phenomenon, intensity: Intensity) -> Self {
        Self {
            coverage,
            phenomenon,
            intensity,
        }
    }

    /// Human-readable text such as "Chance Light Rain Showers"
    #[must_use]
    pub fn description(&self) -> String {
        if self.phenomenon == Phenomenon::NoWeather {
            return Phenomenon::NoWeather.label().to_string();
        }

        [
            self.coverage.label(),
            self.intensity.label(),
            Some(self.phenomenon.label()),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Map onto the coarse display code
    #[must_use]
    pub fn weather_code(&self) -> WeatherCode {
        let heavy = self.intensity == Intensity::Heavy;
        match self.phenomenon {
            Phenomenon::NoWeather | Phenomenon::Frost => WeatherCode::Clear,
            Phenomenon::Fog
            | Phenomenon::FreezingFog
            | Phenomenon::IceFog
            | Phenomenon::Haze
            | Phenomenon::Smoke
            | Phenomenon::BlowingDust
            | Phenomenon::BlowingSand
            | Phenomenon::VolcanicAsh => WeatherCode::Fog,
            Phenomenon::Drizzle | Phenomenon::Rain if heavy => WeatherCode::HeavyRain,
            Phenomenon::Drizzle | Phenomenon::Rain => WeatherCode::LightRain,
            Phenomenon::RainShowers if heavy => WeatherCode::HeavyShowers,
            Phenomenon::RainShowers => WeatherCode::LightShowers,
            Phenomenon::FreezingRain
            | Phenomenon::FreezingDrizzle
            | Phenomenon::FreezingSpray
            | Phenomenon::Sleet
            | Phenomenon::Hail
            | Phenomenon::IceCrystals => WeatherCode::LightSleet,
            Phenomenon::Snow | Phenomenon::SnowShowers | Phenomenon::BlowingSnow if heavy => {
                WeatherCode::HeavySnow
            }
            Phenomenon::Snow | Phenomenon::SnowShowers | Phenomenon::BlowingSnow => {
                WeatherCode::LightSnow
            }
            Phenomenon::Thunderstorms | Phenomenon::WaterSpouts => WeatherCode::Thunderstorm,
            Phenomenon::Other => WeatherCode::Unknown,
        }
    }
}

/// A condition in force over `[valid_from, valid_from + valid_duration)`
///
/// Several samples may share an interval when the upstream lists more than one
/// phenomenon for it; they keep their input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionSample {
    pub valid_from: DateTime<Utc>,
    pub valid_duration: TimeDelta,
    pub condition: Condition,
}

impl ConditionSample {
    #[must_use]
    pub fn new(valid_from: DateTime<Utc>, valid_duration: TimeDelta, condition: Condition) -> Self {
        Self {
            valid_from,
            valid_duration,
            condition,
        }
    }

    #[must_use]
    pub fn valid_until(&self) -> DateTime<Utc> {
        self.valid_from + self.valid_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description() {
        let condition = Condition::new(Coverage::Chance, Phenomenon::RainShowers, Intensity::Light);
        assert_eq!(condition.description(), "Chance Light Rain Showers");

        let condition = Condition::new(
            Coverage::Unspecified,
            Phenomenon::Thunderstorms,
            Intensity::Unspecified,
        );
        assert_eq!(condition.description(), "Thunderstorms");

        assert_eq!(Condition::default().description(), "No Significant Weather");
    }

    #[test]
    fn test_weather_code() {
        let light = Condition::new(Coverage::Likely, Phenomenon::Rain, Intensity::Light);
        assert_eq!(light.weather_code(), WeatherCode::LightRain);

        let heavy = Condition::new(Coverage::Likely, Phenomenon::Rain, Intensity::Heavy);
        assert_eq!(heavy.weather_code(), WeatherCode::HeavyRain);

        let snow = Condition::new(Coverage::Chance, Phenomenon::SnowShowers, Intensity::Heavy);
        assert_eq!(snow.weather_code(), WeatherCode::HeavySnow);

        assert_eq!(Condition::default().weather_code(), WeatherCode::Clear);
    }

    #[test]
    fn test_deserialize_unknown_values() {
        let coverage: Coverage = serde_json::from_str("\"slight_chance\"").unwrap();
        assert_eq!(coverage, Coverage::SlightChance);

        let phenomenon: Phenomenon = serde_json::from_str("\"space_weather\"").unwrap();
        assert_eq!(phenomenon, Phenomenon::Other);
    }
}

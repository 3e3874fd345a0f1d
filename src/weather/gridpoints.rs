//! Gridpoint document decoding into a [`RawForecastBundle`]

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::fetch_properties;
use super::interval::parse_valid_time;
use crate::error::ForecastError;
use crate::models::{
    Condition, ConditionSample, Coverage, FieldName, GridCell, Intensity, MeasurementSeries,
    Phenomenon, RawForecastBundle, Sample,
};
use crate::transport::Transport;

const CONTEXT: &str = "gridpoint response";
const WEATHER_KEY: &str = "weather";

#[derive(Debug, Deserialize)]
struct SeriesDto {
    uom: Option<String>,
    #[serde(default)]
    values: Vec<ValueDto<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct WeatherDto {
    #[serde(default)]
    values: Vec<ValueDto<Vec<WeatherEntryDto>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueDto<T> {
    valid_time: String,
    value: T,
}

#[derive(Debug, Deserialize)]
struct WeatherEntryDto {
    coverage: Option<Coverage>,
    weather: Option<Phenomenon>,
    intensity: Option<Intensity>,
}

impl From<WeatherEntryDto> for Condition {
    fn from(entry: WeatherEntryDto) -> Self {
        Condition::new(
            entry.coverage.unwrap_or_default(),
            entry.weather.unwrap_or_default(),
            entry.intensity.unwrap_or_default(),
        )
    }
}

/// Fetches and decodes every series published for a grid cell
pub struct SeriesFetcher<'a> {
    transport: &'a dyn Transport,
    base_url: &'a str,
}

impl<'a> SeriesFetcher<'a> {
    #[must_use]
    pub fn new(transport: &'a dyn Transport, base_url: &'a str) -> Self {
        Self {
            transport,
            base_url,
        }
    }

    #[must_use]
    pub fn gridpoint_url(&self, cell: &GridCell) -> String {
        format!("{}/{}", self.base_url, cell.gridpoint_path())
    }

    /// Fetch the gridpoint document for `cell` with a single request
    ///
    /// Fields missing from the document are left out of the bundle. Samples
    /// whose value is null are skipped.
    #[instrument(skip(self), fields(office = %cell.office, x = cell.x, y = cell.y))]
    pub fn fetch(&self, cell: &GridCell) -> crate::Result<RawForecastBundle> {
        let url = self.gridpoint_url(cell);
        let properties = fetch_properties(self.transport, &url, CONTEXT)?;
        let bundle = decode_bundle(cell.clone(), &properties)?;

        info!(
            "Fetched {} series with {} samples and {} condition entries",
            bundle.series.len(),
            bundle.sample_count(),
            bundle.conditions.len()
        );

        Ok(bundle)
    }
}

/// Decode a gridpoint `properties` object
pub fn decode_bundle(cell: GridCell, properties: &Value) -> crate::Result<RawForecastBundle> {
    let mut bundle = RawForecastBundle::new(cell);

    for field in FieldName::ALL {
        match properties.get(field.api_key()) {
            Some(raw) if !raw.is_null() => bundle.insert_series(decode_series(field, raw)?),
            _ => debug!("Field {} not published for this cell", field),
        }
    }

    if let Some(raw) = properties.get(WEATHER_KEY).filter(|v| !v.is_null()) {
        bundle.conditions = decode_conditions(raw)?;
    }

    Ok(bundle)
}

fn decode_series(field: FieldName, raw: &Value) -> crate::Result<MeasurementSeries> {
    let key = field.api_key();
    let dto = SeriesDto::deserialize(raw)
        .map_err(|e| ForecastError::decode(key, e.to_string(), raw.to_string()))?;

    let unit = dto
        .uom
        .ok_or_else(|| ForecastError::decode(key, "series has no unit tag", raw.to_string()))?;

    let mut samples = Vec::with_capacity(dto.values.len());
    let mut skipped = 0usize;

    for entry in dto.values {
        let (valid_from, valid_duration) = parse_valid_time(&entry.valid_time)
            .map_err(|e| ForecastError::decode(key, e.to_string(), entry.valid_time.as_str()))?;

        match entry.value {
            Some(value) => samples.push(Sample::new(valid_from, valid_duration, value)),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("Skipped {} null sample(s) in {}", skipped, field);
    }

    samples.sort_by_key(|s| s.valid_from);
    Ok(MeasurementSeries::new(field, unit, samples))
}

fn decode_conditions(raw: &Value) -> crate::Result<Vec<ConditionSample>> {
    let dto = WeatherDto::deserialize(raw)
        .map_err(|e| ForecastError::decode(WEATHER_KEY, e.to_string(), raw.to_string()))?;

    let mut conditions = Vec::new();

    for entry in dto.values {
        let (valid_from, valid_duration) = parse_valid_time(&entry.valid_time).map_err(|e| {
            ForecastError::decode(WEATHER_KEY, e.to_string(), entry.valid_time.as_str())
        })?;

        // Several phenomena may share one interval; keep their order
        conditions.extend(
            entry
                .value
                .into_iter()
                .map(|w| ConditionSample::new(valid_from, valid_duration, w.into())),
        );
    }

    conditions.sort_by_key(|c| c.valid_from);
    Ok(conditions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};
    use serde_json::json;

    fn cell() -> GridCell {
        GridCell::new("TOP", 32, 81)
    }

    #[test]
    fn test_decode_series_and_skip_nulls() {
        let properties = json!({
            "temperature": {
                "uom": "wmoUnit:degC",
                "values": [
                    {"validTime": "2024-07-04T18:00:00+00:00/PT2H", "value": 25.0},
                    {"validTime": "2024-07-04T20:00:00+00:00/PT1H", "value": null},
                    {"validTime": "2024-07-04T21:00:00+00:00/PT1H", "value": 23.5}
                ]
            }
        });

        let bundle = decode_bundle(cell(), &properties).unwrap();
        let series = &bundle.series[&FieldName::Temperature];

        assert_eq!(series.unit, "wmoUnit:degC");
        assert_eq!(series.samples.len(), 2);
        assert_eq!(
            series.samples[0].valid_from,
            Utc.with_ymd_and_hms(2024, 7, 4, 18, 0, 0).unwrap()
        );
        assert_eq!(series.samples[0].valid_duration, TimeDelta::hours(2));
        assert_eq!(series.samples[1].value, 23.5);
    }

    #[test]
    fn test_missing_fields_are_absent() {
        let properties = json!({
            "windSpeed": {"uom": "wmoUnit:km_h-1", "values": []},
            "windGust": null
        });

        let bundle = decode_bundle(cell(), &properties).unwrap();
        assert_eq!(bundle.series.len(), 1);
        assert!(bundle.series.contains_key(&FieldName::WindSpeed));
        assert!(!bundle.series.contains_key(&FieldName::WindGust));
        assert!(bundle.conditions.is_empty());
    }

    #[test]
    fn test_malformed_valid_time_names_field() {
        let properties = json!({
            "dewpoint": {
                "uom": "wmoUnit:degC",
                "values": [{"validTime": "2024-07-04T18:00:00+00:00/1H", "value": 10.0}]
            }
        });

        match decode_bundle(cell(), &properties).unwrap_err() {
            ForecastError::Decode { context, raw, .. } => {
                assert_eq!(context, "dewpoint");
                assert_eq!(raw, "2024-07-04T18:00:00+00:00/1H");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_overflowing_duration_is_decode_error() {
        let token = "2024-07-04T18:00:00+00:00/P100000000D";
        let properties = json!({
            "temperature": {
                "uom": "wmoUnit:degC",
                "values": [{"validTime": token, "value": 20.0}]
            }
        });

        match decode_bundle(cell(), &properties).unwrap_err() {
            ForecastError::Decode { context, raw, .. } => {
                assert_eq!(context, "temperature");
                assert_eq!(raw, token);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_series_without_unit_is_decode_error() {
        let properties = json!({
            "temperature": {"values": [{"validTime": "2024-07-04T18:00:00+00:00/PT1H", "value": 1.0}]}
        });
        assert!(matches!(
            decode_bundle(cell(), &properties),
            Err(ForecastError::Decode { .. })
        ));
    }

    #[test]
    fn test_multiple_phenomena_share_interval_in_order() {
        let properties = json!({
            "weather": {
                "values": [
                    {
                        "validTime": "2024-07-04T18:00:00+00:00/PT6H",
                        "value": [
                            {"coverage": "chance", "weather": "thunderstorms", "intensity": null},
                            {"coverage": "likely", "weather": "rain_showers", "intensity": "light"}
                        ]
                    },
                    {
                        "validTime": "2024-07-05T00:00:00+00:00/PT6H",
                        "value": [{"coverage": null, "weather": null, "intensity": null}]
                    }
                ]
            }
        });

        let bundle = decode_bundle(cell(), &properties).unwrap();
        assert_eq!(bundle.conditions.len(), 3);

        let first = &bundle.conditions[0];
        let second = &bundle.conditions[1];
        assert_eq!(first.valid_from, second.valid_from);
        assert_eq!(first.valid_duration, second.valid_duration);
        assert_eq!(first.condition.phenomenon, Phenomenon::Thunderstorms);
        assert_eq!(second.condition.coverage, Coverage::Likely);
        assert_eq!(second.condition.intensity, Intensity::Light);

        assert_eq!(bundle.conditions[2].condition, Condition::default());
    }
}

//! Timeline normalization
//!
//! Merges every measurement series and the condition list of a
//! [`RawForecastBundle`] onto one ordered sequence of [`ForecastPeriod`]s.
//!
//! The timeline spans from the earliest sample start to the latest sample end,
//! numeric and condition samples alike. Periods are aligned to the span start,
//! not to wall-clock boundaries, and the last period is cut at the span end so
//! the periods cover the span exactly.
//!
//! Per period and field:
//! - most fields take the overlap-weighted mean of the intersecting samples,
//!   which is the sample's own value when a single sample covers the period
//! - wind direction takes the overlap-weighted circular mean
//! - precipitation amount sums each sample's share of its accumulation
//! - the condition is the sample with the greatest overlap, first one on ties
//!
//! A field without intersecting samples stays `None`.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, instrument};

use crate::models::{
    ConditionSample, FieldName, ForecastPeriod, Granularity, RawForecastBundle, Sample,
};
use crate::units::{UnitConversion, canonicalize};

/// How samples of a field are combined inside one period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Aggregation {
    Mean,
    CircularMean,
    Accumulation,
}

impl Aggregation {
    fn for_field(field: FieldName) -> Self {
        match field {
            FieldName::WindDirection => Aggregation::CircularMean,
            FieldName::QuantitativePrecipitation => Aggregation::Accumulation,
            _ => Aggregation::Mean,
        }
    }
}

/// Normalizer bound to one output granularity
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineNormalizer {
    granularity: Granularity,
}

impl TimelineNormalizer {
    #[must_use]
    pub fn new(granularity: Granularity) -> Self {
        Self { granularity }
    }

    #[must_use]
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Merge `bundle` into aligned periods
    ///
    /// Fails with a unit error when a series carries a unit tag that is unknown
    /// or does not fit its field. An empty bundle yields no periods.
    #[instrument(skip_all, fields(granularity = %self.granularity, office = %bundle.cell.office))]
    pub fn normalize(&self, bundle: &RawForecastBundle) -> crate::Result<Vec<ForecastPeriod>> {
        let series = bundle
            .series
            .values()
            .map(|s| {
                canonicalize(s.field, &s.unit)
                    .map(|conversion| (s.field, conversion, s.samples.as_slice()))
            })
            .collect::<crate::Result<Vec<_>>>()?;

        let Some((span_start, span_end)) = timeline_span(bundle) else {
            debug!("Bundle holds no samples, timeline is empty");
            return Ok(Vec::new());
        };

        let mut periods = partition(span_start, span_end, self.granularity.period_length());

        for period in &mut periods {
            for &(field, conversion, samples) in &series {
                let value = aggregate(
                    Aggregation::for_field(field),
                    conversion,
                    samples,
                    period.start,
                    period.end,
                );
                set_field(period, field, value);
            }

            period.set_condition(
                dominant_condition(&bundle.conditions, period.start, period.end)
                    .map(|sample| sample.condition),
            );
        }

        debug!(
            "Normalized {} series into {} period(s) from {} to {}",
            series.len(),
            periods.len(),
            span_start,
            span_end
        );

        Ok(periods)
    }
}

/// Merge `bundle` into periods of the given granularity
pub fn normalize(
    bundle: &RawForecastBundle,
    granularity: Granularity,
) -> crate::Result<Vec<ForecastPeriod>> {
    TimelineNormalizer::new(granularity).normalize(bundle)
}

fn timeline_span(bundle: &RawForecastBundle) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let numeric = bundle
        .series
        .values()
        .flat_map(|s| s.samples.iter())
        .map(|s| (s.valid_from, s.valid_until()));
    let conditions = bundle
        .conditions
        .iter()
        .map(|c| (c.valid_from, c.valid_until()));

    numeric
        .chain(conditions)
        .reduce(|(start, end), (from, until)| (start.min(from), end.max(until)))
        .filter(|(start, end)| start < end)
}

fn partition(start: DateTime<Utc>, end: DateTime<Utc>, length: TimeDelta) -> Vec<ForecastPeriod> {
    let mut periods = Vec::new();
    let mut cursor = start;

    while cursor < end {
        let next = cursor.checked_add_signed(length).map_or(end, |next| next.min(end));
        periods.push(ForecastPeriod::new(cursor, next));
        cursor = next;
    }

    periods
}

/// Length of the intersection of `[a_start, a_end)` and `[b_start, b_end)` in seconds
fn overlap_seconds(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> f64 {
    let overlap = a_end.min(b_end) - a_start.max(b_start);
    if overlap <= TimeDelta::zero() {
        return 0.0;
    }
    overlap.num_milliseconds() as f64 / 1000.0
}

fn aggregate(
    aggregation: Aggregation,
    conversion: UnitConversion,
    samples: &[Sample],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Option<f64> {
    let weighted: Vec<(f64, f64)> = samples
        .iter()
        .filter_map(|s| {
            let weight = overlap_seconds(start, end, s.valid_from, s.valid_until());
            (weight > 0.0).then(|| (conversion.apply(s.value), weight))
        })
        .collect();

    if weighted.is_empty() {
        return None;
    }

    let total: f64 = weighted.iter().map(|(_, w)| w).sum();

    let value = match aggregation {
        Aggregation::Mean => weighted.iter().map(|(v, w)| v * (w / total)).sum(),
        Aggregation::CircularMean => circular_mean(&weighted),
        Aggregation::Accumulation => samples
            .iter()
            .filter_map(|s| {
                let weight = overlap_seconds(start, end, s.valid_from, s.valid_until());
                let length = s.valid_duration.num_milliseconds() as f64 / 1000.0;
                (weight > 0.0).then(|| conversion.apply(s.value) * (weight / length))
            })
            .sum(),
    };

    Some(value)
}

/// Weighted mean of compass directions in degrees, within `[0, 360)`
///
/// Falls back to the heaviest direction when the vectors cancel out.
fn circular_mean(weighted: &[(f64, f64)]) -> f64 {
    if let [(direction, _)] = weighted {
        return *direction;
    }

    let (sin, cos) = weighted.iter().fold((0.0_f64, 0.0_f64), |(sin, cos), (deg, w)| {
        let rad = deg.to_radians();
        (sin + w * rad.sin(), cos + w * rad.cos())
    });

    if sin.hypot(cos) < 1e-9 {
        let mut heaviest = weighted[0];
        for &candidate in &weighted[1..] {
            if candidate.1 > heaviest.1 {
                heaviest = candidate;
            }
        }
        return heaviest.0;
    }

    let mean = sin.atan2(cos).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative angles
    if mean >= 360.0 { 0.0 } else { mean }
}

fn dominant_condition(
    conditions: &[ConditionSample],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Option<&ConditionSample> {
    let mut best: Option<(&ConditionSample, f64)> = None;

    for sample in conditions {
        let overlap = overlap_seconds(start, end, sample.valid_from, sample.valid_until());
        if overlap <= 0.0 {
            continue;
        }
        match best {
            Some((_, best_overlap)) if overlap <= best_overlap => {}
            _ => best = Some((sample, overlap)),
        }
    }

    best.map(|(sample, _)| sample)
}

fn set_field(period: &mut ForecastPeriod, field: FieldName, value: Option<f64>) {
    let slot = match field {
        FieldName::Temperature => &mut period.temperature,
        FieldName::Dewpoint => &mut period.dewpoint,
        FieldName::RelativeHumidity => &mut period.humidity,
        FieldName::ApparentTemperature => &mut period.feels_like,
        FieldName::WindDirection => &mut period.wind_direction,
        FieldName::WindSpeed => &mut period.wind_speed,
        FieldName::WindGust => &mut period.wind_gust,
        FieldName::ProbabilityOfPrecipitation => &mut period.precip_probability,
        FieldName::QuantitativePrecipitation => &mut period.precip_amount,
        FieldName::Visibility => &mut period.visibility,
    };
    *slot = value;
}

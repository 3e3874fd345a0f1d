//! Day grouping of normalized periods
//!
//! Periods are bucketed by the UTC calendar date of their start instant. A
//! period crossing midnight stays in the day it starts in.

use chrono::NaiveDate;
use sunrise::{Coordinates, SolarDay, SolarEvent};
use tracing::{debug, instrument};

use crate::error::ForecastError;
use crate::models::{Astronomy, Coordinate, Forecast, ForecastDay, ForecastPeriod};

/// Sunrise and sunset for `date` at `location`
///
/// Both are `None` when the sun does not rise or set that day.
#[must_use]
pub fn astronomy(location: &Coordinate, date: NaiveDate) -> Astronomy {
    let Some(coordinates) = Coordinates::new(location.latitude(), location.longitude()) else {
        return Astronomy {
            sunrise: None,
            sunset: None,
        };
    };

    let solar_day = SolarDay::new(coordinates, date);

    Astronomy {
        sunrise: solar_day.event_time(SolarEvent::Sunrise),
        sunset: solar_day.event_time(SolarEvent::Sunset),
    }
}

/// Group `periods` into at most `num_days` days and attach `location` unchanged
///
/// Days are never fabricated: fewer days than requested are returned as they
/// are, but having no day at all while at least one was requested is an
/// insufficient data error. `num_days == 0` yields a forecast without days.
#[instrument(skip(periods), fields(periods = periods.len()))]
pub fn assemble(
    periods: Vec<ForecastPeriod>,
    location: Coordinate,
    num_days: usize,
) -> crate::Result<Forecast> {
    let mut days: Vec<ForecastDay> = Vec::new();

    for period in periods {
        let date = period.start.date_naive();

        match days.last_mut() {
            Some(day) if day.date == date => day.periods.push(period),
            _ => {
                if days.len() == num_days {
                    break;
                }
                days.push(ForecastDay {
                    date,
                    astronomy: astronomy(&location, date),
                    periods: vec![period],
                });
            }
        }
    }

    if num_days >= 1 && days.is_empty() {
        return Err(ForecastError::InsufficientData {
            requested: num_days,
            available: 0,
        });
    }

    if days.len() < num_days {
        debug!("Only {} of {} requested day(s) available", days.len(), num_days);
    }

    Ok(Forecast { location, days })
}

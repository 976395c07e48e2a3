//! Point fixes for known reporting glitches
//!
//! Each [`Correction`] targets specific places and dates. A correction that
//! cannot be applied to the data at hand is skipped with a reason instead of
//! failing the run.

use crate::app::models::{Metric, Place, PlaceKey};
use crate::constants::{FRANCE_MISATTRIBUTION_DATE, HUBEI_DEATH_REVISION_DATE};
use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A known defect in the published data and how to undo it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Correction {
    /// On `date` the counts of `correct` were published under `recorded`.
    /// `correct` takes the published values for that day and `recorded`
    /// repeats its own previous-day values.
    Misattribution {
        date: NaiveDate,
        correct: PlaceKey,
        recorded: PlaceKey,
    },

    /// On `date` a place revised `metric` upwards without back-filling.
    /// Every earlier value is scaled by `v[date] / v[date - 1]`.
    Rescale {
        place: PlaceKey,
        date: NaiveDate,
        #[serde(default = "default_rescale_metric")]
        metric: Metric,
    },
}

fn default_rescale_metric() -> Metric {
    Metric::Deaths
}

/// What happened when a correction was applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectionOutcome {
    Applied,
    Skipped(String),
}

fn constant_date((year, month, day): (i32, u32, u32)) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

impl Correction {
    /// France reported as French Polynesia, and the Hubei death revision
    pub fn defaults() -> Vec<Self> {
        let mut corrections = Vec::new();
        if let Some(date) = constant_date(FRANCE_MISATTRIBUTION_DATE) {
            corrections.push(Correction::Misattribution {
                date,
                correct: PlaceKey::country_level("France"),
                recorded: PlaceKey::province_level("France", "French Polynesia"),
            });
        }
        if let Some(date) = constant_date(HUBEI_DEATH_REVISION_DATE) {
            corrections.push(Correction::Rescale {
                place: PlaceKey::province_level("China", "Hubei"),
                date,
                metric: Metric::Deaths,
            });
        }
        corrections
    }

    /// Apply the correction to the place map
    ///
    /// # Errors
    /// Only on internal series inconsistencies; data that does not fit the
    /// correction yields `CorrectionOutcome::Skipped`.
    pub fn apply(&self, places: &mut BTreeMap<PlaceKey, Place>) -> Result<CorrectionOutcome> {
        match self {
            Correction::Misattribution {
                date,
                correct,
                recorded,
            } => correct_misattribution(places, *date, correct, recorded),
            Correction::Rescale {
                place,
                date,
                metric,
            } => rescale_before(places, place, *date, *metric),
        }
    }
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Correction::Misattribution {
                date,
                correct,
                recorded,
            } => write!(
                f,
                "misattribution on {}: {} recorded as {}",
                date, correct, recorded
            ),
            Correction::Rescale {
                place,
                date,
                metric,
            } => write!(f, "rescale {} of {} before {}", metric, place, date),
        }
    }
}

/// Previous day of `date` when both days fall inside `place`'s series
fn previous_day_in_range(place: &Place, date: NaiveDate) -> Option<NaiveDate> {
    let previous = date.pred_opt()?;
    let series = place.series(Metric::Confirmed);
    (series.date_to_position(previous).is_ok() && series.date_to_position(date).is_ok())
        .then_some(previous)
}

fn correct_misattribution(
    places: &mut BTreeMap<PlaceKey, Place>,
    date: NaiveDate,
    correct: &PlaceKey,
    recorded: &PlaceKey,
) -> Result<CorrectionOutcome> {
    if correct == recorded {
        return Ok(CorrectionOutcome::Skipped(format!(
            "{} is both the correct and the recorded place",
            correct
        )));
    }
    if !places.contains_key(correct) {
        return Ok(CorrectionOutcome::Skipped(format!("no place {}", correct)));
    }
    let Some(recorded_place) = places.get(recorded) else {
        return Ok(CorrectionOutcome::Skipped(format!("no place {}", recorded)));
    };
    let Some(previous) = previous_day_in_range(recorded_place, date) else {
        return Ok(CorrectionOutcome::Skipped(format!(
            "{} or the day before is outside the date range",
            date
        )));
    };

    let mut published = Vec::with_capacity(Metric::ALL.len());
    for metric in Metric::ALL {
        let series = recorded_place.series(metric);
        published.push((metric, *series.get(date)?, *series.get(previous)?));
    }

    if let Some(place) = places.get_mut(correct) {
        for (metric, on_date, _) in &published {
            place.series_mut(*metric).set(date, *on_date)?;
        }
    }
    if let Some(place) = places.get_mut(recorded) {
        for (metric, _, day_before) in &published {
            place.series_mut(*metric).set(date, *day_before)?;
        }
    }

    Ok(CorrectionOutcome::Applied)
}

fn rescale_before(
    places: &mut BTreeMap<PlaceKey, Place>,
    key: &PlaceKey,
    date: NaiveDate,
    metric: Metric,
) -> Result<CorrectionOutcome> {
    let Some(place) = places.get_mut(key) else {
        return Ok(CorrectionOutcome::Skipped(format!("no place {}", key)));
    };
    let Some(previous) = previous_day_in_range(place, date) else {
        return Ok(CorrectionOutcome::Skipped(format!(
            "{} or the day before is outside the date range",
            date
        )));
    };

    let series = place.series_mut(metric);
    let revised = *series.get(date)?;
    let before_revision = *series.get(previous)?;
    if before_revision == 0 {
        return Ok(CorrectionOutcome::Skipped(format!(
            "{} of {} on {} is zero",
            metric, key, previous
        )));
    }

    // Exact rational scaling; integer division truncates toward zero
    for value in series.before_mut(date)? {
        let scaled = i128::from(*value) * i128::from(revised) / i128::from(before_revision);
        *value = i64::try_from(scaled).unwrap_or(if scaled < 0 { i64::MIN } else { i64::MAX });
    }

    Ok(CorrectionOutcome::Applied)
}

//! Dense, date-indexed time series
//!
//! A [`TimeSeries`] stores one value per calendar day starting at a fixed
//! date. Position `i` always corresponds to `start_date + i` days, so a
//! series never has gaps and its length is decided at construction.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::ops::Add;

/// Errors raised when addressing or combining time series
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeSeriesError {
    /// The date lies before the start or past the end of the series
    #[error("Date {date} is outside the series starting {start} with {len} values")]
    OutOfRange {
        date: NaiveDate,
        start: NaiveDate,
        len: usize,
    },

    /// Two series with different start dates or lengths were combined
    #[error(
        "Cannot combine series starting {left_start} ({left_len} values) with series starting {right_start} ({right_len} values)"
    )]
    ShapeMismatch {
        left_start: NaiveDate,
        left_len: usize,
        right_start: NaiveDate,
        right_len: usize,
    },

    /// A date range whose last day precedes its first day
    #[error("Invalid date range: {start} is after {last}")]
    InvalidRange { start: NaiveDate, last: NaiveDate },
}

/// Inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    last: NaiveDate,
}

impl DateRange {
    /// Create a range covering `start` through `last`, both included
    pub fn inclusive(start: NaiveDate, last: NaiveDate) -> Result<Self, TimeSeriesError> {
        if last < start {
            return Err(TimeSeriesError::InvalidRange { start, last });
        }
        Ok(Self { start, last })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn last(&self) -> NaiveDate {
        self.last
    }

    /// Number of days in the range
    pub fn len(&self) -> usize {
        (self.last - self.start).num_days() as usize + 1
    }

    /// A valid range always holds at least one day
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.last
    }

    /// Iterate over every date in the range in order
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take(self.len())
    }
}

/// Sequence of values, one per calendar day, from a fixed start date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries<T> {
    start_date: NaiveDate,
    values: Vec<T>,
}

impl<T> TimeSeries<T> {
    /// Create a series from a start date and its values
    pub fn new(start_date: NaiveDate, values: Vec<T>) -> Self {
        Self { start_date, values }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Date of the final value, if any
    pub fn end_date(&self) -> Option<NaiveDate> {
        let len = self.values.len() as u64;
        if len == 0 {
            return None;
        }
        self.start_date.checked_add_days(Days::new(len - 1))
    }

    /// Every date covered by the series, in order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date.iter_days().take(self.values.len())
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Zero-based offset of `date` from the start date
    pub fn date_to_position(&self, date: NaiveDate) -> Result<usize, TimeSeriesError> {
        let offset = (date - self.start_date).num_days();
        if offset < 0 || offset as usize >= self.values.len() {
            return Err(self.out_of_range(date));
        }
        Ok(offset as usize)
    }

    pub fn get(&self, date: NaiveDate) -> Result<&T, TimeSeriesError> {
        let position = self.date_to_position(date)?;
        Ok(&self.values[position])
    }

    pub fn set(&mut self, date: NaiveDate, value: T) -> Result<(), TimeSeriesError> {
        let position = self.date_to_position(date)?;
        self.values[position] = value;
        Ok(())
    }

    /// Values strictly before `date`
    pub fn before(&self, date: NaiveDate) -> Result<&[T], TimeSeriesError> {
        let position = self.date_to_position(date)?;
        Ok(&self.values[..position])
    }

    /// Mutable view of the values strictly before `date`
    pub fn before_mut(&mut self, date: NaiveDate) -> Result<&mut [T], TimeSeriesError> {
        let position = self.date_to_position(date)?;
        Ok(&mut self.values[..position])
    }

    /// Values at and after `date`
    pub fn since(&self, date: NaiveDate) -> Result<&[T], TimeSeriesError> {
        let position = self.date_to_position(date)?;
        Ok(&self.values[position..])
    }

    fn out_of_range(&self, date: NaiveDate) -> TimeSeriesError {
        TimeSeriesError::OutOfRange {
            date,
            start: self.start_date,
            len: self.values.len(),
        }
    }

    fn check_shape<U>(&self, other: &TimeSeries<U>) -> Result<(), TimeSeriesError> {
        if self.start_date != other.start_date || self.values.len() != other.values.len() {
            return Err(TimeSeriesError::ShapeMismatch {
                left_start: self.start_date,
                left_len: self.values.len(),
                right_start: other.start_date,
                right_len: other.values.len(),
            });
        }
        Ok(())
    }
}

impl<T: Clone> TimeSeries<T> {
    /// Create a series covering `range` with every value set to `value`
    pub fn filled(range: &DateRange, value: T) -> Self {
        Self {
            start_date: range.start(),
            values: vec![value; range.len()],
        }
    }
}

impl<T: Clone + Default> TimeSeries<T> {
    /// Create a default-valued (zero for numbers) series covering `range`
    pub fn zeros(range: &DateRange) -> Self {
        Self::filled(range, T::default())
    }
}

impl<T: Copy + Add<Output = T>> TimeSeries<T> {
    /// Add `other` element-wise into this series
    pub fn accumulate(&mut self, other: &TimeSeries<T>) -> Result<(), TimeSeriesError> {
        self.check_shape(other)?;
        for (value, addend) in self.values.iter_mut().zip(&other.values) {
            *value = *value + *addend;
        }
        Ok(())
    }

    /// Element-wise sum of two series of the same shape
    pub fn try_add(&self, other: &TimeSeries<T>) -> Result<TimeSeries<T>, TimeSeriesError> {
        let mut sum = self.clone();
        sum.accumulate(other)?;
        Ok(sum)
    }
}

impl TimeSeries<i64> {
    /// Sum of all values
    pub fn total(&self) -> i64 {
        self.values.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(start: NaiveDate, last: NaiveDate) -> DateRange {
        DateRange::inclusive(start, last).unwrap()
    }

    #[test]
    fn test_date_range_inclusive() {
        let r = range(date(2020, 2, 27), date(2020, 3, 2));
        assert_eq!(r.len(), 5); // leap year
        let dates: Vec<_> = r.iter().collect();
        assert_eq!(dates.first(), Some(&date(2020, 2, 27)));
        assert_eq!(dates.last(), Some(&date(2020, 3, 2)));
        assert!(r.contains(date(2020, 2, 29)));
        assert!(!r.contains(date(2020, 3, 3)));
    }

    #[test]
    fn test_date_range_rejects_reversed() {
        let result = DateRange::inclusive(date(2020, 3, 2), date(2020, 3, 1));
        assert!(matches!(result, Err(TimeSeriesError::InvalidRange { .. })));
    }

    #[test]
    fn test_set_then_get_by_position() {
        let r = range(date(2020, 1, 22), date(2020, 2, 5));
        let mut series: TimeSeries<i64> = TimeSeries::zeros(&r);

        for (i, d) in r.iter().enumerate() {
            series.set(d, (i as i64) * 3).unwrap();
        }
        for d in r.iter() {
            let position = series.date_to_position(d).unwrap();
            assert_eq!(series.values()[position], *series.get(d).unwrap());
        }
        assert_eq!(*series.get(date(2020, 1, 25)).unwrap(), 9);
    }

    #[test]
    fn test_out_of_range_dates_fail() {
        let r = range(date(2020, 1, 22), date(2020, 1, 24));
        let mut series: TimeSeries<i64> = TimeSeries::zeros(&r);

        for bad in [date(2020, 1, 21), date(2020, 1, 25), date(2019, 12, 31)] {
            assert!(matches!(
                series.date_to_position(bad),
                Err(TimeSeriesError::OutOfRange { .. })
            ));
            assert!(series.get(bad).is_err());
            assert!(series.set(bad, 1).is_err());
        }
        assert_eq!(series.values(), &[0, 0, 0]);
    }

    #[test]
    fn test_accumulate_adds_pairwise() {
        let start = date(2020, 3, 1);
        let mut a = TimeSeries::new(start, vec![1_i64, 2, 3]);
        let b = TimeSeries::new(start, vec![10_i64, 20, 30]);

        let sum = a.try_add(&b).unwrap();
        assert_eq!(sum.values(), &[11, 22, 33]);

        a.accumulate(&b).unwrap();
        assert_eq!(a, sum);
    }

    #[test]
    fn test_accumulate_shape_mismatch() {
        let mut a = TimeSeries::new(date(2020, 3, 1), vec![1_i64, 2, 3]);
        let shifted = TimeSeries::new(date(2020, 3, 2), vec![1_i64, 2, 3]);
        let shorter = TimeSeries::new(date(2020, 3, 1), vec![1_i64, 2]);

        assert!(matches!(
            a.accumulate(&shifted),
            Err(TimeSeriesError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            a.try_add(&shorter),
            Err(TimeSeriesError::ShapeMismatch { .. })
        ));
        assert_eq!(a.values(), &[1, 2, 3]);
    }

    #[test]
    fn test_slices_split_at_date() {
        let series = TimeSeries::new(date(2020, 4, 15), vec![1_i64, 2, 3, 4]);
        let pivot = date(2020, 4, 17);

        assert_eq!(series.before(pivot).unwrap(), &[1, 2]);
        assert_eq!(series.since(pivot).unwrap(), &[3, 4]);
        assert!(series.before(date(2020, 4, 30)).is_err());
    }

    #[test]
    fn test_end_date_and_total() {
        let series = TimeSeries::new(date(2020, 12, 30), vec![5_i64, 6, 7]);
        assert_eq!(series.end_date(), Some(date(2021, 1, 1)));
        assert_eq!(series.total(), 18);

        let empty: TimeSeries<i64> = TimeSeries::new(date(2020, 1, 1), Vec::new());
        assert_eq!(empty.end_date(), None);
        assert!(empty.is_empty());
    }
}

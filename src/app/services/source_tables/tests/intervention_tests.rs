//! Tests for the intervention table

use super::interventions_csv;
use crate::Error;
use crate::app::models::PlaceKey;
use crate::app::services::source_tables::InterventionTable;
use crate::app::services::source_tables::interventions::carry_forward;
use chrono::NaiveDate;

#[test]
fn test_carry_forward_fills_blanks() {
    assert_eq!(
        carry_forward(["Lockdown", "", "Reopened"]),
        vec!["Lockdown", "Lockdown", "Reopened"]
    );
    assert_eq!(
        carry_forward(["", "School Closure", ""]),
        vec!["No Intervention", "School Closure", "School Closure"]
    );
}

#[test]
fn test_intervention_rows() {
    let table = InterventionTable::parse(interventions_csv()).unwrap();

    assert_eq!(table.start_date(), NaiveDate::from_ymd_opt(2020, 3, 1).unwrap());
    assert_eq!(table.days(), 3);
    assert_eq!(table.len(), 2);

    let (key, italy) = &table.entries()[0];
    assert_eq!(key, &PlaceKey::country_level("Italy"));
    assert_eq!(italy.values(), &["Lockdown", "Lockdown", "Reopened"]);
}

#[test]
fn test_date_columns_are_sorted_and_mixed_formats_accepted() {
    let table = InterventionTable::parse(
        "3/3/20,Country/Region,2020-03-01,Province/State,3/2/2020\n\
         C,Spain,A,,B\n",
    )
    .unwrap();

    let (_, spain) = &table.entries()[0];
    assert_eq!(spain.values(), &["A", "B", "C"]);
}

#[test]
fn test_gap_in_date_columns_is_fatal() {
    let result = InterventionTable::parse(
        "Country/Region,Province/State,2020-03-01,2020-03-03\nItaly,,A,B\n",
    );
    match result {
        Err(Error::NonConsecutiveDates { previous, next }) => {
            assert_eq!(previous, NaiveDate::from_ymd_opt(2020, 3, 1).unwrap());
            assert_eq!(next, NaiveDate::from_ymd_opt(2020, 3, 3).unwrap());
        }
        other => panic!("expected NonConsecutiveDates, got {:?}", other),
    }
}

#[test]
fn test_duplicate_row_is_fatal() {
    let result = InterventionTable::parse(
        "Country/Region,Province/State,2020-03-01\nItaly,,A\nItaly,,B\n",
    );
    assert!(matches!(
        result,
        Err(Error::DuplicateInterventionRow { .. })
    ));
}

#[test]
fn test_table_without_dates_is_rejected() {
    let result = InterventionTable::parse("Country/Region,Province/State\nItaly,\n");
    assert!(matches!(result, Err(Error::DataValidation { .. })));
}

#[test]
fn test_unknown_sentinel_matches_table_dates() {
    let table = InterventionTable::parse(interventions_csv()).unwrap();
    let sentinel = table.unknown_sentinel();

    assert_eq!(sentinel.start_date(), table.start_date());
    assert_eq!(sentinel.len(), 3);
    assert!(sentinel.values().iter().all(|v| v == "Unknown"));
}

//! Test fixtures for source table parsing

mod intervention_tests;

/// Daily report in the early (January to March 2020) column layout
pub fn early_report_csv() -> &'static str {
    "\u{feff}Province/State,Country/Region,Last Update,Confirmed,Deaths,Recovered\n\
     Hubei,Mainland China,1/22/2020 17:00,444,17,28\n\
     \"King County, WA\",US,1/22/2020 17:00,1,,\n\
     ,Japan,1/22/2020 17:00,2,0,0\n"
}

/// Daily report in the later layout with counties and coordinates
pub fn late_report_csv() -> &'static str {
    "FIPS,Admin2,Province_State,Country_Region,Last_Update,Lat,Long_,Confirmed,Deaths,Recovered,Active,Combined_Key\n\
     53033,King,Washington,US,2020-04-01 21:58:49,47.49,-121.83,2330,150,0,0,\"King, Washington, US\"\n\
     ,,Bavaria,Germany,2020-04-01 21:58:49,48.79,11.50,15.0,n/a,,0,\"Bavaria, Germany\"\n"
}

pub fn interventions_csv() -> &'static str {
    "Country/Region,Province/State,2020-03-01,2020-03-02,2020-03-03\n\
     Italy,,Lockdown,,Reopened\n\
     US,Washington,,School Closure,\n"
}

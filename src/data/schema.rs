//! Dataset Schema Module
//! Column-name constants, expected source files and fixed categorical orders.
//! Single source of truth for the data contract.

/// Source file names expected inside the data directory.
pub mod files {
    pub const ACCIDENT: &str = "accident.csv";
    pub const DRUGS: &str = "drugs.csv";
    pub const DISTRACT: &str = "distract.csv";
    pub const WEATHER: &str = "weather.csv";
}

/// Raw column names as they appear in the source files.
pub mod raw {
    pub const ST_CASE: &str = "ST_CASE";
    pub const STATENAME: &str = "STATENAME";
    pub const MONTHNAME: &str = "MONTHNAME";
    pub const DAY_WEEKNAME: &str = "DAY_WEEKNAME";
    pub const VE_TOTAL: &str = "VE_TOTAL";
    pub const ROUTENAME: &str = "ROUTENAME";
    pub const DRUGRESNAME: &str = "DRUGRESNAME";
    pub const DRDISTRACTNAME: &str = "DRDISTRACTNAME";
    pub const WEATHERNAME: &str = "WEATHERNAME";
}

/// Canonical column names after normalization.
pub mod cols {
    pub const CASE_ID: &str = "case_id";
    pub const STATE: &str = "State";
    pub const MONTH: &str = "Month";
    pub const DAY: &str = "Day";
    pub const VEHICLES: &str = "Number_of_Vehicles";
    pub const ROUTE: &str = "Route";
    pub const REGION: &str = "Region";
    pub const DRUG: &str = "Drug";
    pub const DISTRACTION: &str = "Distraction";
    pub const WEATHER: &str = "Weather";
}

/// Calendar month order, used instead of lexical sorting.
pub const MONTH_LEVELS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Weekday order, Sunday first.
pub const DAY_LEVELS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

//! Region Classifier Module
//! Maps a state name to its census region by static set membership.

/// US census region derived from a state name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Northeast,
    Midwest,
    South,
    West,
    Unknown,
}

const NORTHEAST: [&str; 9] = [
    "Connecticut",
    "Maine",
    "Massachusetts",
    "New Hampshire",
    "New Jersey",
    "New York",
    "Pennsylvania",
    "Rhode Island",
    "Vermont",
];

const MIDWEST: [&str; 12] = [
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Michigan",
    "Minnesota",
    "Missouri",
    "Nebraska",
    "North Dakota",
    "Ohio",
    "South Dakota",
    "Wisconsin",
];

const SOUTH: [&str; 17] = [
    "Alabama",
    "Arkansas",
    "Delaware",
    "District of Columbia",
    "Florida",
    "Georgia",
    "Kentucky",
    "Louisiana",
    "Maryland",
    "Mississippi",
    "North Carolina",
    "Oklahoma",
    "South Carolina",
    "Tennessee",
    "Texas",
    "Virginia",
    "West Virginia",
];

const WEST: [&str; 13] = [
    "Alaska",
    "Arizona",
    "California",
    "Colorado",
    "Hawaii",
    "Idaho",
    "Montana",
    "Nevada",
    "New Mexico",
    "Oregon",
    "Utah",
    "Washington",
    "Wyoming",
];

impl Region {
    /// Classify a state name. Total: anything outside the four membership
    /// lists (missing value, territory, misspelling) degrades to Unknown.
    pub fn from_state(state: &str) -> Region {
        if NORTHEAST.contains(&state) {
            Region::Northeast
        } else if MIDWEST.contains(&state) {
            Region::Midwest
        } else if SOUTH.contains(&state) {
            Region::South
        } else if WEST.contains(&state) {
            Region::West
        } else {
            Region::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Region::Northeast => "Northeast",
            Region::Midwest => "Midwest",
            Region::South => "South",
            Region::West => "West",
            Region::Unknown => "Unknown",
        }
    }
}

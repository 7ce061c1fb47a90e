//! Station catalogue offered by the route selectors.
//!
//! SEPTA accepts station names as query parameters, so the catalogue is
//! just the names the form offers. Free-form names still work through the
//! JSON API.

/// Stations offered by the origin and destination selectors.
pub const STATIONS: &[&str] = &[
    "Suburban Station",
    "30th Street Station",
    "Market East",
    "Temple University",
    "University City",
    "Jefferson Station",
    "Penn Medicine",
    "Ardmore",
    "Bryn Mawr",
    "Paoli",
    "Thorndale",
    "Downingtown",
    "Exton",
    "Malvern",
    "Wayne",
    "Radnor",
    "Villanova",
    "Chelten Avenue",
];

/// Result counts offered by the count selector.
pub const RESULT_COUNTS: &[u32] = &[5, 10, 15, 20];

pub const DEFAULT_ORIGIN: &str = "Suburban Station";
pub const DEFAULT_DESTINATION: &str = "30th Street Station";
pub const DEFAULT_RESULT_COUNT: u32 = 10;

/// Whether `name` is one of the catalogue stations.
pub fn is_known(name: &str) -> bool {
    STATIONS.contains(&name)
}

/// Whether `count` is one of the offered result counts.
pub fn is_offered_count(count: u32) -> bool {
    RESULT_COUNTS.contains(&count)
}

//! Canonical column names shared by every stage.

pub const COUNTRY_NAME: &str = "country_name";
pub const COUNTRY_CODE: &str = "country_code";
pub const YEAR: &str = "year";
/// Generic value column used before a measure is known.
pub const VALUE: &str = "value";
pub const POPULATION: &str = "population";
pub const GDP: &str = "gdp";

/// Column order of the merged output.
pub const MERGED_COLUMNS: [&str; 5] = [COUNTRY_NAME, COUNTRY_CODE, YEAR, POPULATION, GDP];

/// Source header of the name identifier in long tables.
pub const SOURCE_COUNTRY_NAME: &str = "Country Name";
/// Source header of the code identifier in long tables.
pub const SOURCE_COUNTRY_CODE: &str = "Country Code";

/// Default identifier columns looked for in wide tables.
pub const DEFAULT_ID_COLUMNS: [&str; 2] = [SOURCE_COUNTRY_NAME, SOURCE_COUNTRY_CODE];

/// Lowercase names never chosen as a long table's value column by fallback.
pub const LONG_IDENTIFIER_NAMES: [&str; 4] = ["country name", "country", "country code", "year"];

/// Alternate value header accepted alongside `value` and the measure name.
pub const SHORT_VALUE: &str = "val";

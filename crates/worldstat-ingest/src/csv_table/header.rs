//! CSV header normalization.

use std::collections::HashSet;

/// Normalizes a header value: strips a byte-order mark and surrounding whitespace.
pub fn normalize_header(value: &str) -> String {
    value.trim_start_matches('\u{feff}').trim().to_string()
}

/// Normalizes every header and makes the names unique.
///
/// Blank headers become `column_<n>` (1-based position). A repeated name
/// keeps its first occurrence and later ones get `_<k>` appended, so the
/// table library never sees two columns with one name.
pub fn normalize_headers<'a, I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::new();
    for (idx, value) in raw.into_iter().enumerate() {
        let mut name = normalize_header(value);
        if name.is_empty() {
            name = format!("column_{}", idx + 1);
        }
        if seen.contains(&name) {
            let mut suffix = 1usize;
            while seen.contains(&format!("{name}_{suffix}")) {
                suffix += 1;
            }
            name = format!("{name}_{suffix}");
        }
        seen.insert(name.clone());
        headers.push(name);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Country Name  "), "Country Name");
        assert_eq!(normalize_header("\u{feff}Country Name"), "Country Name");
        assert_eq!(normalize_header(" 2020"), "2020");
    }

    #[test]
    fn test_normalize_headers_dedupes() {
        let headers = normalize_headers(["Value", "Year", "Value", " Value "]);
        assert_eq!(headers, vec!["Value", "Year", "Value_1", "Value_2"]);
    }

    #[test]
    fn test_normalize_headers_names_blanks() {
        let headers = normalize_headers(["", "Country Code", "  "]);
        assert_eq!(headers, vec!["column_1", "Country Code", "column_3"]);
    }
}

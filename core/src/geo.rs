//! Coordinate resolution for map markers.

use companymap_types::CoordinateAliases;
use serde::Serialize;

use crate::dataset::Row;

/// A resolved marker position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Parse the leading decimal number of `s`, ignoring leading whitespace and
/// any trailing text (`"45.2 N"` → `45.2`). Returns `None` when there is no
/// numeric prefix or the value is not finite.
pub fn parse_coordinate(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when followed by at least one digit
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// First candidate key whose value parses as a coordinate.
fn first_coordinate(row: &Row, keys: &[String]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| row.get(key))
        .find_map(parse_coordinate)
}

/// Resolve a row's position using the ordered alias lists. Both axes must
/// resolve for the row to be placed on the map.
pub fn resolve(row: &Row, aliases: &CoordinateAliases) -> Option<LatLng> {
    let lat = first_coordinate(row, &aliases.latitude)?;
    let lng = first_coordinate(row, &aliases.longitude)?;
    Some(LatLng { lat, lng })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        let header: Vec<String> = pairs.iter().map(|(k, _)| k.to_string()).collect();
        let values: Vec<Option<String>> = pairs.iter().map(|(_, v)| Some(v.to_string())).collect();
        Row::from_record(&header, &values)
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("45.0"), Some(45.0));
        assert_eq!(parse_coordinate("  -9.19"), Some(-9.19));
        assert_eq!(parse_coordinate("+.5"), Some(0.5));
        assert_eq!(parse_coordinate("7."), Some(7.0));
        assert_eq!(parse_coordinate("45.2 N"), Some(45.2));
        assert_eq!(parse_coordinate("1e2"), Some(100.0));
        assert_eq!(parse_coordinate("3e"), Some(3.0));
        assert_eq!(parse_coordinate("45,5"), Some(45.0));
        assert_eq!(parse_coordinate(""), None);
        assert_eq!(parse_coordinate("   "), None);
        assert_eq!(parse_coordinate("."), None);
        assert_eq!(parse_coordinate("-"), None);
        assert_eq!(parse_coordinate("abc"), None);
        assert_eq!(parse_coordinate("Infinity"), None);
        assert_eq!(parse_coordinate("1e999"), None);
    }

    #[test]
    fn test_resolve_uses_first_alias() {
        let aliases = CoordinateAliases::default();
        let r = row(&[("lat", "45.0"), ("lng", "9.0"), ("latitude", "1.0")]);
        assert_eq!(resolve(&r, &aliases), Some(LatLng { lat: 45.0, lng: 9.0 }));
    }

    #[test]
    fn test_resolve_falls_through_empty_alias() {
        let aliases = CoordinateAliases::default();
        let r = row(&[("lat", ""), ("Latitudine", "41.9"), ("Longitudine", "12.5")]);
        assert_eq!(resolve(&r, &aliases), Some(LatLng { lat: 41.9, lng: 12.5 }));
    }

    #[test]
    fn test_resolve_requires_both_axes() {
        let aliases = CoordinateAliases::default();
        assert_eq!(resolve(&row(&[("lat", "45.0"), ("lng", "")]), &aliases), None);
        assert_eq!(resolve(&row(&[("name", "Acme")]), &aliases), None);
    }

    #[test]
    fn test_resolve_with_custom_aliases() {
        let aliases = CoordinateAliases {
            latitude: vec!["y".into()],
            longitude: vec!["x".into()],
        };
        let r = row(&[("y", "10"), ("x", "20"), ("lat", "1"), ("lng", "2")]);
        assert_eq!(resolve(&r, &aliases), Some(LatLng { lat: 10.0, lng: 20.0 }));
    }
}

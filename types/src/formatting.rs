//! Display formatting shared by ingestion, popups and the CLI report.
//!
//! Spreadsheet cells arrive as numbers; they are shown the way a browser
//! would print them, so a latitude of `45` reads `45`, not `45.0`.

/// Format a spreadsheet number the way JavaScript's `Number#toString` does
/// for the common cases.
///
/// Integral values below 1e21 print without a fractional part, non-finite
/// values print as `NaN` / `Infinity`. Very small magnitudes print in plain
/// decimal rather than exponent notation.
///
/// # Examples
/// ```
/// use companymap_types::formatting::format_number;
/// assert_eq!(format_number(45.0), "45");
/// assert_eq!(format_number(9.19), "9.19");
/// assert_eq!(format_number(-0.0), "0");
/// ```
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
///
/// # Examples
/// ```
/// use companymap_types::formatting::escape_html;
/// assert_eq!(escape_html("A&B <x>"), "A&amp;B &lt;x&gt;");
/// ```
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Pluralize a count with its noun (`1 row`, `3 rows`).
pub fn format_count(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(45.0), "45");
        assert_eq!(format_number(-12.0), "-12");
        assert_eq!(format_number(45.464), "45.464");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1234567.0), "1234567");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(escape_html("<b>\"x\"</b>"), "&lt;b&gt;&quot;x&quot;&lt;/b&gt;");
        assert_eq!(escape_html("O'Brien & Co"), "O&#39;Brien &amp; Co");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0, "row", "rows"), "0 rows");
        assert_eq!(format_count(1, "row", "rows"), "1 row");
        assert_eq!(format_count(2, "marker", "markers"), "2 markers");
    }
}

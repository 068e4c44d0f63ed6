use chrono::{Datelike, NaiveDate};

/// Input formats accepted from the record store, tried in order
const INPUT_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Format a stored date as `5 Jan`. Anything unparseable comes back unchanged.
pub fn format_display_date(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    // chrono skips leading whitespace in numeric fields
    if value.starts_with(char::is_whitespace) {
        return value.to_string();
    }

    INPUT_FORMATS
        .iter()
        // `%Y` accepts any width; only four-digit years count
        .find_map(|fmt| {
            NaiveDate::parse_from_str(value, fmt)
                .ok()
                .filter(|date| (1000..=9999).contains(&date.year()))
        })
        .map(|date| date.format("%-d %b").to_string())
        .unwrap_or_else(|| value.to_string())
}

/// Like [`format_display_date`], but `TBC` placeholders are kept verbatim
pub fn format_live_date(value: &str) -> String {
    match value {
        "" | "TBC" | "tbc" => value.to_string(),
        _ => format_display_date(value),
    }
}

/// Header date, e.g. `05 January 2024`
pub fn format_report_date(date: NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

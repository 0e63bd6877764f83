use chrono::DateTime;

/// Format a millisecond timing as `MM:SS`.
pub fn ms_to_min_sec(milliseconds: u64) -> String {
    let total_seconds = milliseconds / 1000;
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Render an ISO-8601 timestamp in a readable form.
pub fn iso_date_to_display(iso_date: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(iso_date)
        .ok()
        .map(|date| date.format("%Y-%m-%d %H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_and_seconds_are_zero_padded() {
        assert_eq!(ms_to_min_sec(0), "00:00");
        assert_eq!(ms_to_min_sec(9_000), "00:09");
        assert_eq!(ms_to_min_sec(125_000), "02:05");
        assert_eq!(ms_to_min_sec(720_000), "12:00");
    }

    #[test]
    fn iso_dates_render_readably() {
        assert_eq!(
            iso_date_to_display("2023-10-02T18:33:20Z").as_deref(),
            Some("2023-10-02 18:33:20")
        );
        assert_eq!(iso_date_to_display("not-a-date"), None);
    }
}

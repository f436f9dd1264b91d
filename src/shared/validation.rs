use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// Absolute http(s) URL, as returned by the image host
/// - Valid: "https://res.cloudinary.com/demo/image/upload/v1/banner.png"
/// - Invalid: "ftp://host/file", "/local/path.png", "https://"
pub static IMAGE_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").unwrap());

/// Banner click-through target: site-relative path, anchor, or absolute http(s) URL
/// - Valid: "/products/coca-cola", "#", "https://shop.example.com/deals"
/// - Invalid: "javascript:alert(1)", "products", "/ spaced"
pub static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:/[^\s]*|#[^\s]*|https?://[^\s]+)$").unwrap());

pub const END_BEFORE_START_MESSAGE: &str = "End date must be after start date";

/// A visibility window is valid unless both bounds are set and start is not
/// strictly before end.
pub fn is_valid_window(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> bool {
    match (start, end) {
        (Some(start), Some(end)) => start < end,
        _ => true,
    }
}

/// Whether `now` falls inside `[start, end]`; a missing bound is open on that side.
pub fn is_within_window(
    now: DateTime<Utc>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> bool {
    start.is_none_or(|s| s <= now) && end.is_none_or(|e| e >= now)
}

/// Parse a date field as typed into a form.
///
/// Accepts `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
/// Blank input is `Ok(None)`.
pub fn parse_date_input(input: &str) -> Result<Option<DateTime<Utc>>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| Some(dt.and_utc()))
            .ok_or_else(|| format!("Invalid date: {}", input));
    }

    DateTime::parse_from_rfc3339(input)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|_| format!("Invalid date: {}", input))
}

/// Render a stored timestamp back into the `YYYY-MM-DD` form representation
pub fn format_date_input(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_image_url_regex() {
        assert!(IMAGE_URL_REGEX.is_match("https://res.cloudinary.com/demo/image/upload/a.png"));
        assert!(IMAGE_URL_REGEX.is_match("http://host/img.png"));
        assert!(!IMAGE_URL_REGEX.is_match("/local/path.png"));
        assert!(!IMAGE_URL_REGEX.is_match("ftp://host/file"));
        assert!(!IMAGE_URL_REGEX.is_match(""));
    }

    #[test]
    fn test_link_regex() {
        assert!(LINK_REGEX.is_match("/products/coca-cola"));
        assert!(LINK_REGEX.is_match("#"));
        assert!(LINK_REGEX.is_match("https://shop.example.com/deals"));
        assert!(!LINK_REGEX.is_match("javascript:alert(1)"));
        assert!(!LINK_REGEX.is_match("products"));
    }

    #[test]
    fn test_window_ordering() {
        assert!(is_valid_window(Some(day(1)), Some(day(2))));
        assert!(!is_valid_window(Some(day(2)), Some(day(2))));
        assert!(!is_valid_window(Some(day(3)), Some(day(2))));
        assert!(is_valid_window(None, Some(day(2))));
        assert!(is_valid_window(Some(day(2)), None));
    }

    #[test]
    fn test_within_window_bounds_are_inclusive() {
        assert!(is_within_window(day(5), None, None));
        assert!(is_within_window(day(5), Some(day(5)), Some(day(5))));
        assert!(!is_within_window(day(5), Some(day(6)), None));
        assert!(!is_within_window(day(5), None, Some(day(4))));
    }

    #[test]
    fn test_parse_date_input() {
        assert_eq!(parse_date_input("  ").unwrap(), None);
        assert_eq!(parse_date_input("2026-03-04").unwrap(), Some(day(4)));
        assert_eq!(
            parse_date_input("2026-03-04T00:00:00Z").unwrap(),
            Some(day(4))
        );
        assert!(parse_date_input("04/03/2026").is_err());
    }

    #[test]
    fn test_format_date_input() {
        assert_eq!(format_date_input(Some(day(9))), "2026-03-09");
        assert_eq!(format_date_input(None), "");
    }
}

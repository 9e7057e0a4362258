//! Shared utility functions for WQM crates.

/// Date utility functions
pub mod dates {
    use chrono::{NaiveDate, NaiveTime};

    /// ISO calendar date format used by the view host: "YYYY-MM-DD"
    pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

    /// Calendar date layouts accepted in lab result exports.
    const COLLECTION_DATE_FORMATS: [&str; 3] = [ISO_DATE_FORMAT, "%m/%d/%Y", "%Y/%m/%d"];

    /// Time-of-day layouts accepted in lab result exports.
    const COLLECTION_TIME_FORMATS: [&str; 4] = ["%H:%M:%S", "%H:%M", "%I:%M:%S %p", "%I:%M %p"];

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(ISO_DATE_FORMAT).to_string()
    }

    /// Parse a date string in strict "YYYY-MM-DD" format
    pub fn parse_iso_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
        NaiveDate::parse_from_str(s.trim(), ISO_DATE_FORMAT)
    }

    /// Split "2020-06-01 10:30" or "2020-06-01T10:30" into its date and time parts.
    fn split_date_time(s: &str) -> Option<(&str, &str)> {
        s.split_once(|c: char| c == ' ' || c == 'T')
            .map(|(date, time)| (date.trim(), time.trim()))
    }

    /// Parse a collection date, accepting the layouts seen in result exports.
    ///
    /// A trailing time component is ignored. Returns `None` for empty or
    /// unrecognised input.
    pub fn parse_collection_date(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        let parse = |candidate: &str| {
            COLLECTION_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(candidate, fmt).ok())
        };
        parse(s).or_else(|| split_date_time(s).and_then(|(date, _)| parse(date)))
    }

    /// Parse a collection time of day.
    ///
    /// Missing or unrecognised input yields midnight. A full date-time string
    /// contributes its time part.
    pub fn parse_collection_time(s: Option<&str>) -> NaiveTime {
        let Some(s) = s.map(str::trim).filter(|s| !s.is_empty()) else {
            return NaiveTime::MIN;
        };
        let parse = |candidate: &str| {
            COLLECTION_TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(candidate, fmt).ok())
        };
        parse(s)
            .or_else(|| split_date_time(s).and_then(|(_, time)| parse(time)))
            .unwrap_or(NaiveTime::MIN)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_collection_date_layouts() {
            let expected = NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
            assert_eq!(parse_collection_date("2020-06-01"), Some(expected));
            assert_eq!(parse_collection_date("06/01/2020"), Some(expected));
            assert_eq!(parse_collection_date("6/1/2020"), Some(expected));
            assert_eq!(parse_collection_date("6/1/2020 9:15 AM"), Some(expected));
            assert_eq!(parse_collection_date("2020/06/01"), Some(expected));
            assert_eq!(parse_collection_date(" 2020-06-01 "), Some(expected));
            assert_eq!(parse_collection_date("2020-06-01 13:45:00"), Some(expected));
            assert_eq!(parse_collection_date("2020-06-01T13:45:00"), Some(expected));
        }

        #[test]
        fn test_parse_collection_date_rejects_garbage() {
            assert_eq!(parse_collection_date(""), None);
            assert_eq!(parse_collection_date("yesterday"), None);
            assert_eq!(parse_collection_date("2020-13-01"), None);
        }

        #[test]
        fn test_parse_collection_time() {
            let t = |h, m, s| NaiveTime::from_hms_opt(h, m, s).unwrap();
            assert_eq!(parse_collection_time(Some("10:30:15")), t(10, 30, 15));
            assert_eq!(parse_collection_time(Some("10:30")), t(10, 30, 0));
            assert_eq!(parse_collection_time(Some("01:15 PM")), t(13, 15, 0));
            assert_eq!(parse_collection_time(Some("1:15 PM")), t(13, 15, 0));
            assert_eq!(parse_collection_time(Some("1:15:30 pm")), t(13, 15, 30));
            assert_eq!(parse_collection_time(Some("2020-06-01 08:05:00")), t(8, 5, 0));
        }

        #[test]
        fn test_parse_collection_time_defaults_to_midnight() {
            assert_eq!(parse_collection_time(None), NaiveTime::MIN);
            assert_eq!(parse_collection_time(Some("")), NaiveTime::MIN);
            assert_eq!(parse_collection_time(Some("noonish")), NaiveTime::MIN);
        }

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            assert_eq!(parse_iso_date(&formatted).unwrap(), date);
            assert!(parse_iso_date("06/15/2023").is_err());
        }
    }
}

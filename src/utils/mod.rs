use std::time::{SystemTime, UNIX_EPOCH};

/// Largest count accepted for generated prompts, ideas and mockups
pub const MAX_GENERATION_COUNT: u32 = 50;

/// Get current Unix timestamp in milliseconds
pub fn timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis()
}

/// `mockups-<millis>.zip`
pub fn archive_file_name(timestamp: u128) -> String {
    format!("mockups-{}.zip", timestamp)
}

/// Parse a user-typed generation count; only 1..=50 is accepted.
pub fn parse_count(input: &str) -> Option<u32> {
    input
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|count| (1..=MAX_GENERATION_COUNT).contains(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp() {
        let ts = timestamp_millis();
        assert!(ts > 1_700_000_000_000); // Sanity check
    }

    #[test]
    fn test_archive_file_name() {
        assert_eq!(archive_file_name(1_760_000_000_123), "mockups-1760000000123.zip");
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("3"), Some(3));
        assert_eq!(parse_count(" 50 "), Some(50));
        assert_eq!(parse_count("0"), None);
        assert_eq!(parse_count("51"), None);
        assert_eq!(parse_count("-2"), None);
        assert_eq!(parse_count("many"), None);
    }
}

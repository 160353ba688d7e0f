use once_cell::sync::Lazy;
use regex::Regex;

static DURATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("valid duration regex")
});

/// Converts an ISO 8601 time duration such as `PT1M30S` to whole seconds.
/// Missing or unparsable input yields 0.
pub fn parse_duration(iso8601: &str) -> u32 {
    let Some(caps) = DURATION_REGEX.captures(iso8601) else {
        return 0;
    };

    // Captures are all digits, so a failed parse means the value overflowed.
    let component = |idx: usize| -> u32 {
        caps.get(idx)
            .map_or(0, |m| m.as_str().parse::<u32>().unwrap_or(u32::MAX))
    };

    component(1)
        .saturating_mul(3600)
        .saturating_add(component(2).saturating_mul(60))
        .saturating_add(component(3))
}

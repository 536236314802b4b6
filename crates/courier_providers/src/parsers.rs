use std::time::Duration;

use jiff::SpanRelativeTo;

/// Accepts ISO 8601 (`PT30S`), friendly (`30s`, `1m 30s`) or plain seconds.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let signed = if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        duration
    } else if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        duration
    } else if let Ok(seconds) = input.parse::<u64>() {
        return Ok(Duration::from_secs(seconds));
    } else {
        return Err(format!("Invalid duration `{input}`"));
    };

    Duration::try_from(signed).map_err(|_| format!("Duration `{input}` must not be negative"))
}

use std::time::{Duration, Instant};

use thousands::Separable;

/// Milliseconds elapsed since `start`, e.g. `1_234`.
pub fn duration_since(start: Instant) -> String {
    format_millis(start.elapsed())
}

pub fn format_millis(duration: Duration) -> String {
    duration.as_millis().separate_with_underscores()
}

/// Mean duration of `count` runs lasting `total` altogether.
pub fn average_millis(total: Duration, count: usize) -> String {
    if count == 0 {
        return "0".to_string();
    }
    (total.as_millis() / count as u128).separate_with_underscores()
}

//! Relative "last activity" labels for the contact list.

use chrono::{DateTime, Duration, Utc};

/// Human label for when something happened, relative to `now`.
///
/// Recent activity reads as "Just now" or "12 min ago", earlier today as a
/// clock time, then "Yesterday", a weekday within the last week, and a
/// short date beyond that.
pub fn relative_label(now: DateTime<Utc>, at: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    if elapsed < Duration::minutes(1) {
        return "Just now".to_string();
    }
    if elapsed < Duration::hours(1) {
        return format!("{} min ago", elapsed.num_minutes());
    }

    let today = now.date_naive();
    let day = at.date_naive();
    if day == today {
        at.format("%-I:%M %p").to_string()
    } else if today.pred_opt() == Some(day) {
        "Yesterday".to_string()
    } else if elapsed < Duration::days(7) {
        at.format("%A").to_string()
    } else {
        at.format("%b %-d").to_string()
    }
}

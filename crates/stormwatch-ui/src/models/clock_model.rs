use std::fmt::Display;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Clock text like `FRI, Dec 6, 12:34 pm`.
pub fn format_clock<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    let formatted = now.format("%a, %b %-d, %-I:%M %p").to_string();

    // Weekday upper-cased, meridiem lower-cased
    let (weekday, rest) = formatted.split_at(3);
    format!(
        "{}{}",
        weekday.to_uppercase(),
        rest.replace("AM", "am").replace("PM", "pm")
    )
}

/// Publish the local clock text now and then every `interval`.
///
/// The task stops once every receiver is dropped.
pub fn spawn_clock(interval: Duration) -> (watch::Receiver<String>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(format_clock(&Local::now()));

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // First tick completes immediately; the initial value is already sent
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if tx.send(format_clock(&Local::now())).is_err() {
                tracing::debug!("Clock receivers dropped, stopping");
                break;
            }
        }
    });

    (rx, handle)
}

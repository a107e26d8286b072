//! Countdown module tracking shared future events.
//!
//! Remaining time is derived from the stored target instant on every read
//! rather than persisted, so expired countdowns simply report zero.

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{CountdownError, CountdownResult};
pub use manager::CountdownManager;
pub use models::{
    Countdown, CountdownId, CountdownView, CreateCountdownRequest, MAX_TITLE_LENGTH,
};

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::models::Countdown;

    fn countdown_at(target_offset: Duration) -> Countdown {
        let now = Utc::now();
        Countdown {
            id: 1,
            creator_id: 1,
            title: "Ferry arrives".to_string(),
            target_at: now + target_offset,
            created_at: now,
        }
    }

    #[test]
    fn view_reports_positive_seconds_before_target() {
        let countdown = countdown_at(Duration::hours(2));
        let view = countdown.view_at(Utc::now());
        assert!(view.seconds_remaining > 7100);
        assert!(view.seconds_remaining <= 7200);
    }

    #[test]
    fn view_clamps_to_zero_after_target() {
        let countdown = countdown_at(Duration::hours(-1));
        let view = countdown.view_at(Utc::now());
        assert_eq!(view.seconds_remaining, 0);
    }
}

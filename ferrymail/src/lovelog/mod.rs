//! Love log module, a shared mood journal.

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{LoveLogError, LoveLogResult};
pub use manager::LoveLogManager;
pub use models::{CreateEntryRequest, EntryId, LoveLogEntry, MAX_NOTE_LENGTH, Mood};

#[cfg(test)]
mod tests {
    use super::Mood;

    #[test]
    fn mood_round_trips_through_storage_form() {
        for mood in [Mood::Loved, Mood::Happy, Mood::Okay, Mood::Sad, Mood::Grumpy] {
            assert_eq!(Mood::parse(mood.as_str()), Some(mood));
        }
    }

    #[test]
    fn unknown_mood_does_not_parse() {
        assert_eq!(Mood::parse("ecstatic"), None);
        assert_eq!(Mood::parse(""), None);
    }
}

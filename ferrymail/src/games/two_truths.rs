//! Two Truths & a Lie round logic.
//!
//! A one-shot round: the creator writes two true statements and one lie,
//! the recipient gets a single guess at which statement is the lie. The
//! display order is shuffled once at creation and fixed from then on, so
//! the lie never sits in a predictable slot.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::errors::{GameError, GameResult};
use super::models::{GameId, TwoTruthsView};
use crate::auth::UserId;

/// Number of statements in a round: two truths plus one lie.
pub const STATEMENT_COUNT: usize = 3;

/// Lifecycle of a round. Forward-only: `Open → Guessed`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    Open,
    Guessed,
}

impl RoundStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Guessed => "guessed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "guessed" => Some(Self::Guessed),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One Two Truths & a Lie round.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TwoTruthsRound {
    pub id: GameId,
    pub creator_id: UserId,
    pub recipient_id: UserId,
    /// Statements in display order, exactly [`STATEMENT_COUNT`] of them.
    pub statements: Vec<String>,
    /// Index of the lie within `statements`.
    pub lie_index: u8,
    pub guess_index: Option<u8>,
    pub guessed_correctly: Option<bool>,
    pub status: RoundStatus,
}

impl TwoTruthsRound {
    /// Create a new round, shuffling the display order with `rng`.
    ///
    /// # Errors
    ///
    /// `GameError::InvalidInput` if any statement is empty, the statements
    /// are not pairwise distinct, or creator and recipient coincide.
    pub fn new<R: Rng + ?Sized>(
        creator_id: UserId,
        recipient_id: UserId,
        truths: [&str; 2],
        lie: &str,
        rng: &mut R,
    ) -> GameResult<Self> {
        if creator_id == recipient_id {
            return Err(GameError::InvalidInput(
                "you cannot play against yourself".to_string(),
            ));
        }

        let mut entries: Vec<(String, bool)> = vec![
            (truths[0].trim().to_string(), false),
            (truths[1].trim().to_string(), false),
            (lie.trim().to_string(), true),
        ];

        if entries.iter().any(|(s, _)| s.is_empty()) {
            return Err(GameError::InvalidInput(
                "statements must not be empty".to_string(),
            ));
        }
        for i in 0..entries.len() {
            for j in (i + 1)..entries.len() {
                if entries[i].0.eq_ignore_ascii_case(&entries[j].0) {
                    return Err(GameError::InvalidInput(
                        "statements must be distinct".to_string(),
                    ));
                }
            }
        }

        entries.shuffle(rng);
        let lie_index = entries
            .iter()
            .position(|(_, is_lie)| *is_lie)
            .ok_or_else(|| {
                GameError::InternalStateError("no lie among the statements".to_string())
            })? as u8;

        Ok(Self {
            id: 0,
            creator_id,
            recipient_id,
            statements: entries.into_iter().map(|(s, _)| s).collect(),
            lie_index,
            guess_index: None,
            guessed_correctly: None,
            status: RoundStatus::Open,
        })
    }

    /// The recipient's one guess. Returns whether it hit the lie.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the requester is not the recipient.
    /// - `InvalidState` if the round was already guessed.
    /// - `InvalidInput` if the index is out of range.
    pub fn guess(&mut self, requester_id: UserId, index: u8) -> GameResult<bool> {
        if requester_id != self.recipient_id {
            return Err(GameError::Unauthorized);
        }
        if self.status == RoundStatus::Guessed {
            return Err(GameError::InvalidState);
        }
        if usize::from(index) >= STATEMENT_COUNT {
            return Err(GameError::InvalidInput(format!(
                "statement index must be below {STATEMENT_COUNT}"
            )));
        }

        let correct = index == self.lie_index;
        self.guess_index = Some(index);
        self.guessed_correctly = Some(correct);
        self.status = RoundStatus::Guessed;
        Ok(correct)
    }

    pub fn is_participant(&self, user_id: UserId) -> bool {
        user_id == self.creator_id || user_id == self.recipient_id
    }

    /// Project the round for a viewer: the lie index stays hidden from the
    /// recipient until they have guessed.
    pub fn view(&self, viewer_id: UserId) -> TwoTruthsView {
        let resolved = self.status == RoundStatus::Guessed;
        let lie_index =
            (viewer_id == self.creator_id || resolved).then_some(self.lie_index);

        TwoTruthsView {
            id: self.id,
            creator_id: self.creator_id,
            recipient_id: self.recipient_id,
            status: self.status,
            statements: self.statements.clone(),
            lie_index,
            guess_index: self.guess_index,
            guessed_correctly: self.guessed_correctly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round() -> TwoTruthsRound {
        TwoTruthsRound::new(
            1,
            2,
            ["i've been to iceland", "i can juggle"],
            "i hate coffee",
            &mut rand::rng(),
        )
        .expect("valid round")
    }

    #[test]
    fn test_new_round_shuffles_but_keeps_all_statements() {
        let r = round();
        assert_eq!(r.statements.len(), STATEMENT_COUNT);
        assert_eq!(r.statements[r.lie_index as usize], "i hate coffee");
        assert!(r.statements.contains(&"i can juggle".to_string()));
        assert_eq!(r.status, RoundStatus::Open);
    }

    #[test]
    fn test_new_round_rejects_bad_input() {
        let mut rng = rand::rng();
        assert!(matches!(
            TwoTruthsRound::new(1, 2, ["a", ""], "c", &mut rng),
            Err(GameError::InvalidInput(_))
        ));
        assert!(matches!(
            TwoTruthsRound::new(1, 2, ["same", "Same"], "other", &mut rng),
            Err(GameError::InvalidInput(_))
        ));
        assert!(matches!(
            TwoTruthsRound::new(1, 1, ["a", "b"], "c", &mut rng),
            Err(GameError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_correct_guess() {
        let mut r = round();
        let correct = r.guess(2, r.lie_index).unwrap();
        assert!(correct);
        assert_eq!(r.status, RoundStatus::Guessed);
        assert_eq!(r.guessed_correctly, Some(true));
    }

    #[test]
    fn test_wrong_guess() {
        let mut r = round();
        let wrong_index = (r.lie_index + 1) % STATEMENT_COUNT as u8;
        let correct = r.guess(2, wrong_index).unwrap();
        assert!(!correct);
        assert_eq!(r.guessed_correctly, Some(false));
    }

    #[test]
    fn test_only_recipient_may_guess() {
        let mut r = round();
        assert!(matches!(r.guess(1, 0), Err(GameError::Unauthorized)));
        assert!(matches!(r.guess(99, 0), Err(GameError::Unauthorized)));
        assert_eq!(r.status, RoundStatus::Open);
    }

    #[test]
    fn test_single_shot() {
        let mut r = round();
        r.guess(2, 0).unwrap();
        let before = r.clone();
        assert!(matches!(r.guess(2, 1), Err(GameError::InvalidState)));
        assert_eq!(r, before);
    }

    #[test]
    fn test_out_of_range_guess() {
        let mut r = round();
        assert!(matches!(r.guess(2, 3), Err(GameError::InvalidInput(_))));
        assert_eq!(r.status, RoundStatus::Open);
    }

    #[test]
    fn test_view_hides_lie_until_guessed() {
        let mut r = round();
        assert_eq!(r.view(2).lie_index, None);
        assert_eq!(r.view(1).lie_index, Some(r.lie_index));

        r.guess(2, 0).unwrap();
        assert_eq!(r.view(2).lie_index, Some(r.lie_index));
    }
}

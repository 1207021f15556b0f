use crate::grading::{grade, GradingResult};
use crate::history::{update_score, HistoryStore, PerformanceStore};
use crate::picker::{CyclingPicker, WeightedPicker, WordPicker};
use crate::session::{RoundState, ScoreBoard, Tier};
use crate::wordlist::WordList;
use rand::seq::SliceRandom;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// What a submitted guess did to the round.
#[derive(Debug, Clone, PartialEq)]
pub enum GuessOutcome {
    /// Guess matched the target; the round is settled and scored.
    Solved {
        grading: GradingResult,
        attempts: u32,
        tier: Tier,
    },
    /// Guess was wrong but the round continues.
    Wrong {
        grading: GradingResult,
        attempts_left: u32,
    },
    /// Guess was wrong and the attempt budget is spent; the round is settled
    /// with a full struggle penalty and the answer is revealed.
    OutOfTries {
        grading: GradingResult,
        answer: String,
    },
}

/// Owns everything a session mutates: the shuffled word order, the score
/// history and its store handle, the tracking flag, the round state, and the
/// tier tally. The driver only feeds it guesses and advances it between
/// rounds; it never reaches into the state directly.
pub struct Game {
    words: Vec<String>,
    history: PerformanceStore,
    store: Box<dyn HistoryStore>,
    tracking_enabled: bool,
    max_attempts: u32,
    cycle: CyclingPicker,
    target: String,
    state: RoundState,
    board: ScoreBoard,
}

impl Game {
    /// Start a session over `list`, loading past scores from `store` and
    /// selecting the first target. The word order is shuffled once here so
    /// cycling mode doesn't replay the same sequence every run.
    pub fn new(
        list: WordList,
        store: Box<dyn HistoryStore>,
        tracking_enabled: bool,
        max_attempts: u32,
    ) -> Self {
        let mut words = list.words;
        words.shuffle(&mut rand::thread_rng());
        let history = store.load();
        let mut game = Self {
            words,
            history,
            store,
            tracking_enabled,
            max_attempts: max_attempts.max(1),
            cycle: CyclingPicker::default(),
            target: String::new(),
            state: RoundState::GaveUp,
            board: ScoreBoard::default(),
        };
        game.next_target();
        game
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn score_board(&self) -> &ScoreBoard {
        &self.board
    }

    pub fn history(&self) -> &PerformanceStore {
        &self.history
    }

    pub fn tracking_enabled(&self) -> bool {
        self.tracking_enabled
    }

    /// Toggle difficulty-weighted selection. Applies from the next selection
    /// on; the current target is left alone.
    pub fn set_tracking_enabled(&mut self, on: bool) {
        self.tracking_enabled = on;
    }

    /// Grade one submitted guess and react to the result. Returns `None` for
    /// blank input or when the round is already settled and waiting on
    /// [`Game::advance`].
    pub fn submit_guess(&mut self, raw: &str) -> Option<GuessOutcome> {
        let attempts = match self.state {
            RoundState::AwaitingGuess { attempts } => attempts,
            _ => return None,
        };

        let guess = raw.trim().to_lowercase();
        if guess.is_empty() {
            return None;
        }

        let grading = grade(&self.target, &guess);
        if grading.solved {
            let tier = Tier::for_attempts(attempts);
            self.board.record(tier);
            self.state = RoundState::Solved { attempts };
            self.record_outcome(attempts);
            return Some(GuessOutcome::Solved {
                grading,
                attempts,
                tier,
            });
        }

        if attempts >= self.max_attempts {
            self.state = RoundState::GaveUp;
            // An unsolved round always records the full struggle penalty,
            // even when the attempt budget is below the worst scoring tier.
            self.record_outcome((self.max_attempts + 1).max(3));
            return Some(GuessOutcome::OutOfTries {
                grading,
                answer: self.target.clone(),
            });
        }

        self.state = RoundState::AwaitingGuess {
            attempts: attempts + 1,
        };
        Some(GuessOutcome::Wrong {
            grading,
            attempts_left: self.max_attempts - attempts,
        })
    }

    /// Move to the next target once the current round is settled. Calling it
    /// mid-round does nothing, so a settled round advances exactly once no
    /// matter how eagerly the driver fires its timer.
    pub fn advance(&mut self) -> &str {
        if self.state.is_terminal() {
            self.next_target();
        }
        &self.target
    }

    fn next_target(&mut self) {
        self.target = if self.tracking_enabled {
            let mut picker = WeightedPicker;
            picker.pick(&self.words, &self.history)
        } else {
            self.cycle.pick(&self.words, &self.history)
        };
        self.state = RoundState::AwaitingGuess { attempts: 1 };
    }

    fn record_outcome(&mut self, attempts: u32) {
        update_score(&mut self.history, &self.target, attempts);
        // The history is a cache; a lost write costs at most one update.
        let _ = self.store.save(&self.history);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::LetterMark::*;
    use assert_matches::assert_matches;
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;

    /// In-memory store that records every save for inspection.
    struct MemoryStore {
        initial: PerformanceStore,
        saves: Rc<RefCell<Vec<PerformanceStore>>>,
    }

    impl MemoryStore {
        fn empty() -> (Self, Rc<RefCell<Vec<PerformanceStore>>>) {
            let saves = Rc::new(RefCell::new(Vec::new()));
            (
                Self {
                    initial: PerformanceStore::new(),
                    saves: Rc::clone(&saves),
                },
                saves,
            )
        }
    }

    impl HistoryStore for MemoryStore {
        fn load(&self) -> PerformanceStore {
            self.initial.clone()
        }

        fn save(&self, store: &PerformanceStore) -> io::Result<()> {
            self.saves.borrow_mut().push(store.clone());
            Ok(())
        }
    }

    struct FailingStore;

    impl HistoryStore for FailingStore {
        fn load(&self) -> PerformanceStore {
            PerformanceStore::new()
        }

        fn save(&self, _store: &PerformanceStore) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    fn one_word_game(word: &str, max_attempts: u32) -> (Game, Rc<RefCell<Vec<PerformanceStore>>>) {
        let list = WordList::from_words("test", vec![word.to_string()]).unwrap();
        let (store, saves) = MemoryStore::empty();
        (Game::new(list, Box::new(store), false, max_attempts), saves)
    }

    #[test]
    fn first_try_solve_scores_diamond_and_persists() {
        let (mut game, saves) = one_word_game("cat", 5);

        let outcome = game.submit_guess("cat").unwrap();
        assert_matches!(
            outcome,
            GuessOutcome::Solved {
                attempts: 1,
                tier: Tier::Diamond,
                ..
            }
        );
        assert_eq!(game.score_board().diamond, 1);
        // 1.0 * 0.7 + 0.0 * 0.3
        assert!((game.history()["cat"] - 0.7).abs() < 1e-12);
        assert_eq!(saves.borrow().len(), 1);
    }

    #[test]
    fn second_try_solve_scores_gold() {
        let (mut game, _) = one_word_game("cat", 5);

        let wrong = game.submit_guess("cot").unwrap();
        assert_matches!(wrong, GuessOutcome::Wrong { attempts_left: 4, .. });

        let outcome = game.submit_guess("cat").unwrap();
        assert_matches!(
            outcome,
            GuessOutcome::Solved {
                attempts: 2,
                tier: Tier::Gold,
                ..
            }
        );
        // 1.0 * 0.7 + 0.5 * 0.3
        assert!((game.history()["cat"] - 0.85).abs() < 1e-12);
    }

    #[test]
    fn wrong_guess_reports_letter_marks() {
        let (mut game, _) = one_word_game("cat", 5);
        let outcome = game.submit_guess("cot").unwrap();
        match outcome {
            GuessOutcome::Wrong { grading, .. } => {
                assert_eq!(grading.marks, vec![Exact, Absent, Exact]);
                assert!(!grading.solved);
            }
            other => panic!("expected Wrong, got {other:?}"),
        }
    }

    #[test]
    fn guesses_are_trimmed_and_lowercased() {
        let (mut game, _) = one_word_game("cat", 5);
        let outcome = game.submit_guess("  CAT ").unwrap();
        assert_matches!(outcome, GuessOutcome::Solved { .. });
    }

    #[test]
    fn blank_guess_is_ignored() {
        let (mut game, saves) = one_word_game("cat", 5);
        assert!(game.submit_guess("").is_none());
        assert!(game.submit_guess("   ").is_none());
        assert_matches!(game.state(), RoundState::AwaitingGuess { attempts: 1 });
        assert!(saves.borrow().is_empty());
    }

    #[test]
    fn exhausting_attempts_gives_up_with_one_update_and_one_advance() {
        let (mut game, saves) = one_word_game("cat", 2);

        assert_matches!(
            game.submit_guess("dog").unwrap(),
            GuessOutcome::Wrong { attempts_left: 1, .. }
        );
        let outcome = game.submit_guess("dug").unwrap();
        match outcome {
            GuessOutcome::OutOfTries { answer, .. } => assert_eq!(answer, "cat"),
            other => panic!("expected OutOfTries, got {other:?}"),
        }
        assert_matches!(game.state(), RoundState::GaveUp);

        // Exactly one score update, at the full penalty.
        assert_eq!(saves.borrow().len(), 1);
        assert!((game.history()["cat"] - 1.0).abs() < 1e-12);

        // Settled rounds ignore further guesses until advanced.
        assert!(game.submit_guess("cat").is_none());

        game.advance();
        assert_matches!(game.state(), RoundState::AwaitingGuess { attempts: 1 });
        assert_eq!(saves.borrow().len(), 1);
    }

    #[test]
    fn give_up_with_single_attempt_budget_forces_full_penalty() {
        let (mut game, saves) = one_word_game("cat", 1);

        let outcome = game.submit_guess("dog").unwrap();
        assert_matches!(outcome, GuessOutcome::OutOfTries { .. });

        // max_attempts + 1 is only 2 here, which on its own would score as a
        // second-try solve; the give-up must still record penalty 1.0.
        assert!((game.history()["cat"] - 1.0).abs() < 1e-12);
        assert_eq!(saves.borrow().len(), 1);
    }

    #[test]
    fn advance_mid_round_is_a_no_op() {
        let (mut game, _) = one_word_game("cat", 5);
        game.submit_guess("cot").unwrap();
        game.advance();
        assert_matches!(game.state(), RoundState::AwaitingGuess { attempts: 2 });
    }

    #[test]
    fn solve_then_advance_starts_a_fresh_round() {
        let (mut game, _) = one_word_game("cat", 5);
        game.submit_guess("cat").unwrap();
        assert_matches!(game.state(), RoundState::Solved { attempts: 1 });
        let next = game.advance().to_string();
        assert_eq!(next, "cat"); // single-word list cycles back
        assert_matches!(game.state(), RoundState::AwaitingGuess { attempts: 1 });
    }

    #[test]
    fn targets_always_come_from_the_list() {
        let list = WordList::from_words(
            "test",
            vec!["cat".into(), "dog".into(), "sun".into()],
        )
        .unwrap();
        let (store, _) = MemoryStore::empty();
        let mut game = Game::new(list, Box::new(store), true, 5);
        for _ in 0..50 {
            let target = game.target().to_string();
            assert!(["cat", "dog", "sun"].contains(&target.as_str()));
            game.submit_guess(&target).unwrap();
            game.advance();
        }
    }

    #[test]
    fn failed_save_keeps_in_memory_history() {
        let list = WordList::from_words("test", vec!["cat".to_string()]).unwrap();
        let mut game = Game::new(list, Box::new(FailingStore), false, 5);
        game.submit_guess("cat").unwrap();
        assert!((game.history()["cat"] - 0.7).abs() < 1e-12);
    }

    #[test]
    fn tracking_toggle_takes_effect_without_changing_current_target() {
        let (mut game, _) = one_word_game("cat", 5);
        let before = game.target().to_string();
        game.set_tracking_enabled(true);
        assert!(game.tracking_enabled());
        assert_eq!(game.target(), before);
    }
}

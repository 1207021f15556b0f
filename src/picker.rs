use crate::history::{score_for, PerformanceStore};
use rand::seq::SliceRandom;
use rand::Rng;

/// Weight floor so mastered words still come up occasionally.
pub const BASE_WEIGHT: f64 = 1.0;
/// Extra weight per point of struggle score; a score-1.0 word is drawn
/// six times as often as a score-0.0 one.
pub const STRUGGLE_WEIGHT: f64 = 5.0;

/// Strategy for choosing the next target word.
///
/// `words` must be non-empty; the game validates its list at startup.
pub trait WordPicker {
    fn pick(&mut self, words: &[String], history: &PerformanceStore) -> String;
}

/// Walks the word order in a fixed circle. The caller shuffles the word
/// vector once per session so the circle differs between runs.
#[derive(Debug, Default)]
pub struct CyclingPicker {
    cursor: usize,
}

impl WordPicker for CyclingPicker {
    fn pick(&mut self, words: &[String], _history: &PerformanceStore) -> String {
        let word = words[self.cursor % words.len()].clone();
        self.cursor = (self.cursor + 1) % words.len();
        word
    }
}

/// Roulette-wheel selection biased toward historically difficult words.
#[derive(Debug, Default)]
pub struct WeightedPicker;

impl WordPicker for WeightedPicker {
    fn pick(&mut self, words: &[String], history: &PerformanceStore) -> String {
        let total: f64 = words.iter().map(|w| weight_of(score_for(history, w))).sum();
        let draw = rand::thread_rng().gen_range(0.0..total);
        pick_at(words, history, draw)
    }
}

fn weight_of(score: f64) -> f64 {
    BASE_WEIGHT + score * STRUGGLE_WEIGHT
}

/// Walk the wheel, spending `draw` against each word's weight in turn.
/// If float drift leaves the draw unspent past the last word, fall back to
/// a uniform choice rather than failing.
fn pick_at(words: &[String], history: &PerformanceStore, mut draw: f64) -> String {
    for word in words {
        draw -= weight_of(score_for(history, word));
        if draw <= 0.0 {
            return word.clone();
        }
    }
    words
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_default()
}

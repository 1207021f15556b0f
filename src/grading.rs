/// Feedback for one guessed letter.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum LetterMark {
    /// Right letter in the right position.
    Exact,
    /// Letter occurs somewhere in the target, but not here.
    Present,
    /// Letter does not occur in the target at all.
    Absent,
}

/// Per-letter marks for a whole guess, plus whether it solved the word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradingResult {
    pub marks: Vec<LetterMark>,
    pub solved: bool,
}

/// Grade `guess` against `target`, one mark per guessed character.
///
/// `Present` is plain containment: a letter repeated in the guess is marked
/// present at every occurrence as long as the target contains it anywhere,
/// with no accounting for how many times the target has it. Guesses may be
/// shorter or longer than the target; positions past the target's end can
/// still earn `Present`, never `Exact`.
pub fn grade(target: &str, guess: &str) -> GradingResult {
    let target_chars: Vec<char> = target.chars().collect();
    let marks = guess
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if target_chars.get(i) == Some(&c) {
                LetterMark::Exact
            } else if target_chars.contains(&c) {
                LetterMark::Present
            } else {
                LetterMark::Absent
            }
        })
        .collect();

    GradingResult {
        marks,
        solved: guess == target,
    }
}

/// Score tier for a solved round, best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Diamond,
    Gold,
    Silver,
    Bronze,
}

impl Tier {
    pub fn for_attempts(attempts: u32) -> Self {
        match attempts {
            0 | 1 => Tier::Diamond,
            2 => Tier::Gold,
            3 => Tier::Silver,
            _ => Tier::Bronze,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Diamond => "diamond",
            Tier::Gold => "gold",
            Tier::Silver => "silver",
            Tier::Bronze => "bronze",
        }
    }
}

/// Per-session tally of solved rounds by tier. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    pub diamond: u32,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

impl ScoreBoard {
    pub fn record(&mut self, tier: Tier) {
        match tier {
            Tier::Diamond => self.diamond += 1,
            Tier::Gold => self.gold += 1,
            Tier::Silver => self.silver += 1,
            Tier::Bronze => self.bronze += 1,
        }
    }

    pub fn solved(&self) -> u32 {
        self.diamond + self.gold + self.silver + self.bronze
    }
}

/// State of the round in progress for the current target word.
///
/// `attempts` starts at 1 and counts the submission about to happen, so a
/// word solved on the very first submission settles as `Solved { attempts: 1 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    AwaitingGuess { attempts: u32 },
    Solved { attempts: u32 },
    GaveUp,
}

impl RoundState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RoundState::AwaitingGuess { .. })
    }
}

use clap::{Parser, ValueEnum};
use crossterm::{
    cursor::MoveToColumn,
    event::{KeyCode, KeyEventKind, KeyModifiers},
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
};
use dikt::{
    config::{Config, ConfigStore, FileConfigStore},
    game::{Game, GuessOutcome, DEFAULT_MAX_ATTEMPTS},
    grading::LetterMark,
    history::FileHistoryStore,
    runtime::{CrosstermKeySource, Deadline, LoopEvent, Pump},
    session::ScoreBoard,
    wordlist::WordList,
};
use std::{
    error::Error,
    io::{self, Write},
    time::Duration,
};

/// Ceiling for the flash/cooldown knobs; anything longer is a typo.
const MAX_DELAY_SECS: f64 = 600.0;

/// terminal spelling trainer with adaptive word selection
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal spelling trainer: each word flashes briefly, you retype it from memory, and colored per-letter feedback shows how close you got. With tracking enabled, words you struggle with come up more often."
)]
pub struct Cli {
    /// word list to practice
    #[clap(short = 'l', long, value_enum, default_value_t = BuiltinList::English)]
    word_list: BuiltinList,

    /// practice a custom space-separated set of words instead of a built-in list
    #[clap(short = 'w', long)]
    words: Option<String>,

    /// wrong submissions allowed before the answer is revealed
    #[clap(short = 'a', long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,

    /// seconds the target word stays visible before it is masked
    #[clap(short = 'f', long, default_value_t = 1.5)]
    flash_secs: f64,

    /// seconds the revealed answer stays on screen after a failed round
    #[clap(short = 'c', long, default_value_t = 3.0)]
    cooldown_secs: f64,

    /// enable difficulty-weighted word selection for this and future runs
    #[clap(long, conflicts_with = "no_track")]
    track: bool,

    /// disable difficulty-weighted word selection for this and future runs
    #[clap(long)]
    no_track: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum BuiltinList {
    English,
    Tricky,
}

impl BuiltinList {
    fn file_name(&self) -> &'static str {
        match self {
            BuiltinList::English => "english.json",
            BuiltinList::Tricky => "tricky.json",
        }
    }
}

/// Turn a user-supplied seconds value into a bounded `Duration`. Negative,
/// NaN, infinite, and absurdly large values all collapse to the bounds
/// instead of panicking in `Duration::from_secs_f64`.
fn delay_from_secs(value: f64) -> Duration {
    if value.is_finite() {
        Duration::from_secs_f64(value.clamp(0.0, MAX_DELAY_SECS))
    } else {
        Duration::from_secs_f64(if value == f64::INFINITY {
            MAX_DELAY_SECS
        } else {
            0.0
        })
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let list = match &cli.words {
        Some(raw) => WordList::from_words(
            "custom",
            raw.split_whitespace().map(str::to_string).collect(),
        )?,
        None => WordList::load(cli.word_list.file_name())?,
    };

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    if cli.track {
        config.track_performance = true;
    }
    if cli.no_track {
        config.track_performance = false;
    }
    if cli.track || cli.no_track {
        let _ = config_store.save(&config);
    }

    let list_name = list.name.clone();
    let list_size = list.words.len();
    let game = Game::new(
        list,
        Box::new(FileHistoryStore::new()),
        config.track_performance,
        cli.max_attempts,
    );

    let flash = delay_from_secs(cli.flash_secs);
    let cooldown = delay_from_secs(cli.cooldown_secs);

    println!(
        "dikt — practicing '{list_name}' ({list_size} words), tracking {}",
        if config.track_performance { "on" } else { "off" }
    );
    println!("type the word after it disappears. enter submits, ctrl-r shows the word again,");
    println!("ctrl-t toggles tracking, esc quits.");
    println!();

    enable_raw_mode()?;
    let outcome = run(game, &config_store, config, flash, cooldown);
    disable_raw_mode()?;
    let board = outcome?;

    println!();
    println!(
        "session over: {} solved — diamond {}, gold {}, silver {}, bronze {}",
        board.solved(),
        board.diamond,
        board.gold,
        board.silver,
        board.bronze
    );
    Ok(())
}

fn run(
    mut game: Game,
    config_store: &FileConfigStore,
    mut config: Config,
    flash: Duration,
    cooldown: Duration,
) -> io::Result<ScoreBoard> {
    let mut out = io::stdout();
    let mut pump = Pump::new(CrosstermKeySource);
    let mut buffer = String::new();

    show_word(&mut out, game.target())?;
    pump.deadlines.arm(Deadline::Mask, flash);

    loop {
        match pump.next()? {
            LoopEvent::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                let revealing = pump.deadlines.is_armed(Deadline::Advance);
                match (key.code, key.modifiers) {
                    (KeyCode::Esc, _) => break,
                    (KeyCode::Char('c'), KeyModifiers::CONTROL) => break,
                    (KeyCode::Char('r'), KeyModifiers::CONTROL) => {
                        if !revealing {
                            show_word(&mut out, game.target())?;
                            pump.deadlines.arm(Deadline::Mask, flash);
                        }
                    }
                    (KeyCode::Char('t'), KeyModifiers::CONTROL) => {
                        config.track_performance = !config.track_performance;
                        game.set_tracking_enabled(config.track_performance);
                        let _ = config_store.save(&config);
                        print_notice(
                            &mut out,
                            if config.track_performance {
                                "tracking on: hard words will come up more often"
                            } else {
                                "tracking off: words cycle in shuffled order"
                            },
                        )?;
                        redraw_input(&mut out, &buffer)?;
                    }
                    (KeyCode::Backspace, _) => {
                        buffer.pop();
                        redraw_input(&mut out, &buffer)?;
                    }
                    (KeyCode::Enter, _) => {
                        if revealing {
                            continue;
                        }
                        let submitted = std::mem::take(&mut buffer);
                        match game.submit_guess(&submitted) {
                            Some(GuessOutcome::Solved {
                                grading,
                                attempts,
                                tier,
                            }) => {
                                print_graded(&mut out, &submitted, &grading.marks, " ✓")?;
                                print_notice(
                                    &mut out,
                                    &format!("{} (attempt {attempts})", tier.label()),
                                )?;
                                game.advance();
                                show_word(&mut out, game.target())?;
                                pump.deadlines.arm(Deadline::Mask, flash);
                            }
                            Some(GuessOutcome::Wrong {
                                grading,
                                attempts_left,
                            }) => {
                                print_graded(&mut out, &submitted, &grading.marks, " ✗")?;
                                print_notice(
                                    &mut out,
                                    &format!(
                                        "{attempts_left} {} left",
                                        if attempts_left == 1 { "try" } else { "tries" }
                                    ),
                                )?;
                                redraw_input(&mut out, &buffer)?;
                            }
                            Some(GuessOutcome::OutOfTries { grading, answer }) => {
                                print_graded(&mut out, &submitted, &grading.marks, " ✗")?;
                                print_notice(&mut out, &format!("the word was '{answer}'"))?;
                                pump.deadlines.cancel(Deadline::Mask);
                                pump.deadlines.arm(Deadline::Advance, cooldown);
                            }
                            None => redraw_input(&mut out, &buffer)?,
                        }
                    }
                    (KeyCode::Char(ch), mods)
                        if ch.is_ascii_alphabetic()
                            && (mods.is_empty() || mods == KeyModifiers::SHIFT) =>
                    {
                        if !revealing {
                            buffer.push(ch.to_ascii_lowercase());
                            redraw_input(&mut out, &buffer)?;
                        }
                    }
                    _ => {}
                }
            }
            LoopEvent::Due(Deadline::Mask) => {
                redraw_input(&mut out, &buffer)?;
            }
            LoopEvent::Due(Deadline::Advance) => {
                game.advance();
                show_word(&mut out, game.target())?;
                pump.deadlines.arm(Deadline::Mask, flash);
            }
        }
    }

    Ok(game.score_board().clone())
}

fn show_word(out: &mut impl Write, word: &str) -> io::Result<()> {
    queue!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        SetForegroundColor(Color::Cyan),
        Print("hear ▸ "),
        ResetColor,
        Print(word)
    )?;
    out.flush()
}

fn redraw_input(out: &mut impl Write, buffer: &str) -> io::Result<()> {
    queue!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print("type ▸ "),
        Print(buffer)
    )?;
    out.flush()
}

fn print_notice(out: &mut impl Write, msg: &str) -> io::Result<()> {
    queue!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        SetForegroundColor(Color::DarkGrey),
        Print(msg),
        ResetColor,
        Print("\r\n")
    )?;
    out.flush()
}

fn print_graded(
    out: &mut impl Write,
    guess: &str,
    marks: &[LetterMark],
    suffix: &str,
) -> io::Result<()> {
    queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    for (ch, mark) in guess.chars().zip(marks.iter()) {
        let color = match mark {
            LetterMark::Exact => Color::Green,
            LetterMark::Present => Color::Yellow,
            LetterMark::Absent => Color::DarkGrey,
        };
        queue!(out, SetForegroundColor(color), Print(ch))?;
    }
    queue!(out, ResetColor, Print(suffix), Print("\r\n"))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_clamps_out_of_range_values() {
        assert_eq!(delay_from_secs(1.5), Duration::from_secs_f64(1.5));
        assert_eq!(delay_from_secs(0.0), Duration::ZERO);
        assert_eq!(delay_from_secs(-4.0), Duration::ZERO);
        assert_eq!(
            delay_from_secs(1e300),
            Duration::from_secs_f64(MAX_DELAY_SECS)
        );
    }

    #[test]
    fn delay_handles_non_finite_values() {
        assert_eq!(
            delay_from_secs(f64::INFINITY),
            Duration::from_secs_f64(MAX_DELAY_SECS)
        );
        assert_eq!(delay_from_secs(f64::NEG_INFINITY), Duration::ZERO);
        assert_eq!(delay_from_secs(f64::NAN), Duration::ZERO);
    }
}

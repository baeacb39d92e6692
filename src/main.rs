mod error;
mod game;
mod quiz;

use std::io::{self, BufRead, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use dotenv::dotenv;
use error::Result;
use game::{Event, Game, Phase};
use log::{debug, info, warn};
use quiz::lifeline::{Dice, Lifeline, LifelineOutcome};
use quiz::{Question, Quiz, OPTION_LABELS};
use rand::rngs::StdRng;
use rand::SeedableRng;

const WELCOME_TEXT: &str = "Welcome to Who Wants to Be a Millionaire? (Console Version)";
const RULES_TEXT: &str = "Rules: Type A/B/C/D to answer. Type L to use a lifeline. Type Q to walk away.";
const CHOICE_PROMPT: &str =
    "\nEnter your choice (A/B/C/D), L for lifeline, Q to quit and take winnings: ";
const LIFELINE_PROMPT: &str = "Select lifeline number (or any other key to cancel): ";

fn main() -> Result<()> {
    dotenv().ok();

    pretty_env_logger::init();
    info!("Starting quiz...");

    let quiz = Quiz::embedded()?;
    info!(
        "Loaded {} questions, top prize {}",
        quiz.len(),
        quiz.top_prize()
    );

    // Seeded once per process so consecutive runs play differently
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    debug!("Seeding dice with {}", seed);

    let mut game = Game::new(quiz, StdRng::seed_from_u64(seed));
    let winnings = play(&mut game, io::stdin().lock(), io::stdout().lock())?;

    info!("Game ended as {:?}, player keeps {}", game.phase(), winnings);
    Ok(())
}

/// Runs the game to a terminal phase over the given console, returning the winnings.
fn play<D: Dice>(game: &mut Game<D>, mut input: impl BufRead, mut output: impl Write) -> Result<u32> {
    writeln!(output, "{}", WELCOME_TEXT)?;
    writeln!(output, "{}", RULES_TEXT)?;

    while !game.phase().is_over() {
        match game.phase() {
            Phase::AwaitingLifelineChoice(_) => write!(output, "{}", LIFELINE_PROMPT)?,
            _ => {
                if let Some(question) = game.current_question() {
                    show_question(&mut output, question, game)?;
                }
                write!(output, "{}", CHOICE_PROMPT)?;
            }
        }
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // Nothing more will ever arrive, so take the money instead of prompting forever
            warn!("Input closed, walking away");
            writeln!(output)?;
            render(&mut output, &Event::InvalidInput)?;
            let event = game.walk_away();
            render(&mut output, &event)?;
            break;
        }

        let event = game.handle(&line)?;
        debug!("{:?} -> {:?}", line.trim_end(), event);
        render(&mut output, &event)?;
    }

    output.flush()?;
    Ok(game.winnings())
}

fn show_question<D: Dice>(output: &mut impl Write, question: &Question, game: &Game<D>) -> Result<()> {
    writeln!(output, "\nQuestion for Rs {}:", question.prize)?;
    writeln!(output, "{}", question.text)?;
    for (index, option) in question.options.iter().enumerate() {
        if game.visibility().is_shown(index) {
            writeln!(output, "  {}) {}", OPTION_LABELS[index], option)?;
        } else {
            writeln!(output, "  {}) ---", OPTION_LABELS[index])?;
        }
    }
    Ok(())
}

fn render(output: &mut impl Write, event: &Event) -> Result<()> {
    match event {
        Event::InvalidInput => writeln!(output, "Invalid input. Try again.")?,
        Event::InvalidChoice => writeln!(output, "Invalid choice. Use A/B/C/D, L, or Q.")?,
        Event::OptionHidden => writeln!(
            output,
            "That option is not available. Choose a shown option."
        )?,
        Event::Correct { prize } => writeln!(output, "Correct! You have won Rs {}.", prize)?,
        Event::WrongAnswer {
            correct_index,
            correct_option,
            winnings,
        } => {
            writeln!(
                output,
                "Wrong answer. The correct answer was {}) {}",
                OPTION_LABELS[*correct_index], correct_option
            )?;
            writeln!(output, "You leave with Rs {} (guaranteed).", winnings)?;
        }
        Event::WalkedAway { winnings } => writeln!(
            output,
            "You chose to walk away with Rs {}. Congratulations!",
            winnings
        )?,
        Event::Won { winnings } => {
            writeln!(output, "Correct! You have won Rs {}.", winnings)?;
            writeln!(
                output,
                "\nCONGRATULATIONS! You answered all questions and won Rs {}!",
                winnings
            )?;
        }
        Event::LifelineMenu(available) => {
            writeln!(output, "\nAvailable lifelines:")?;
            for lifeline in available {
                writeln!(output, "  {}) {}", lifeline.selector(), lifeline.title())?;
            }
        }
        Event::LifelineUsed(lifeline, outcome) => render_lifeline(output, *lifeline, outcome)?,
        Event::NoLifelineUsed => writeln!(output, "No lifeline used.")?,
        Event::GameOver { winnings } => {
            writeln!(output, "The game is over. You leave with Rs {}.", winnings)?
        }
    }
    Ok(())
}

fn render_lifeline(
    output: &mut impl Write,
    lifeline: Lifeline,
    outcome: &LifelineOutcome,
) -> Result<()> {
    match outcome {
        LifelineOutcome::OptionsRemoved => writeln!(
            output,
            "{} lifeline used. Two wrong answers removed.",
            lifeline.title()
        )?,
        LifelineOutcome::FriendSuggests(index) => writeln!(
            output,
            "You called a friend. They think the answer is: {}",
            OPTION_LABELS[*index]
        )?,
        LifelineOutcome::AudiencePoll(poll) => {
            writeln!(output, "Audience poll results (percent):")?;
            for (index, share) in poll.iter().enumerate() {
                match share {
                    Some(share) => writeln!(output, "  {}: {}%", OPTION_LABELS[index], share)?,
                    None => writeln!(output, "  {}: --", OPTION_LABELS[index])?,
                }
            }
        }
    }
    Ok(())
}

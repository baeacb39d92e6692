use std::collections::HashSet;

use log::{debug, info};

use crate::error::Result;
use crate::quiz::lifeline::{use_lifeline, Dice, Lifeline, LifelineOutcome};
use crate::quiz::visibility::Visibility;
use crate::quiz::{Question, Quiz, OPTION_LABELS};

/// Question indices whose correct answer raises the guaranteed money.
pub const MILESTONES: [usize; 2] = [2, 6];

/// Money and lifeline bookkeeping for one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GameState {
    pub current_prize: u32,
    pub guaranteed_money: u32,
    pub lifelines_used: HashSet<Lifeline>,
    pub question_index: usize,
}

impl GameState {
    pub fn is_available(&self, lifeline: Lifeline) -> bool {
        !self.lifelines_used.contains(&lifeline)
    }

    pub fn available_lifelines(&self) -> Vec<Lifeline> {
        Lifeline::ALL
            .into_iter()
            .filter(|l| self.is_available(*l))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Phase {
    Presenting(usize),
    AwaitingLifelineChoice(usize),
    WalkedAway,
    Lost,
    Won,
}

impl Phase {
    pub fn is_over(&self) -> bool {
        matches!(self, Phase::WalkedAway | Phase::Lost | Phase::Won)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Answer(usize),
    RequestLifeline,
    WalkAway,
}

impl Command {
    pub fn parse(choice: char) -> Option<Self> {
        match choice {
            'A'..='D' => Some(Command::Answer(choice as usize - 'A' as usize)),
            'L' => Some(Command::RequestLifeline),
            'Q' => Some(Command::WalkAway),
            _ => None,
        }
    }
}

/// First non-whitespace character of a line, uppercased.
pub fn read_choice(line: &str) -> Option<char> {
    line.chars()
        .find(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
}

/// Everything the player gets told after one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Empty or unreadable line.
    InvalidInput,
    /// A character that is not a command.
    InvalidChoice,
    OptionHidden,
    Correct { prize: u32 },
    WrongAnswer {
        correct_index: usize,
        correct_option: String,
        winnings: u32,
    },
    WalkedAway { winnings: u32 },
    Won { winnings: u32 },
    LifelineMenu(Vec<Lifeline>),
    LifelineUsed(Lifeline, LifelineOutcome),
    NoLifelineUsed,
    /// Input arrived after the game had already ended.
    GameOver { winnings: u32 },
}

pub struct Game<D: Dice> {
    quiz: Quiz,
    state: GameState,
    visibility: Visibility,
    phase: Phase,
    dice: D,
}

impl<D: Dice> Game<D> {
    pub fn new(quiz: Quiz, dice: D) -> Self {
        Self {
            quiz,
            state: GameState::default(),
            visibility: Visibility::new(),
            phase: Phase::Presenting(0),
            dice,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    /// The question on screen, `None` once the game is over.
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::Presenting(index) | Phase::AwaitingLifelineChoice(index) => {
                self.quiz.get(index).ok()
            }
            _ => None,
        }
    }

    /// What the player leaves with if the game ended now.
    pub fn winnings(&self) -> u32 {
        match self.phase {
            Phase::Lost => self.state.guaranteed_money,
            _ => self.state.current_prize,
        }
    }

    /// Feeds one line of player input into the state machine.
    pub fn handle(&mut self, line: &str) -> Result<Event> {
        let choice = read_choice(line);
        match self.phase {
            Phase::Presenting(index) => {
                let Some(choice) = choice else {
                    return Ok(Event::InvalidInput);
                };
                match Command::parse(choice) {
                    Some(Command::WalkAway) => Ok(self.walk_away()),
                    Some(Command::RequestLifeline) => {
                        self.phase = Phase::AwaitingLifelineChoice(index);
                        Ok(Event::LifelineMenu(self.state.available_lifelines()))
                    }
                    Some(Command::Answer(option)) => self.answer(index, option),
                    None => Ok(Event::InvalidChoice),
                }
            }
            Phase::AwaitingLifelineChoice(index) => {
                self.phase = Phase::Presenting(index);
                let lifeline = choice
                    .and_then(Lifeline::from_selector)
                    .filter(|l| self.state.is_available(*l));
                match lifeline {
                    Some(lifeline) => self.lifeline(index, lifeline),
                    None => Ok(Event::NoLifelineUsed),
                }
            }
            Phase::WalkedAway | Phase::Lost | Phase::Won => Ok(Event::GameOver {
                winnings: self.winnings(),
            }),
        }
    }

    /// Ends the game keeping the current prize.
    pub fn walk_away(&mut self) -> Event {
        if self.phase.is_over() {
            return Event::GameOver {
                winnings: self.winnings(),
            };
        }
        self.phase = Phase::WalkedAway;
        info!("Player walks away with {}", self.state.current_prize);
        Event::WalkedAway {
            winnings: self.state.current_prize,
        }
    }

    fn lifeline(&mut self, index: usize, lifeline: Lifeline) -> Result<Event> {
        let question = self.quiz.get(index)?;
        self.state.lifelines_used.insert(lifeline);
        let outcome = use_lifeline(lifeline, question, &mut self.visibility, &mut self.dice);
        debug!("Lifeline {:?} on question {}: {:?}", lifeline, index, outcome);
        Ok(Event::LifelineUsed(lifeline, outcome))
    }

    fn answer(&mut self, index: usize, option: usize) -> Result<Event> {
        if !self.visibility.is_shown(option) {
            return Ok(Event::OptionHidden);
        }

        let question = self.quiz.get(index)?;
        if option != question.correct_index {
            self.phase = Phase::Lost;
            info!(
                "Wrong answer {} on question {}, player keeps {}",
                OPTION_LABELS[option], index, self.state.guaranteed_money
            );
            return Ok(Event::WrongAnswer {
                correct_index: question.correct_index,
                correct_option: question.correct_option().to_string(),
                winnings: self.state.guaranteed_money,
            });
        }

        let prize = question.prize;
        self.state.current_prize = prize;
        if MILESTONES.contains(&index) {
            self.state.guaranteed_money = prize;
            info!("Milestone reached, {} is now guaranteed", prize);
        }

        if index == self.quiz.last_index() {
            self.phase = Phase::Won;
            info!("All questions answered, player wins {}", prize);
            return Ok(Event::Won { winnings: prize });
        }

        self.state.question_index = index + 1;
        self.visibility.reset();
        self.phase = Phase::Presenting(index + 1);
        debug!("Advancing to question {}", index + 1);
        Ok(Event::Correct { prize })
    }
}

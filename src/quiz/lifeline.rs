use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

use super::visibility::Visibility;
use super::{Question, OPTION_COUNT};

/// Chance out of 100 that the friend on the phone names the right answer.
pub const PHONE_ACCURACY: usize = 70;
/// Every visible option starts the audience poll with this share.
pub const AUDIENCE_BASE: u32 = 20;
/// Extra share the audience always gives the correct option.
pub const AUDIENCE_BONUS: u32 = 50;

/// Source of randomness for the lifelines.
pub trait Dice {
    /// Uniform pick in `0..upper`. `upper` is never 0.
    fn roll(&mut self, upper: usize) -> usize;
}

impl Dice for StdRng {
    fn roll(&mut self, upper: usize) -> usize {
        self.gen_range(0..upper)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Lifeline {
    FiftyFifty,
    PhoneAFriend,
    AskTheAudience,
}

impl Lifeline {
    pub const ALL: [Lifeline; 3] = [
        Lifeline::FiftyFifty,
        Lifeline::PhoneAFriend,
        Lifeline::AskTheAudience,
    ];

    pub fn from_selector(selector: char) -> Option<Self> {
        match selector {
            '1' => Some(Lifeline::FiftyFifty),
            '2' => Some(Lifeline::PhoneAFriend),
            '3' => Some(Lifeline::AskTheAudience),
            _ => None,
        }
    }

    pub fn selector(&self) -> char {
        match self {
            Lifeline::FiftyFifty => '1',
            Lifeline::PhoneAFriend => '2',
            Lifeline::AskTheAudience => '3',
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Lifeline::FiftyFifty => "50:50",
            Lifeline::PhoneAFriend => "Phone a friend",
            Lifeline::AskTheAudience => "Ask the audience",
        }
    }
}

/// What the player learns from a lifeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifelineOutcome {
    /// Two wrong options were hidden.
    OptionsRemoved,
    /// Option index the friend suggests.
    FriendSuggests(usize),
    /// Percentage per option; `None` for hidden options.
    AudiencePoll([Option<u32>; OPTION_COUNT]),
}

pub fn use_lifeline(
    lifeline: Lifeline,
    question: &Question,
    visibility: &mut Visibility,
    dice: &mut impl Dice,
) -> LifelineOutcome {
    match lifeline {
        Lifeline::FiftyFifty => {
            fifty_fifty(question, visibility, dice);
            LifelineOutcome::OptionsRemoved
        }
        Lifeline::PhoneAFriend => {
            LifelineOutcome::FriendSuggests(phone_a_friend(question, visibility, dice))
        }
        Lifeline::AskTheAudience => {
            LifelineOutcome::AudiencePoll(ask_the_audience(question, visibility, dice))
        }
    }
}

/// Hides two of the three wrong options, chosen uniformly.
pub fn fifty_fifty(question: &Question, visibility: &mut Visibility, dice: &mut impl Dice) {
    let mut wrongs = question.wrong_indices();

    // Fisher-Yates, the first two after shuffling get removed
    for i in (1..wrongs.len()).rev() {
        let j = dice.roll(i + 1);
        wrongs.swap(i, j);
    }

    for index in wrongs.iter().take(2) {
        visibility.hide(*index);
    }
    debug!("50:50 removed options {:?}", &wrongs[..2]);
}

/// Returns the option index the friend thinks is right. Never touches visibility.
pub fn phone_a_friend(question: &Question, visibility: &Visibility, dice: &mut impl Dice) -> usize {
    if dice.roll(100) < PHONE_ACCURACY {
        debug!("Friend knows the answer");
        return question.correct_index;
    }

    let candidates = question
        .wrong_indices()
        .into_iter()
        .filter(|i| visibility.is_shown(*i))
        .collect::<Vec<_>>();

    // Nothing wrong left to guess, so the friend can only be right
    if candidates.is_empty() {
        return question.correct_index;
    }

    let guess = candidates[dice.roll(candidates.len())];
    debug!("Friend guesses wrong option {}", guess);
    guess
}

/// Synthetic audience poll over the visible options, summing to 100.
///
/// The correct option gets `AUDIENCE_BASE + AUDIENCE_BONUS`. Visible wrong
/// options get `AUDIENCE_BASE` each, lowered when there are too many of them
/// to fit in the remaining share. Whatever is left over goes one point at a
/// time to uniformly chosen visible options.
pub fn ask_the_audience(
    question: &Question,
    visibility: &Visibility,
    dice: &mut impl Dice,
) -> [Option<u32>; OPTION_COUNT] {
    let mut poll = [None; OPTION_COUNT];
    let visible = visibility.shown_indices();
    if visible.is_empty() {
        return poll;
    }

    let visible_wrongs = visible
        .iter()
        .filter(|i| **i != question.correct_index)
        .count() as u32;
    let favoured = AUDIENCE_BASE + AUDIENCE_BONUS;
    let wrong_base = if visible_wrongs == 0 {
        0
    } else {
        AUDIENCE_BASE.min((100 - favoured) / visible_wrongs)
    };

    for index in &visible {
        poll[*index] = Some(if *index == question.correct_index {
            favoured
        } else {
            wrong_base
        });
    }

    let assigned: u32 = poll.iter().flatten().sum();
    let mut remaining = 100u32.saturating_sub(assigned);
    while remaining > 0 {
        let index = visible[dice.roll(visible.len())];
        if let Some(share) = poll[index].as_mut() {
            *share += 1;
        }
        remaining -= 1;
    }

    debug!("Audience poll: {:?}", poll);
    poll
}

/// Replays a fixed list of rolls.
#[cfg(test)]
pub struct ScriptedDice {
    rolls: std::collections::VecDeque<usize>,
}

#[cfg(test)]
impl ScriptedDice {
    pub fn new(rolls: &[usize]) -> Self {
        Self {
            rolls: rolls.iter().copied().collect(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.rolls.is_empty()
    }
}

#[cfg(test)]
impl Dice for ScriptedDice {
    fn roll(&mut self, upper: usize) -> usize {
        let roll = self.rolls.pop_front().expect("ran out of scripted rolls");
        assert!(roll < upper, "scripted roll {} is not below {}", roll, upper);
        roll
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn question(correct_index: usize) -> Question {
        Question::new(
            "Which one?".to_string(),
            [
                "alpha".to_string(),
                "beta".to_string(),
                "gamma".to_string(),
                "delta".to_string(),
            ],
            correct_index,
            1000,
        )
    }

    #[test]
    fn selectors_map_to_lifelines() {
        for lifeline in Lifeline::ALL {
            assert_eq!(Lifeline::from_selector(lifeline.selector()), Some(lifeline));
        }
        assert_eq!(Lifeline::from_selector('4'), None);
        assert_eq!(Lifeline::from_selector('A'), None);
    }

    #[test]
    fn fifty_fifty_hides_scripted_pair() {
        let question = question(0);
        let mut visibility = Visibility::new();
        // [1, 2, 3] -> swap(2, 0) -> [3, 2, 1] -> swap(1, 1)
        let mut dice = ScriptedDice::new(&[0, 1]);

        fifty_fifty(&question, &mut visibility, &mut dice);

        assert_eq!(visibility.shown_indices(), vec![0, 1]);
        assert!(dice.is_exhausted());
    }

    #[test]
    fn fifty_fifty_never_hides_the_answer() {
        let mut rng = StdRng::seed_from_u64(7);
        for correct_index in 0..OPTION_COUNT {
            for _ in 0..200 {
                let question = question(correct_index);
                let mut visibility = Visibility::new();
                fifty_fifty(&question, &mut visibility, &mut rng);

                assert!(visibility.is_shown(correct_index));
                assert_eq!(visibility.shown_count(), 2);
            }
        }
    }

    #[test]
    fn fifty_fifty_can_leave_any_wrong_option() {
        let mut rng = StdRng::seed_from_u64(11);
        let question = question(2);
        let mut survivors = std::collections::HashSet::new();
        for _ in 0..300 {
            let mut visibility = Visibility::new();
            fifty_fifty(&question, &mut visibility, &mut rng);
            survivors.extend(visibility.shown_indices().into_iter().filter(|i| *i != 2));
        }
        assert_eq!(survivors.len(), 3);
    }

    #[test]
    fn friend_is_right_below_threshold() {
        let question = question(3);
        let visibility = Visibility::new();
        let mut dice = ScriptedDice::new(&[69]);
        assert_eq!(phone_a_friend(&question, &visibility, &mut dice), 3);
        assert!(dice.is_exhausted());
    }

    #[test]
    fn friend_guesses_among_visible_wrongs() {
        let question = question(0);
        let mut visibility = Visibility::new();
        visibility.hide(1);
        visibility.hide(2);
        // Only option 3 is a visible wrong answer
        let mut dice = ScriptedDice::new(&[70, 0]);
        assert_eq!(phone_a_friend(&question, &visibility, &mut dice), 3);
        assert_eq!(visibility.shown_count(), 2);
    }

    #[test]
    fn friend_falls_back_to_answer_without_visible_wrongs() {
        let question = question(1);
        let mut visibility = Visibility::new();
        visibility.hide(0);
        visibility.hide(2);
        visibility.hide(3);
        let mut dice = ScriptedDice::new(&[99]);
        assert_eq!(phone_a_friend(&question, &visibility, &mut dice), 1);
        assert!(dice.is_exhausted());
    }

    #[test]
    fn audience_after_fifty_fifty_matches_scripted_rolls() {
        let question = question(2);
        let mut visibility = Visibility::new();
        visibility.hide(0);
        visibility.hide(3);
        // 70 + 20 assigned, 10 left over: 7 to option 1, 3 to option 2
        let rolls = [0, 0, 0, 0, 0, 0, 0, 1, 1, 1];
        let mut dice = ScriptedDice::new(&rolls);

        let poll = ask_the_audience(&question, &visibility, &mut dice);

        assert_eq!(poll, [None, Some(27), Some(73), None]);
        assert!(dice.is_exhausted());
    }

    #[test]
    fn audience_with_all_options_visible_sums_to_100() {
        let question = question(1);
        let visibility = Visibility::new();
        let mut dice = ScriptedDice::new(&[]);

        let poll = ask_the_audience(&question, &visibility, &mut dice);

        assert_eq!(poll, [Some(10), Some(70), Some(10), Some(10)]);
    }

    #[test]
    fn audience_poll_invariants_hold() {
        let mut rng = StdRng::seed_from_u64(42);
        for correct_index in 0..OPTION_COUNT {
            for _ in 0..100 {
                let question = question(correct_index);
                let mut visibility = Visibility::new();
                if rng.gen_bool(0.5) {
                    fifty_fifty(&question, &mut visibility, &mut rng);
                }
                let poll = ask_the_audience(&question, &visibility, &mut rng);

                assert_eq!(poll.iter().flatten().sum::<u32>(), 100);
                assert!(poll[correct_index].unwrap() >= AUDIENCE_BASE + AUDIENCE_BONUS);
                for index in 0..OPTION_COUNT {
                    assert_eq!(poll[index].is_some(), visibility.is_shown(index));
                }
            }
        }
    }

    #[test]
    fn use_lifeline_dispatches() {
        let question = question(0);
        let mut visibility = Visibility::new();
        let mut dice = ScriptedDice::new(&[10]);
        assert_eq!(
            use_lifeline(Lifeline::PhoneAFriend, &question, &mut visibility, &mut dice),
            LifelineOutcome::FriendSuggests(0)
        );

        let mut dice = ScriptedDice::new(&[0, 0]);
        assert_eq!(
            use_lifeline(Lifeline::FiftyFifty, &question, &mut visibility, &mut dice),
            LifelineOutcome::OptionsRemoved
        );
        assert_eq!(visibility.shown_count(), 2);
    }
}

pub mod lifeline;
pub mod visibility;

use crate::error::{QuizError, Result};

pub const QUESTION_COUNT: usize = 12;
pub const OPTION_COUNT: usize = 4;
pub const OPTION_LABELS: [char; OPTION_COUNT] = ['A', 'B', 'C', 'D'];

const EMBEDDED_QUESTIONS: &str = include_str!("questions.json");

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub correct_index: usize,
    pub prize: u32,
}
impl Question {
    pub fn new(text: String, options: [String; OPTION_COUNT], correct_index: usize, prize: u32) -> Self {
        Self {
            text,
            options,
            correct_index,
            prize,
        }
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    /// Indices of the three options that are not the answer, in label order.
    pub fn wrong_indices(&self) -> Vec<usize> {
        (0..OPTION_COUNT).filter(|i| *i != self.correct_index).collect()
    }
}

/// The ordered, read-only question bank a game is played through.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Quiz {
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn new(questions: Vec<Question>) -> Result<Self> {
        if questions.len() != QUESTION_COUNT {
            return Err(QuizError::WrongQuestionCount {
                expected: QUESTION_COUNT,
                found: questions.len(),
            });
        }

        let mut previous_prize = 0;
        for (index, question) in questions.iter().enumerate() {
            if question.correct_index >= OPTION_COUNT {
                return Err(QuizError::CorrectIndexOutOfRange {
                    index,
                    correct_index: question.correct_index,
                });
            }
            // Prizes start above zero and strictly increase
            if question.prize <= previous_prize {
                return Err(QuizError::PrizesNotIncreasing {
                    index,
                    prize: question.prize,
                });
            }
            previous_prize = question.prize;
        }

        Ok(Self { questions })
    }

    /// Loads the bank shipped inside the binary.
    pub fn embedded() -> Result<Self> {
        let questions: Vec<Question> = serde_json::from_str(EMBEDDED_QUESTIONS)?;
        Self::new(questions)
    }

    pub fn get(&self, index: usize) -> Result<&Question> {
        self.questions
            .get(index)
            .ok_or(QuizError::NoSuchQuestion(index))
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn last_index(&self) -> usize {
        self.questions.len() - 1
    }

    pub fn top_prize(&self) -> u32 {
        self.questions.last().map(|q| q.prize).unwrap_or(0)
    }
}

//! Error types for the quiz.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Failed to parse the question bank: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Question bank must hold {expected} questions, found {found}")]
    WrongQuestionCount { expected: usize, found: usize },

    #[error("Question {index} marks option {correct_index} as correct, but only 0..=3 exist")]
    CorrectIndexOutOfRange { index: usize, correct_index: usize },

    #[error("Question {index} pays {prize}, which is not more than the previous question")]
    PrizesNotIncreasing { index: usize, prize: u32 },

    #[error("There is no question number {0}")]
    NoSuchQuestion(usize),

    #[error("Console error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, QuizError>;

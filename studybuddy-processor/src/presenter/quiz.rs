//! Quiz session view model
//!
//! Records one answer per question. Answers are final once given. The
//! score is only available after every question has been answered.

use crate::models::{QuizData, QuizQuestion};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufRead, Write};
use thiserror::Error;

/// Quiz interaction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("No question at index {0}")]
    NoSuchQuestion(usize),

    #[error("Question {question} has no option {option}")]
    NoSuchOption { question: usize, option: usize },

    #[error("Question {0} has already been answered")]
    AlreadyAnswered(usize),

    #[error("{answered} of {total} questions answered")]
    Incomplete { answered: usize, total: usize },
}

/// Final quiz result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizScore {
    /// Correct answers
    pub score: usize,
    /// Questions in the quiz
    pub total: usize,
}

impl fmt::Display for QuizScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} out of {}", self.score, self.total)
    }
}

#[derive(Debug, Clone)]
pub struct QuizSession<'a> {
    quiz: &'a QuizData,
    answers: Vec<Option<usize>>,
}

impl<'a> QuizSession<'a> {
    pub fn new(quiz: &'a QuizData) -> Self {
        Self {
            quiz,
            answers: vec![None; quiz.questions.len()],
        }
    }

    pub fn title(&self) -> &'a str {
        &self.quiz.title
    }

    pub fn questions(&self) -> &'a [QuizQuestion] {
        &self.quiz.questions
    }

    pub fn total(&self) -> usize {
        self.quiz.questions.len()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.answered_count() == self.total()
    }

    /// Option chosen for a question, if any
    pub fn answer_for(&self, question_index: usize) -> Option<usize> {
        self.answers.get(question_index).copied().flatten()
    }

    /// Record an answer; returns whether it was correct
    pub fn answer(&mut self, question_index: usize, option_index: usize) -> Result<bool, QuizError> {
        let question = self
            .quiz
            .questions
            .get(question_index)
            .ok_or(QuizError::NoSuchQuestion(question_index))?;

        if option_index >= question.options.len() {
            return Err(QuizError::NoSuchOption {
                question: question_index,
                option: option_index,
            });
        }

        let slot = &mut self.answers[question_index];
        if slot.is_some() {
            return Err(QuizError::AlreadyAnswered(question_index));
        }
        *slot = Some(option_index);

        Ok(question.is_correct(option_index))
    }

    /// Correct answers so far
    pub fn correct_count(&self) -> usize {
        self.quiz
            .questions
            .iter()
            .zip(&self.answers)
            .filter(|(q, a)| a.is_some_and(|chosen| q.is_correct(chosen)))
            .count()
    }

    /// Final score once every question is answered
    pub fn finish(&self) -> Result<QuizScore, QuizError> {
        if !self.is_complete() {
            return Err(QuizError::Incomplete {
                answered: self.answered_count(),
                total: self.total(),
            });
        }
        Ok(QuizScore {
            score: self.correct_count(),
            total: self.total(),
        })
    }
}

/// Run a quiz over a line-oriented terminal
///
/// Options are numbered from 1. Questions the session already holds an
/// answer for are skipped. Invalid input re-prompts; end of input abandons
/// the quiz and returns `Ok(None)`.
pub fn take_quiz<R: BufRead, W: Write>(
    session: &mut QuizSession<'_>,
    mut input: R,
    mut output: W,
) -> std::io::Result<Option<QuizScore>> {
    writeln!(output, "{}", session.title())?;

    for (index, question) in session.questions().iter().enumerate() {
        if session.answer_for(index).is_some() {
            continue;
        }

        writeln!(output)?;
        writeln!(output, "Question {} of {}: {}", index + 1, session.total(), question.question)?;
        for (option_index, option) in question.options.iter().enumerate() {
            writeln!(output, "  {}. {}", option_index + 1, option)?;
        }

        loop {
            write!(output, "Your answer (1-{}): ", question.options.len())?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            let choice = match line.trim().parse::<usize>() {
                Ok(n) if n >= 1 => n - 1,
                _ => {
                    writeln!(output, "Please enter a number.")?;
                    continue;
                }
            };

            match session.answer(index, choice) {
                Ok(true) => {
                    writeln!(output, "Correct!")?;
                    break;
                }
                Ok(false) => {
                    let correct = question
                        .options
                        .get(question.correct_answer_index)
                        .map(String::as_str)
                        .unwrap_or("?");
                    writeln!(output, "Incorrect. The answer is: {}", correct)?;
                    break;
                }
                Err(e) => writeln!(output, "{}", e)?,
            }
        }
    }

    match session.finish() {
        Ok(score) => {
            writeln!(output)?;
            writeln!(output, "You scored {}.", score)?;
            Ok(Some(score))
        }
        Err(_) => Ok(None),
    }
}

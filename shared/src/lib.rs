//! Line-oriented text protocol shared by the guessing-game server and client.
//!
//! Every message is plain UTF-8 text terminated by `\n`. Clients send one
//! integer per line; the server answers privately with low/high feedback or
//! a parse error, and announces a correct guess to everybody.

use std::cmp::Ordering;
use std::fmt;
use std::num::ParseIntError;

pub const SECRET_MIN: u32 = 1;
pub const SECRET_MAX: u32 = 100;
pub const DEFAULT_PORT: u16 = 8080;

pub const TOO_LOW_MESSAGE: &str = "guess too low, try again\n";
pub const TOO_HIGH_MESSAGE: &str = "guess too high, try again\n";
/// Sent for lines that are not an integer. The blank line is part of the protocol.
pub const INVALID_GUESS_MESSAGE: &str = "Please send a valid number.\n\n";

/// Result of comparing a guess against the active secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    TooLow,
    TooHigh,
    Correct,
}

impl Feedback {
    pub fn evaluate(guess: i64, secret: u32) -> Self {
        match guess.cmp(&i64::from(secret)) {
            Ordering::Less => Feedback::TooLow,
            Ordering::Greater => Feedback::TooHigh,
            Ordering::Equal => Feedback::Correct,
        }
    }

    /// Text sent only to the guesser. A correct guess has no private reply,
    /// the winner hears about it through the broadcast like everyone else.
    pub fn private_message(&self) -> Option<&'static str> {
        match self {
            Feedback::TooLow => Some(TOO_LOW_MESSAGE),
            Feedback::TooHigh => Some(TOO_HIGH_MESSAGE),
            Feedback::Correct => None,
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::TooLow => write!(f, "too low"),
            Feedback::TooHigh => write!(f, "too high"),
            Feedback::Correct => write!(f, "correct"),
        }
    }
}

/// Parses one received line into a guess.
///
/// Surrounding whitespace (including the line terminator) is ignored. Any
/// integer is accepted, even outside the secret range.
pub fn parse_guess(line: &str) -> Result<i64, ParseIntError> {
    line.trim().parse::<i64>()
}

pub fn winner_announcement(winner: impl fmt::Display) -> String {
    format!("Player {} guessed correctly. Starting a new round!\n", winner)
}

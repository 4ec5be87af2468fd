pub mod config;
pub mod facet;
pub mod message;
pub mod phase;
pub mod phrases;
pub mod scheduler;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

/// A finished post body plus the hashtag it carries, ready for the
/// publishing side to wrap into a post record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    pub text: String,
    pub hashtag: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error("invalid month index: {0} (expected 0-11)")]
    InvalidMonth(usize),
    #[error(
        "unknown moon phase: {input:?} (expected one of: New Moon, Waxing Crescent, \
         First Quarter, Waxing Gibbous, Full Moon, Waning Gibbous, Last Quarter, \
         Waning Crescent)"
    )]
    UnknownPhase { input: String },
}

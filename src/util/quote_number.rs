use chrono::{Local, NaiveDateTime};
use rand::Rng;

pub const QUOTE_NUMBER_PREFIX: &str = "PRS";

/// Source of human-readable quote numbers.
pub trait QuoteNumberGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// `PRS-YYYYMMDD-HHMMSSRR` from the local wall clock and a random two-digit suffix.
///
/// Two submissions in the same second draw from only 100 suffixes; the unique index on
/// `quotes.quote_number` is what actually rejects a duplicate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClockQuoteNumberGenerator;

impl QuoteNumberGenerator for ClockQuoteNumberGenerator {
    fn generate(&self) -> String {
        let suffix = rand::thread_rng().gen_range(0..100u8);
        format_quote_number(Local::now().naive_local(), suffix)
    }
}

pub fn format_quote_number(at: NaiveDateTime, suffix: u8) -> String {
    format!(
        "{}-{}-{}{:02}",
        QUOTE_NUMBER_PREFIX,
        at.format("%Y%m%d"),
        at.format("%H%M%S"),
        suffix % 100
    )
}

/// True when `candidate` has the `PRS-<8 digits>-<8 digits>` shape.
pub fn is_quote_number(candidate: &str) -> bool {
    let mut parts = candidate.split('-');
    let (Some(prefix), Some(date), Some(time), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let eight_digits = |s: &str| s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit());
    prefix == QUOTE_NUMBER_PREFIX && eight_digits(date) && eight_digits(time)
}

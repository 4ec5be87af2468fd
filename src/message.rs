use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::MessageConfig;
use crate::phase::MoonPhase;
use crate::phrases;
use crate::{ComposeError, ComposedMessage, Month};

/// Composes today's post text with the process-wide RNG.
pub fn compose(
    phase: &str,
    illumination_pct: f64,
    month_index: usize,
    config: &MessageConfig,
) -> Result<ComposedMessage, ComposeError> {
    compose_with_rng(
        phase,
        illumination_pct,
        month_index,
        config,
        &mut rand::thread_rng(),
    )
}

/// Composes a post from a phase name, an illumination percentage, and a
/// 0-indexed month. Out-of-range illumination values are formatted as-is;
/// the upstream source occasionally reports them and the message stays
/// honest about what it was given.
pub fn compose_with_rng<R: Rng + ?Sized>(
    phase: &str,
    illumination_pct: f64,
    month_index: usize,
    config: &MessageConfig,
    rng: &mut R,
) -> Result<ComposedMessage, ComposeError> {
    let month =
        Month::from_index(month_index).ok_or(ComposeError::InvalidMonth(month_index))?;
    let phase = MoonPhase::from_name(phase)?;
    let illumination = format!("{:.1}", illumination_pct);

    let base = base_clause(phase, &illumination, rng);
    let mut extras = optional_clauses(month, config, rng);
    extras.shuffle(rng);

    let mut pieces: Vec<&str> = Vec::with_capacity(extras.len() + 2);
    pieces.push(&base);
    pieces.extend(extras.iter().copied());
    pieces.push(phase.hashtag());
    let candidate = pieces.join(" ");

    Ok(ComposedMessage {
        text: truncate(candidate, config.max_length, &config.truncate_suffix),
        hashtag: phase.hashtag(),
    })
}

fn base_clause<R: Rng + ?Sized>(phase: MoonPhase, illumination: &str, rng: &mut R) -> String {
    let aside = pick(phrases::LYCANTHROPIC_PHRASES, rng);
    format!("{} {} {}", phase.emoji(), phase.template(illumination), aside)
}

/// Each clause is gated by its own independent draw, so any subset of the
/// three can land in the same message.
fn optional_clauses<R: Rng + ?Sized>(
    month: Month,
    config: &MessageConfig,
    rng: &mut R,
) -> Vec<&'static str> {
    let mut clauses = Vec::new();

    let flairs = phrases::month_flairs(month);
    if !flairs.is_empty() && rng.gen::<f64>() < config.month_flair_chance {
        clauses.push(pick(flairs, rng));
    }

    if rng.gen::<f64>() < config.british_chance {
        clauses.push(pick(phrases::BRITISH_REFERENCES, rng));
    }

    if month == Month::June && rng.gen::<f64>() < config.pride_chance {
        clauses.push(pick(phrases::PRIDE_REFERENCES, rng));
    }

    clauses
}

fn pick<R: Rng + ?Sized>(pool: &'static [&'static str], rng: &mut R) -> &'static str {
    pool.choose(rng).copied().unwrap_or("")
}

/// Hard cut at the character limit, suffix included in the budget. The
/// hashtag is not protected; an overlong candidate may lose it.
fn truncate(text: String, max_length: usize, suffix: &str) -> String {
    if text.chars().count() <= max_length {
        return text;
    }

    let keep = max_length.saturating_sub(suffix.chars().count());
    let mut cut: String = text.chars().take(keep).collect();
    cut.push_str(suffix);
    cut
}

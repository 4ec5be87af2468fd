use crate::ComposeError;

/// The eight canonical moon phases, in lunation order. All per-phase data
/// (emoji, hashtag, base template) hangs off this enum so a new phase name
/// from upstream can never reach message assembly unmapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

/// Case-insensitive spellings accepted from the data source, including the
/// FarmSense variants that differ from the canonical names.
const PHASE_ALIASES: &[(&str, MoonPhase)] = &[
    ("new moon", MoonPhase::NewMoon),
    ("dark moon", MoonPhase::NewMoon),
    ("new", MoonPhase::NewMoon),
    ("waxing crescent", MoonPhase::WaxingCrescent),
    ("first quarter", MoonPhase::FirstQuarter),
    ("1st quarter", MoonPhase::FirstQuarter),
    ("waxing gibbous", MoonPhase::WaxingGibbous),
    ("full moon", MoonPhase::FullMoon),
    ("full", MoonPhase::FullMoon),
    ("waning gibbous", MoonPhase::WaningGibbous),
    ("last quarter", MoonPhase::LastQuarter),
    ("3rd quarter", MoonPhase::LastQuarter),
    ("third quarter", MoonPhase::LastQuarter),
    ("waning crescent", MoonPhase::WaningCrescent),
];

impl MoonPhase {
    pub const ALL: [MoonPhase; 8] = [
        MoonPhase::NewMoon,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::FullMoon,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    /// Maps a phase name from the data source to its canonical phase.
    /// Exact canonical spellings win; anything else goes through the
    /// case-insensitive alias table.
    pub fn from_name(input: &str) -> Result<Self, ComposeError> {
        for phase in Self::ALL {
            if phase.name() == input {
                return Ok(phase);
            }
        }

        let lowered = input.trim().to_lowercase();
        for (alias, phase) in PHASE_ALIASES {
            if *alias == lowered {
                return Ok(*phase);
            }
        }

        Err(ComposeError::UnknownPhase {
            input: input.to_string(),
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::FullMoon => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "🌑",
            MoonPhase::WaxingCrescent => "🌒",
            MoonPhase::FirstQuarter => "🌓",
            MoonPhase::WaxingGibbous => "🌔",
            MoonPhase::FullMoon => "🌕",
            MoonPhase::WaningGibbous => "🌖",
            MoonPhase::LastQuarter => "🌗",
            MoonPhase::WaningCrescent => "🌘",
        }
    }

    pub fn hashtag(self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "#NewMoon",
            MoonPhase::WaxingCrescent => "#WaxingCrescent",
            MoonPhase::FirstQuarter => "#FirstQuarter",
            MoonPhase::WaxingGibbous => "#WaxingGibbous",
            MoonPhase::FullMoon => "#FullMoon",
            MoonPhase::WaningGibbous => "#WaningGibbous",
            MoonPhase::LastQuarter => "#LastQuarter",
            MoonPhase::WaningCrescent => "#WaningCrescent",
        }
    }

    /// The fixed per-phase opener with the illumination already formatted
    /// to one decimal (e.g. `"42.3"`).
    pub fn template(self, illumination: &str) -> String {
        match self {
            MoonPhase::NewMoon => format!(
                "It's a New Moon, barely a whisper! Illumination: {}%.",
                illumination
            ),
            MoonPhase::WaxingCrescent => format!(
                "Look up! Waxing Crescent, brighter at {}%.",
                illumination
            ),
            MoonPhase::FirstQuarter => format!(
                "Halfway to full! First Quarter moon {}% lit.",
                illumination
            ),
            MoonPhase::WaxingGibbous => format!(
                "Waxing Gibbous almost full, glowing at {}%!",
                illumination
            ),
            MoonPhase::FullMoon => format!(
                "By Jove, a magnificent Full Moon! {}% light.",
                illumination
            ),
            MoonPhase::WaningGibbous => format!(
                "Waning Gibbous gracefully fading, {}% illuminated.",
                illumination
            ),
            MoonPhase::LastQuarter => {
                format!("Last Quarter moon, {}% visible!", illumination)
            }
            MoonPhase::WaningCrescent => {
                format!("Waning Crescent, tiny sliver, {}% lit.", illumination)
            }
        }
    }
}

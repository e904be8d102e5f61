//! Cast phase state machine

use std::fmt;

/// Operational segment of a cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// At or near the surface before the descent starts
    #[default]
    Initial,
    /// Brought back up after the first lowering, before the real descent
    Return,
    Downcasting,
    Upcasting,
}

/// Direction of a smoothed depth change relative to the tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Depth decreased by more than the tolerance
    Shallower,
    /// Depth increased by more than the tolerance
    Deeper,
    Steady,
}

impl Trend {
    /// Classifies a depth change. An undefined change has no trend.
    pub fn classify(delta: Option<f64>, tolerance: f64) -> Option<Trend> {
        let delta = delta.filter(|d| !d.is_nan())?;
        Some(if delta < -tolerance {
            Trend::Shallower
        } else if delta > tolerance {
            Trend::Deeper
        } else {
            Trend::Steady
        })
    }
}

/// Every transition the cast can make. Pairs not listed hold their phase,
/// which makes `Upcasting` terminal.
pub const TRANSITIONS: [(Phase, Trend, Phase); 3] = [
    (Phase::Initial, Trend::Shallower, Phase::Return),
    (Phase::Return, Trend::Deeper, Phase::Downcasting),
    (Phase::Downcasting, Trend::Shallower, Phase::Upcasting),
];

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Initial, Phase::Return, Phase::Downcasting, Phase::Upcasting];

    /// Phase after observing `trend`.
    pub fn next(self, trend: Option<Trend>) -> Phase {
        let Some(trend) = trend else {
            return self;
        };
        TRANSITIONS
            .iter()
            .find(|(from, on, _)| *from == self && *on == trend)
            .map(|&(_, _, to)| to)
            .unwrap_or(self)
    }

    /// Whether frames in this phase are scientifically useful.
    pub fn is_usable(self) -> bool {
        matches!(self, Phase::Downcasting | Phase::Upcasting)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Initial => "Initial",
            Phase::Return => "Return",
            Phase::Downcasting => "Downcasting",
            Phase::Upcasting => "Upcasting",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

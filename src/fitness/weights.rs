use std::time::Duration;

/// Relative weight of each of the eight metrics. Styles are presets;
/// equal weighting is the neutral starting point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub decision_density: f64,
    pub comeback: f64,
    pub tension: f64,
    pub interaction: f64,
    pub complexity: f64,
    pub skill: f64,
    pub bluffing: f64,
    pub session: f64,
}

impl Weights {
    pub fn balanced() -> Self {
        Self {
            decision_density: 1.0,
            comeback: 1.0,
            tension: 1.0,
            interaction: 1.0,
            complexity: 1.0,
            skill: 1.0,
            bluffing: 1.0,
            session: 1.0,
        }
    }

    pub fn total(&self) -> f64 {
        self.decision_density
            + self.comeback
            + self.tension
            + self.interaction
            + self.complexity
            + self.skill
            + self.bluffing
            + self.session
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Balanced,
    Strategic,
    Bluffing,
    Quick,
}

impl Style {
    pub fn weights(&self) -> Weights {
        let mut w = Weights::balanced();
        match self {
            Style::Balanced => {}
            Style::Strategic => {
                w.skill = 3.0;
                w.decision_density = 2.0;
                w.tension = 1.5;
            }
            Style::Bluffing => {
                w.bluffing = 3.0;
                w.interaction = 2.0;
            }
            Style::Quick => {
                w.session = 3.0;
                w.decision_density = 1.5;
            }
        }
        w
    }
}

impl std::str::FromStr for Style {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balanced" => Ok(Style::Balanced),
            "strategic" => Ok(Style::Strategic),
            "bluffing" => Ok(Style::Bluffing),
            "quick" => Ok(Style::Quick),
            other => Err(format!("unknown style '{}'", other)),
        }
    }
}

/// Everything the evaluator can be tuned with, including the unimodal
/// shapes the spec leaves open.
#[derive(Debug, Clone)]
pub struct FitnessConfig {
    pub weights: Weights,
    pub screen_games: usize,
    pub full_games: usize,
    pub skill_games: usize,
    pub mcts_iterations: usize,
    /// soft per-genome deadline for the expensive phase
    pub deadline: Option<Duration>,
    /// rules-complexity sweet spot in weighted structure units
    pub complexity_low: f64,
    pub complexity_peak: f64,
    pub complexity_high: f64,
    /// session-length sweet spot in table rounds
    pub session_low: f64,
    pub session_target: f64,
    pub session_high: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            weights: Weights::balanced(),
            screen_games: 10,
            full_games: 100,
            skill_games: 30,
            mcts_iterations: 100,
            deadline: Some(Duration::from_secs(20)),
            complexity_low: 1.0,
            complexity_peak: 4.5,
            complexity_high: 14.0,
            session_low: 5.0,
            session_target: 60.0,
            session_high: 400.0,
        }
    }
}

impl FitnessConfig {
    pub fn for_style(style: Style) -> Self {
        Self {
            weights: style.weights(),
            ..Default::default()
        }
    }
}

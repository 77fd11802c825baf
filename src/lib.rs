pub mod bytecode;
pub mod cards;
pub mod catalog;
pub mod error;
pub mod evolve;
pub mod fitness;
pub mod genome;
pub mod interpreter;
pub mod mcts;
pub mod sim;
pub mod skill;
pub mod state;

pub use error::Error;

/// dimensional analysis types
pub type Chips = i32;
pub type Score = i32;
pub type Seed = u64;
pub type Fitness = f64;
pub type Probability = f64;

/// a full standard deck; every genome deals from it
pub const DECK_SIZE: usize = 52;
pub const MAX_PLAYERS: usize = 4;

/// mcts parameters
pub const UCB1_EXPLORATION: f64 = std::f64::consts::SQRT_2;
pub const ROLLOUT_TURN_CAP: u32 = 256;

/// evolution parameters
pub const POPULATION_SIZE: usize = 100;
pub const TOURNAMENT_SIZE: usize = 3;
pub const ELITE_FRACTION: f64 = 0.10;
pub const CROSSOVER_RATE: f64 = 0.70;
pub const SEED_FRACTION: f64 = 0.70;
pub const PLATEAU_WINDOW: usize = 30;
pub const PLATEAU_EPSILON: f64 = 0.01;
pub const DIVERSITY_FLOOR: f64 = 0.05;

/// hard ceiling on any genome's turn budget, repair clamps to it
pub const MAX_TURN_BOUND: u32 = 2_000;

/// trait for random generation, mainly (strictly?) for testing
pub trait Arbitrary {
    fn random() -> Self;
}

/// progress bar
pub fn progress(n: usize) -> indicatif::ProgressBar {
    let tick = std::time::Duration::from_secs(5);
    let style = "{spinner:.cyan} {elapsed} ~ {percent:>3}% {wide_bar:.cyan}";
    let style = indicatif::ProgressStyle::with_template(style).unwrap();
    let progress = indicatif::ProgressBar::new(n as u64);
    progress.set_style(style);
    progress.enable_steady_tick(tick);
    progress
}

/// initialize logging
pub fn init() {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    simplelog::TermLogger::init(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .expect("initialize logger");
}

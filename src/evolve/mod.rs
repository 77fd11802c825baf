pub mod crossover;
pub mod diversity;
pub mod engine;
pub mod mutate;
pub mod population;
pub mod repair;
pub mod select;

pub use engine::Evolution;
pub use engine::EvolutionConfig;
pub use engine::GenerationSummary;
pub use engine::RunReport;
pub use mutate::Mutator;
pub use population::Individual;
pub use population::Population;

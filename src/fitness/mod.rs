pub mod cache;
pub mod evaluator;
pub mod gate;
pub mod metrics;
pub mod weights;

pub use cache::FitnessCache;
pub use evaluator::Evaluate;
pub use evaluator::Evaluation;
pub use evaluator::Evaluator;
pub use gate::GateOutcome;
pub use metrics::Metrics;
pub use metrics::SkillInputs;
pub use weights::FitnessConfig;
pub use weights::Style;
pub use weights::Weights;

pub mod condition;
pub mod effect;
pub mod genome;
pub mod phase;
pub mod scoring;
pub mod setup;
pub mod validate;
pub mod win;

pub use condition::Cmp;
pub use condition::Condition;
pub use condition::Probe;
pub use condition::Test;
pub use effect::Effect;
pub use effect::EffectKind;
pub use effect::EffectTarget;
pub use genome::Genome;
pub use phase::BettingSpec;
pub use phase::BiddingSpec;
pub use phase::ClaimSpec;
pub use phase::DiscardSpec;
pub use phase::DrawSpec;
pub use phase::Phase;
pub use phase::PlaySpec;
pub use phase::TrickSpec;
pub use scoring::ContractScoring;
pub use scoring::Scoring;
pub use setup::SequenceDirection;
pub use setup::Setup;
pub use setup::TableauMode;
pub use setup::TrumpRule;
pub use setup::Visibility;
pub use win::WinCondition;
pub use win::WinKind;

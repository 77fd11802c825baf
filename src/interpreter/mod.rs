pub mod betting;
pub mod bidding;
pub mod claim;
pub mod conditions;
pub mod discard;
pub mod draw;
pub mod effects;
pub mod engine;
pub mod moves;
pub mod play;
pub mod trick;
pub mod win;

pub use engine::Applied;
pub use engine::Engine;
pub use engine::Step;
pub use moves::Move;

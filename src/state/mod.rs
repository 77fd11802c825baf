pub mod game;
pub mod player;
pub mod pool;
pub mod rng;

pub use game::GameState;
pub use game::TableauOutcome;
pub use player::PlayerState;
pub use pool::StatePool;
pub use rng::game_seed;
pub use rng::Lcg;

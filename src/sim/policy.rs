use crate::interpreter::Engine;
use crate::interpreter::Move;
use crate::mcts::Mcts;
use crate::state::GameState;
use crate::state::Lcg;
use crate::state::StatePool;

/// The AI menu. MCTS budgets are distinct kinds so batches can name
/// them without extra configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiKind {
    Random,
    Greedy,
    Mcts100,
    Mcts500,
    Mcts1000,
    Mcts2000,
}

impl AiKind {
    pub fn mcts_iterations(&self) -> Option<usize> {
        match self {
            AiKind::Mcts100 => Some(100),
            AiKind::Mcts500 => Some(500),
            AiKind::Mcts1000 => Some(1000),
            AiKind::Mcts2000 => Some(2000),
            _ => None,
        }
    }

    /// nearest configured budget for a requested iteration count
    pub fn mcts_for(iterations: usize) -> AiKind {
        match iterations {
            0..=250 => AiKind::Mcts100,
            251..=750 => AiKind::Mcts500,
            751..=1500 => AiKind::Mcts1000,
            _ => AiKind::Mcts2000,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AiKind::Random => "random",
            AiKind::Greedy => "greedy",
            AiKind::Mcts100 => "mcts-100",
            AiKind::Mcts500 => "mcts-500",
            AiKind::Mcts1000 => "mcts-1000",
            AiKind::Mcts2000 => "mcts-2000",
        }
    }
}

/// Pick an index into `moves` for the current actor.
pub fn choose(
    kind: AiKind,
    engine: &Engine,
    state: &GameState,
    moves: &[Move],
    states: &StatePool,
    rng: &mut Lcg,
) -> usize {
    debug_assert!(!moves.is_empty());
    // a forced move needs no deliberation, whatever the policy
    if moves.len() == 1 {
        return 0;
    }
    match kind {
        AiKind::Random => rng.below(moves.len() as u32) as usize,
        AiKind::Greedy => greedy(state, moves),
        _ => {
            let budget = kind.mcts_iterations().expect("mcts kind");
            let pick = Mcts::new(budget).search(engine, state, states, rng);
            pick.and_then(|mv| moves.iter().position(|m| *m == mv))
                .unwrap_or(0)
        }
    }
}

/// Deterministic heuristic: playing a card beats not playing one, and
/// higher ranks beat lower. First occurrence wins ties.
fn greedy(state: &GameState, moves: &[Move]) -> usize {
    let hand = &state.players[state.actor].hand;
    let mut best = 0usize;
    let mut best_score = i32::MIN;
    for (i, mv) in moves.iter().enumerate() {
        let score = match mv.card {
            n if n >= 0 => {
                let rank = hand
                    .get(n as usize)
                    .map(|c| c.rank().value() as i32)
                    .unwrap_or(0);
                10 + rank
            }
            _ => 0,
        };
        if score > best_score {
            best_score = score;
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use crate::cards::Location;
    use crate::cards::Rank;
    use crate::cards::Suit;
    use crate::state::PlayerState;

    #[test]
    fn greedy_prefers_high_card_plays() {
        let mut state = GameState::default();
        let mut player = PlayerState::default();
        player.hand = vec![
            Card::new(Rank::Three, Suit::Club),
            Card::new(Rank::King, Suit::Heart),
        ];
        state.players = vec![player, PlayerState::default()];
        let moves = vec![
            Move::action(0, crate::interpreter::moves::PLAY_PASS, Location::Discard),
            Move::card_at(0, 0, Location::Discard),
            Move::card_at(0, 1, Location::Discard),
        ];
        assert!(greedy(&state, &moves) == 2);
    }
}

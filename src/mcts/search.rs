//! UCB1 tree search. Iterations are strictly serial per search since
//! each depends on the visit counts the previous one left behind;
//! parallelism lives a level up, across games. A node is rolled out
//! once before it may expand, which keeps the visit accounting exact:
//! after N iterations the root holds N visits and its children N - 1.

use super::node::Node;
use super::node::NodePool;
use super::node::NO_PARENT;
use crate::interpreter::Engine;
use crate::interpreter::Move;
use crate::interpreter::Step;
use crate::state::GameState;
use crate::state::Lcg;
use crate::state::StatePool;

pub struct Mcts {
    pub iterations: usize,
    pub exploration: f64,
    pub rollout_cap: u32,
}

impl Mcts {
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            exploration: crate::UCB1_EXPLORATION,
            rollout_cap: crate::ROLLOUT_TURN_CAP,
        }
    }

    /// Pick the best move from `root_state`, which must be at a
    /// decision point. Returns None when the position is terminal.
    pub fn search(
        &self,
        engine: &Engine,
        root_state: &GameState,
        states: &StatePool,
        rng: &mut Lcg,
    ) -> Option<Move> {
        let (mut pool, root) = self.grow(engine, root_state, states, rng);
        // most-visited child, the robust choice
        let best = pool
            .get(root)
            .children
            .iter()
            .copied()
            .max_by_key(|child| pool.get(*child).visits)
            .and_then(|child| pool.get(child).lead);
        for state in pool.drain() {
            states.release(state);
        }
        best
    }

    /// run the full iteration budget and hand back the finished tree
    fn grow(
        &self,
        engine: &Engine,
        root_state: &GameState,
        states: &StatePool,
        rng: &mut Lcg,
    ) -> (NodePool, usize) {
        let mut pool = NodePool::with_capacity(self.iterations + 1);
        let mut buf: Vec<Move> = Vec::with_capacity(32);

        let mut state = states.acquire();
        state.clone_from(root_state);
        let mut untried = generate(engine, &mut state, &mut buf);
        rng.shuffle(&mut untried);
        let terminal = untried.is_empty();
        let before = previous_seat(&state);
        let root = pool.alloc(Node {
            parent: NO_PARENT,
            lead: None,
            player: before,
            children: vec![],
            untried,
            state,
            visits: 0,
            wins: 0.0,
            terminal,
        });

        for _ in 0..self.iterations {
            let mut at = root;
            // select: descend through fully expanded interior nodes
            while pool.get(at).untried.is_empty()
                && !pool.get(at).children.is_empty()
                && !pool.get(at).terminal
            {
                at = self.best_ucb(&pool, at);
            }
            // expand: only a node that has already been rolled out once
            if pool.get(at).visits > 0 && !pool.get(at).terminal {
                if let Some(mv) = pool.get_mut(at).untried.pop() {
                    let mut state = states.acquire();
                    state.clone_from(&pool.get(at).state);
                    let mover = state.actor;
                    engine.apply(&mut state, mv, rng);
                    let mut untried = generate(engine, &mut state, &mut buf);
                    rng.shuffle(&mut untried);
                    let terminal = state.winner >= 0 || untried.is_empty();
                    let child = pool.alloc(Node {
                        parent: at,
                        lead: Some(mv),
                        player: mover,
                        children: vec![],
                        untried,
                        state,
                        visits: 0,
                        wins: 0.0,
                        terminal,
                    });
                    pool.get_mut(at).children.push(child);
                    at = child;
                }
            }
            // rollout and backpropagate
            let winner = self.rollout(engine, &pool.get(at).state, states, rng);
            let mut walk = at;
            while walk != NO_PARENT {
                let node = pool.get_mut(walk);
                node.visits += 1;
                node.wins += reward(winner, node.player);
                walk = node.parent;
            }
        }
        (pool, root)
    }

    fn best_ucb(&self, pool: &NodePool, at: usize) -> usize {
        let parent_visits = pool.get(at).visits.max(1) as f64;
        let mut best = pool.get(at).children[0];
        let mut best_score = f64::MIN;
        for child in pool.get(at).children.iter().copied() {
            let node = pool.get(child);
            let visits = node.visits.max(1) as f64;
            let score =
                node.wins / visits + self.exploration * (parent_visits.ln() / visits).sqrt();
            if score > best_score {
                best_score = score;
                best = child;
            }
        }
        best
    }

    /// random play to the end of the game or the rollout cap
    fn rollout(
        &self,
        engine: &Engine,
        from: &GameState,
        states: &StatePool,
        rng: &mut Lcg,
    ) -> i32 {
        let mut state = states.acquire();
        state.clone_from(from);
        let mut buf: Vec<Move> = Vec::with_capacity(32);
        let horizon = state.turn.saturating_add(self.rollout_cap);
        let winner = loop {
            if state.winner >= 0 {
                break state.winner;
            }
            if state.turn >= horizon {
                break -1;
            }
            match engine.step_moves(&mut state, &mut buf) {
                Step::Over => break state.winner,
                Step::Stuck => break -1,
                Step::Moves => {
                    let pick = rng.below(buf.len() as u32) as usize;
                    engine.apply(&mut state, buf[pick], rng);
                }
            }
        };
        states.release(state);
        winner
    }
}

fn generate(engine: &Engine, state: &mut GameState, buf: &mut Vec<Move>) -> Vec<Move> {
    match engine.step_moves(state, buf) {
        Step::Moves => buf.clone(),
        _ => vec![],
    }
}

fn previous_seat(state: &GameState) -> usize {
    let n = state.player_count() as i32;
    ((state.actor as i32 - state.direction as i32).rem_euclid(n)) as usize
}

/// win 1, draw half, loss nothing, from the given seat's perspective
fn reward(winner: i32, seat: usize) -> f64 {
    match winner {
        w if w < 0 => 0.5,
        w if w as usize == seat => 1.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn decision_point(engine: &Engine, states: &StatePool, rng: &mut Lcg) -> GameState {
        let mut state = states.acquire();
        engine.setup(&mut state, rng);
        let mut buf = vec![];
        assert!(matches!(engine.step_moves(&mut state, &mut buf), Step::Moves));
        state
    }

    #[test]
    fn visit_accounting_holds() {
        let engine = Engine::from_genome(&catalog::crazy_eights()).expect("engine");
        let states = StatePool::new();
        let mut rng = Lcg::new(9);
        let state = decision_point(&engine, &states, &mut rng);

        let budget = 200;
        let mcts = Mcts::new(budget);
        let (mut pool, root) = mcts.grow(&engine, &state, &states, &mut rng);
        let children_sum: u64 = pool
            .get(root)
            .children
            .iter()
            .map(|c| pool.get(*c).visits)
            .sum();
        assert!(pool.get(root).visits == budget as u64);
        assert!(children_sum == budget as u64 - 1);
        for state in pool.drain() {
            states.release(state);
        }
        states.release(state);
    }

    #[test]
    fn search_returns_a_legal_move() {
        let engine = Engine::from_genome(&catalog::crazy_eights()).expect("engine");
        let states = StatePool::new();
        let mut rng = Lcg::new(5);
        let mut state = decision_point(&engine, &states, &mut rng);
        let mut buf = vec![];
        engine.step_moves(&mut state, &mut buf);
        let mcts = Mcts::new(100);
        let pick = mcts.search(&engine, &state, &states, &mut rng);
        assert!(pick.is_some());
        assert!(buf.contains(&pick.expect("non-terminal")));
        states.release(state);
    }
}

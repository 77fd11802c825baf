//! Cheat-style claim phase. A claim sheds face-down cards under a rank
//! announcement; the following player may challenge before making their
//! own claim. Challenge resolution reveals the top of the discard pile.

use super::engine::Engine;
use super::engine::Flow;
use super::engine::Gen;
use super::moves;
use super::moves::Move;
use crate::cards::Location;
use crate::genome::ClaimSpec;
use crate::state::GameState;

pub fn moves(index: u8, spec: &ClaimSpec, state: &GameState, buf: &mut Vec<Move>) -> Gen {
    if state.claim_pending && state.actor != state.claim_player && spec.allow_challenge {
        buf.push(Move::action(index, moves::CHALLENGE, Location::Discard));
        buf.push(Move::action(index, moves::ACCEPT, Location::Discard));
        return Gen::Moves;
    }
    let hand = &state.players[state.actor].hand;
    if hand.is_empty() {
        return Gen::Skip;
    }
    let top = spec.max_cards.min(hand.len() as u8);
    match spec.sequential_rank {
        true => {
            for count in 1..=top {
                buf.push(claim_move(index, state.expected_rank, count));
            }
        }
        false => {
            for rank in 0..13u8 {
                for count in 1..=top {
                    buf.push(claim_move(index, rank, count));
                }
            }
        }
    }
    Gen::Moves
}

fn claim_move(index: u8, rank: u8, count: u8) -> Move {
    Move::action(index, moves::encode_claim(rank, count), Location::Discard)
}

pub fn apply(
    spec: &ClaimSpec,
    engine: &Engine,
    state: &mut GameState,
    mv: Move,
) -> (bool, Flow) {
    match mv.card {
        moves::CHALLENGE => (true, resolve_challenge(spec, engine, state)),
        moves::ACCEPT => {
            settle_pending(spec, state);
            (false, Flow::StayPhase)
        }
        _ => match moves::decode_claim(mv.card) {
            Some((rank, count)) => {
                // an unchallengeable pending claim settles silently
                settle_pending(spec, state);
                shed(state, rank, count);
                state.claim_pending = true;
                state.claim_player = state.actor;
                state.claim_rank = rank;
                state.claim_count = count;
                if spec.sequential_rank {
                    state.expected_rank = (rank + 1) % 13;
                }
                (false, Flow::NextPhase)
            }
            None => (false, Flow::NextPhase),
        },
    }
}

/// award the shed bonus for a claim nobody contested
fn settle_pending(spec: &ClaimSpec, state: &mut GameState) {
    if state.claim_pending {
        let claimer = state.claim_player;
        state.players[claimer].score += spec.claim_score as i32 * state.claim_count as i32;
        state.claim_pending = false;
    }
}

/// move `count` cards face-down to the pile, truthful where possible
fn shed(state: &mut GameState, rank: u8, count: u8) {
    for _ in 0..count {
        let hand = &state.players[state.actor].hand;
        if hand.is_empty() {
            break;
        }
        let index = hand
            .iter()
            .position(|c| c.rank() as u8 == rank)
            .unwrap_or_else(|| {
                hand.iter()
                    .enumerate()
                    .min_by_key(|(_, c)| c.rank().value())
                    .map(|(i, _)| i)
                    .expect("hand non-empty")
            });
        let card = state.players[state.actor].hand.remove(index);
        state.discard.push(card);
    }
}

fn resolve_challenge(spec: &ClaimSpec, engine: &Engine, state: &mut GameState) -> Flow {
    let challenger = state.actor;
    let claimer = state.claim_player;
    let count = state.claim_count as usize;
    let from = state.discard.len().saturating_sub(count);
    let truthful = state.discard[from..].iter().all(|c| {
        c.rank() as u8 == state.claim_rank || engine.wilds().contains(&c.rank())
    });
    let loser = match truthful {
        true => challenger,
        false => claimer,
    };
    if truthful {
        state.players[claimer].score += spec.claim_score as i32 * state.claim_count as i32;
    }
    if spec.pile_penalty {
        let pile: Vec<crate::cards::Card> = state.discard.drain(..).collect();
        state.players[loser].hand.extend(pile);
    }
    state.players[loser].score += spec.penalty_score;
    state.claim_pending = false;
    Flow::StayPhase
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use crate::cards::Rank;
    use crate::cards::Suit;
    use crate::catalog;
    use crate::interpreter::Engine;
    use crate::state::PlayerState;

    fn engine() -> Engine {
        Engine::from_genome(&catalog::cheat()).expect("engine")
    }

    fn spec() -> ClaimSpec {
        ClaimSpec {
            start_rank: Rank::Ace,
            sequential_rank: true,
            max_cards: 4,
            allow_challenge: true,
            pile_penalty: true,
            claim_score: 1,
            penalty_score: -2,
        }
    }

    fn state() -> GameState {
        let mut state = GameState::default();
        state.players = vec![PlayerState::default(), PlayerState::default()];
        state.direction = 1;
        state.expected_rank = Rank::Ace as u8;
        state
    }

    #[test]
    fn false_claim_loses_the_pile() {
        let mut state = state();
        state.players[0].hand = vec![Card::new(Rank::Two, Suit::Club)];
        state.actor = 0;
        // claim an ace while shedding a two
        apply(&spec(), &engine(), &mut state, claim_move(0, Rank::Ace as u8, 1));
        assert!(state.claim_pending);
        assert!(state.players[0].hand.is_empty());
        state.actor = 1;
        apply(
            &spec(),
            &engine(),
            &mut state,
            Move::action(0, moves::CHALLENGE, Location::Discard),
        );
        // the lie is exposed: claimer takes the pile and the penalty
        assert!(state.players[0].hand.len() == 1);
        assert!(state.players[0].score == -2);
        assert!(!state.claim_pending);
    }

    #[test]
    fn true_claim_punishes_the_challenger() {
        let mut state = state();
        state.players[0].hand = vec![Card::new(Rank::Ace, Suit::Club)];
        state.actor = 0;
        apply(&spec(), &engine(), &mut state, claim_move(0, Rank::Ace as u8, 1));
        state.actor = 1;
        apply(
            &spec(),
            &engine(),
            &mut state,
            Move::action(0, moves::CHALLENGE, Location::Discard),
        );
        assert!(state.players[1].hand.len() == 1);
        assert!(state.players[1].score == -2);
        assert!(state.players[0].score == 1);
    }

    #[test]
    fn challenger_sees_challenge_and_accept() {
        let mut state = state();
        state.players[0].hand = vec![Card::new(Rank::Two, Suit::Club)];
        state.players[1].hand = vec![Card::new(Rank::Five, Suit::Club)];
        state.actor = 0;
        apply(&spec(), &engine(), &mut state, claim_move(0, Rank::Ace as u8, 1));
        state.actor = 1;
        let mut buf = vec![];
        moves(0, &spec(), &state, &mut buf);
        assert!(buf.len() == 2);
        assert!(buf.iter().any(|m| m.card == moves::CHALLENGE));
        assert!(buf.iter().any(|m| m.card == moves::ACCEPT));
    }
}

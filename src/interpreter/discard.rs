use super::effects;
use super::engine::Engine;
use super::engine::Flow;
use super::engine::Gen;
use super::moves::Move;
use crate::genome::DiscardSpec;
use crate::state::GameState;
use crate::state::Lcg;

pub fn moves(index: u8, spec: &DiscardSpec, state: &GameState, buf: &mut Vec<Move>) -> Gen {
    let hand = &state.players[state.actor].hand;
    if hand.is_empty() {
        return match spec.mandatory {
            true => Gen::Stuck,
            false => Gen::Skip,
        };
    }
    for i in 0..hand.len() {
        buf.push(Move::card_at(index, i, spec.target));
    }
    Gen::Moves
}

/// one card per decision; the phase repeats until `count` are gone
pub fn apply(
    spec: &DiscardSpec,
    engine: &Engine,
    state: &mut GameState,
    mv: Move,
    rng: &mut Lcg,
) -> (bool, Flow) {
    let mut interaction = false;
    if mv.card >= 0 {
        let index = mv.card as usize;
        if index < state.players[state.actor].hand.len() {
            let rank = state.players[state.actor].hand[index].rank();
            state.play_card(state.actor, index, spec.target);
            interaction = effects::trigger(engine, state, rank, rng);
        }
    }
    state.phase_progress += 1;
    let done = state.phase_progress as u32 >= spec.count
        || state.players[state.actor].hand.is_empty();
    match done {
        true => (interaction, Flow::NextPhase),
        false => (interaction, Flow::StayPhase),
    }
}

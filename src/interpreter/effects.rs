//! Rank-triggered special effects. Fired when a play or discard phase
//! lands a card of a trigger rank; trick and claim plays do not fire
//! effects. Returns whether the effect touched another player's state.

use super::engine::Engine;
use crate::cards::Location;
use crate::cards::Rank;
use crate::genome::EffectKind;
use crate::genome::EffectTarget;
use crate::state::GameState;
use crate::state::Lcg;

pub fn trigger(engine: &Engine, state: &mut GameState, rank: Rank, rng: &mut Lcg) -> bool {
    let Some(effect) = engine.effect_for(rank) else {
        return false;
    };
    let actor = state.actor;
    match effect.kind {
        EffectKind::ExtraTurn => {
            state.extra_turn = true;
            false
        }
        EffectKind::SkipNext => {
            state.skip_pending = true;
            true
        }
        EffectKind::Reverse => {
            state.direction = -state.direction;
            true
        }
        EffectKind::ForceDraw => {
            for victim in victims(state, actor, effect.target) {
                for _ in 0..effect.value {
                    state.draw_card(victim, Location::Deck, rng);
                }
            }
            true
        }
        EffectKind::ForceDiscard => {
            for victim in victims(state, actor, effect.target) {
                for _ in 0..effect.value {
                    discard_lowest(state, victim);
                }
            }
            true
        }
    }
}

fn victims(state: &GameState, actor: usize, target: EffectTarget) -> Vec<usize> {
    match target {
        EffectTarget::NextPlayer => vec![state.next_seat(actor)],
        EffectTarget::AllOpponents => (0..state.player_count()).filter(|p| *p != actor).collect(),
    }
}

/// forced discards shed the lowest card; deterministic, no decision
fn discard_lowest(state: &mut GameState, player: usize) {
    let lowest = state.players[player]
        .hand
        .iter()
        .enumerate()
        .min_by_key(|(_, c)| c.rank().value())
        .map(|(i, _)| i);
    if let Some(index) = lowest {
        let card = state.players[player].hand.remove(index);
        state.discard.push(card);
    }
}

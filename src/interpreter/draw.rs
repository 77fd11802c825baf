use super::conditions;
use super::conditions::Ctx;
use super::engine::Engine;
use super::engine::Flow;
use super::engine::Gen;
use super::moves;
use super::moves::Move;
use crate::cards::Location;
use crate::genome::DrawSpec;
use crate::state::GameState;
use crate::state::Lcg;

pub fn moves(index: u8, spec: &DrawSpec, engine: &Engine, state: &GameState, buf: &mut Vec<Move>) -> Gen {
    if let Some(ref test) = spec.condition {
        let ctx = Ctx {
            state,
            actor: state.actor,
            card: None,
            wilds: engine.wilds(),
        };
        if !conditions::eval_test(test, &ctx) {
            return Gen::Skip;
        }
    }
    let available = match spec.source {
        // the deck refills from the discard, so count both
        Location::Deck => state.deck.len() + state.discard.len().saturating_sub(1),
        Location::Discard => state.discard.len(),
        Location::OpponentHand => state.players[state.next_seat(state.actor)].hand.len(),
        _ => 0,
    };
    if available > 0 || spec.mandatory {
        buf.push(Move::action(index, moves::DRAW_SOURCE, spec.source));
    } else {
        buf.push(Move::action(index, moves::DRAW_PASS, spec.source));
    }
    Gen::Moves
}

pub fn apply(
    spec: &DrawSpec,
    state: &mut GameState,
    mv: Move,
    rng: &mut Lcg,
) -> (bool, Flow) {
    let interaction = match mv.card {
        moves::DRAW_SOURCE => {
            for _ in 0..spec.count {
                if !state.draw_card(state.actor, spec.source, rng) {
                    break;
                }
            }
            spec.source == Location::OpponentHand
        }
        _ => false,
    };
    (interaction, Flow::NextPhase)
}

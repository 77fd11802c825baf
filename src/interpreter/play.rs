use super::conditions;
use super::conditions::Ctx;
use super::effects;
use super::engine::Engine;
use super::engine::Flow;
use super::engine::Gen;
use super::moves;
use super::moves::Move;
use crate::cards::Card;
use crate::genome::PlaySpec;
use crate::genome::Visibility;
use crate::state::GameState;
use crate::state::Lcg;
use crate::state::TableauOutcome;

pub fn moves(index: u8, spec: &PlaySpec, engine: &Engine, state: &GameState, buf: &mut Vec<Move>) -> Gen {
    let hand = &state.players[state.actor].hand;
    if !hand.is_empty() {
        // a face-down hand is played blind: only the top card flips
        let blind = engine.hand_visibility() == Visibility::FaceDown;
        if spec.min_cards <= 1 {
            let candidates: Box<dyn Iterator<Item = usize>> = match blind {
                true => Box::new(std::iter::once(hand.len() - 1)),
                false => Box::new(0..hand.len()),
            };
            for i in candidates {
                if qualifies(spec, engine, state, hand[i]) {
                    buf.push(Move::card_at(index, i, spec.target));
                }
            }
        }
        if spec.max_cards > 1 && !blind {
            set_moves(index, spec, engine, state, buf);
        }
    }
    if !buf.is_empty() {
        return Gen::Moves;
    }
    if spec.pass_if_unable {
        buf.push(Move::action(index, moves::PLAY_PASS, spec.target));
        return Gen::Moves;
    }
    match spec.mandatory {
        true => Gen::Stuck,
        false => Gen::Skip,
    }
}

/// multi-card plays are sets of one rank, encoded like claims
fn set_moves(index: u8, spec: &PlaySpec, engine: &Engine, state: &GameState, buf: &mut Vec<Move>) {
    let hand = &state.players[state.actor].hand;
    let mut counts = [0u8; 13];
    let mut sample = [None::<Card>; 13];
    for card in hand {
        counts[card.rank() as usize] += 1;
        sample[card.rank() as usize].get_or_insert(*card);
    }
    for rank in 0..13usize {
        let held = counts[rank];
        let lo = spec.min_cards.max(2);
        let hi = spec.max_cards.min(held);
        for n in lo..=hi {
            let representative = sample[rank].expect("held > 0");
            if qualifies(spec, engine, state, representative) {
                buf.push(Move {
                    phase: index,
                    card: moves::encode_claim(rank as u8, n),
                    target: spec.target,
                });
            }
        }
    }
}

fn qualifies(spec: &PlaySpec, engine: &Engine, state: &GameState, card: Card) -> bool {
    match spec.condition {
        None => true,
        Some(ref condition) => {
            let ctx = Ctx {
                state,
                actor: state.actor,
                card: Some(card),
                wilds: engine.wilds(),
            };
            conditions::eval(condition, &ctx)
        }
    }
}

pub fn apply(
    spec: &PlaySpec,
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
            let outcome = state.play_card(state.actor, index, spec.target);
            interaction |= !matches!(outcome, TableauOutcome::Stayed);
            interaction |= effects::trigger(engine, state, rank, rng);
        }
    } else if let Some((rank, count)) = moves::decode_claim(mv.card) {
        for _ in 0..count {
            let found = state.players[state.actor]
                .hand
                .iter()
                .position(|c| c.rank() as u8 == rank);
            match found {
                Some(index) => {
                    let outcome = state.play_card(state.actor, index, spec.target);
                    interaction |= !matches!(outcome, TableauOutcome::Stayed);
                }
                None => break,
            }
        }
        interaction |= effects::trigger(engine, state, crate::cards::Rank::from(rank), rng);
    }
    (interaction, Flow::NextPhase)
}

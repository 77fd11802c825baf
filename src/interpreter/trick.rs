use super::engine::Engine;
use super::engine::Flow;
use super::engine::Gen;
use super::moves::Move;
use super::win;
use crate::cards::Card;
use crate::genome::TrickSpec;
use crate::state::GameState;
use crate::state::Lcg;

pub fn moves(index: u8, spec: &TrickSpec, state: &GameState, buf: &mut Vec<Move>) -> Gen {
    let hand = &state.players[state.actor].hand;
    if hand.is_empty() {
        return Gen::Skip;
    }
    let trump = state.trump.or(spec.trump_suit);
    match state.trick.first() {
        None => lead_moves(index, spec, state, buf),
        Some((_, lead)) => {
            let lead_suit = lead.suit();
            let holds_lead = hand.iter().any(|c| c.suit() == lead_suit);
            for (i, card) in hand.iter().enumerate() {
                let offsuit = card.suit() != lead_suit && Some(card.suit()) != trump;
                if spec.lead_suit_required && holds_lead && offsuit {
                    continue;
                }
                buf.push(Move::card_at(index, i, crate::cards::Location::Tableau));
            }
            Gen::Moves
        }
    }
}

/// leading the breaking suit is illegal until it has been broken, unless
/// the hand holds nothing else
fn lead_moves(index: u8, spec: &TrickSpec, state: &GameState, buf: &mut Vec<Move>) -> Gen {
    let hand = &state.players[state.actor].hand;
    let gated = match spec.breaking_suit {
        Some(suit) if !state.hearts_broken => {
            hand.iter().any(|c| c.suit() != suit)
        }
        _ => false,
    };
    for (i, card) in hand.iter().enumerate() {
        if gated && Some(card.suit()) == spec.breaking_suit {
            continue;
        }
        buf.push(Move::card_at(index, i, crate::cards::Location::Tableau));
    }
    Gen::Moves
}

pub fn apply(
    spec: &TrickSpec,
    engine: &Engine,
    state: &mut GameState,
    mv: Move,
    rng: &mut Lcg,
) -> (bool, Flow) {
    if mv.card < 0 {
        return (false, Flow::NextPhase);
    }
    let index = mv.card as usize;
    if index >= state.players[state.actor].hand.len() {
        return (false, Flow::NextPhase);
    }
    let card = state.players[state.actor].hand.remove(index);
    let actor = state.actor;
    if state.trick.is_empty() {
        state.trick_leader = actor;
    }
    if let Some(breaking) = spec.breaking_suit {
        let off_lead = state
            .trick
            .first()
            .map(|(_, lead)| lead.suit() != breaking)
            .unwrap_or(true);
        if card.suit() == breaking && off_lead {
            state.hearts_broken = true;
        }
    }
    state.trick.push((actor, card));
    if state.trick.len() < state.player_count() {
        return (false, Flow::ToActor(state.next_seat(actor)));
    }
    // trick complete
    let winner = trick_winner(spec, state);
    let cards: Vec<Card> = state.trick.drain(..).map(|(_, c)| c).collect();
    let points: i32 = cards.iter().map(|c| engine.card_points(*c)).sum();
    state.players[winner].captured.extend(cards);
    state.players[winner].score += points;
    state.players[winner].tricks_won += 1;
    state.tricks_completed += 1;
    state.trick_leader = winner;

    if state.tricks_completed >= engine.tricks_per_hand() {
        if engine.has_contract() {
            engine.score_contracts(state);
        }
        let decided = win::check(engine, state, true);
        if decided >= 0 {
            state.winner = decided;
            return (true, Flow::ToActor(winner));
        }
        engine.redeal(state, rng);
        return (true, Flow::ToActor(state.actor));
    }
    (true, Flow::ToActor(winner))
}

/// highest of the led suit unless trump showed up; the comparator flips
/// for misère-style specs
fn trick_winner(spec: &TrickSpec, state: &GameState) -> usize {
    let trump = state.trump.or(spec.trump_suit);
    let lead_suit = state.trick.first().expect("trick non-empty").1.suit();
    let pool: Vec<&(usize, Card)> = match trump {
        Some(t) if state.trick.iter().any(|(_, c)| c.suit() == t) => {
            state.trick.iter().filter(|(_, c)| c.suit() == t).collect()
        }
        _ => state
            .trick
            .iter()
            .filter(|(_, c)| c.suit() == lead_suit)
            .collect(),
    };
    let pick = match spec.high_card_wins {
        true => pool.iter().max_by_key(|(_, c)| c.rank().value()),
        false => pool.iter().min_by_key(|(_, c)| c.rank().value()),
    };
    pick.expect("lead card always eligible").0
}

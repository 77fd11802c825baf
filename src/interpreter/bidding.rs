use super::engine::Flow;
use super::engine::Gen;
use super::moves;
use super::moves::Move;
use crate::cards::Location;
use crate::genome::BiddingSpec;
use crate::state::GameState;

pub fn moves(index: u8, spec: &BiddingSpec, state: &GameState, buf: &mut Vec<Move>) -> Gen {
    if state.bidding_complete || state.players[state.actor].bid.is_some() {
        return Gen::Skip;
    }
    for bid in spec.min_bid..=spec.max_bid {
        buf.push(Move::action(index, moves::encode_bid(bid), Location::Discard));
    }
    if spec.allow_nil {
        buf.push(Move::action(index, moves::BID_NIL, Location::Discard));
    }
    Gen::Moves
}

pub fn apply(state: &mut GameState, mv: Move) -> (bool, Flow) {
    let actor = state.actor;
    match mv.card {
        moves::BID_NIL => {
            state.players[actor].bid = Some(0);
            state.players[actor].nil_bid = true;
        }
        card => {
            if let Some(bid) = moves::decode_bid(card) {
                state.players[actor].bid = Some(bid);
            }
        }
    }
    if state.players.iter().all(|p| p.bid.is_some()) {
        state.bidding_complete = true;
        state.team_contracts = [0; 2];
        for (seat, player) in state.players.iter().enumerate() {
            state.team_contracts[seat % 2] += player.bid.unwrap_or(0) as i32;
        }
    }
    (false, Flow::NextPhase)
}

use super::engine::Flow;
use super::engine::Gen;
use super::moves;
use super::moves::Move;
use crate::cards::Location;
use crate::genome::BettingSpec;
use crate::state::GameState;
use crate::Chips;

pub fn moves(index: u8, spec: &BettingSpec, state: &GameState, buf: &mut Vec<Move>) -> Gen {
    let player = &state.players[state.actor];
    if state.betting_complete || !player.active || player.folded || player.all_in {
        return Gen::Skip;
    }
    let to_call = state.current_bet - player.current_bet;
    let min_bet = spec.min_bet as Chips;
    if to_call == 0 {
        buf.push(action(index, moves::BET_CHECK));
        if player.chips >= min_bet {
            buf.push(action(index, moves::BET_OPEN));
        } else if player.chips > 0 {
            buf.push(action(index, moves::BET_ALL_IN));
        }
    } else {
        if player.chips >= to_call {
            buf.push(action(index, moves::BET_CALL));
        }
        if player.chips >= to_call + min_bet && state.raise_count < spec.max_raises {
            buf.push(action(index, moves::BET_RAISE));
        }
        if player.chips > 0 && player.chips < to_call {
            buf.push(action(index, moves::BET_ALL_IN));
        }
        buf.push(action(index, moves::BET_FOLD));
    }
    Gen::Moves
}

fn action(index: u8, sentinel: i32) -> Move {
    Move::action(index, sentinel, Location::Discard)
}

pub fn apply(spec: &BettingSpec, state: &mut GameState, mv: Move) -> (bool, Flow) {
    let actor = state.actor;
    let min_bet = spec.min_bet as Chips;
    let to_call = state.current_bet - state.players[actor].current_bet;
    let interaction = match mv.card {
        moves::BET_CHECK => {
            state.betting_acted += 1;
            false
        }
        moves::BET_OPEN => {
            commit(state, actor, min_bet);
            state.current_bet = state.players[actor].current_bet;
            state.betting_acted = 1;
            true
        }
        moves::BET_CALL => {
            commit(state, actor, to_call);
            state.betting_acted += 1;
            true
        }
        moves::BET_RAISE => {
            // a raise is a call plus one more unit
            commit(state, actor, to_call + min_bet);
            state.current_bet = state.players[actor].current_bet;
            state.raise_count += 1;
            state.betting_acted = 1;
            true
        }
        moves::BET_FOLD => {
            state.players[actor].folded = true;
            false
        }
        moves::BET_ALL_IN => {
            let chips = state.players[actor].chips;
            commit(state, actor, chips);
            state.players[actor].all_in = true;
            // shoving past the bet raises it; short shoves do not
            if state.players[actor].current_bet > state.current_bet {
                state.current_bet = state.players[actor].current_bet;
                state.betting_acted = 1;
            } else {
                state.betting_acted += 1;
            }
            true
        }
        _ => false,
    };
    if round_over(state) {
        showdown(state);
    }
    (interaction, Flow::NextPhase)
}

fn commit(state: &mut GameState, player: usize, amount: Chips) {
    let amount = amount.min(state.players[player].chips);
    state.players[player].chips -= amount;
    state.players[player].current_bet += amount;
    state.pot += amount;
}

/// the round ends when everyone still in has matched the bet and had a
/// say, or when all but one player folded
fn round_over(state: &GameState) -> bool {
    let contenders = state
        .players
        .iter()
        .filter(|p| p.active && !p.folded)
        .count();
    if contenders <= 1 {
        return true;
    }
    let eligible: Vec<&crate::state::PlayerState> = state
        .players
        .iter()
        .filter(|p| p.active && !p.folded && !p.all_in)
        .collect();
    eligible
        .iter()
        .all(|p| p.current_bet == state.current_bet)
        && state.betting_acted >= eligible.len() as u32
}

/// high-card showdown; the pot moves and the round state resets so the
/// next table round can open fresh
fn showdown(state: &mut GameState) {
    state.betting_complete = true;
    let winner = state
        .players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.active && !p.folded)
        .max_by_key(|(i, p)| {
            let high = p.hand.iter().map(|c| c.rank().value()).max().unwrap_or(0);
            (high, usize::MAX - i)
        })
        .map(|(i, _)| i);
    if let Some(winner) = winner {
        state.players[winner].chips += state.pot;
    }
    state.pot = 0;
    state.current_bet = 0;
    state.raise_count = 0;
    state.betting_acted = 0;
    state.betting_complete = false;
    for player in state.players.iter_mut() {
        player.current_bet = 0;
        player.folded = false;
        player.all_in = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PlayerState;

    fn table(chips: Chips) -> GameState {
        let mut state = GameState::default();
        let mut player = PlayerState::default();
        player.active = true;
        player.chips = chips;
        state.players = vec![player.clone(), player];
        state.direction = 1;
        state
    }

    fn spec() -> BettingSpec {
        BettingSpec {
            min_bet: 10,
            max_raises: 3,
        }
    }

    #[test]
    fn bet_call_raise_fold_arithmetic() {
        let mut state = table(100);
        // p0 bets 10
        state.actor = 0;
        apply(&spec(), &mut state, action(0, moves::BET_OPEN));
        assert!(state.players[0].chips == 90);
        assert!(state.pot == 10);
        assert!(state.current_bet == 10);
        // p1 raises: call 10 + 10 more
        state.actor = 1;
        apply(&spec(), &mut state, action(0, moves::BET_RAISE));
        assert!(state.players[1].chips == 80);
        assert!(state.pot == 30);
        assert!(state.current_bet == 20);
        assert!(state.raise_count == 1);
        // p0 folds: round over, pot to p1, round state reset
        state.actor = 0;
        apply(&spec(), &mut state, action(0, moves::BET_FOLD));
        assert!(state.players[1].chips == 110);
        assert!(state.pot == 0);
        assert!(state.current_bet == 0);
        assert!(!state.players[0].folded);
    }

    #[test]
    fn short_all_in_does_not_raise() {
        let mut state = table(100);
        state.players.push(state.players[0].clone());
        state.players[1].chips = 5;
        state.actor = 0;
        apply(&spec(), &mut state, action(0, moves::BET_OPEN));
        state.actor = 1;
        let mut buf = vec![];
        assert!(matches!(moves(0, &spec(), &state, &mut buf), Gen::Moves));
        assert!(buf.iter().any(|m| m.card == moves::BET_ALL_IN));
        assert!(!buf.iter().any(|m| m.card == moves::BET_CALL));
        apply(&spec(), &mut state, action(0, moves::BET_ALL_IN));
        // p1 shoved short of the bet: current_bet must not move
        assert!(state.current_bet == 10);
        assert!(state.pot == 15);
        assert!(state.players[1].all_in);
    }

    #[test]
    fn check_around_ends_round() {
        let mut state = table(100);
        state.actor = 0;
        apply(&spec(), &mut state, action(0, moves::BET_CHECK));
        assert!(state.pot == 0);
        state.actor = 1;
        apply(&spec(), &mut state, action(0, moves::BET_CHECK));
        // both checked, round resolved and reset
        assert!(state.betting_acted == 0);
    }
}

//! Ordered win-condition check. Walks the compiled list after every
//! applied move and returns the first winner it can determine, or -1.
//! Nothing here throws; a draw is simply -1 at the turn cap.

use super::engine::Engine;
use crate::genome::WinKind;
use crate::state::GameState;

pub fn check(engine: &Engine, state: &GameState, hand_complete: bool) -> i32 {
    // min_turns keeps degenerate genomes from winning on the deal
    if state.turn + 1 < engine.min_turns() {
        return -1;
    }
    for win in engine.wins() {
        let winner = match win.kind {
            WinKind::EmptyHand => first_empty_hand(state),
            WinKind::HighScore => score_race(state, win.threshold, true),
            WinKind::LowScore => score_race(state, win.threshold, false),
            WinKind::FirstToScore => first_to_score(state, win.threshold),
            WinKind::MostTricks => most_tricks(state, win.threshold, hand_complete),
            WinKind::FewestTricks => fewest_tricks(state, hand_complete),
            WinKind::MostCaptured => most_captured(state),
            WinKind::CaptureAll => capture_all(state),
            WinKind::AllHandsEmpty => all_hands_empty(state),
            WinKind::MostChips => most_chips(state, win.threshold),
        };
        if winner >= 0 {
            return winner;
        }
    }
    -1
}

fn first_empty_hand(state: &GameState) -> i32 {
    if state.cards_in_play == 0 {
        return -1;
    }
    state
        .players
        .iter()
        .enumerate()
        // an empty hand behind an uncontested claim is not out yet
        .find(|(seat, p)| {
            p.active
                && p.hand.is_empty()
                && !(state.claim_pending && state.claim_player == *seat)
        })
        .map(|(seat, _)| seat as i32)
        .unwrap_or(-1)
}

/// once any score crosses the threshold the race ends; high_wins picks
/// whether the top or bottom score takes it (Hearts is the latter)
fn score_race(state: &GameState, threshold: i32, high_wins: bool) -> i32 {
    if !state.players.iter().any(|p| p.score >= threshold) {
        return -1;
    }
    let best = match high_wins {
        true => state.players.iter().map(|p| p.score).max(),
        false => state.players.iter().map(|p| p.score).min(),
    };
    best.and_then(|score| state.players.iter().position(|p| p.score == score))
        .map(|p| p as i32)
        .unwrap_or(-1)
}

fn first_to_score(state: &GameState, threshold: i32) -> i32 {
    state
        .players
        .iter()
        .position(|p| p.score >= threshold)
        .map(|p| p as i32)
        .unwrap_or(-1)
}

fn most_tricks(state: &GameState, threshold: i32, hand_complete: bool) -> i32 {
    if threshold > 0 {
        if let Some(player) = state
            .players
            .iter()
            .position(|p| p.tricks_won as i32 >= threshold)
        {
            return player as i32;
        }
    }
    if hand_complete {
        return argmax(state.players.iter().map(|p| p.tricks_won as i32));
    }
    -1
}

fn fewest_tricks(state: &GameState, hand_complete: bool) -> i32 {
    match hand_complete {
        true => argmin(state.players.iter().map(|p| p.tricks_won as i32)),
        false => -1,
    }
}

/// capture games end when every card has left circulation
fn most_captured(state: &GameState) -> i32 {
    let exhausted = state.deck.is_empty() && state.players.iter().all(|p| p.hand.is_empty());
    match exhausted && state.cards_in_play > 0 {
        true => argmax(state.players.iter().map(|p| p.captured.len() as i32)),
        false => -1,
    }
}

fn capture_all(state: &GameState) -> i32 {
    if state.cards_in_play == 0 {
        return -1;
    }
    state
        .players
        .iter()
        .position(|p| (p.hand.len() + p.captured.len()) as u32 == state.cards_in_play)
        .map(|p| p as i32)
        .unwrap_or(-1)
}

fn all_hands_empty(state: &GameState) -> i32 {
    let done = state.cards_in_play > 0 && state.players.iter().all(|p| p.hand.is_empty());
    match done {
        true => argmax(state.players.iter().map(|p| p.score)),
        false => -1,
    }
}

fn most_chips(state: &GameState, threshold: i32) -> i32 {
    if let Some(player) = state
        .players
        .iter()
        .position(|p| threshold > 0 && p.chips >= threshold)
    {
        return player as i32;
    }
    // everyone else bankrupt also ends it
    let solvent: Vec<usize> = state
        .players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.chips > 0)
        .map(|(i, _)| i)
        .collect();
    match solvent.len() == 1 && state.players.len() > 1 {
        true => solvent[0] as i32,
        false => -1,
    }
}

fn argmax(values: impl Iterator<Item = i32>) -> i32 {
    let mut best = i32::MIN;
    let mut winner = -1;
    for (i, value) in values.enumerate() {
        if value > best {
            best = value;
            winner = i as i32;
        }
    }
    winner
}

fn argmin(values: impl Iterator<Item = i32>) -> i32 {
    let mut best = i32::MAX;
    let mut winner = -1;
    for (i, value) in values.enumerate() {
        if value < best {
            best = value;
            winner = i as i32;
        }
    }
    winner
}

//! Genome -> bytecode. Compilation is deterministic: the same genome
//! always yields the same byte sequence, which is what makes the byte
//! form usable as a cache key and an interop contract.

use super::conditions;
use super::opcode::OP_EFFECTS;
use super::BYTECODE_VERSION;
use super::HEADER_LEN_V2;
use crate::cards::Rank;
use crate::genome::Effect;
use crate::genome::Genome;
use crate::genome::Phase;
use crate::genome::Scoring;
use crate::genome::Setup;
use crate::genome::WinCondition;
use crate::Error;
use byteorder::BigEndian;
use byteorder::WriteBytesExt;
use std::collections::BTreeMap;

pub fn compile(genome: &Genome) -> Result<Vec<u8>, Error> {
    genome.validate()?;
    let setup = write_setup(&genome.setup, genome.min_turns);
    let turn = write_turn_structure(genome)?;
    let wins = write_wins(&genome.win_conditions);
    let scoring = genome.scoring.as_ref().map(write_scoring);
    let effects = match genome.effects.is_empty() {
        true => None,
        false => Some(write_effects(&genome.effects)),
    };

    let setup_offset = HEADER_LEN_V2 as u32;
    let turn_offset = setup_offset + setup.len() as u32;
    let win_offset = turn_offset + turn.len() as u32;
    let scoring_offset = match scoring {
        Some(_) => win_offset + wins.len() as u32,
        None => 0,
    };

    let mut buf = Vec::with_capacity(128);
    buf.write_u8(BYTECODE_VERSION).expect("vec write");
    buf.write_u32::<BigEndian>(genome.schema_version)
        .expect("vec write");
    buf.write_u64::<BigEndian>(super::fnv1a(genome.genome_id.as_bytes()))
        .expect("vec write");
    buf.write_u32::<BigEndian>(genome.player_count as u32)
        .expect("vec write");
    buf.write_u32::<BigEndian>(genome.max_turns)
        .expect("vec write");
    buf.write_u32::<BigEndian>(setup_offset).expect("vec write");
    buf.write_u32::<BigEndian>(turn_offset).expect("vec write");
    buf.write_u32::<BigEndian>(win_offset).expect("vec write");
    buf.write_u32::<BigEndian>(scoring_offset)
        .expect("vec write");
    buf.write_u8(genome.setup.tableau_mode as u8)
        .expect("vec write");
    buf.write_u8(genome.setup.sequence_direction as u8)
        .expect("vec write");
    debug_assert!(buf.len() == HEADER_LEN_V2);

    buf.extend_from_slice(&setup);
    buf.extend_from_slice(&turn);
    buf.extend_from_slice(&wins);
    if let Some(ref scoring) = scoring {
        buf.extend_from_slice(scoring);
    }
    if let Some(ref effects) = effects {
        buf.extend_from_slice(effects);
    }
    Ok(buf)
}

pub fn write_setup(setup: &Setup, min_turns: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(16 + setup.wild_ranks.len());
    buf.write_u8(setup.cards_per_player).expect("vec write");
    buf.write_u8(setup.deck_id).expect("vec write");
    buf.write_u8(setup.initial_discard).expect("vec write");
    buf.write_u8(setup.initial_tableau).expect("vec write");
    buf.write_u8(setup.hand_visibility as u8).expect("vec write");
    buf.write_u8(setup.deck_visibility as u8).expect("vec write");
    buf.write_u8(setup.discard_visibility as u8)
        .expect("vec write");
    buf.write_u8(setup.trump.mode_byte()).expect("vec write");
    buf.write_u8(setup.trump.suit_byte()).expect("vec write");
    buf.write_u32::<BigEndian>(setup.starting_chips)
        .expect("vec write");
    buf.write_u16::<BigEndian>(min_turns as u16)
        .expect("vec write");
    buf.write_u8(setup.wild_ranks.len() as u8).expect("vec write");
    for rank in setup.wild_ranks.iter() {
        buf.write_u8(*rank as u8).expect("vec write");
    }
    buf
}

fn write_turn_structure(genome: &Genome) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::with_capacity(8 + genome.phases.len() * 10);
    buf.write_u8(genome.phases.len() as u8).expect("vec write");
    buf.write_u8(genome.is_trick_based as u8).expect("vec write");
    buf.write_u32::<BigEndian>(genome.tricks_per_hand.unwrap_or(0))
        .expect("vec write");
    for phase in genome.phases.iter() {
        buf.write_u8(phase.tag()).expect("vec write");
        write_phase_payload(phase, &mut buf);
    }
    Ok(buf)
}

pub fn write_phase_payload(phase: &Phase, buf: &mut Vec<u8>) {
    match phase {
        Phase::Draw(spec) => {
            buf.write_u8(spec.source as u8).expect("vec write");
            buf.write_u32::<BigEndian>(spec.count).expect("vec write");
            buf.write_u8(spec.mandatory as u8).expect("vec write");
            buf.write_u8(spec.condition.is_some() as u8)
                .expect("vec write");
            if let Some(ref test) = spec.condition {
                conditions::encode_test(test, buf);
            }
        }
        Phase::Play(spec) => {
            buf.write_u8(spec.target as u8).expect("vec write");
            buf.write_u8(spec.min_cards).expect("vec write");
            buf.write_u8(spec.max_cards).expect("vec write");
            buf.write_u8(spec.mandatory as u8).expect("vec write");
            buf.write_u8(spec.pass_if_unable as u8).expect("vec write");
            let mut cond = vec![];
            if let Some(ref condition) = spec.condition {
                conditions::encode(condition, &mut cond);
            }
            buf.write_u32::<BigEndian>(cond.len() as u32)
                .expect("vec write");
            buf.extend_from_slice(&cond);
        }
        Phase::Discard(spec) => {
            buf.write_u8(spec.target as u8).expect("vec write");
            buf.write_u32::<BigEndian>(spec.count).expect("vec write");
            buf.write_u8(spec.mandatory as u8).expect("vec write");
        }
        Phase::Trick(spec) => {
            buf.write_u8(spec.lead_suit_required as u8)
                .expect("vec write");
            buf.write_u8(spec.trump_suit.map(|s| s as u8).unwrap_or(0xFF))
                .expect("vec write");
            buf.write_u8(spec.high_card_wins as u8).expect("vec write");
            buf.write_u8(spec.breaking_suit.map(|s| s as u8).unwrap_or(0xFF))
                .expect("vec write");
        }
        Phase::Betting(spec) => {
            buf.write_u32::<BigEndian>(spec.min_bet).expect("vec write");
            buf.write_u32::<BigEndian>(spec.max_raises)
                .expect("vec write");
        }
        Phase::Claim(spec) => {
            buf.write_u8(spec.start_rank as u8).expect("vec write");
            buf.write_u8(spec.sequential_rank as u8).expect("vec write");
            buf.write_u8(spec.max_cards).expect("vec write");
            buf.write_u8(spec.allow_challenge as u8).expect("vec write");
            buf.write_u8(spec.pile_penalty as u8).expect("vec write");
            buf.write_u8(spec.claim_score).expect("vec write");
            buf.write_i32::<BigEndian>(spec.penalty_score)
                .expect("vec write");
        }
        Phase::Bidding(spec) => {
            buf.write_u8(spec.min_bid).expect("vec write");
            buf.write_u8(spec.max_bid).expect("vec write");
            buf.write_u8(spec.allow_nil as u8).expect("vec write");
            buf.write_u8(spec.blind_nil as u8).expect("vec write");
        }
    }
}

pub fn write_wins(wins: &[WinCondition]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1 + wins.len() * 5);
    buf.write_u8(wins.len() as u8).expect("vec write");
    for win in wins {
        buf.write_u8(win.kind as u8).expect("vec write");
        buf.write_i32::<BigEndian>(win.threshold).expect("vec write");
    }
    buf
}

pub fn write_scoring(scoring: &Scoring) -> Vec<u8> {
    let mut buf = Vec::with_capacity(40);
    buf.write_u8(match scoring.contract {
        Some(_) => 2,
        None => 1,
    })
    .expect("vec write");
    buf.write_u8(scoring.team_mode as u8).expect("vec write");
    for points in scoring.rank_points.iter() {
        buf.write_i16::<BigEndian>(*points).expect("vec write");
    }
    for points in scoring.suit_points.iter() {
        buf.write_i16::<BigEndian>(*points).expect("vec write");
    }
    if let Some(ref contract) = scoring.contract {
        buf.write_i16::<BigEndian>(contract.points_per_trick)
            .expect("vec write");
        buf.write_i16::<BigEndian>(contract.overtrick)
            .expect("vec write");
        buf.write_i16::<BigEndian>(contract.nil_bonus)
            .expect("vec write");
        buf.write_i16::<BigEndian>(contract.nil_penalty)
            .expect("vec write");
        buf.write_i16::<BigEndian>(contract.bag_penalty)
            .expect("vec write");
        buf.write_u8(contract.bag_limit).expect("vec write");
    }
    buf
}

pub fn write_effects(effects: &BTreeMap<Rank, Effect>) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2 + effects.len() * 4);
    buf.write_u8(OP_EFFECTS).expect("vec write");
    buf.write_u8(effects.len() as u8).expect("vec write");
    for (rank, effect) in effects.iter() {
        buf.write_u8(*rank as u8).expect("vec write");
        buf.write_u8(effect.kind as u8).expect("vec write");
        buf.write_u8(effect.target as u8).expect("vec write");
        buf.write_u8(effect.value).expect("vec write");
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    /// the reference War genome is the cross-implementation golden vector
    #[test]
    fn war_compiles_to_77_bytes() {
        let bytecode = compile(&crate::catalog::war()).expect("compile");
        assert!(bytecode.len() == 77, "got {}", bytecode.len());
        assert!(bytecode[0] == BYTECODE_VERSION);
    }

    #[test]
    fn compilation_is_deterministic() {
        for genome in crate::catalog::all() {
            let a = compile(&genome).expect("compile");
            let b = compile(&genome).expect("compile");
            assert!(a == b, "{}", genome.genome_id);
        }
    }

    #[test]
    fn rejects_invalid_genome() {
        let broken = Genome::blank("broken", 2);
        assert!(matches!(
            compile(&broken),
            Err(Error::InvalidGenome(_))
        ));
    }

    #[test]
    fn distinct_ids_hash_differently() {
        let war = crate::catalog::war();
        let mut renamed = war.clone();
        renamed.genome_id = "seed-war-2".into();
        let a = compile(&war).expect("compile");
        let b = compile(&renamed).expect("compile");
        assert!(a[5..13] != b[5..13]);
        assert!(a[13..] == b[13..]);
    }
}

//! Bytecode -> parsed program. The parser segments: it slices the header,
//! phase descriptors (raw payloads preserved), win conditions, scoring,
//! and the effects trailer. It never evaluates anything; decoding a
//! payload into a typed phase happens on demand via `PhaseDescriptor`.

use super::compiler;
use super::conditions;
use super::opcode::OP_EFFECTS;
use super::BYTECODE_VERSION;
use super::HEADER_LEN_V1;
use super::HEADER_LEN_V2;
use crate::cards::Location;
use crate::cards::Rank;
use crate::cards::Suit;
use crate::genome::phase::TAG_BETTING;
use crate::genome::phase::TAG_BIDDING;
use crate::genome::phase::TAG_CLAIM;
use crate::genome::phase::TAG_DISCARD;
use crate::genome::phase::TAG_DRAW;
use crate::genome::phase::TAG_PLAY;
use crate::genome::phase::TAG_TRICK;
use crate::genome::BettingSpec;
use crate::genome::BiddingSpec;
use crate::genome::ClaimSpec;
use crate::genome::ContractScoring;
use crate::genome::DiscardSpec;
use crate::genome::DrawSpec;
use crate::genome::Effect;
use crate::genome::EffectKind;
use crate::genome::EffectTarget;
use crate::genome::Phase;
use crate::genome::PlaySpec;
use crate::genome::Scoring;
use crate::genome::SequenceDirection;
use crate::genome::Setup;
use crate::genome::TableauMode;
use crate::genome::TrickSpec;
use crate::genome::TrumpRule;
use crate::genome::Visibility;
use crate::genome::WinCondition;
use crate::genome::WinKind;
use crate::Error;
use byteorder::BigEndian;
use byteorder::ReadBytesExt;
use std::collections::BTreeMap;
use std::io::Cursor;

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub version: u8,
    pub legacy_version: u32,
    pub genome_hash: u64,
    pub player_count: u32,
    pub max_turns: u32,
    pub setup_offset: u32,
    pub turn_offset: u32,
    pub win_offset: u32,
    pub scoring_offset: u32,
    pub tableau_mode: TableauMode,
    pub sequence_direction: SequenceDirection,
}

/// One phase as segmented from the turn-structure section. The payload
/// is kept raw so re-emission is byte-exact.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseDescriptor {
    pub tag: u8,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub header: Header,
    pub setup: Setup,
    pub min_turns: u32,
    pub is_trick_based: bool,
    pub tricks_per_hand: Option<u32>,
    pub phases: Vec<PhaseDescriptor>,
    pub win_conditions: Vec<WinCondition>,
    pub scoring: Option<Scoring>,
    pub effects: BTreeMap<Rank, Effect>,
}

pub fn parse(bytes: &[u8]) -> Result<Program, Error> {
    let header = parse_header(bytes)?;
    let len = bytes.len() as u32;
    for (name, offset) in [
        ("setup", header.setup_offset),
        ("turn", header.turn_offset),
        ("win", header.win_offset),
    ] {
        if offset >= len {
            return Err(Error::InvalidBytecode(format!(
                "{} offset {} out of range",
                name, offset
            )));
        }
    }
    if header.scoring_offset != 0 && header.scoring_offset >= len {
        return Err(Error::InvalidBytecode(format!(
            "scoring offset {} out of range",
            header.scoring_offset
        )));
    }
    if header.setup_offset >= header.turn_offset || header.turn_offset >= header.win_offset {
        return Err(Error::InvalidBytecode("sections out of order".into()));
    }

    let mut cursor = Cursor::new(bytes);
    cursor.set_position(header.setup_offset as u64);
    let (mut setup, min_turns) = parse_setup(&mut cursor)?;
    setup.tableau_mode = header.tableau_mode;
    setup.sequence_direction = header.sequence_direction;

    cursor.set_position(header.turn_offset as u64);
    let (is_trick_based, tricks_per_hand, phases) = parse_turn_structure(&mut cursor)?;

    cursor.set_position(header.win_offset as u64);
    let win_conditions = parse_wins(&mut cursor)?;

    let scoring = match header.scoring_offset {
        0 => None,
        offset => {
            cursor.set_position(offset as u64);
            Some(parse_scoring(&mut cursor)?)
        }
    };

    let effects = match cursor.position() as usize == bytes.len() {
        true => BTreeMap::new(),
        false => parse_effects(&mut cursor)?,
    };
    if cursor.position() as usize != bytes.len() {
        return Err(Error::InvalidBytecode(format!(
            "trailing bytes at {}",
            cursor.position()
        )));
    }

    Ok(Program {
        header,
        setup,
        min_turns,
        is_trick_based,
        tricks_per_hand,
        phases,
        win_conditions,
        scoring,
        effects,
    })
}

fn parse_header(bytes: &[u8]) -> Result<Header, Error> {
    let v2 = bytes.first().copied() == Some(BYTECODE_VERSION);
    let need = if v2 { HEADER_LEN_V2 } else { HEADER_LEN_V1 };
    if bytes.len() < need {
        return Err(Error::InvalidBytecode(format!(
            "header needs {} bytes, have {}",
            need,
            bytes.len()
        )));
    }
    let mut cursor = Cursor::new(bytes);
    let version = match v2 {
        true => cursor.read_u8().expect("length checked"),
        false => 1,
    };
    let legacy_version = cursor.read_u32::<BigEndian>().expect("length checked");
    let genome_hash = cursor.read_u64::<BigEndian>().expect("length checked");
    let player_count = cursor.read_u32::<BigEndian>().expect("length checked");
    let max_turns = cursor.read_u32::<BigEndian>().expect("length checked");
    let setup_offset = cursor.read_u32::<BigEndian>().expect("length checked");
    let turn_offset = cursor.read_u32::<BigEndian>().expect("length checked");
    let win_offset = cursor.read_u32::<BigEndian>().expect("length checked");
    let scoring_offset = cursor.read_u32::<BigEndian>().expect("length checked");
    let (tableau_mode, sequence_direction) = match v2 {
        true => (
            TableauMode::try_from(cursor.read_u8().expect("length checked"))?,
            SequenceDirection::try_from(cursor.read_u8().expect("length checked"))?,
        ),
        false => (TableauMode::None, SequenceDirection::Ascending),
    };
    if !(2..=4).contains(&player_count) {
        return Err(Error::InvalidBytecode(format!(
            "player count {}",
            player_count
        )));
    }
    Ok(Header {
        version,
        legacy_version,
        genome_hash,
        player_count,
        max_turns,
        setup_offset,
        turn_offset,
        win_offset,
        scoring_offset,
        tableau_mode,
        sequence_direction,
    })
}

fn parse_setup(cursor: &mut Cursor<&[u8]>) -> Result<(Setup, u32), Error> {
    let cards_per_player = read_u8(cursor)?;
    let deck_id = read_u8(cursor)?;
    let initial_discard = read_u8(cursor)?;
    let initial_tableau = read_u8(cursor)?;
    let hand_visibility = Visibility::try_from(read_u8(cursor)?)?;
    let deck_visibility = Visibility::try_from(read_u8(cursor)?)?;
    let discard_visibility = Visibility::try_from(read_u8(cursor)?)?;
    let trump_mode = read_u8(cursor)?;
    let trump_suit = read_u8(cursor)?;
    let starting_chips = read_u32(cursor)?;
    let min_turns = cursor
        .read_u16::<BigEndian>()
        .map_err(|_| truncated(cursor))? as u32;
    let wild_count = read_u8(cursor)? as usize;
    let mut wild_ranks = Vec::with_capacity(wild_count);
    for _ in 0..wild_count {
        let byte = read_u8(cursor)?;
        if byte > 12 {
            return Err(Error::InvalidBytecode(format!("wild rank byte {}", byte)));
        }
        wild_ranks.push(Rank::from(byte));
    }
    let setup = Setup {
        cards_per_player,
        deck_id,
        initial_discard,
        initial_tableau,
        wild_ranks,
        hand_visibility,
        deck_visibility,
        discard_visibility,
        trump: TrumpRule::decode(trump_mode, trump_suit)?,
        starting_chips,
        tableau_mode: TableauMode::None,
        sequence_direction: SequenceDirection::Ascending,
    };
    Ok((setup, min_turns))
}

fn parse_turn_structure(
    cursor: &mut Cursor<&[u8]>,
) -> Result<(bool, Option<u32>, Vec<PhaseDescriptor>), Error> {
    let phase_count = read_u8(cursor)? as usize;
    let is_trick_based = read_u8(cursor)? != 0;
    let tricks = read_u32(cursor)?;
    let tricks_per_hand = match tricks {
        0 => None,
        n => Some(n),
    };
    let mut phases = Vec::with_capacity(phase_count);
    for _ in 0..phase_count {
        let tag = read_u8(cursor)?;
        let payload = read_payload(tag, cursor)?;
        phases.push(PhaseDescriptor { tag, payload });
    }
    Ok((is_trick_based, tricks_per_hand, phases))
}

/// fixed payload size per tag; Draw and Play carry variable condition bytes
fn read_payload(tag: u8, cursor: &mut Cursor<&[u8]>) -> Result<Vec<u8>, Error> {
    match tag {
        TAG_DRAW => {
            let mut payload = read_exact(cursor, 7)?;
            if payload[6] != 0 {
                payload.extend_from_slice(&read_exact(cursor, conditions::TEST_LEN)?);
            }
            Ok(payload)
        }
        TAG_PLAY => {
            let mut payload = read_exact(cursor, 9)?;
            let cond_len = u32::from_be_bytes(payload[5..9].try_into().expect("4 bytes")) as usize;
            payload.extend_from_slice(&read_exact(cursor, cond_len)?);
            Ok(payload)
        }
        TAG_DISCARD => read_exact(cursor, 6),
        TAG_TRICK => read_exact(cursor, 4),
        TAG_BETTING => read_exact(cursor, 8),
        TAG_CLAIM => read_exact(cursor, 10),
        TAG_BIDDING => read_exact(cursor, 4),
        _ => Err(Error::InvalidBytecode(format!("unknown phase tag {}", tag))),
    }
}

fn parse_wins(cursor: &mut Cursor<&[u8]>) -> Result<Vec<WinCondition>, Error> {
    let count = read_u8(cursor)? as usize;
    if count == 0 {
        return Err(Error::InvalidBytecode("no win conditions".into()));
    }
    let mut wins = Vec::with_capacity(count);
    for _ in 0..count {
        let kind = WinKind::try_from(read_u8(cursor)?)?;
        let threshold = cursor
            .read_i32::<BigEndian>()
            .map_err(|_| truncated(cursor))?;
        wins.push(WinCondition { kind, threshold });
    }
    Ok(wins)
}

fn parse_scoring(cursor: &mut Cursor<&[u8]>) -> Result<Scoring, Error> {
    let mode = read_u8(cursor)?;
    if mode != 1 && mode != 2 {
        return Err(Error::InvalidBytecode(format!("scoring mode {}", mode)));
    }
    let team_mode = read_u8(cursor)? != 0;
    let mut rank_points = [0i16; 13];
    for slot in rank_points.iter_mut() {
        *slot = read_i16(cursor)?;
    }
    let mut suit_points = [0i16; 4];
    for slot in suit_points.iter_mut() {
        *slot = read_i16(cursor)?;
    }
    let contract = match mode {
        2 => Some(ContractScoring {
            points_per_trick: read_i16(cursor)?,
            overtrick: read_i16(cursor)?,
            nil_bonus: read_i16(cursor)?,
            nil_penalty: read_i16(cursor)?,
            bag_penalty: read_i16(cursor)?,
            bag_limit: read_u8(cursor)?,
        }),
        _ => None,
    };
    Ok(Scoring {
        team_mode,
        rank_points,
        suit_points,
        contract,
    })
}

fn parse_effects(cursor: &mut Cursor<&[u8]>) -> Result<BTreeMap<Rank, Effect>, Error> {
    let sentinel = read_u8(cursor)?;
    if sentinel != OP_EFFECTS {
        return Err(Error::InvalidBytecode(format!(
            "expected effects sentinel, got {}",
            sentinel
        )));
    }
    let count = read_u8(cursor)? as usize;
    let mut effects = BTreeMap::new();
    for _ in 0..count {
        let rank = read_u8(cursor)?;
        if rank > 12 {
            return Err(Error::InvalidBytecode(format!("trigger rank {}", rank)));
        }
        let kind = EffectKind::try_from(read_u8(cursor)?)?;
        let target = EffectTarget::try_from(read_u8(cursor)?)?;
        let value = read_u8(cursor)?;
        effects.insert(
            Rank::from(rank),
            Effect {
                kind,
                target,
                value,
            },
        );
    }
    Ok(effects)
}

impl PhaseDescriptor {
    /// decode the raw payload into a typed phase; the interpreter does
    /// this once at engine construction, never per move
    pub fn decode(&self) -> Result<Phase, Error> {
        let bytes: &[u8] = &self.payload;
        let mut cursor = Cursor::new(bytes);
        let phase = match self.tag {
            TAG_DRAW => {
                let source = Location::try_from(read_u8(&mut cursor)?)?;
                let count = read_u32(&mut cursor)?;
                let mandatory = read_u8(&mut cursor)? != 0;
                let condition = match read_u8(&mut cursor)? {
                    0 => None,
                    _ => Some(conditions::decode_test(&mut cursor)?),
                };
                Phase::Draw(DrawSpec {
                    source,
                    count,
                    mandatory,
                    condition,
                })
            }
            TAG_PLAY => {
                let target = Location::try_from(read_u8(&mut cursor)?)?;
                let min_cards = read_u8(&mut cursor)?;
                let max_cards = read_u8(&mut cursor)?;
                let mandatory = read_u8(&mut cursor)? != 0;
                let pass_if_unable = read_u8(&mut cursor)? != 0;
                let cond_len = read_u32(&mut cursor)? as usize;
                let at = cursor.position() as usize;
                let condition = match cond_len {
                    0 => None,
                    n => {
                        let slice = bytes
                            .get(at..at + n)
                            .ok_or_else(|| truncated(&cursor))?;
                        cursor.set_position((at + n) as u64);
                        Some(conditions::decode(slice)?)
                    }
                };
                Phase::Play(PlaySpec {
                    target,
                    min_cards,
                    max_cards,
                    mandatory,
                    pass_if_unable,
                    condition,
                })
            }
            TAG_DISCARD => Phase::Discard(DiscardSpec {
                target: Location::try_from(read_u8(&mut cursor)?)?,
                count: read_u32(&mut cursor)?,
                mandatory: read_u8(&mut cursor)? != 0,
            }),
            TAG_TRICK => Phase::Trick(TrickSpec {
                lead_suit_required: read_u8(&mut cursor)? != 0,
                trump_suit: suit_option(read_u8(&mut cursor)?)?,
                high_card_wins: read_u8(&mut cursor)? != 0,
                breaking_suit: suit_option(read_u8(&mut cursor)?)?,
            }),
            TAG_BETTING => Phase::Betting(BettingSpec {
                min_bet: read_u32(&mut cursor)?,
                max_raises: read_u32(&mut cursor)?,
            }),
            TAG_CLAIM => {
                let start = read_u8(&mut cursor)?;
                if start > 12 {
                    return Err(Error::InvalidBytecode(format!("claim rank {}", start)));
                }
                Phase::Claim(ClaimSpec {
                    start_rank: Rank::from(start),
                    sequential_rank: read_u8(&mut cursor)? != 0,
                    max_cards: read_u8(&mut cursor)?,
                    allow_challenge: read_u8(&mut cursor)? != 0,
                    pile_penalty: read_u8(&mut cursor)? != 0,
                    claim_score: read_u8(&mut cursor)?,
                    penalty_score: cursor
                        .read_i32::<BigEndian>()
                        .map_err(|_| truncated(&cursor))?,
                })
            }
            TAG_BIDDING => Phase::Bidding(BiddingSpec {
                min_bid: read_u8(&mut cursor)?,
                max_bid: read_u8(&mut cursor)?,
                allow_nil: read_u8(&mut cursor)? != 0,
                blind_nil: read_u8(&mut cursor)? != 0,
            }),
            tag => return Err(Error::InvalidBytecode(format!("unknown phase tag {}", tag))),
        };
        if cursor.position() as usize != bytes.len() {
            return Err(Error::InvalidBytecode("phase payload trailing bytes".into()));
        }
        Ok(phase)
    }
}

impl Program {
    pub fn decode_phases(&self) -> Result<Vec<Phase>, Error> {
        self.phases.iter().map(PhaseDescriptor::decode).collect()
    }

    /// Re-serialize. For any program parsed from compiler output this is
    /// a byte-for-byte fixed point.
    pub fn emit(&self) -> Vec<u8> {
        use byteorder::WriteBytesExt;
        let setup = compiler::write_setup(&self.setup, self.min_turns);
        let mut turn = Vec::new();
        turn.write_u8(self.phases.len() as u8).expect("vec write");
        turn.write_u8(self.is_trick_based as u8).expect("vec write");
        turn.write_u32::<BigEndian>(self.tricks_per_hand.unwrap_or(0))
            .expect("vec write");
        for descriptor in self.phases.iter() {
            turn.write_u8(descriptor.tag).expect("vec write");
            turn.extend_from_slice(&descriptor.payload);
        }
        let wins = compiler::write_wins(&self.win_conditions);
        let scoring = self.scoring.as_ref().map(compiler::write_scoring);

        let setup_offset = HEADER_LEN_V2 as u32;
        let turn_offset = setup_offset + setup.len() as u32;
        let win_offset = turn_offset + turn.len() as u32;
        let scoring_offset = match scoring {
            Some(_) => win_offset + wins.len() as u32,
            None => 0,
        };
        let mut buf = Vec::with_capacity(128);
        buf.write_u8(BYTECODE_VERSION).expect("vec write");
        buf.write_u32::<BigEndian>(self.header.legacy_version)
            .expect("vec write");
        buf.write_u64::<BigEndian>(self.header.genome_hash)
            .expect("vec write");
        buf.write_u32::<BigEndian>(self.header.player_count)
            .expect("vec write");
        buf.write_u32::<BigEndian>(self.header.max_turns)
            .expect("vec write");
        buf.write_u32::<BigEndian>(setup_offset).expect("vec write");
        buf.write_u32::<BigEndian>(turn_offset).expect("vec write");
        buf.write_u32::<BigEndian>(win_offset).expect("vec write");
        buf.write_u32::<BigEndian>(scoring_offset)
            .expect("vec write");
        buf.write_u8(self.setup.tableau_mode as u8)
            .expect("vec write");
        buf.write_u8(self.setup.sequence_direction as u8)
            .expect("vec write");
        buf.extend_from_slice(&setup);
        buf.extend_from_slice(&turn);
        buf.extend_from_slice(&wins);
        if let Some(ref scoring) = scoring {
            buf.extend_from_slice(scoring);
        }
        if !self.effects.is_empty() {
            buf.extend_from_slice(&compiler::write_effects(&self.effects));
        }
        buf
    }
}

fn suit_option(byte: u8) -> Result<Option<Suit>, Error> {
    match byte {
        0xFF => Ok(None),
        n if n < 4 => Ok(Some(Suit::from(n))),
        n => Err(Error::InvalidBytecode(format!("suit byte {}", n))),
    }
}

fn read_u8(cursor: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    cursor.read_u8().map_err(|_| truncated(cursor))
}

fn read_u32(cursor: &mut Cursor<&[u8]>) -> Result<u32, Error> {
    cursor
        .read_u32::<BigEndian>()
        .map_err(|_| truncated(cursor))
}

fn read_i16(cursor: &mut Cursor<&[u8]>) -> Result<i16, Error> {
    cursor
        .read_i16::<BigEndian>()
        .map_err(|_| truncated(cursor))
}

fn read_exact(cursor: &mut Cursor<&[u8]>, n: usize) -> Result<Vec<u8>, Error> {
    let at = cursor.position() as usize;
    let slice = cursor
        .get_ref()
        .get(at..at + n)
        .ok_or_else(|| truncated(cursor))?
        .to_vec();
    cursor.set_position((at + n) as u64);
    Ok(slice)
}

fn truncated(cursor: &Cursor<&[u8]>) -> Error {
    Error::InvalidBytecode(format!("truncated at byte {}", cursor.position()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::compile;

    #[test]
    fn round_trip_all_seeds() {
        for genome in crate::catalog::all() {
            let bytecode = compile(&genome).expect("compile");
            let program = parse(&bytecode).expect("parse");
            assert!(program.emit() == bytecode, "{}", genome.genome_id);
            let phases = program.decode_phases().expect("decode");
            assert!(phases == genome.phases, "{}", genome.genome_id);
            assert!(program.win_conditions == genome.win_conditions);
            assert!(program.setup == genome.setup);
            assert!(program.min_turns == genome.min_turns);
            assert!(program.effects == genome.effects);
            assert!(program.scoring == genome.scoring);
        }
    }

    #[test]
    fn v2_header_shape() {
        let bytecode = compile(&crate::catalog::war()).expect("compile");
        let program = parse(&bytecode).expect("parse");
        assert!(program.header.version == 2);
        assert!(program.header.player_count == 2);
        assert!(program.header.setup_offset == HEADER_LEN_V2 as u32);
    }

    #[test]
    fn accepts_v1_header() {
        // V1 is the V2 byte stream minus the version byte and the two
        // trailing mode bytes, with all offsets shifted by 3.
        let v2 = compile(&crate::catalog::crazy_eights()).expect("compile");
        let mut v1 = Vec::with_capacity(v2.len() - 3);
        v1.extend_from_slice(&v2[1..21]);
        for chunk in v2[21..37].chunks(4) {
            let offset = u32::from_be_bytes(chunk.try_into().expect("4 bytes"));
            let shifted = offset.saturating_sub(3);
            v1.extend_from_slice(&shifted.to_be_bytes());
        }
        v1.extend_from_slice(&v2[39..]);
        let program = parse(&v1).expect("parse v1");
        assert!(program.header.version == 1);
        assert!(program.setup.tableau_mode == TableauMode::None);
        assert!(program.decode_phases().is_ok());
    }

    #[test]
    fn rejects_truncation() {
        let bytecode = compile(&crate::catalog::hearts()).expect("compile");
        for cut in [1usize, 10, 38, bytecode.len() - 1] {
            assert!(parse(&bytecode[..cut]).is_err(), "cut {}", cut);
        }
    }

    #[test]
    fn rejects_unknown_phase_tag() {
        let war = crate::catalog::war();
        let mut bytecode = compile(&war).expect("compile");
        let program = parse(&bytecode).expect("parse");
        let turn = program.header.turn_offset as usize;
        bytecode[turn + 6] = 99;
        assert!(parse(&bytecode).is_err());
    }

    #[test]
    fn rejects_out_of_range_offsets() {
        let mut bytecode = compile(&crate::catalog::war()).expect("compile");
        bytecode[21..25].copy_from_slice(&u32::MAX.to_be_bytes());
        assert!(parse(&bytecode).is_err());
    }
}

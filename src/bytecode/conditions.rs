//! Byte codec for condition trees. A leaf is a fixed 7-byte record
//! `(opcode, operator, value: i32, reference)`; a compound is an AND/OR
//! marker, a child count, and the children in order.

use super::opcode::OP_AND;
use super::opcode::OP_OR;
use crate::genome::Cmp;
use crate::genome::Condition;
use crate::genome::Probe;
use crate::genome::Test;
use crate::Error;
use byteorder::BigEndian;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use std::io::Cursor;

pub const TEST_LEN: usize = 7;
const MAX_DECODE_DEPTH: usize = 16;

pub fn encode(condition: &Condition, buf: &mut Vec<u8>) {
    match condition {
        Condition::Test(test) => encode_test(test, buf),
        Condition::All(kids) => encode_compound(OP_AND, kids, buf),
        Condition::Any(kids) => encode_compound(OP_OR, kids, buf),
    }
}

pub fn encode_test(test: &Test, buf: &mut Vec<u8>) {
    buf.write_u8(test.probe as u8).expect("vec write");
    buf.write_u8(test.cmp as u8).expect("vec write");
    buf.write_i32::<BigEndian>(test.value).expect("vec write");
    buf.write_u8(test.reference).expect("vec write");
}

fn encode_compound(marker: u8, kids: &[Condition], buf: &mut Vec<u8>) {
    buf.write_u8(marker).expect("vec write");
    buf.write_u8(kids.len() as u8).expect("vec write");
    for kid in kids {
        encode(kid, buf);
    }
}

/// decode a full condition tree from exactly `bytes`
pub fn decode(bytes: &[u8]) -> Result<Condition, Error> {
    let mut cursor = Cursor::new(bytes);
    let condition = decode_node(&mut cursor, 0)?;
    if cursor.position() as usize != bytes.len() {
        return Err(Error::InvalidBytecode(format!(
            "condition bytes trailing at {}",
            cursor.position()
        )));
    }
    Ok(condition)
}

pub fn decode_test(cursor: &mut Cursor<&[u8]>) -> Result<Test, Error> {
    let probe = Probe::try_from(read_u8(cursor)?)?;
    let cmp = Cmp::try_from(read_u8(cursor)?)?;
    let value = cursor
        .read_i32::<BigEndian>()
        .map_err(|_| truncated(cursor))?;
    let reference = read_u8(cursor)?;
    Ok(Test {
        probe,
        cmp,
        value,
        reference,
    })
}

fn decode_node(cursor: &mut Cursor<&[u8]>, depth: usize) -> Result<Condition, Error> {
    if depth > MAX_DECODE_DEPTH {
        return Err(Error::InvalidBytecode("condition nesting too deep".into()));
    }
    let marker = peek_u8(cursor)?;
    match marker {
        OP_AND | OP_OR => {
            let _ = read_u8(cursor)?;
            let count = read_u8(cursor)? as usize;
            if count == 0 {
                return Err(Error::InvalidBytecode("empty compound condition".into()));
            }
            let kids = (0..count)
                .map(|_| decode_node(cursor, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(match marker {
                OP_AND => Condition::All(kids),
                _ => Condition::Any(kids),
            })
        }
        _ => Ok(Condition::Test(decode_test(cursor)?)),
    }
}

fn read_u8(cursor: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    cursor.read_u8().map_err(|_| truncated(cursor))
}

fn peek_u8(cursor: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    let position = cursor.position() as usize;
    cursor
        .get_ref()
        .get(position)
        .copied()
        .ok_or_else(|| truncated(cursor))
}

fn truncated(cursor: &Cursor<&[u8]>) -> Error {
    Error::InvalidBytecode(format!("truncated at byte {}", cursor.position()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::condition::REF_TOP_DISCARD;

    fn sample() -> Condition {
        Condition::Any(vec![
            Condition::Test(Test::new(Probe::CardMatchesRank, Cmp::Eq, 1).against(REF_TOP_DISCARD)),
            Condition::All(vec![
                Condition::Test(Test::new(Probe::HandSize, Cmp::Gt, 3)),
                Condition::Test(Test::new(Probe::CardRank, Cmp::Ge, 10)),
            ]),
        ])
    }

    #[test]
    fn round_trip() {
        let mut buf = vec![];
        encode(&sample(), &mut buf);
        assert!(decode(&buf).expect("decode") == sample());
    }

    #[test]
    fn leaf_is_seven_bytes() {
        let mut buf = vec![];
        encode_test(&Test::new(Probe::HandSize, Cmp::Eq, 0), &mut buf);
        assert!(buf.len() == TEST_LEN);
    }

    #[test]
    fn rejects_truncation() {
        let mut buf = vec![];
        encode(&sample(), &mut buf);
        buf.pop();
        assert!(decode(&buf).is_err());
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut buf = vec![];
        encode(&sample(), &mut buf);
        buf.push(0);
        assert!(decode(&buf).is_err());
    }
}

use super::condition::Condition;
use super::genome::Genome;
use super::phase::Phase;
use crate::cards::Location;
use crate::Error;

/// condition trees deeper or wider than this fail validation
pub const MAX_CONDITION_DEPTH: usize = 4;
pub const MAX_CONDITION_FANOUT: usize = 8;

impl Genome {
    /// Structural invariants every genome must satisfy before it may be
    /// compiled. The evolution engine repairs first, so a violation here
    /// is a bug in an operator, not an expected runtime event.
    pub fn validate(&self) -> Result<(), Error> {
        if !(2..=4).contains(&self.player_count) {
            return Err(invalid(format!("player_count {} not in 2..=4", self.player_count)));
        }
        if self.phases.is_empty() {
            return Err(invalid("no phases".into()));
        }
        if self.win_conditions.is_empty() {
            return Err(invalid("no win conditions".into()));
        }
        if self.setup.cards_per_player == 0 {
            return Err(invalid("zero cards per player".into()));
        }
        if self.cards_dealt() > crate::DECK_SIZE {
            return Err(invalid(format!("deal requires {} cards", self.cards_dealt())));
        }
        if self.min_turns < 1 {
            return Err(invalid("min_turns must be at least 1".into()));
        }
        if self.max_turns < self.min_turns {
            return Err(invalid(format!(
                "max_turns {} below min_turns {}",
                self.max_turns, self.min_turns
            )));
        }
        if self.max_turns > crate::MAX_TURN_BOUND {
            return Err(invalid(format!("max_turns {} above hard bound", self.max_turns)));
        }
        if self.is_trick_based {
            if !self.phases.iter().any(|p| matches!(p, Phase::Trick(_))) {
                return Err(invalid("trick-based genome without a trick phase".into()));
            }
            match self.tricks_per_hand {
                Some(t) if t >= 1 && t <= self.setup.cards_per_player as u32 => {}
                Some(t) => return Err(invalid(format!("tricks_per_hand {} out of range", t))),
                None => return Err(invalid("trick-based genome without tricks_per_hand".into())),
            }
        } else if self.phases.iter().any(|p| matches!(p, Phase::Trick(_))) {
            return Err(invalid("trick phase in a non-trick genome".into()));
        }
        for phase in self.phases.iter() {
            self.validate_phase(phase)?;
        }
        Ok(())
    }

    fn validate_phase(&self, phase: &Phase) -> Result<(), Error> {
        match phase {
            Phase::Draw(spec) => {
                if spec.count == 0 {
                    return Err(invalid("draw phase with zero count".into()));
                }
                match spec.source {
                    Location::Deck | Location::Discard | Location::OpponentHand => Ok(()),
                    other => Err(invalid(format!("draw phase cannot source {}", other))),
                }
            }
            Phase::Play(spec) => {
                if spec.min_cards == 0 || spec.min_cards > spec.max_cards {
                    return Err(invalid(format!(
                        "play phase card range {}..{}",
                        spec.min_cards, spec.max_cards
                    )));
                }
                if let Some(ref condition) = spec.condition {
                    validate_condition(condition)?;
                }
                match spec.target {
                    Location::Discard | Location::Tableau => Ok(()),
                    other => Err(invalid(format!("play phase cannot target {}", other))),
                }
            }
            Phase::Discard(spec) => {
                if spec.count == 0 {
                    return Err(invalid("discard phase with zero count".into()));
                }
                match spec.target {
                    Location::Discard | Location::Tableau => Ok(()),
                    other => Err(invalid(format!("discard phase cannot target {}", other))),
                }
            }
            Phase::Trick(_) => Ok(()),
            Phase::Betting(spec) => {
                if self.setup.starting_chips == 0 {
                    return Err(invalid("betting phase without starting chips".into()));
                }
                if spec.min_bet == 0 {
                    return Err(invalid("betting phase with zero min_bet".into()));
                }
                Ok(())
            }
            Phase::Claim(spec) => {
                if spec.max_cards == 0 {
                    return Err(invalid("claim phase with zero max_cards".into()));
                }
                Ok(())
            }
            Phase::Bidding(spec) => {
                if !self.is_trick_based {
                    return Err(invalid("bidding phase in a non-trick genome".into()));
                }
                if spec.min_bid > spec.max_bid {
                    return Err(invalid(format!(
                        "bid range {}..{}",
                        spec.min_bid, spec.max_bid
                    )));
                }
                Ok(())
            }
        }
    }
}

fn validate_condition(condition: &Condition) -> Result<(), Error> {
    if condition.depth() > MAX_CONDITION_DEPTH {
        return Err(invalid(format!("condition depth {}", condition.depth())));
    }
    walk(condition)
}

fn walk(condition: &Condition) -> Result<(), Error> {
    match condition {
        Condition::Test(_) => Ok(()),
        Condition::All(kids) | Condition::Any(kids) => {
            if kids.is_empty() {
                return Err(invalid("compound condition with no children".into()));
            }
            if kids.len() > MAX_CONDITION_FANOUT {
                return Err(invalid(format!("compound condition fanout {}", kids.len())));
            }
            kids.iter().try_for_each(walk)
        }
    }
}

fn invalid(why: String) -> Error {
    Error::InvalidGenome(why)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::phase::DrawSpec;
    use crate::genome::win::{WinCondition, WinKind};

    #[test]
    fn catalog_is_valid() {
        for genome in crate::catalog::all() {
            assert!(genome.validate().is_ok(), "{}", genome.genome_id);
        }
    }

    #[test]
    fn rejects_empty_phase_list() {
        let mut g = Genome::blank("t", 2);
        g.win_conditions = vec![WinCondition::new(WinKind::EmptyHand, 0)];
        assert!(matches!(g.validate(), Err(Error::InvalidGenome(_))));
    }

    #[test]
    fn rejects_missing_win_condition() {
        let mut g = Genome::blank("t", 2);
        g.phases = vec![Phase::Draw(DrawSpec {
            source: Location::Deck,
            count: 1,
            mandatory: false,
            condition: None,
        })];
        assert!(matches!(g.validate(), Err(Error::InvalidGenome(_))));
    }

    #[test]
    fn rejects_oversized_deal() {
        let mut g = crate::catalog::war();
        g.setup.cards_per_player = 27;
        assert!(g.validate().is_err());
    }

    #[test]
    fn rejects_inverted_turn_bounds() {
        let mut g = crate::catalog::war();
        g.min_turns = g.max_turns + 1;
        assert!(g.validate().is_err());
    }

    #[test]
    fn rejects_trick_genome_without_trick_phase() {
        let mut g = crate::catalog::crazy_eights();
        g.is_trick_based = true;
        g.tricks_per_hand = Some(5);
        assert!(g.validate().is_err());
    }
}

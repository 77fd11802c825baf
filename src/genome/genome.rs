use super::effect::Effect;
use super::phase::Phase;
use super::scoring::Scoring;
use super::setup::Setup;
use super::win::WinCondition;
use crate::cards::Rank;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: u32 = 1;

/// The complete rule specification for one game. Genomes are frozen:
/// every evolution operator clones and rebuilds, nothing edits in place.
/// The effects map is a BTreeMap so iteration order, and therefore
/// compilation, is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub schema_version: u32,
    pub genome_id: String,
    pub generation: u32,
    pub player_count: u8,
    pub setup: Setup,
    pub phases: Vec<Phase>,
    pub is_trick_based: bool,
    pub tricks_per_hand: Option<u32>,
    pub effects: BTreeMap<Rank, Effect>,
    pub win_conditions: Vec<WinCondition>,
    pub scoring: Option<Scoring>,
    pub min_turns: u32,
    pub max_turns: u32,
}

impl Genome {
    /// a minimal playable skeleton the builders and repair both start from
    pub fn blank(genome_id: &str, player_count: u8) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            genome_id: genome_id.to_string(),
            generation: 0,
            player_count,
            setup: Setup::plain(5),
            phases: vec![],
            is_trick_based: false,
            tricks_per_hand: None,
            effects: BTreeMap::new(),
            win_conditions: vec![],
            scoring: None,
            min_turns: 1,
            max_turns: 200,
        }
    }

    /// total cards committed by the deal
    pub fn cards_dealt(&self) -> usize {
        self.setup.cards_per_player as usize * self.player_count as usize
            + self.setup.initial_discard as usize
            + self.setup.initial_tableau as usize
    }

    pub fn condition_nodes(&self) -> usize {
        self.phases.iter().map(Phase::condition_nodes).sum()
    }

    /// child identity for the breeding pipeline
    pub fn child_of(&self, genome_id: String, generation: u32) -> Self {
        let mut child = self.clone();
        child.genome_id = genome_id;
        child.generation = generation;
        child
    }
}

impl std::fmt::Display for Genome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} p{} [{}] wins:{}",
            self.genome_id,
            self.player_count,
            self.phases
                .iter()
                .map(Phase::name)
                .collect::<Vec<_>>()
                .join(","),
            self.win_conditions.len(),
        )
    }
}

impl crate::Arbitrary for Genome {
    /// a random catalog seed with a couple of mutations applied
    fn random() -> Self {
        use rand::Rng;
        use rand::SeedableRng;
        let mut rng = rand::rngs::SmallRng::seed_from_u64(rand::rng().random());
        let seeds = crate::catalog::all();
        let pick = rng.random_range(0..seeds.len());
        crate::evolve::mutate::Mutator::default().mutate(&seeds[pick], &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip() {
        for genome in crate::catalog::all() {
            let json = serde_json::to_string(&genome).expect("serialize");
            let back: Genome = serde_json::from_str(&json).expect("deserialize");
            assert!(back == genome);
        }
    }

    #[test]
    fn arbitrary_genomes_repair_cleanly() {
        use crate::Arbitrary;
        for _ in 0..10 {
            let genome = Genome::random();
            let repaired = crate::evolve::repair::validate_and_repair(genome);
            assert!(repaired.validate().is_ok());
        }
    }

    #[test]
    fn cards_dealt_counts_seeding() {
        let mut g = Genome::blank("t", 3);
        g.setup.cards_per_player = 7;
        g.setup.initial_discard = 1;
        g.setup.initial_tableau = 4;
        assert!(g.cards_dealt() == 26);
    }
}

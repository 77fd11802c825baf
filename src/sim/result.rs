/// Everything one simulated game reports back.
#[derive(Debug, Clone, Default)]
pub struct GameResult {
    pub winner: i32,
    pub turns: u32,
    pub duration_ns: u64,
    pub error: bool,
    /// decision points offered to any player
    pub decisions: u32,
    /// decision points with exactly one legal move
    pub forced: u32,
    pub valid_moves: u64,
    pub actions: u32,
    /// moves that changed another player's state
    pub interactions: u32,
    pub challenges: u32,
    pub challenges_upheld: u32,
    pub lead_changes: u32,
    pub decisive_turn_pct: f64,
    pub closest_margin: f64,
    /// leader at the game's midpoint, -1 when tied
    pub midpoint_leader: i32,
}

/// Batch summary. Every field is a sum, mean, or order statistic so a
/// parallel reduction matches the serial one.
#[derive(Debug, Clone, Default)]
pub struct AggregatedStats {
    pub games: u32,
    pub wins: [u32; crate::MAX_PLAYERS],
    pub draws: u32,
    pub errors: u32,
    pub avg_turns: f64,
    pub median_turns: f64,
    /// games per second over the whole batch
    pub throughput: f64,
    pub total_decisions: u64,
    pub forced_decisions: u64,
    pub total_valid_moves: u64,
    pub total_actions: u64,
    pub total_interactions: u64,
    pub challenges: u64,
    pub challenges_upheld: u64,
    pub avg_lead_changes: f64,
    pub avg_decisive_turn_pct: f64,
    pub avg_closest_margin: f64,
    /// games whose winner trailed at the midpoint
    pub comebacks: u32,
    pub timed_out: bool,
}

impl AggregatedStats {
    pub fn from_results(results: &[GameResult], elapsed_secs: f64, timed_out: bool) -> Self {
        let games = results.len() as u32;
        let mut stats = AggregatedStats {
            games,
            timed_out,
            ..Default::default()
        };
        if games == 0 {
            return stats;
        }
        let mut turns: Vec<u32> = Vec::with_capacity(results.len());
        for result in results {
            match result.winner {
                w if w >= 0 && (w as usize) < crate::MAX_PLAYERS => {
                    stats.wins[w as usize] += 1;
                }
                _ if result.error => stats.errors += 1,
                _ => stats.draws += 1,
            }
            turns.push(result.turns);
            stats.total_decisions += result.decisions as u64;
            stats.forced_decisions += result.forced as u64;
            stats.total_valid_moves += result.valid_moves;
            stats.total_actions += result.actions as u64;
            stats.total_interactions += result.interactions as u64;
            stats.challenges += result.challenges as u64;
            stats.challenges_upheld += result.challenges_upheld as u64;
            stats.avg_lead_changes += result.lead_changes as f64;
            stats.avg_decisive_turn_pct += result.decisive_turn_pct;
            stats.avg_closest_margin += result.closest_margin;
            if result.winner >= 0 && result.midpoint_leader != result.winner {
                stats.comebacks += 1;
            }
        }
        let n = games as f64;
        stats.avg_turns = turns.iter().map(|t| *t as f64).sum::<f64>() / n;
        turns.sort_unstable();
        stats.median_turns = match turns.len() % 2 {
            0 => (turns[turns.len() / 2 - 1] + turns[turns.len() / 2]) as f64 / 2.0,
            _ => turns[turns.len() / 2] as f64,
        };
        stats.avg_lead_changes /= n;
        stats.avg_decisive_turn_pct /= n;
        stats.avg_closest_margin /= n;
        stats.throughput = match elapsed_secs > 0.0 {
            true => n / elapsed_secs,
            false => 0.0,
        };
        stats
    }

    pub fn win_rate(&self, seat: usize) -> f64 {
        match self.games {
            0 => 0.0,
            games => self.wins[seat] as f64 / games as f64,
        }
    }

    pub fn error_rate(&self) -> f64 {
        match self.games {
            0 => 0.0,
            games => self.errors as f64 / games as f64,
        }
    }

    pub fn draw_rate(&self) -> f64 {
        match self.games {
            0 => 0.0,
            games => self.draws as f64 / games as f64,
        }
    }

    pub fn forced_rate(&self) -> f64 {
        match self.total_decisions {
            0 => 0.0,
            n => self.forced_decisions as f64 / n as f64,
        }
    }
}

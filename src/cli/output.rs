//! Output formatting utilities for CLI.

// Counts are averaged as floats
#![allow(clippy::cast_precision_loss)]

use gridwar::sim::MatchResult;
use serde::Serialize;

/// Format a match result as human-readable text.
pub(super) fn format_text(result: &MatchResult, names: &[String]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Match Result (seed: {})\n", result.seed));
    if let Some(winner) = result.winner {
        let name = names
            .get(usize::from(winner).saturating_sub(1))
            .map_or("Unknown", String::as_str);
        output.push_str(&format!("  Winner: Player {winner} ({name})\n"));
    } else {
        output.push_str("  Winner: Draw\n");
    }
    output.push_str(&format!("  Turns: {}\n\n", result.turns_played));

    for (i, player) in result.players.iter().enumerate() {
        let name = names.get(i).map_or("Unknown", String::as_str);
        output.push_str(&format!(
            "  Player {} ({}, {}): {} cells, {} population",
            player.player, name, player.doctrine, player.cells, player.population
        ));
        if let Some(turn) = player.eliminated_turn {
            output.push_str(&format!(" [eliminated turn {turn}]"));
        }
        output.push('\n');
    }

    output
}

/// Tournament statistics for aggregated results.
#[derive(Debug, Default)]
pub(super) struct TournamentStats {
    /// Total games played.
    pub(super) games_played: u64,
    /// Win count per player.
    pub(super) wins: Vec<u64>,
    /// Draw count.
    pub(super) draws: u64,
    /// Total final cells per player.
    total_cells: Vec<f64>,
    /// Final cells sum of squares for std dev calculation.
    cell_sq_sums: Vec<f64>,
    /// Total turns across all games.
    total_turns: u64,
}

impl TournamentStats {
    /// Create new stats for n players.
    pub(super) fn new(num_players: usize) -> Self {
        Self {
            games_played: 0,
            wins: vec![0; num_players],
            draws: 0,
            total_cells: vec![0.0; num_players],
            cell_sq_sums: vec![0.0; num_players],
            total_turns: 0,
        }
    }

    /// Add a match result to the stats.
    pub(super) fn add_result(&mut self, result: &MatchResult) {
        self.games_played += 1;
        self.total_turns += u64::from(result.turns_played);

        if let Some(winner) = result.winner {
            let idx = usize::from(winner).saturating_sub(1);
            if let Some(wins) = self.wins.get_mut(idx) {
                *wins += 1;
            }
        } else {
            self.draws += 1;
        }

        for (i, player) in result.players.iter().enumerate() {
            if i < self.total_cells.len() {
                let cells = f64::from(player.cells);
                self.total_cells[i] += cells;
                self.cell_sq_sums[i] += cells * cells;
            }
        }
    }

    /// Merge another thread's stats into these.
    pub(super) fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.draws += other.draws;
        self.total_turns += other.total_turns;
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        for (a, b) in self.total_cells.iter_mut().zip(&other.total_cells) {
            *a += b;
        }
        for (a, b) in self.cell_sq_sums.iter_mut().zip(&other.cell_sq_sums) {
            *a += b;
        }
    }

    /// Get win rate for a player (0.0-1.0).
    pub(super) fn win_rate(&self, player_idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins.get(player_idx).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Get draw rate (0.0-1.0).
    pub(super) fn draw_rate(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.draws as f64 / self.games_played as f64
    }

    /// Get average final cell count for a player.
    pub(super) fn avg_cells(&self, player_idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_cells.get(player_idx).copied().unwrap_or(0.0) / self.games_played as f64
    }

    /// Get final cell count standard deviation for a player.
    pub(super) fn cells_std_dev(&self, player_idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let n = self.games_played as f64;
        let mean = self.avg_cells(player_idx);
        let sq_sum = self.cell_sq_sums.get(player_idx).copied().unwrap_or(0.0);
        let variance = (sq_sum / n) - (mean * mean);
        if variance < 0.0 { 0.0 } else { variance.sqrt() }
    }

    /// Get average game length.
    pub(super) fn avg_turns(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games_played as f64
    }
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    /// Total games played.
    games_played: u64,
    /// Per-player statistics.
    players: Vec<JsonTournamentPlayer>,
    /// Number of draws.
    draws: u64,
    /// Average game length in turns.
    avg_turns: f64,
}

/// JSON-serializable per-player tournament stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentPlayer {
    /// Player number (1-based).
    player: usize,
    /// Strategy name.
    strategy: String,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Average final cell count.
    avg_cells: f64,
    /// Final cell count standard deviation.
    cells_std_dev: f64,
}

impl JsonTournamentResult {
    /// Create from stats and strategy names.
    pub(super) fn from_stats(stats: &TournamentStats, names: &[String]) -> Self {
        let players = names
            .iter()
            .enumerate()
            .map(|(i, name)| JsonTournamentPlayer {
                player: i + 1,
                strategy: name.clone(),
                wins: stats.wins.get(i).copied().unwrap_or(0),
                win_rate: stats.win_rate(i),
                avg_cells: stats.avg_cells(i),
                cells_std_dev: stats.cells_std_dev(i),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            players,
            draws: stats.draws,
            avg_turns: stats.avg_turns(),
        }
    }
}

/// Format tournament stats as human-readable text.
pub(super) fn format_tournament_text(stats: &TournamentStats, names: &[String]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Tournament Results ({} games)\n", stats.games_played));
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (i, name) in names.iter().enumerate() {
        let wins = stats.wins.get(i).copied().unwrap_or(0);
        let rate = stats.win_rate(i) * 100.0;
        output.push_str(&format!("  Player {} ({}): {:.1}% ({} wins)\n", i + 1, name, rate, wins));
    }
    output.push_str(&format!(
        "  Draws: {} ({:.1}%)\n\n",
        stats.draws,
        stats.draw_rate() * 100.0
    ));

    output.push_str("Average Final Cells:\n");
    for (i, name) in names.iter().enumerate() {
        output.push_str(&format!(
            "  Player {} ({}): {:.1} (+/- {:.1})\n",
            i + 1,
            name,
            stats.avg_cells(i),
            stats.cells_std_dev(i)
        ));
    }

    output.push_str(&format!("\nAverage Game Length: {:.0} turns\n", stats.avg_turns()));

    output
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &TournamentStats, names: &[String]) -> String {
    let mut output = String::new();

    output.push_str("player,strategy,wins,win_rate,avg_cells,cells_std_dev\n");

    for (i, name) in names.iter().enumerate() {
        output.push_str(&format!(
            "{},{},{},{:.4},{:.2},{:.2}\n",
            i + 1,
            name,
            stats.wins.get(i).copied().unwrap_or(0),
            stats.win_rate(i),
            stats.avg_cells(i),
            stats.cells_std_dev(i)
        ));
    }

    output
}

//! Match runner: a pure function from `(seed, profiles)` to a result.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::MatchError;
use crate::grid::Coord;
use crate::sim::universe::{Topology, Universe};
use crate::sim::{MAX_PLAYERS, PlayerId};
use crate::strategy::{Doctrine, StrategyConfig, Strategist};

/// World parameters for a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Side length of the universe.
    pub size: u32,
    /// Turn limit.
    pub max_turns: u32,
    /// Multiplicative growth per turn.
    pub growth_rate: f64,
    /// Population cap of a cell.
    pub maximum_population: u32,
    /// Population of each starting cell.
    pub starting_population: u32,
    /// Edge behaviour.
    pub topology: Topology,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            size: 50,
            max_turns: 500,
            growth_rate: 1.1,
            maximum_population: 100,
            starting_population: 100,
            topology: Topology::Toroidal,
        }
    }
}

/// Final standing of one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    /// Player identifier.
    pub player: PlayerId,
    /// Doctrine the player used.
    pub doctrine: Doctrine,
    /// Cells owned at the end.
    pub cells: u32,
    /// Total population at the end.
    pub population: u64,
    /// Turn on which the player lost its last cell.
    pub eliminated_turn: Option<u32>,
}

/// Outcome of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Seed the match was played with.
    pub seed: u64,
    /// Winner, or `None` on a draw.
    pub winner: Option<PlayerId>,
    /// Turns actually played.
    pub turns_played: u32,
    /// Per-player standings, in player order.
    pub players: Vec<PlayerSummary>,
}

/// Play one match to completion.
///
/// Given the same seed, profiles and configuration the result is always
/// the same. The match ends when at most one player owns cells or the turn
/// limit is reached. The winner owns the most cells, then the most
/// population; a full tie is a draw.
///
/// # Errors
///
/// Returns an error if the player count is outside 2 to [`MAX_PLAYERS`],
/// the universe is too small, or a profile fails validation.
pub fn play_match(
    seed: u64,
    strategies: &[StrategyConfig],
    config: &MatchConfig,
) -> Result<MatchResult, MatchError> {
    let count = strategies.len();
    if count < 2 {
        return Err(MatchError::TooFewPlayers(count));
    }
    if count > MAX_PLAYERS {
        return Err(MatchError::TooManyPlayers(count));
    }
    for (i, strategy) in strategies.iter().enumerate() {
        strategy
            .validate()
            .map_err(|source| MatchError::Strategy {
                player: i + 1,
                source,
            })?;
    }

    let mut universe = Universe::new(
        config.size,
        config.growth_rate,
        config.maximum_population,
        config.topology,
    )?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let ids: Vec<PlayerId> = (1..=PlayerId::MAX).take(count).collect();
    for (&player, start) in ids.iter().zip(starting_cells(config.size, &mut rng)) {
        universe.place(start, player, config.starting_population);
    }

    let mut agents: Vec<Strategist> = strategies
        .iter()
        .map(|s| {
            let mut profile = s.clone();
            profile.seed = profile.seed.wrapping_add(seed);
            Strategist::new(profile)
        })
        .collect();
    let mut eliminated: Vec<Option<u32>> = vec![None; count];

    while universe.turn() <= config.max_turns {
        let turn = universe.turn();
        let orders: Vec<_> = ids
            .iter()
            .zip(&mut agents)
            .zip(&eliminated)
            .filter(|(_, out)| out.is_none())
            .map(|((&player, agent), _)| (player, agent.decide(&universe.view(player))))
            .collect();
        universe.apply_turn(&orders);

        for (&player, out) in ids.iter().zip(&mut eliminated) {
            if out.is_none() && universe.holdings(player).0 == 0 {
                *out = Some(turn);
            }
        }
        if eliminated.iter().filter(|out| out.is_none()).count() <= 1 {
            break;
        }
    }

    let players: Vec<PlayerSummary> = ids
        .iter()
        .zip(strategies)
        .zip(&eliminated)
        .map(|((&player, strategy), &eliminated_turn)| {
            let (cells, population) = universe.holdings(player);
            PlayerSummary {
                player,
                doctrine: strategy.doctrine,
                cells,
                population,
                eliminated_turn,
            }
        })
        .collect();

    let result = MatchResult {
        seed,
        winner: winner(&players),
        turns_played: universe.turn() - 1,
        players,
    };
    tracing::info!(
        seed,
        winner = ?result.winner,
        turns = result.turns_played,
        "match finished"
    );
    Ok(result)
}

fn winner(players: &[PlayerSummary]) -> Option<PlayerId> {
    let mut ranked: Vec<&PlayerSummary> = players.iter().filter(|p| p.cells > 0).collect();
    ranked.sort_by_key(|p| std::cmp::Reverse((p.cells, p.population)));
    match ranked.as_slice() {
        [] => None,
        [only] => Some(only.player),
        [first, second, ..] => {
            let tied = (first.cells, first.population) == (second.cells, second.population);
            (!tied).then_some(first.player)
        }
    }
}

/// One starting cell per quarter of the universe, shuffled and jittered.
fn starting_cells(size: u32, rng: &mut ChaCha8Rng) -> Vec<Coord> {
    let size = i32::try_from(size).unwrap_or(i32::MAX);
    let (low, high) = (size / 4, size - 1 - size / 4);
    let jitter = size / 8;

    let mut anchors = vec![
        Coord::new(low, low),
        Coord::new(high, high),
        Coord::new(high, low),
        Coord::new(low, high),
    ];
    anchors.shuffle(rng);
    anchors
        .into_iter()
        .map(|c| {
            Coord::new(
                c.x + rng.gen_range(-jitter..=jitter),
                c.y + rng.gen_range(-jitter..=jitter),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> MatchConfig {
        MatchConfig {
            size: 16,
            max_turns: 60,
            ..MatchConfig::default()
        }
    }

    #[test]
    fn test_player_count_checked() {
        let one = [StrategyConfig::default()];
        assert!(matches!(
            play_match(1, &one, &small()),
            Err(MatchError::TooFewPlayers(1))
        ));

        let five = vec![StrategyConfig::default(); 5];
        assert!(matches!(
            play_match(1, &five, &small()),
            Err(MatchError::TooManyPlayers(5))
        ));
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let mut bad = StrategyConfig::default();
        bad.fractions.expand = 2.0;
        let err = play_match(1, &[StrategyConfig::default(), bad], &small()).unwrap_err();
        assert!(matches!(err, MatchError::Strategy { player: 2, .. }));
    }

    #[test]
    fn test_starting_cells_distinct_and_inside() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let cells = starting_cells(16, &mut rng);
        assert_eq!(cells.len(), 4);
        for (i, a) in cells.iter().enumerate() {
            assert!((0..16).contains(&a.x) && (0..16).contains(&a.y));
            for b in &cells[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_match_is_deterministic() {
        let strategies = [
            StrategyConfig::preset(Doctrine::Frontier),
            StrategyConfig::preset(Doctrine::Weighted),
        ];
        let a = play_match(42, &strategies, &small()).unwrap();
        let b = play_match(42, &strategies, &small()).unwrap();
        assert_eq!(a, b);
        assert!(a.turns_played <= 60);
        assert_eq!(a.players.len(), 2);
    }

    #[test]
    fn test_winner_ranking() {
        let summary = |player, cells, population| PlayerSummary {
            player,
            doctrine: Doctrine::Quadrant,
            cells,
            population,
            eliminated_turn: None,
        };
        assert_eq!(winner(&[summary(1, 5, 10), summary(2, 6, 1)]), Some(2));
        assert_eq!(winner(&[summary(1, 5, 10), summary(2, 5, 9)]), Some(1));
        assert_eq!(winner(&[summary(1, 5, 10), summary(2, 5, 10)]), None);
        assert_eq!(winner(&[summary(1, 0, 0), summary(2, 0, 0)]), None);
    }
}

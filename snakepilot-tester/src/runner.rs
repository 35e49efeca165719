use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use snakepilot_game::{AgentConfig, Controller, Game, GameConfig, GameSummary, Outcome};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    /// Seed passed on the command line.
    pub base_seed: u64,
    /// Index of the game within its seed.
    pub game_index: usize,
    pub summary: GameSummary,
    #[serde(with = "duration_serde")]
    pub wall_time: Duration,
}

impl GameResult {
    pub fn died(&self) -> bool {
        self.summary.outcome == Outcome::Died
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub results: Vec<GameResult>,
    pub games: usize,
    pub wins: usize,
    pub deaths: usize,
    pub agent_failures: usize,
    pub move_limits: usize,
    pub stalls: usize,
    pub best_score: u64,
    pub mean_score: f64,
    pub mean_moves: f64,
}

impl BatchReport {
    pub fn from_results(results: Vec<GameResult>) -> Self {
        let count = |outcome: Outcome| {
            results
                .iter()
                .filter(|r| r.summary.outcome == outcome)
                .count()
        };
        let games = results.len();
        let (mean_score, mean_moves) = if games == 0 {
            (0.0, 0.0)
        } else {
            #[allow(clippy::cast_precision_loss)]
            let n = games as f64;
            #[allow(clippy::cast_precision_loss)]
            let scores = results.iter().map(|r| r.summary.score as f64).sum::<f64>();
            #[allow(clippy::cast_precision_loss)]
            let moves = results.iter().map(|r| r.summary.moves as f64).sum::<f64>();
            (scores / n, moves / n)
        };
        Self {
            games,
            wins: count(Outcome::Won),
            deaths: count(Outcome::Died),
            agent_failures: count(Outcome::AgentFailed),
            move_limits: count(Outcome::MoveLimit),
            stalls: count(Outcome::Stalled),
            best_score: results.iter().map(|r| r.summary.score).max().unwrap_or(0),
            mean_score,
            mean_moves,
            results,
        }
    }

    pub fn any_deaths(&self) -> bool {
        self.results.iter().any(GameResult::died)
    }
}

pub struct BatchRunner {
    agent: AgentConfig,
    game: GameConfig,
    verbose: bool,
}

impl BatchRunner {
    pub const fn new(agent: AgentConfig, game: GameConfig, verbose: bool) -> Self {
        Self {
            agent,
            game,
            verbose,
        }
    }

    /// Play `games` games for each seed; game `i` of seed `s` uses `s + i`.
    pub fn run(&self, seeds: &[u64], games: usize) -> anyhow::Result<BatchReport> {
        let mut results = Vec::with_capacity(seeds.len() * games);
        for &base_seed in seeds {
            for game_index in 0..games {
                let seed = base_seed.wrapping_add(u64::try_from(game_index).unwrap_or(u64::MAX));
                let result = self.run_single(base_seed, game_index, seed)?;
                if self.verbose {
                    print_game_line(&result);
                }
                results.push(result);
            }
        }
        Ok(BatchReport::from_results(results))
    }

    fn run_single(
        &self,
        base_seed: u64,
        game_index: usize,
        seed: u64,
    ) -> anyhow::Result<GameResult> {
        let config = GameConfig {
            seed,
            ..self.game.clone()
        };
        let mut game = Game::new(config)?;
        let mut controller = Controller::new(self.agent.clone());

        let start_time = Instant::now();
        let summary = game.play(&mut controller);
        let wall_time = start_time.elapsed();
        log::debug!(
            "seed {seed}: {} with score {}/{} in {} moves",
            summary.outcome,
            summary.score,
            summary.max_score,
            summary.moves
        );

        Ok(GameResult {
            base_seed,
            game_index,
            summary,
            wall_time,
        })
    }
}

fn print_game_line(result: &GameResult) {
    let summary = &result.summary;
    let outcome = match summary.outcome {
        Outcome::Won => summary.outcome.label().green(),
        Outcome::Died => summary.outcome.label().red(),
        Outcome::AgentFailed => summary.outcome.label().yellow(),
        Outcome::MoveLimit => summary.outcome.label().blue(),
        Outcome::Stalled => summary.outcome.label().magenta(),
    };
    println!(
        "🐍 seed {} #{}: {} score {}/{} moves {} ({:?})",
        result.base_seed,
        result.game_index,
        outcome,
        summary.score,
        summary.max_score,
        summary.moves,
        result.wall_time
    );
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

#[cfg(test)]
pub(crate) fn sample_result(outcome: Outcome, score: u64) -> GameResult {
    GameResult {
        base_seed: 1,
        game_index: 0,
        summary: GameSummary {
            outcome,
            score,
            max_score: 31,
            moves: 120,
            total_decision: Duration::from_millis(4),
            smoothed_decision: Duration::from_micros(30),
            seed: 1,
            size: 8,
            growth: 2,
        },
        wall_time: Duration::from_millis(5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregates_outcomes_and_scores() {
        let report = BatchReport::from_results(vec![
            sample_result(Outcome::Won, 31),
            sample_result(Outcome::Died, 10),
            sample_result(Outcome::MoveLimit, 4),
            sample_result(Outcome::Stalled, 5),
        ]);
        assert_eq!(report.games, 4);
        assert_eq!(report.wins, 1);
        assert_eq!(report.deaths, 1);
        assert_eq!(report.move_limits, 1);
        assert_eq!(report.stalls, 1);
        assert_eq!(report.agent_failures, 0);
        assert_eq!(report.best_score, 31);
        assert!((report.mean_score - 12.5).abs() < f64::EPSILON);
        assert!(report.any_deaths());
    }

    #[test]
    fn empty_batch_has_zero_means() {
        let report = BatchReport::from_results(Vec::new());
        assert_eq!(report.games, 0);
        assert!(report.mean_moves.abs() < f64::EPSILON);
        assert!(!report.any_deaths());
    }

    #[test]
    fn runner_plays_every_seed_and_game() {
        let game = GameConfig {
            size: 6,
            growth: 1,
            seed: 0,
            max_moves: Some(30),
        };
        let runner = BatchRunner::new(AgentConfig::default(), game, false);
        let report = runner.run(&[3, 10], 2).unwrap();
        assert_eq!(report.games, 4);
        let seeds: Vec<u64> = report.results.iter().map(|r| r.summary.seed).collect();
        assert_eq!(seeds, vec![3, 4, 10, 11]);
        assert!(report.results.iter().all(|r| r.summary.moves <= 30));
    }
}

//! Command-line front end: loads an instance, runs the evolutionary search,
//! and prints the best arrangement found.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use u_srflp::ga::{Crossover, EvolutionConfig, EvolutionEngine, Mutation, Replacement, Selection};
use u_srflp::problem::load_instance;

#[derive(Parser, Debug)]
#[command(
    name = "srflp",
    version,
    about = "Single Row Facility Layout Problem solver (genetic algorithm)"
)]
struct Cli {
    /// Instance file (count, sizes, flow matrix; comma separated).
    instance: PathBuf,

    /// Population size μ.
    #[arg(long, default_value_t = 100)]
    pop_size: usize,

    /// Children bred per generation λ.
    #[arg(long, default_value_t = 100)]
    offspring_size: usize,

    #[arg(long, value_enum, default_value_t = SelectionArg::Tournament)]
    parent_selection: SelectionArg,

    /// Tournament size for `tournament` parent selection.
    #[arg(long, default_value_t = 3)]
    tournament_size: usize,

    #[arg(long, value_enum, default_value_t = CrossoverArg::Lox)]
    crossover: CrossoverArg,

    #[arg(long, value_enum, default_value_t = MutationArg::Swap)]
    mutation: MutationArg,

    /// Per-child mutation probability.
    #[arg(long, default_value_t = 0.1)]
    mutation_prob: f64,

    #[arg(long, value_enum, default_value_t = ReplacementArg::Offspring)]
    replacement: ReplacementArg,

    #[arg(long, value_enum, default_value_t = SelectionArg::Truncation)]
    survivor_selection: SelectionArg,

    /// Tournament size for `tournament` survivor selection.
    #[arg(long, default_value_t = 3)]
    survivor_tournament_size: usize,

    /// Cheapest parents carried over unchanged each generation.
    #[arg(long, default_value_t = 0)]
    elitism: usize,

    /// Evaluation budget; zero or negative disables it.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    max_evaluations: i64,

    /// Generation limit; zero or negative disables it.
    #[arg(long, default_value_t = 500, allow_negative_numbers = true)]
    max_generations: i64,

    /// Generations between full cost recomputations (0 = never).
    #[arg(long, default_value_t = 50)]
    resync_interval: usize,

    #[arg(long)]
    seed: Option<u64>,

    /// Breed offspring on all cores (needs the `parallel` feature).
    #[arg(long)]
    parallel: bool,

    #[arg(long, value_enum, default_value_t = Report::Full)]
    report: Report,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SelectionArg {
    Random,
    Roulette,
    Tournament,
    Rank,
    Truncation,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CrossoverArg {
    /// Linear order crossover.
    Lox,
    /// Order crossover.
    Ox,
    /// Partially mapped crossover.
    Pmx,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MutationArg {
    Swap,
    TwoOpt,
    Insert,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ReplacementArg {
    /// (μ,λ): survivors from the offspring only.
    Offspring,
    /// (μ+λ): survivors from parents and offspring.
    Union,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Report {
    /// 1-based arrangement followed by the cost.
    Full,
    /// Cost only.
    Cost,
}

impl SelectionArg {
    fn to_selection(self, tournament_size: usize) -> Selection {
        match self {
            SelectionArg::Random => Selection::Random,
            SelectionArg::Roulette => Selection::Roulette,
            SelectionArg::Tournament => Selection::Tournament(tournament_size),
            SelectionArg::Rank => Selection::Rank,
            SelectionArg::Truncation => Selection::Truncation,
        }
    }
}

impl From<CrossoverArg> for Crossover {
    fn from(arg: CrossoverArg) -> Self {
        match arg {
            CrossoverArg::Lox => Crossover::LinearOrder,
            CrossoverArg::Ox => Crossover::Order,
            CrossoverArg::Pmx => Crossover::PartiallyMapped,
        }
    }
}

impl From<MutationArg> for Mutation {
    fn from(arg: MutationArg) -> Self {
        match arg {
            MutationArg::Swap => Mutation::Swap,
            MutationArg::TwoOpt => Mutation::TwoOpt,
            MutationArg::Insert => Mutation::Insert,
        }
    }
}

impl From<ReplacementArg> for Replacement {
    fn from(arg: ReplacementArg) -> Self {
        match arg {
            ReplacementArg::Offspring => Replacement::Offspring,
            ReplacementArg::Union => Replacement::Union,
        }
    }
}

impl Cli {
    fn config(&self) -> EvolutionConfig {
        let mut config = EvolutionConfig::default()
            .with_population_size(self.pop_size)
            .with_offspring_size(self.offspring_size)
            .with_parent_selection(self.parent_selection.to_selection(self.tournament_size))
            .with_crossover(self.crossover.into())
            .with_mutation(self.mutation.into())
            .with_replacement(self.replacement.into())
            .with_survivor_selection(
                self.survivor_selection
                    .to_selection(self.survivor_tournament_size),
            )
            .with_elitism(self.elitism)
            .with_max_evaluations(limit(self.max_evaluations))
            .with_max_generations(limit(self.max_generations))
            .with_resync_interval(self.resync_interval)
            .with_parallel(self.parallel);
        // unclamped: validate() rejects values outside [0, 1]
        config.mutation_probability = self.mutation_prob;
        config.seed = self.seed;
        config
    }
}

/// Maps a signed limit to the engine's convention (0 = disabled).
fn limit(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let problem = load_instance(&cli.instance)
        .with_context(|| format!("failed to load instance {}", cli.instance.display()))?;
    info!(
        path = %cli.instance.display(),
        facilities = problem.facility_count(),
        "instance ready"
    );

    let result = EvolutionEngine::run(&problem, &cli.config()).context("search failed")?;

    match cli.report {
        Report::Full => {
            let arrangement: Vec<String> = result
                .best
                .arrangement()
                .iter()
                .map(|f| (f + 1).to_string())
                .collect();
            println!("{}", arrangement.join(" "));
            println!("{}", result.best_cost);
        }
        Report::Cost => println!("{}", result.best_cost),
    }
    Ok(())
}

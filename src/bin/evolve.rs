//! Evolution front door: seed a population, run the generational loop,
//! write the winners, and report their skill gap.

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use deckforge::evolve::Evolution;
use deckforge::evolve::EvolutionConfig;
use deckforge::fitness::Evaluator;
use deckforge::fitness::FitnessConfig;
use deckforge::fitness::Style;
use deckforge::sim::AiKind;
use deckforge::skill;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "evolve", about = "Evolve novel 2-4 player 52-card games")]
struct Args {
    #[arg(long, default_value_t = 100)]
    population_size: usize,
    #[arg(long, default_value_t = 50)]
    generations: usize,
    /// balanced | strategic | bluffing | quick
    #[arg(long, default_value = "balanced")]
    style: String,
    /// games per genome in the skill evaluation
    #[arg(long, default_value_t = 200)]
    mcts_games: usize,
    #[arg(long, default_value_t = 500)]
    mcts_iterations: usize,
    #[arg(long)]
    skip_skill_eval: bool,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value = "runs")]
    output_dir: PathBuf,
    #[arg(long, default_value_t = 10)]
    top_k: usize,
}

fn main() -> anyhow::Result<()> {
    deckforge::init();
    let args = Args::parse();
    let style: Style = args
        .style
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    log::info!(
        "evolving {} genomes for up to {} generations, style {:?}, seed {}, {} workers",
        args.population_size,
        args.generations,
        style,
        args.seed,
        num_cpus::get(),
    );
    let evaluator = Evaluator::new(FitnessConfig::for_style(style), args.seed);
    let config = EvolutionConfig {
        population_size: args.population_size,
        generations: args.generations,
        master_seed: args.seed,
        ..Default::default()
    };
    let report = Evolution::new(config, &evaluator).run();
    let top = report.top(args.top_k);

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("create {}", args.output_dir.display()))?;
    for member in top {
        let stem = args.output_dir.join(&member.genome.genome_id);
        let json = serde_json::to_string_pretty(&member.genome)?;
        std::fs::write(stem.with_extension("json"), json)?;
        let bytecode = deckforge::bytecode::compile(&member.genome)
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        std::fs::write(stem.with_extension("bin"), bytecode)?;
    }
    log::info!(
        "wrote top {} genomes to {}",
        top.len(),
        args.output_dir.display(),
    );

    let skill_reports = match args.skip_skill_eval {
        true => vec![],
        false => {
            let genomes: Vec<_> = top.iter().map(|m| m.genome.clone()).collect();
            skill::evaluate_top(
                evaluator.driver(),
                &genomes,
                args.mcts_games,
                AiKind::mcts_for(args.mcts_iterations),
                args.seed,
                Some(Duration::from_secs(120)),
            )
        }
    };

    println!();
    println!(
        "{}",
        format!(
            "top {} after {} generations{}",
            top.len(),
            report.generations_run,
            if report.stopped_early { " (plateau)" } else { "" },
        )
        .bold()
    );
    for (i, member) in top.iter().enumerate() {
        let skill = skill_reports
            .get(i)
            .map(|r| match r.timed_out {
                true => format!("skill {:.2} (partial)", r.win_rate),
                false => format!("skill {:.2}", r.win_rate),
            })
            .unwrap_or_else(|| "skill n/a".to_string());
        println!(
            "{:>2}. {} {} {}",
            i + 1,
            format!("{:.4}", member.fitness()).green(),
            member.genome.to_string().cyan(),
            skill.yellow(),
        );
    }
    Ok(())
}

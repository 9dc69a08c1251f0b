// form-jsfuzz/src/bin/fuzz_try_catch.rs
//! Try/catch wrapping fuzzer

use form_jsfuzz::constants::targets;
use form_jsfuzz::generators::{Generator, ProgramGenerator};
use form_jsfuzz::reporters::{report_mutation_results, MutationReport};
use form_jsfuzz::utils;
use form_jsfuzz::{print_program, seeded, FuzzResult, PrintStyle, Program, TryCatchConfig, TryCatchMutator};

use clap::{Parser, Subcommand};
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Try/catch fuzzer CLI
#[derive(Parser, Debug)]
#[clap(author, version, about = "Wraps JavaScript corpus programs in try/catch handlers")]
struct Cli {
    /// Seed of the mutation stream (defaults to FORM_JSFUZZ_SEED, then random)
    #[clap(long)]
    seed: Option<u64>,

    /// Number of mutated variants per input (defaults to the mode's count)
    #[clap(short, long)]
    iterations: Option<usize>,

    /// JSON file with mutator configuration
    #[clap(long)]
    config: Option<PathBuf>,

    /// Single JSON program to mutate instead of the corpus
    #[clap(long)]
    input: Option<PathBuf>,

    /// Path to the corpus directory
    #[clap(short, long)]
    corpus_path: Option<PathBuf>,

    /// Directory to write mutated sources to; printed to stdout if omitted
    #[clap(short, long)]
    output_dir: Option<PathBuf>,

    /// Print each program on a single line
    #[clap(long)]
    compact: bool,

    /// Subcommands
    #[clap(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate random programs into the corpus
    Generate {
        /// Number of programs to generate
        #[clap(short, long, default_value = "10")]
        count: usize,

        /// Maximum nesting depth of generated statements
        #[clap(long, default_value = "3")]
        max_depth: usize,
    },
}

/// Main entry point
fn main() {
    // Initialize logging
    env_logger::init();
    form_jsfuzz::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        error!("Try/catch fuzzing failed: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> FuzzResult<()> {
    let seed = cli
        .seed
        .or_else(utils::get_seed)
        .unwrap_or_else(rand::random);
    info!("Using seed {}", seed);
    let mut rng = seeded(seed);

    let corpus_dir = match &cli.corpus_path {
        Some(path) => {
            fs::create_dir_all(path)?;
            path.clone()
        }
        None => utils::get_corpus_dir(targets::TRY_CATCH)?,
    };

    if let Some(Commands::Generate { count, max_depth }) = cli.command {
        let generator = ProgramGenerator::new().with_max_depth(max_depth);
        for (i, program) in generator.generate_set(&mut rng, count).iter().enumerate() {
            let name = format!("generated_{}_{}.json", seed, i);
            let path = utils::save_program(&corpus_dir, &name, program)?;
            info!("Generated {}", path.display());
        }
        println!("{} programs saved to: {}", count, corpus_dir.display());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => TryCatchConfig::from_file(path)?,
        None => TryCatchConfig::default(),
    };
    let mutator = TryCatchMutator::with_config(config)?;
    let iterations = cli.iterations.unwrap_or_else(utils::get_max_iterations);
    let style = if cli.compact {
        PrintStyle::Compact
    } else {
        PrintStyle::Pretty
    };

    let inputs = match &cli.input {
        Some(path) => vec![(path.clone(), utils::load_program(path)?)],
        None => utils::load_corpus(&corpus_dir)?,
    };
    info!("Loaded {} programs", inputs.len());
    if let Some(dir) = &cli.output_dir {
        fs::create_dir_all(dir)?;
    }

    let start_time = Instant::now();
    let mut reports = Vec::with_capacity(inputs.len() * iterations);
    for (path, program) in &inputs {
        let stem = unit_name(path);
        for iteration in 0..iterations {
            let mut mutated: Program = program.clone();
            let stats = mutator.mutate_with_stats(&mut mutated, &mut rng);
            let source = print_program(&mutated, style);
            let unit = format!("{}_{}", stem, iteration);

            match &cli.output_dir {
                Some(dir) => fs::write(dir.join(format!("{}.js", unit)), source)?,
                None => println!("// {}\n{}", unit, source),
            }
            reports.push(MutationReport::new(unit, stats));
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        "Mutated {} units in {}",
        reports.len(),
        humantime::format_duration(elapsed)
    );
    let artifacts_dir = utils::get_artifacts_dir(targets::TRY_CATCH)?;
    report_mutation_results(&reports, Some(&artifacts_dir))?;
    Ok(())
}

fn unit_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unit".to_string())
}

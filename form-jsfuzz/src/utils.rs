// form-jsfuzz/src/utils.rs
//! Utility functions for the fuzzing infrastructure

use crate::ast::Program;
use crate::constants;
use crate::error::FuzzResult;
use log::warn;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Get the fuzzing mode from environment or default to standard
pub fn get_fuzzing_mode() -> String {
    env::var(constants::env::MODE).unwrap_or_else(|_| constants::modes::STANDARD.to_string())
}

/// Get the seed of the mutation stream, if one is pinned
pub fn get_seed() -> Option<u64> {
    env::var(constants::env::SEED)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
}

/// Number of mutated variants per input for a mode
pub fn iterations_for_mode(mode: &str) -> usize {
    match mode {
        constants::modes::QUICK => 1,
        constants::modes::THOROUGH => 100,
        constants::modes::CI => 5,
        _ => 10,
    }
}

/// Get the number of variants per input based on mode
pub fn get_max_iterations() -> usize {
    let default_iterations = iterations_for_mode(&get_fuzzing_mode());
    env::var(constants::env::ITERATIONS)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(default_iterations)
}

/// Get the corpus directory path, creating it if needed
pub fn get_corpus_dir(target: &str) -> FuzzResult<PathBuf> {
    let base_dir = env::var(constants::env::CORPUS_DIR)
        .unwrap_or_else(|_| constants::DEFAULT_CORPUS_DIR.to_string());
    ensure_dir(Path::new(&base_dir).join(target))
}

/// Get the artifacts directory path, creating it if needed
pub fn get_artifacts_dir(target: &str) -> FuzzResult<PathBuf> {
    let base_dir = env::var(constants::env::ARTIFACTS_DIR)
        .unwrap_or_else(|_| constants::DEFAULT_ARTIFACT_DIR.to_string());
    ensure_dir(Path::new(&base_dir).join(target))
}

fn ensure_dir(path: PathBuf) -> FuzzResult<PathBuf> {
    if !path.exists() {
        fs::create_dir_all(&path)?;
    }
    Ok(path)
}

/// Get a timestamp string for file naming
pub fn get_timestamp_string() -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs();

    format!("{}", now)
}

/// Create a unique file name with timestamp
pub fn create_timestamped_filename(prefix: &str, extension: &str) -> String {
    format!("{}_{}.{}", prefix, get_timestamp_string(), extension)
}

/// Save a program as JSON into `dir`
pub fn save_program(dir: &Path, file_name: &str, program: &Program) -> FuzzResult<PathBuf> {
    let path = dir.join(file_name);
    let data = serde_json::to_string_pretty(program)?;
    fs::write(&path, data)?;
    Ok(path)
}

/// Load a program from a JSON file
pub fn load_program(path: &Path) -> FuzzResult<Program> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Load all `.json` programs of a corpus directory, sorted by path.
/// Files that fail to parse are skipped with a warning.
pub fn load_corpus(dir: &Path) -> FuzzResult<Vec<(PathBuf, Program)>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().map_or(false, |ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut corpus = Vec::with_capacity(paths.len());
    for path in paths {
        match load_program(&path) {
            Ok(program) => corpus.push((path, program)),
            Err(err) => warn!("Skipping corpus file {}: {}", path.display(), err),
        }
    }
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expression, Statement};
    use tempfile::TempDir;

    #[test]
    fn test_iterations_for_mode() {
        assert_eq!(iterations_for_mode(constants::modes::QUICK), 1);
        assert_eq!(iterations_for_mode(constants::modes::THOROUGH), 100);
        assert_eq!(iterations_for_mode("unknown"), 10);
    }

    #[test]
    fn test_timestamped_filename() {
        let name = create_timestamped_filename("mutated", "js");
        assert!(name.starts_with("mutated_"));
        assert!(name.ends_with(".js"));
    }

    #[test]
    fn test_corpus_save_and_load() {
        let dir = TempDir::new().unwrap();
        let program = Program::new(vec![
            Statement::marker(0.0),
            Statement::expression(Expression::call_ident("f", vec![])),
        ]);
        save_program(dir.path(), "b.json", &program).unwrap();
        save_program(dir.path(), "a.json", &Program::default()).unwrap();
        fs::write(dir.path().join("broken.json"), "{").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let corpus = load_corpus(dir.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus[0].0, dir.path().join("a.json"));
        assert_eq!(corpus[1].1, program);
    }

    #[test]
    fn test_load_corpus_missing_dir_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_corpus(&dir.path().join("missing")).is_err());
    }
}

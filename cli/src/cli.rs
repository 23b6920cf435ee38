use std::path::{Path, PathBuf};
use std::process::ExitCode;

use color_eyre::eyre::{Result, WrapErr, eyre};
use puzkit_codec::{ChecksumReport, PuzImage, UnlockKey, find_unlock_key, lock, unlock};

use crate::file::{load_puzzle, read_puz, write_puz};
use crate::preferences::{Preferences, preferences_path, save_preferences};
use crate::report::{checksum_lines, to_text_format};

/// Inspect, verify, lock and unlock Across Lite `.puz` files.
#[derive(Debug, clap::Parser)]
#[command(version)]
pub(crate) struct Args {
    #[command(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Subcommand {
    /// Print a puzzle's metadata, grid and clues.
    Info {
        file: PathBuf,
        /// Decode even if checksums do not match.
        #[arg(long)]
        lenient: bool,
        /// Show solution letters instead of the solver's entries.
        #[arg(long)]
        solution: bool,
    },
    /// Verify every checksum; exits with status 1 if any mismatch.
    Check { file: PathBuf },
    /// Recover the unlock key of a locked puzzle.
    FindKey { file: PathBuf },
    /// Lock the solution with a four-digit key (digits 1-9).
    Lock {
        file: PathBuf,
        key: UnlockKey,
        /// Write here instead of overwriting the input.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Unlock the solution, searching for the key if none is given.
    Unlock {
        file: PathBuf,
        key: Option<UnlockKey>,
        /// Write here instead of overwriting the input.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show or change saved preferences.
    Prefs {
        #[arg(long)]
        strict_checksums: Option<bool>,
        #[arg(long)]
        show_solution: Option<bool>,
    },
}

pub(crate) fn exec(subcommand: Subcommand, prefs: &Preferences) -> Result<ExitCode> {
    match subcommand {
        Subcommand::Info {
            file,
            lenient,
            solution,
        } => {
            let strict = prefs.strict_checksums && !lenient;
            let puzzle = load_puzzle(&file, strict)
                .wrap_err_with(|| format!("failed to load {}", file.display()))?;
            print!("{}", to_text_format(&puzzle, solution || prefs.show_solution));
            Ok(ExitCode::SUCCESS)
        }

        Subcommand::Check { file } => {
            let bytes = read_puz(&file)?;
            let image = PuzImage::new(&bytes)
                .wrap_err_with(|| format!("{} is not a PUZ image", file.display()))?;
            let report = ChecksumReport::of(&image)?;
            print!("{}", checksum_lines(&report));
            if report.is_valid() {
                println!("{}: all checksums match", file.display());
                Ok(ExitCode::SUCCESS)
            } else {
                println!("{}: checksum mismatch", file.display());
                Ok(ExitCode::FAILURE)
            }
        }

        Subcommand::FindKey { file } => {
            let bytes = read_puz(&file)?;
            if !PuzImage::new(&bytes)?.is_encrypted() {
                println!("{} is not locked", file.display());
                return Ok(ExitCode::SUCCESS);
            }
            let key = find_unlock_key(&bytes)
                .ok_or_else(|| eyre!("no key unlocks {}", file.display()))?;
            println!("{key}");
            Ok(ExitCode::SUCCESS)
        }

        Subcommand::Lock { file, key, output } => {
            let mut bytes = read_puz(&file)?;
            lock(&mut bytes, &key).wrap_err("failed to lock solution")?;
            let target = output.as_deref().unwrap_or(file.as_path());
            write_puz(target, &bytes)?;
            println!("Locked {} with key {}", target.display(), key);
            Ok(ExitCode::SUCCESS)
        }

        Subcommand::Unlock { file, key, output } => {
            let mut bytes = read_puz(&file)?;
            let key = match key {
                Some(key) => key,
                None => find_unlock_key(&bytes)
                    .ok_or_else(|| eyre!("no key unlocks {}", file.display()))?,
            };
            unlock(&mut bytes, &key).wrap_err("failed to unlock solution")?;
            let target = output.as_deref().unwrap_or(file.as_path());
            write_puz(target, &bytes)?;
            println!("Unlocked {} with key {}", target.display(), key);
            Ok(ExitCode::SUCCESS)
        }

        Subcommand::Prefs {
            strict_checksums,
            show_solution,
        } => {
            let mut updated = prefs.clone();
            if let Some(strict) = strict_checksums {
                updated.strict_checksums = strict;
            }
            if let Some(show) = show_solution {
                updated.show_solution = show;
            }

            let path = if updated != *prefs {
                save_preferences(&updated)?
            } else {
                preferences_path()?
            };
            print_preferences(&path, &updated);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_preferences(path: &Path, prefs: &Preferences) {
    println!("Preferences ({})", path.display());
    println!("  strict_checksums = {}", prefs.strict_checksums);
    println!("  show_solution    = {}", prefs.show_solution);
}

//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};
use regex::Regex;

use crate::application::Strategy;
use crate::domain::FactorPair;

/// Interactive prime factorization trees: pick factor pairs until every leaf is prime
#[derive(Parser, Debug)]
#[command(name = "primetree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more: -d, -dd, -ddd
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (TOML), layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print author and version
    #[arg(long)]
    pub info: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a number and list its factor pairs
    Check {
        /// Integer greater than 1
        number: String,
    },

    /// Build a complete factorization tree non-interactively
    Factor {
        /// Composite integer
        number: String,

        /// Pair selection for nodes not covered by --choose
        #[arg(short, long, value_enum)]
        strategy: Option<Strategy>,

        /// Pairs applied in pre-order to undecomposed nodes, e.g. 2x6
        #[arg(long, value_parser = parse_pair, num_args = 1..)]
        choose: Vec<FactorPair>,

        /// Write the tree as SVG
        #[arg(long, value_hint = ValueHint::FilePath)]
        svg: Option<PathBuf>,
    },

    /// Interactive session on stdin
    Play {
        /// Number to start with
        number: Option<String>,

        /// Pick factor pairs with a fuzzy selector
        #[arg(long)]
        fuzzy: bool,
    },

    /// Show effective configuration
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Parses `2x6`, `2*6` or `2×6`; the smaller factor comes first.
pub fn parse_pair(s: &str) -> Result<FactorPair, String> {
    let re = Regex::new(r"^\s*(\d+)\s*[xX*×]\s*(\d+)\s*$").map_err(|e| e.to_string())?;
    let caps = re
        .captures(s)
        .ok_or_else(|| format!("expected a pair like 2x6, got {s:?}"))?;
    let a: u64 = caps[1].parse().map_err(|e| format!("{e}"))?;
    let b: u64 = caps[2].parse().map_err(|e| format!("{e}"))?;
    Ok(FactorPair(a.min(b), a.max(b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2x6", FactorPair(2, 6))]
    #[case("6*2", FactorPair(2, 6))]
    #[case(" 3 × 4 ", FactorPair(3, 4))]
    #[case("3X4", FactorPair(3, 4))]
    fn test_parse_pair(#[case] input: &str, #[case] expected: FactorPair) {
        assert_eq!(parse_pair(input).unwrap(), expected);
    }

    #[rstest]
    #[case("2")]
    #[case("2x")]
    #[case("a x b")]
    #[case("2x6x1")]
    fn test_parse_pair_rejects(#[case] input: &str) {
        assert!(parse_pair(input).is_err());
    }

    #[test]
    fn test_factor_args() {
        let cli = Cli::try_parse_from([
            "primetree", "factor", "36", "--choose", "6x6", "2x3", "-s", "balanced",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Factor {
                number,
                strategy,
                choose,
                svg,
            }) => {
                assert_eq!(number, "36");
                assert_eq!(strategy, Some(Strategy::Balanced));
                assert_eq!(choose, vec![FactorPair(6, 6), FactorPair(2, 3)]);
                assert!(svg.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_debug_counts() {
        let cli = Cli::try_parse_from(["primetree", "-dd", "check", "12"]).unwrap();
        assert_eq!(cli.debug, 2);
    }
}

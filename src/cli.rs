//! Command-line arguments for the `ledger-eng` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::engine::{DuplicatePolicy, EngineConfig, UnfreezePolicy};

/// Apply a csv file of transaction records and print the resulting accounts
#[derive(Parser, Debug)]
#[command(name = "ledger-eng", version, long_about = None)]
pub struct Args {
    /// Input csv file of transaction records
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// When a resolve clears a frozen account
    #[arg(long, value_enum, default_value_t = UnfreezePolicy::AnyResolve)]
    pub unfreeze: UnfreezePolicy,

    /// What to do with a deposit or withdraw that reuses a transaction id
    #[arg(long, value_enum, default_value_t = DuplicatePolicy::Reject)]
    pub duplicates: DuplicatePolicy,
}

impl Args {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            unfreeze: self.unfreeze,
            duplicates: self.duplicates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["ledger-eng", "input.csv"]).unwrap();
        assert_eq!(args.input, PathBuf::from("input.csv"));
        assert_eq!(args.engine_config(), EngineConfig::default());
    }

    #[test]
    fn policies_from_flags() {
        let args = Args::try_parse_from([
            "ledger-eng",
            "--unfreeze",
            "never-charged-back",
            "--duplicates",
            "overwrite",
            "input.csv",
        ])
        .unwrap();
        assert_eq!(
            args.engine_config(),
            EngineConfig {
                unfreeze: UnfreezePolicy::NeverChargedBack,
                duplicates: DuplicatePolicy::Overwrite,
            }
        );
    }

    #[test]
    fn missing_input_is_an_error() {
        assert!(Args::try_parse_from(["ledger-eng"]).is_err());
    }

    #[test]
    fn unknown_policy_is_an_error() {
        assert!(Args::try_parse_from(["ledger-eng", "--duplicates", "ignore", "in.csv"]).is_err());
    }
}

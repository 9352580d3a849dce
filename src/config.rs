//! Configuration for business-check
//!
//! CLI arguments with environment variable fallbacks, using clap.

use clap::Parser;

/// Run the business-core customer checks and exit with the aggregate result
#[derive(Parser, Debug, Clone)]
#[command(name = "business-check")]
#[command(about = "Checks the customer business object module")]
pub struct CheckArgs {
    /// Seed for random check data (random when omitted)
    #[arg(long, env = "BUSINESS_CHECK_SEED")]
    pub seed: Option<u64>,

    /// Default log filter when RUST_LOG is not set
    #[arg(long, env = "BUSINESS_CHECK_LOG", default_value = "warn")]
    pub log_level: String,

    /// Only print failures and the summary
    #[arg(long, short)]
    pub quiet: bool,

    /// Print the summary as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CheckArgs::try_parse_from(["business-check"]).unwrap();
        assert_eq!(args.seed, None);
        assert_eq!(args.log_level, "warn");
        assert!(!args.quiet);
        assert!(!args.json);
    }

    #[test]
    fn test_flags() {
        let args = CheckArgs::try_parse_from([
            "business-check",
            "--seed",
            "42",
            "--log-level",
            "debug",
            "-q",
            "--json",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.log_level, "debug");
        assert!(args.quiet);
        assert!(args.json);
    }

    #[test]
    fn test_rejects_bad_seed() {
        assert!(CheckArgs::try_parse_from(["business-check", "--seed", "abc"]).is_err());
    }
}

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use business_core::{run_customer_suite, CheckArgs, Checker, RandomSource};

fn main() -> Result<()> {
    let args = CheckArgs::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut random = match args.seed {
        Some(seed) => RandomSource::seeded(seed),
        None => RandomSource::from_entropy(),
    };
    let mut checker = Checker::new().verbose(!args.quiet);

    if !args.quiet {
        println!("🧾 business-core: customer checks");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    run_customer_suite(&mut checker, &mut random);

    if args.json {
        println!("{}", serde_json::to_string_pretty(checker.summary())?);
    } else {
        checker.print_summary();
    }

    std::process::exit(checker.exit_code());
}

use std::env;
use std::path::Path;

use retrieval_core::config::Config;
use tracing_subscriber::EnvFilter;

fn parse_args() -> (String, String, Option<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.len() < 2 {
        eprintln!("Usage: {} <response.json> <query.json> [entities.json]", prog);
        std::process::exit(1);
    }
    let response = args.remove(0);
    let query = args.remove(0);
    (response, query, args.into_iter().next())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let (response_path, query_path, entities_path) = parse_args();

    let output = retrieval_cli::run_files(
        &config,
        Path::new(&response_path),
        Path::new(&query_path),
        entities_path.as_deref().map(Path::new),
    )?;
    print!("{}", output);
    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;

use safescript_cli::args::{CliArgs, Command};
use safescript_cli::driver::{self, DriverOptions};
use safescript_cli::reporter::Reporter;

fn main() -> Result<ExitCode> {
    safescript_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    if let Some(Command::Compose { first, second, out }) = &args.command {
        let map = driver::compose_files(first, second)?;
        let json = map.to_json()?;
        match out {
            Some(out) => std::fs::write(out, json)
                .with_context(|| format!("cannot write {}", out.display()))?,
            None => println!("{json}"),
        }
        return Ok(ExitCode::SUCCESS);
    }

    let Some(src) = args.src.clone() else {
        anyhow::bail!("--src is required");
    };
    let options = DriverOptions {
        dest: args.dest.clone().unwrap_or_else(|| src.clone()),
        src,
        source_map: args.src_map,
        allow_ts: args.allow_ts,
        allow_angular: args.allow_angular,
        module: args.module.into(),
    };
    let reporter = Reporter::new(std::io::stderr().is_terminal());
    let summary = driver::run(&options, &reporter)?;

    if summary.has_errors() {
        eprintln!("{}", reporter.summary(summary.errors, summary.failed));
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

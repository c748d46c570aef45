mod command;
mod logger;
mod report;

use std::{fmt::Debug, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use wirecheck_compliance::{
    CableCapacity, CircuitDesigner, EarthFaultCheck, Selectivity, VoltageDrop, max_zs,
};
use wirecheck_core::Component;
use wirecheck_tables::Standards;

use crate::{
    command::{Cli, Command},
    report::Render,
};

/// Exit status for a well-formed request whose design does not comply.
const NON_COMPLIANT: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(NON_COMPLIANT),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_standards(cli: &Cli) -> Result<Standards> {
    match &cli.standards {
        Some(path) => {
            let standards = Standards::from_toml_file(path)
                .with_context(|| format!("failed to load standards from {}", path.display()))?;
            tracing::info!("using standards '{}' from {}", standards.name, path.display());
            Ok(standards)
        }
        None => Ok(Standards::bs7671()),
    }
}

/// Runs the selected calculator and prints its result.
///
/// Returns whether the result passed.
fn run(cli: &Cli) -> Result<bool> {
    let standards = load_standards(cli)?;

    match &cli.command {
        Command::Design(args) => evaluate(CircuitDesigner::new(standards), args.request(), cli.json),
        Command::Capacity(args) => evaluate(CableCapacity::new(standards), args.check()?, cli.json),
        Command::VoltageDrop(args) => evaluate(VoltageDrop::new(standards), args.input()?, cli.json),
        Command::MaxZs(args) => match args.loop_input() {
            Some(input) => evaluate(EarthFaultCheck::new(standards), input, cli.json),
            None => {
                let ceiling = max_zs(&standards, args.rating(), args.curve)?;
                print(&ceiling, cli.json)
            }
        },
        Command::Selectivity(args) => evaluate(Selectivity::new(standards), args.input(), cli.json),
    }
}

/// Calls a calculator with debug tracing of its input and result.
fn evaluate<C>(component: C, input: C::Input, json: bool) -> Result<bool>
where
    C: Component,
    C::Input: Debug,
    C::Output: Serialize + Render,
{
    let calculator = std::any::type_name::<C>();
    let output = component
        .inspect(
            |input| tracing::debug!(calculator, ?input, "calling"),
            |result| {
                if let Err(err) = result {
                    tracing::debug!(calculator, %err, "rejected");
                }
            },
        )
        .call(input)?;
    print(&output, json)
}

fn print<T: Serialize + Render>(output: &T, json: bool) -> Result<bool> {
    if json {
        println!("{}", serde_json::to_string_pretty(output)?);
    } else {
        print!("{}", output.render());
    }
    Ok(output.passed())
}

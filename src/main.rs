use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;

use scopesim::interpreter::{run_program, ScopeMode, StepEvent, StepHook};

#[derive(Parser, Debug)]
#[command(
    name = "scopesim",
    version,
    about = "Step through a toy-language script under static or dynamic scoping"
)]
#[command(group(clap::ArgGroup::new("mode").required(true).multiple(false)))]
struct Cli {
    /// Script to interpret
    file: PathBuf,

    /// Resolve identifiers by the lexical-parent chain of the usage site
    #[arg(short = 's', long = "static", group = "mode")]
    static_mode: bool,

    /// Resolve identifiers to the most recent binding on the stack
    #[arg(short = 'd', long = "dynamic", group = "mode")]
    dynamic_mode: bool,
}

/// Pauses after every executed line, printing the dynamic call chain and
/// the bindings each frame owns.
struct ConsoleStepper {
    lines: Vec<String>,
}

impl StepHook for ConsoleStepper {
    fn on_step(&mut self, event: &StepEvent<'_>) {
        let source = self
            .lines
            .get(event.line)
            .map(String::as_str)
            .unwrap_or("");
        println!();
        println!("--> {:>3}  {}", event.line, source.trim_end());
        for frame in &event.frames {
            let bindings: Vec<String> = frame
                .bindings
                .iter()
                .map(|(name, value)| format!("{} = {}", name, value))
                .collect();
            println!("    {:<12} [{}]", frame.def.name, bindings.join(", "));
        }
        print!("(enter to step, q to quit) ");
        io::stdout().flush().ok();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() || input.trim() == "q" {
            process::exit(0);
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;
    let lines: Vec<String> = source.lines().map(str::to_string).collect();

    let mode = if cli.dynamic_mode {
        ScopeMode::Dynamic
    } else {
        ScopeMode::Static
    };

    let mut stepper = ConsoleStepper {
        lines: lines.clone(),
    };
    run_program(lines, mode, &mut stepper)?;
    Ok(())
}

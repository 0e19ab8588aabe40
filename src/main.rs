mod line;
mod shell;
mod sources;

use anyhow::Result;
use clap::Parser;
use nix::libc;
use nix::unistd;
use tracing_subscriber::EnvFilter;

use shell::{init_script_path, Shell};
use sources::basic_tty::BasicTty;
use sources::tty::Tty;

use std::io;
use std::path::PathBuf;

/// A small interactive command shell
#[derive(Parser)]
#[command(name = "mysh")]
struct Args {
    /// Execute STRING and exit
    #[arg(short = 'c', value_name = "STRING", conflicts_with = "file")]
    command: Option<String>,

    /// Skip $XDG_CONFIG_HOME/mysh/init in interactive mode
    #[arg(long)]
    no_init: bool,

    /// Script to execute
    file: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    // Off unless MYSH_LOG is set, e.g. MYSH_LOG=debug
    let filter = EnvFilter::try_from_env("MYSH_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut mysh = Shell::new();

    match run(&mut mysh, args) {
        Ok(rv) => std::process::exit(rv),
        Err(e) => {
            eprintln!("mysh: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(mysh: &mut Shell, args: Args) -> Result<i32> {
    if let Some(command) = args.command {
        mysh.run_string(&command)
    } else if let Some(path) = args.file {
        mysh.run_file(&path)
    } else {
        if !args.no_init {
            mysh.set_init_script(init_script_path()?);
        }

        if unistd::isatty(libc::STDIN_FILENO)? {
            mysh.run_interactive(&mut Tty::new())
        } else {
            mysh.run_interactive(&mut BasicTty::stdin())
        }
    }
}

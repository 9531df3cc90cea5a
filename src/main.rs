use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use log::info;

use earsh::config::ShellConfig;
use earsh::render::{DisplayEvent, PlainRenderer};
use earsh::shell::Shell;
use earsh::storage::JsonFileStore;

#[derive(Parser)]
#[command(name = "earsh", about = "Browse the earsh virtual filesystem from a console", version)]
struct Cli {
    /// TOML settings file; defaults apply when it does not exist.
    #[arg(long, default_value = "earsh.toml")]
    config: PathBuf,
    /// Session state file, overriding the configured one.
    #[arg(long)]
    state: Option<PathBuf>,
    /// Open a blog post (or `list`) before the prompt appears.
    #[arg(long)]
    blogpost: Option<String>,
}

fn print_events(out: &mut impl Write, events: Vec<DisplayEvent>) -> io::Result<()> {
    for event in events {
        match event {
            DisplayEvent::Line(line) | DisplayEvent::Rich(line) => writeln!(out, "{line}")?,
            DisplayEvent::Clear => write!(out, "\x1b[2J\x1b[H")?,
        }
    }
    Ok(())
}

fn main() -> earsh::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config = ShellConfig::load(&cli.config)?;
    if let Some(state) = cli.state {
        config.state_path = state;
    }
    let store = JsonFileStore::open(&config.state_path)?;
    let mut shell = Shell::boot(config, Box::new(store), Box::new(PlainRenderer))?;
    info!("session ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    if let Some(post) = cli.blogpost {
        print_events(&mut stdout, shell.launch_blogpost(&post))?;
    }

    let mut lines = stdin.lock().lines();
    loop {
        write!(stdout, "{}", shell.prompt())?;
        stdout.flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.trim() == "exit" {
            break;
        }
        // the terminal already shows what was typed, skip the echoed prompt line
        let events = shell.submit(&line).into_iter().skip(1).collect();
        print_events(&mut stdout, events)?;
    }
    Ok(())
}

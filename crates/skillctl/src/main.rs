use clap::{Parser, Subcommand};
use skillctl::{Command, SOCKET_PATH};
use std::io::Write;
use std::os::unix::net::UnixStream;

#[derive(Parser, Debug)]
#[command(name = "skillctl", version, about = "Control a running skillring daemon", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Open the ring if closed, close it if open
    Toggle,
    /// Open the ring
    Open,
    /// Close the ring
    Close,
    /// Select a skill by slot index
    Select { index: usize },
    /// Simulate a click on a slot (opens the ring first when closed)
    Click { index: usize },
}

impl From<Commands> for Command {
    fn from(cmd: Commands) -> Self {
        match cmd {
            Commands::Toggle => Command::Toggle,
            Commands::Open => Command::Open,
            Commands::Close => Command::Close,
            Commands::Select { index } => Command::Select(index),
            Commands::Click { index } => Command::Click(index),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    send_command(Command::from(cli.command))
}

fn send_command(cmd: Command) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to skillring daemon at {}: {}. Is skillring running?",
            SOCKET_PATH,
            e
        )
    })?;

    log::debug!("sending '{}'", cmd);
    writeln!(stream, "{}", cmd)?;
    Ok(())
}

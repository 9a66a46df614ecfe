//! tokflow command-line entry point

use clap::Parser;
use tokflow_cli::commands::Commands;
use tokflow_cli::CliResult;

/// Incremental token-to-text streaming decoder
#[derive(Debug, Parser)]
#[command(name = "tokflow", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> CliResult<()> {
    Cli::parse().command.execute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_replay() {
        let cli = Cli::try_parse_from([
            "tokflow", "replay", "-i", "a.trace", "-i", "b.trace", "--vocab", "v.json", "-vv",
        ])
        .unwrap();
        match cli.command {
            Commands::Replay(args) => {
                assert_eq!(args.input, vec!["a.trace", "b.trace"]);
                assert_eq!(args.verbose, 2);
                assert!(args.format.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_replay_requires_vocab() {
        assert!(Cli::try_parse_from(["tokflow", "replay", "-i", "a.trace"]).is_err());
    }
}

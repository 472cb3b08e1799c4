use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// `BreathU` - wellbeing check-ins from free-form text.
#[derive(Parser, Debug)]
#[command(name = "breathu")]
#[command(version = "0.1.0")]
#[command(about = "Affect estimate, task schedule and coaching recommendations.", long_about = None)]
pub struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyse a message and print recommendations
    Analyze {
        /// What is on your mind
        #[arg(required_unless_present = "audio")]
        text: Option<String>,

        /// Transcribe an audio file instead of reading TEXT
        #[arg(long, conflicts_with = "text")]
        audio: Option<PathBuf>,

        /// Print the full response envelope as JSON
        #[arg(long)]
        json: bool,

        /// Save the interaction to the local log
        #[arg(long)]
        save: bool,

        /// Rate the recommendations (1-5); implies --save
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: Option<u8>,
    },

    /// Show recently saved interactions
    History {
        /// How many interactions to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Print the effective configuration (secrets redacted)
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_parses_flags() {
        let cli = Cli::parse_from(["breathu", "analyze", "estou cansado", "--json", "--rating", "4"]);
        match cli.command {
            Commands::Analyze {
                text,
                json,
                rating,
                save,
                audio,
            } => {
                assert_eq!(text.as_deref(), Some("estou cansado"));
                assert!(json);
                assert!(!save);
                assert_eq!(rating, Some(4));
                assert!(audio.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn analyze_requires_text_or_audio() {
        assert!(Cli::try_parse_from(["breathu", "analyze"]).is_err());
        assert!(Cli::try_parse_from(["breathu", "analyze", "--audio", "nota.wav"]).is_ok());
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["breathu", "analyze", "x", "--rating", "6"]).is_err());
        assert!(Cli::try_parse_from(["breathu", "analyze", "x", "--rating", "0"]).is_err());
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::parse_from(["breathu", "-vv", "history", "--limit", "3"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::History { limit: 3 }));
    }
}

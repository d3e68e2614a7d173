use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser};
use clap_complete::{generate, Shell};
use gujspell::cli::output::{self, OutputFormat};
use gujspell::{dict, Config, PartOfSpeech, SpellChecker};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gujspell")]
#[command(version, about = "Spelling suggestions for Gujarati words", long_about = None)]
struct Cli {
    /// Words to check, each on its own
    #[arg(value_name = "WORDS")]
    words: Vec<String>,

    /// Part of speech used to re-rank suggestions (noun, verb, adjective)
    #[arg(short, long, default_value = "noun")]
    pos: String,

    /// Prompt for the word and part of speech
    #[arg(short, long)]
    interactive: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if a word is misspelled
    #[arg(long)]
    no_fail: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Lexicon file (overrides config)
    #[arg(long, env = "GUJSPELL_LEXICON")]
    lexicon: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, env = "GUJSPELL_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Lexicon management
    Lexicon {
        #[command(subcommand)]
        action: LexiconCommands,
    },
}

#[derive(Parser, Debug)]
enum LexiconCommands {
    /// Build the lexicon from the configured source tables
    Build {
        /// Where to write the lexicon (defaults to the configured path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip root prediction with the segmentation model
        #[arg(long)]
        no_roots: bool,
    },
    /// Show lexicon info
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "gujspell", &mut io::stdout());
        return Ok(());
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(lexicon) = &cli.lexicon {
        config.lexicon = lexicon.clone();
    }

    if let Some(command) = cli.command {
        return handle_command(command, &config);
    }

    let (words, pos) = if cli.interactive {
        let (word, pos) = output::prompt_word_and_pos(&cli.pos)?;
        (vec![word], pos)
    } else {
        (cli.words.clone(), cli.pos.clone())
    };

    if words.is_empty() {
        anyhow::bail!("No words specified. Use --help for usage information.");
    }
    if pos.parse::<PartOfSpeech>().is_err() {
        log::warn!("Unknown part of speech {:?}; suggestions keep edit-distance order", pos);
    }

    let checker = SpellChecker::new(&config)?;

    let mut verdicts = Vec::with_capacity(words.len());
    for word in &words {
        if word.trim().is_empty() {
            log::warn!("Skipping blank word");
            continue;
        }
        verdicts.push(checker.check(word, &pos)?);
    }

    let colored = !cli.no_color;
    output::print_verdicts(&verdicts, &pos, config.max_suggestions, colored, &cli.format)?;
    if let OutputFormat::Text = cli.format {
        output::print_check_summary(&verdicts, colored);
    }

    if verdicts.iter().any(|v| !v.correct) && !cli.no_fail {
        std::process::exit(1);
    }

    Ok(())
}

fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Lexicon { action } => match action {
            LexiconCommands::Build { output, no_roots } => {
                let output = output.unwrap_or_else(|| config.lexicon.clone());
                dict::manager::build_lexicon(config, &output, !no_roots)?;
            }
            LexiconCommands::Info => {
                dict::manager::show_info(&config.lexicon)?;
            }
        },
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

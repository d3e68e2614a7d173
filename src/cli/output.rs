use crate::model::PartOfSpeech;
use crate::Verdict;
use anyhow::Result;
use colored::*;
use dialoguer::{Input, Select};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    pos: &'a str,
    words_checked: usize,
    misspelled: usize,
    results: &'a [Verdict],
}

pub fn print_verdicts(
    verdicts: &[Verdict],
    pos: &str,
    max_suggestions: usize,
    colored_output: bool,
    format: &OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for verdict in verdicts {
                print_text_verdict(verdict, max_suggestions, colored_output);
            }
        }
        OutputFormat::Json => {
            let output = JsonOutput {
                pos,
                words_checked: verdicts.len(),
                misspelled: verdicts.iter().filter(|v| !v.correct).count(),
                results: verdicts,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn print_text_verdict(verdict: &Verdict, max_suggestions: usize, colored_output: bool) {
    if verdict.correct {
        if colored_output {
            println!(
                "{} The word '{}' is spelled correctly!",
                "✓".green().bold(),
                verdict.word.bold()
            );
        } else {
            println!("✓ The word '{}' is spelled correctly!", verdict.word);
        }
        return;
    }

    if colored_output {
        println!(
            "{} The word '{}' appears to be misspelled.",
            "✗".red().bold(),
            verdict.word.red().bold()
        );
    } else {
        println!("✗ The word '{}' appears to be misspelled.", verdict.word);
    }

    if verdict.suggestions.is_empty() {
        if colored_output {
            println!("    {}", "No suggestions found.".yellow());
        } else {
            println!("    No suggestions found.");
        }
        return;
    }

    let shown = verdict.suggestions.iter().take(max_suggestions);
    if colored_output {
        let suggestions = shown
            .map(|s| s.green().to_string())
            .collect::<Vec<_>>()
            .join(&", ".dimmed().to_string());
        println!("    {} {}", "Did you mean:".dimmed(), suggestions);
    } else {
        let suggestions = shown.map(|s| s.as_str()).collect::<Vec<_>>().join(", ");
        println!("    Did you mean: {}", suggestions);
    }
}

pub fn print_check_summary(verdicts: &[Verdict], colored: bool) {
    if verdicts.len() < 2 {
        return;
    }
    let misspelled = verdicts.iter().filter(|v| !v.correct).count();

    println!();
    if misspelled == 0 {
        if colored {
            println!("{}", "✓ All words are spelled correctly!".green().bold());
        } else {
            println!("✓ All words are spelled correctly!");
        }
    } else {
        let noun = if misspelled == 1 { "word" } else { "words" };
        if colored {
            println!(
                "{} {} of {} {} misspelled",
                "✗".red().bold(),
                misspelled.to_string().red().bold(),
                verdicts.len(),
                noun
            );
        } else {
            println!("✗ {} of {} {} misspelled", misspelled, verdicts.len(), noun);
        }
    }
}

/// Ask for a word and a part of speech, the way the web form did.
pub fn prompt_word_and_pos(default_pos: &str) -> Result<(String, String)> {
    let word: String = Input::new()
        .with_prompt("Enter a Gujarati word")
        .validate_with(|input: &String| -> Result<(), &'static str> {
            if input.trim().is_empty() {
                Err("Please enter a word to check.")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let options: Vec<&str> = PartOfSpeech::ALL.iter().map(|p| p.as_str()).collect();
    let default = options.iter().position(|p| *p == default_pos).unwrap_or(0);
    let choice = Select::new()
        .with_prompt("Select the part of speech")
        .items(&options)
        .default(default)
        .interact()?;

    Ok((word, options[choice].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert!(matches!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!(matches!("TEXT".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_json_shape() {
        let verdicts = vec![Verdict {
            word: "ઘપ".to_string(),
            correct: false,
            suggestions: vec!["ઘર".to_string()],
        }];
        let output = JsonOutput {
            pos: "noun",
            words_checked: 1,
            misspelled: 1,
            results: &verdicts,
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["results"][0]["word"], "ઘપ");
        assert_eq!(value["results"][0]["correct"], false);
        assert_eq!(value["results"][0]["suggestions"][0], "ઘર");
    }
}

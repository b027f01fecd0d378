use std::io::{self, Write};

use clap::{Args, Subcommand};

use crate::config::{StoredConfig, config_file_path};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring desk.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("The API token is stored in the local config file; protect your filesystem accordingly.");
    println!();

    apply_prompt(
        "API base URL (e.g., https://helpdesk.example.com/api)",
        &mut cfg.api_base_url,
        false,
    )?;
    apply_prompt("API token", &mut cfg.api_token, true)?;

    cfg.reset_on_error = prompt_flag(
        "Clear the form when the server rejects a ticket (true/false)",
        cfg.reset_on_error,
    )?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("API base URL: {}", display_value(&cfg.api_base_url));
    println!("API token: {}", mask_secret(&cfg.api_token));
    println!(
        "Reset form on error: {}",
        cfg.reset_on_error.unwrap_or(true)
    );
    if cfg.project_coordinators.is_empty() {
        println!("Project coordinators: <defaults>");
    } else {
        println!("Project coordinators:");
        for coordinator in &cfg.project_coordinators {
            println!("  {}  {}", coordinator.id, coordinator.name);
        }
    }

    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>, secret: bool) -> AppResult<()> {
    match prompt(field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match (current, secret) {
        (Some(_), true) => write!(stdout, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => {
            write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?
        }
        (None, _) => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(PromptAction::parse(&input))
}

/// Asks until the answer is a flag, an empty line or '-'.
fn prompt_flag(field: &str, current: Option<bool>) -> AppResult<Option<bool>> {
    let shown = current.map(|flag| flag.to_string());
    loop {
        match flag_answer(prompt(field, shown.as_deref(), false)?, current) {
            Some(answer) => return Ok(answer),
            None => println!("Please answer true or false."),
        }
    }
}

/// `None` when the answer is not a recognised flag.
fn flag_answer(action: PromptAction, current: Option<bool>) -> Option<Option<bool>> {
    match action {
        PromptAction::Keep => Some(current),
        PromptAction::Clear => Some(None),
        PromptAction::Set(value) => parse_flag(&value).map(Some),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" => Some(true),
        "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let prefix = token.chars().take(3).collect::<String>();
            let suffix = token.chars().skip(token.chars().count() - 3).collect::<String>();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }
}

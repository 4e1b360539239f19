use anyhow::Result;
use colored::Colorize;

use crate::cli::{ConfigCommands, ConfigSetArgs};
use crate::config::{self, ProfileConfig};
use crate::output::print_success;

pub fn run(command: &ConfigCommands, profile: &str) -> Result<()> {
    match command {
        ConfigCommands::Show => show(profile),
        ConfigCommands::Set(args) => set(args, profile),
    }
}

fn show(profile: &str) -> Result<()> {
    let cfg = config::load_profile(profile)?;
    println!("{}: {}", "Profile".cyan(), profile);
    println!(
        "{}: {}",
        "Server".cyan(),
        cfg.server.as_deref().unwrap_or("(not set)")
    );
    println!(
        "{}: {}",
        "Format".cyan(),
        cfg.format.as_deref().unwrap_or("json")
    );
    println!(
        "{}: {}",
        "Page size".cyan(),
        cfg.page_size
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("{} (default)", clinic_core::DEFAULT_PAGE_SIZE))
    );
    println!("{}: {}", "Token".cyan(), mask(cfg.token.as_deref()));
    Ok(())
}

fn set(args: &ConfigSetArgs, profile: &str) -> Result<()> {
    let mut cfg: ProfileConfig = config::load_profile(profile)?;
    cfg.set(&args.key, &args.value)?;
    config::save_profile(profile, &cfg)?;
    let shown = if args.key == "token" {
        mask(Some(&args.value))
    } else {
        args.value.clone()
    };
    print_success(&format!("Set {} = {}", args.key, shown));
    Ok(())
}

fn mask(token: Option<&str>) -> String {
    match token {
        None => "(not set)".to_string(),
        Some(t) => {
            let len = t.chars().count();
            if len <= 8 {
                return "********".to_string();
            }
            let tail: String = t.chars().skip(len - 4).collect();
            format!("****{tail}")
        }
    }
}

use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scan,
    Detail(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub command: Command,
    pub json: bool,
    pub config_path: PathBuf,
}

pub const USAGE: &str = "usage: golden-zone-scanner [scan | detail SYMBOL] [--json] [--config PATH]";

/// Parse process arguments (without the program name). No subcommand means `scan`.
pub fn parse_args<I, S>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut command = None;
    let mut json = false;
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);

    let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--config" => match iter.next() {
                Some(path) => config_path = PathBuf::from(path),
                None => bail!("--config needs a path\n{}", USAGE),
            },
            "scan" if command.is_none() => command = Some(Command::Scan),
            "detail" if command.is_none() => match iter.next() {
                Some(symbol) if !symbol.starts_with("--") => {
                    command = Some(Command::Detail(symbol.trim().to_ascii_uppercase()))
                }
                _ => bail!("detail needs a symbol\n{}", USAGE),
            },
            other => bail!("unexpected argument '{}'\n{}", other, USAGE),
        }
    }

    Ok(CliArgs {
        command: command.unwrap_or(Command::Scan),
        json,
        config_path,
    })
}

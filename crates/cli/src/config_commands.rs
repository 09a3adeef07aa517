use {
    anyhow::Result,
    clap::Subcommand,
    courier_common::secret::REDACTED,
    courier_config::{CourierConfig, validate::Severity},
    std::path::Path,
};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors/warnings.
    Check {
        /// Show informational diagnostics in addition to errors and warnings.
        #[arg(long)]
        verbose: bool,
    },
    /// Print the effective configuration as TOML.
    Show {
        /// Print OAuth secrets instead of redacting them.
        #[arg(long)]
        show_secrets: bool,
    },
}

pub fn handle_config(action: ConfigAction, path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Check { verbose } => check(path, verbose),
        ConfigAction::Show { show_secrets } => show(path, show_secrets),
    }
}

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn check(path: Option<&Path>, verbose: bool) -> Result<()> {
    let result = courier_config::validate(path);

    if let Some(ref path) = result.config_path {
        eprintln!("Checking {}\n", path.display());
    } else {
        eprintln!("No config file found; checking defaults.\n");
    }

    let mut shown = 0;
    for d in &result.diagnostics {
        if d.severity == Severity::Info && !verbose {
            continue;
        }

        let (color, label) = match d.severity {
            Severity::Error => (RED, "error"),
            Severity::Warning => (YELLOW, "warning"),
            Severity::Info => (CYAN, "info"),
        };

        if d.path.is_empty() {
            eprintln!("  {BOLD}{color}{label}{RESET} {}", d.message);
        } else {
            eprintln!("  {BOLD}{color}{label}{RESET} {}: {}", d.path, d.message);
        }
        shown += 1;
    }

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);

    if shown > 0 {
        eprintln!();
    }

    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }

    if errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn show(path: Option<&Path>, show_secrets: bool) -> Result<()> {
    let (config, source) = courier_config::load_or_discover(path)?;
    match source {
        Some(source) => eprintln!("# loaded from {}", source.display()),
        None => eprintln!("# no config file found; defaults"),
    }
    print!("{}", render(&config, show_secrets)?);
    Ok(())
}

fn render(config: &CourierConfig, show_secrets: bool) -> Result<String> {
    let mut value = toml::Value::try_from(config)?;
    if !show_secrets
        && let Some(history) = value.get_mut("history").and_then(toml::Value::as_table_mut)
    {
        for key in ["consumer_secret", "token_secret"] {
            if let Some(secret) = history.get_mut(key)
                && secret.as_str().is_some_and(|s| !s.is_empty())
            {
                *secret = toml::Value::String(REDACTED.into());
            }
        }
    }
    Ok(toml::to_string_pretty(&value)?)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use {super::*, secrecy::Secret};

    fn config_with_secrets() -> CourierConfig {
        let mut config = CourierConfig::default();
        config.history.consumer_secret = Secret::new("consumer-shh".into());
        config.history.token_secret = Secret::new("token-shh".into());
        config
    }

    #[test]
    fn show_redacts_secrets_by_default() {
        let out = render(&config_with_secrets(), false).unwrap();
        assert!(!out.contains("consumer-shh"));
        assert!(!out.contains("token-shh"));
        assert!(out.contains(REDACTED));
        assert!(out.contains("[liveperson]"));
    }

    #[test]
    fn show_secrets_flag_prints_them() {
        let out = render(&config_with_secrets(), true).unwrap();
        assert!(out.contains("consumer-shh"));
    }

    #[test]
    fn empty_secrets_stay_empty() {
        let out = render(&CourierConfig::default(), false).unwrap();
        assert!(!out.contains(REDACTED));
    }
}

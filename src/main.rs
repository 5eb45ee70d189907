mod i18n;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

use i18n::I18n;
use langpath::{Config, LanguageCatalog, Value};

#[derive(Parser)]
#[command(name = "langpath")]
#[command(about = "Query and edit path-addressed language catalogs")]
#[command(after_help = "Config: ~/.langpath/config.toml (override with $LANGPATH_CONFIG or --config)")]
struct Cli {
    /// Config file to use instead of ~/.langpath/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Language to activate (must be registered in the config)
    #[arg(long, global = true)]
    lang: Option<String>,
    /// Language file to load before running the command: relative[=target]
    #[arg(short = 'l', long = "load", global = true)]
    load: Vec<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the entry at a path with placeholders substituted
    Get {
        path: String,
        /// Placeholder substitution: name=value (repeatable, applied in order)
        #[arg(short = 's', long = "sub")]
        subs: Vec<String>,
        /// Print strings as JSON too
        #[arg(long)]
        json: bool,
    },
    /// Print the whole catalog, or the subtree at a path, as JSON
    Dump {
        path: Option<String>,
    },
    /// Substitute placeholders in a literal text
    Replace {
        text: String,
        /// Placeholder substitution: name=value (repeatable, applied in order)
        #[arg(short = 's', long = "sub")]
        subs: Vec<String>,
    },
    /// Copy a path onto another, merging mappings
    Copy {
        source: String,
        dest: String,
    },
    /// Move a path onto another, merging mappings
    Move {
        source: String,
        dest: String,
    },
    /// Remove a path
    Remove {
        path: String,
    },
    /// List registered languages
    Languages,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::get_config_path);
    let config = Config::load_or_create(&config_path)?;
    let i18n = I18n::new(&config.get_effective_language());
    let options = config.lookup_options();

    let mut catalog = config.build_catalog();
    if let Some(lang) = &cli.lang {
        if !catalog.set_language(lang) {
            bail!(i18n.t_format("error_unknown_language", &[("lang", lang.as_str())]));
        }
    }

    for entry in &cli.load {
        let (relative, target) = match entry.split_once('=') {
            Some((relative, target)) => (relative, Some(target)),
            None => (entry.as_str(), None),
        };
        catalog
            .load_sep(relative, target, options.separator)
            .with_context(|| i18n.t_format("error_load", &[("file", relative)]))?;
        let shown_target = target
            .map(str::to_string)
            .unwrap_or_else(|| relative.replace(['/', '\\'], &options.separator.to_string()));
        eprintln!(
            "{}",
            i18n.t_format("loaded", &[("file", relative), ("target", shown_target.as_str())])
                .dimmed()
        );
    }

    match cli.command {
        Commands::Get { path, subs, json } => {
            let subs = parse_substitutions(&subs, &i18n)?;
            let subs: Vec<(&str, &str)> = subs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            match catalog.get_with(&path, &subs, &options) {
                Some(Value::String(text)) if !json => println!("{}", text),
                Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                None => println!("{}", i18n.t_format("not_found", &[("path", path.as_str())]).red().bold()),
            }
        }
        Commands::Dump { path } => match path {
            None if catalog.store().is_empty() => {
                println!("{}", i18n.t("catalog_empty").yellow());
            }
            None => println!("{}", catalog.store().to_json_pretty()?),
            Some(path) => match catalog.store().get_sep(&path, options.separator) {
                Some(value) => println!("{}", serde_json::to_string_pretty(value)?),
                None => println!("{}", i18n.t_format("not_found", &[("path", path.as_str())]).red().bold()),
            },
        },
        Commands::Replace { text, subs } => {
            let subs = parse_substitutions(&subs, &i18n)?;
            let subs: Vec<(&str, &str)> = subs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            println!(
                "{}",
                LanguageCatalog::replace(Some(text.as_str()), &subs, options.marker, options.escape)
            );
        }
        Commands::Copy { source, dest } => {
            if catalog.copy_sep(&source, &dest, options.separator) {
                println!("{}", i18n.t_format("copied", &[("source", source.as_str()), ("dest", dest.as_str())]).green().bold());
                print_catalog(&catalog)?;
            } else {
                println!("{}", i18n.t_format("source_missing", &[("path", source.as_str())]).yellow());
            }
        }
        Commands::Move { source, dest } => {
            if catalog.move_path_sep(&source, &dest, options.separator) {
                println!("{}", i18n.t_format("moved", &[("source", source.as_str()), ("dest", dest.as_str())]).green().bold());
                print_catalog(&catalog)?;
            } else {
                println!("{}", i18n.t_format("source_missing", &[("path", source.as_str())]).yellow());
            }
        }
        Commands::Remove { path } => {
            if catalog.remove_sep(&path, options.separator) {
                println!("{}", i18n.t_format("removed", &[("path", path.as_str())]).green().bold());
                print_catalog(&catalog)?;
            } else {
                println!("{}", i18n.t_format("source_missing", &[("path", path.as_str())]).yellow());
            }
        }
        Commands::Languages => {
            println!("{}", i18n.t_format("config_path", &[("path", config_path.display().to_string().as_str())]).dimmed());
            print_languages(&catalog, &i18n);
            println!();
            println!("{}", i18n.t("help_config_section").cyan());
            for key in ["help_config_storage", "help_config_languages", "help_config_lookup"] {
                println!("  {}", i18n.t(key));
            }
        }
    }

    Ok(())
}

fn parse_substitutions(raw: &[String], i18n: &I18n) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|arg| match arg.split_once('=') {
            Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
            _ => bail!(i18n.t_format("error_substitution", &[("arg", arg.as_str())])),
        })
        .collect()
}

fn print_catalog(catalog: &LanguageCatalog) -> Result<()> {
    println!("{}", catalog.store().to_json_pretty()?);
    Ok(())
}

fn print_languages(catalog: &LanguageCatalog, i18n: &I18n) {
    if catalog.languages().is_empty() {
        println!("{}", i18n.t("no_languages").yellow());
        return;
    }

    println!("{}", i18n.t("languages_header").cyan().bold());
    for (id, folder) in catalog.languages() {
        let mut line = format!("  {} -> {}", id.bold(), catalog.storage_root().join(folder).display());
        if catalog.language() == Some(id.as_str()) {
            line.push_str(&format!(" {}", i18n.t("active_marker").green()));
        }
        if catalog.default_language() == Some(id.as_str()) {
            line.push_str(&format!(" {}", i18n.t("default_marker").dimmed()));
        }
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_substitutions_keeps_order() -> Result<()> {
        let i18n = I18n::new("en");
        let raw = vec!["name=Ana".to_string(), "x=a=b".to_string(), "empty=".to_string()];
        let parsed = parse_substitutions(&raw, &i18n)?;
        assert_eq!(
            parsed,
            vec![
                ("name".to_string(), "Ana".to_string()),
                ("x".to_string(), "a=b".to_string()),
                ("empty".to_string(), String::new()),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_parse_substitutions_rejects_missing_name() {
        let i18n = I18n::new("en");
        let err = parse_substitutions(&["novalue".to_string()], &i18n).unwrap_err();
        assert!(err.to_string().contains("novalue"));
        assert!(parse_substitutions(&["=v".to_string()], &i18n).is_err());
    }

    #[test]
    fn test_cli_parses_global_load_flags() {
        let cli = Cli::try_parse_from([
            "langpath", "get", "menu.open", "-s", "n=1", "-l", "menu", "--load", "extra=menu.more",
        ])
        .unwrap();
        assert_eq!(cli.load, vec!["menu", "extra=menu.more"]);
        assert!(matches!(cli.command, Commands::Get { ref subs, .. } if subs == &["n=1"]));
    }
}

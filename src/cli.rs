// command line interface

use crate::core::Db;
use crate::tui::{self, ThemeKind, UiOptions, detect_theme, editor};
use crate::Error;
use clap::Parser;
use miette::Result;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::process::Command;
use tracing_subscriber::EnvFilter;

// php snippet that prints the database path from the deployment's config.php
const PHP_CONFIG_PROBE: &str = "require 'config.php'; echo DB_FILE;";

#[derive(Parser)]
#[command(name = "litebrowse", about = "Browse and edit a SQLite database in the terminal")]
struct Cli {
    /// database file
    path: Option<PathBuf>,

    /// database file, when not given as an argument
    #[arg(long, env = "LITEBROWSE_DB")]
    db: Option<PathBuf>,

    /// editor for record edits (default: $VISUAL, then $EDITOR, then vi)
    #[arg(long, short)]
    editor: Option<String>,

    /// color theme (dark, light, dracula, nord, catppuccin-mocha, rose-pine-dawn)
    #[arg(long, short, value_parser = parse_theme)]
    theme: Option<ThemeKind>,

    /// append a trace log to this file
    #[arg(long, env = "LITEBROWSE_LOG")]
    log_file: Option<PathBuf>,
}

fn parse_theme(name: &str) -> std::result::Result<ThemeKind, String> {
    ThemeKind::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = ThemeKind::ALL.iter().map(|k| k.name()).collect();
        format!("unknown theme '{name}' (one of: {})", known.join(", "))
    })
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let path = match cli.path.or(cli.db) {
        Some(path) => path,
        None => autodetect_db_path().await?,
    };

    let db = Db::connect(&path).await?;
    let summaries = db.table_summaries().await?;
    if summaries.is_empty() {
        println!("No tables found in {}.", path.display());
        return Ok(());
    }

    let options = UiOptions {
        database: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        editor: editor::resolve_editor(cli.editor.as_deref()),
        theme: cli.theme.unwrap_or_else(detect_theme),
    };

    Ok(tui::run(&db, summaries, options).await?)
}

/// Asks php for `DB_FILE` from the config.php next to the executable.
async fn autodetect_db_path() -> Result<PathBuf, Error> {
    let exe = std::env::current_exe()?;
    let dir = exe.parent().unwrap_or(Path::new("."));

    let output = Command::new("php")
        .args(["-r", PHP_CONFIG_PROBE])
        .current_dir(dir)
        .output()
        .await
        .map_err(|e| {
            Error::PathResolution(format!(
                "no database given and php is unavailable to read config.php: {e}"
            ))
        })?;

    if !output.status.success() {
        return Err(Error::PathResolution(
            "failed to load DB_FILE from config.php".to_string(),
        ));
    }

    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if path.is_empty() {
        return Err(Error::PathResolution(
            "config.php did not define DB_FILE".to_string(),
        ));
    }

    tracing::info!(path, "database path from config.php");
    Ok(PathBuf::from(path))
}

// the ui owns the terminal, so traces only ever go to a file
fn init_logging(path: &Path) -> Result<(), Error> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn positional_path_and_flags() {
        let cli = Cli::try_parse_from(["litebrowse", "app.db", "--theme", "nord", "-e", "nano"])
            .unwrap();
        assert_eq!(cli.path, Some(PathBuf::from("app.db")));
        assert_eq!(cli.theme, Some(ThemeKind::Nord));
        assert_eq!(cli.editor.as_deref(), Some("nano"));
    }

    #[test]
    fn crate_errors_become_reports() {
        fn fail() -> miette::Result<()> {
            Err(Error::PathResolution("no database given".into()))?;
            Ok(())
        }
        assert_eq!(fail().unwrap_err().to_string(), "no database given");
    }

    #[test]
    fn unknown_theme_is_rejected() {
        assert!(Cli::try_parse_from(["litebrowse", "--theme", "neon"]).is_err());
    }
}

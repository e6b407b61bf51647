// external editor round-trip for a single record

use std::env;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tokio::process::Command;

use crate::Error;
use crate::tui::session::UiSession;

pub const DEFAULT_EDITOR: &str = "vi";

/// `--editor` wins, then `$VISUAL`, then `$EDITOR`, then vi.
pub fn resolve_editor(configured: Option<&str>) -> String {
    pick_editor(
        configured,
        env::var("VISUAL").ok().as_deref(),
        env::var("EDITOR").ok().as_deref(),
    )
}

fn pick_editor(configured: Option<&str>, visual: Option<&str>, editor: Option<&str>) -> String {
    [configured, visual, editor]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_EDITOR)
        .to_string()
}

/// Runs `editor` on `path` and waits for it. The editor string may carry its
/// own arguments (`code --wait`); the path always comes last.
pub async fn launch(editor: &str, path: &Path) -> Result<(), Error> {
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| Error::Editor("no editor configured".to_string()))?;

    tracing::debug!(editor, path = %path.display(), "launching editor");

    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .await
        .map_err(|e| Error::Editor(format!("failed to start {program}: {e}")))?;

    if !status.success() {
        return Err(Error::Editor(format!("{program} exited with {status}")));
    }
    Ok(())
}

/// Hands `document` to the editor with the ui suspended and returns the text
/// it left behind. The ui is back before this returns, whatever the editor
/// did; the temp file is gone once this returns.
pub async fn open_in_editor(
    session: &mut UiSession,
    editor: &str,
    document: &str,
) -> Result<String, Error> {
    let mut file = tempfile::Builder::new()
        .prefix("litebrowse-")
        .suffix(".json")
        .tempfile()?;
    file.write_all(document.as_bytes())?;
    file.flush()?;

    let console = session.suspend()?;
    let launched = launch(editor, file.path()).await;
    console.resume()?;
    launched?;

    read_back(&file)
}

fn read_back(file: &NamedTempFile) -> Result<String, Error> {
    Ok(std::fs::read_to_string(file.path())?)
}

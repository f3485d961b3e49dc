//! Terminal surface: runs one command against a session and prints the report.
//!
//! The report is written to any [`Write`] so tests can capture it; logs go
//! elsewhere (stderr) and never interleave with it.

use std::io::{self, Write};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::domain::ports::{CatalogSource, IdentityStore};
use crate::domain::{
    MismatchView, NoticeSeverity, SessionController, SessionError, SessionSnapshot, SessionState,
};

/// User action requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    /// Show the report for the stored identity.
    Show,
    /// Resolve a new username, then show its report.
    Set {
        /// Name to look up.
        username: String,
    },
    /// Forget the stored identity.
    Clear,
}

/// Whether the command ended with a hard error shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Report shown; any notice was transient.
    Completed,
    /// A hard error was shown.
    Failed,
}

/// Errors that stop the terminal surface from producing output.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// The report could not be written.
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
    /// The session could not be inspected.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Run `command` with fresh session wiring and print the outcome to `out`.
///
/// # Errors
///
/// Returns [`TerminalError`] when the report cannot be written or the
/// session state is unavailable. Catalog and store failures are reported in
/// the output and reflected in [`CommandOutcome`].
pub async fn execute<W: Write>(
    command: &TerminalCommand,
    source: Arc<dyn CatalogSource>,
    store: Arc<dyn IdentityStore>,
    out: &mut W,
) -> Result<CommandOutcome, TerminalError> {
    debug!(?command, "running terminal command");
    let session = match command {
        TerminalCommand::Show => SessionController::start(source, store).await,
        TerminalCommand::Set { username } => {
            let session = SessionController::new(source, store);
            session.set_identity_input(username.as_str())?;
            if let Err(error) = session.submit().await {
                debug!(%error, "submit reported an error");
            }
            session
        }
        TerminalCommand::Clear => {
            let session = SessionController::new(source, store);
            if let Err(error) = session.clear() {
                debug!(%error, "clear reported an error");
            }
            let snapshot = session.snapshot()?;
            if let Some(notice) = &snapshot.notice {
                writeln!(out, "Error: {}", notice.message)?;
            } else {
                writeln!(out, "Stored username cleared.")?;
            }
            return Ok(outcome(&snapshot));
        }
    };

    let snapshot = session.snapshot()?;
    let view = session.view()?;
    render_report(out, &snapshot, &view)?;
    Ok(outcome(&snapshot))
}

fn outcome(snapshot: &SessionSnapshot) -> CommandOutcome {
    match &snapshot.notice {
        Some(notice) if notice.severity == NoticeSeverity::Hard => CommandOutcome::Failed,
        _ => CommandOutcome::Completed,
    }
}

/// Print the accent, totals, and one block per mismatched entry.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn render_report<W: Write>(
    out: &mut W,
    snapshot: &SessionSnapshot,
    view: &MismatchView,
) -> io::Result<()> {
    if let Some(notice) = &snapshot.notice {
        let label = match notice.severity {
            NoticeSeverity::Hard => "Error",
            NoticeSeverity::Transient => "Warning",
        };
        writeln!(out, "{label}: {}", notice.message)?;
    }

    match snapshot.state {
        SessionState::Empty => {
            return writeln!(out, "No username set. Run `anicomplete set <USERNAME>`.");
        }
        SessionState::Failed => return Ok(()),
        SessionState::Resolving | SessionState::Resolved => {}
    }

    let identity = &snapshot.identity;
    writeln!(out, "User: {} (accent: {})", identity.username, identity.accent_color)?;
    if snapshot.loading {
        writeln!(out, "Loading...")?;
    }
    writeln!(out, "Total read: {}", view.total_count)?;
    writeln!(out, "Total mismatches: {}", view.mismatch_count)?;
    for row in &view.rows {
        writeln!(
            out,
            "{}  Progress: {}  {}",
            row.title, row.progress_label, row.link_url
        )?;
        if !row.cover_image_url.is_empty() {
            writeln!(out, "    {}", row.cover_image_url)?;
        }
    }
    Ok(())
}

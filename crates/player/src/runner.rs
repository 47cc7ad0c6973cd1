use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use sheetkeep_domain::{slug_from_page, DomainError};
use sheetkeep_shared::BuilderRecord;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::application::autosave::AutosaveState;
use crate::application::error::SaveError;
use crate::application::form::SheetField;
use crate::application::services::{
    BuilderError, BuilderService, SheetCommand, SheetEvent, SheetRunner, SheetSession,
};
use crate::config::SheetConfig;
use crate::ports::outbound::{ClockPort, KeyValueStore, RecordStore};
use crate::ui;

/// Command-line surface of the `sheetkeep` binary.
pub mod cli {
    use std::path::PathBuf;

    use clap::{Parser, Subcommand};

    #[derive(Debug, Parser)]
    #[command(name = "sheetkeep", version, about = "Character sheets, kept")]
    pub struct Cli {
        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Subcommand)]
    pub enum Command {
        /// The local builder flow
        #[command(subcommand)]
        Builder(BuilderCommand),
        /// Slug-addressed sheets
        #[command(subcommand)]
        Sheet(SheetCommandArgs),
    }

    #[derive(Debug, Subcommand)]
    pub enum BuilderCommand {
        /// Store a builder form (JSON) as the current character
        Submit {
            #[arg(long)]
            form: PathBuf,
        },
        /// Show the stored builder character
        Show,
    }

    #[derive(Debug, Subcommand)]
    pub enum SheetCommandArgs {
        /// Create a blank sheet for the page's slug (local backend), then print it
        New { page: String },
        /// Load and print a sheet
        Show { page: String },
        /// Apply `field=value` edits, then save
        Set {
            page: String,
            #[arg(required = true)]
            edits: Vec<String>,
        },
        /// Edit interactively from stdin with autosave
        Edit { page: String },
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("could not read {path}: {source}")]
    ReadForm {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid builder form: {0}")]
    InvalidForm(#[from] serde_json::Error),

    #[error(transparent)]
    Builder(#[from] BuilderError),

    #[error("expected field=value, got {0:?}")]
    MalformedEdit(String),

    #[error(transparent)]
    Field(#[from] DomainError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error("{0}")]
    NotReady(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub struct RunnerDeps {
    pub config: SheetConfig,
    pub local: Arc<dyn KeyValueStore>,
    pub records: Arc<dyn RecordStore>,
    pub clock: Arc<dyn ClockPort>,
}

/// Parses one `field=value` edit. `\n` in the value stands for a newline.
pub fn parse_edit(raw: &str) -> Result<(SheetField, String), RunError> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| RunError::MalformedEdit(raw.to_string()))?;
    let field: SheetField = field.parse()?;
    Ok((field, value.replace("\\n", "\n")))
}

pub async fn run(deps: RunnerDeps, command: cli::Command) -> Result<(), RunError> {
    let mut out = std::io::stdout().lock();
    match command {
        cli::Command::Builder(command) => run_builder(&deps, command, &mut out),
        cli::Command::Sheet(command) => {
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            run_sheet(&deps, command, input, &mut out).await
        }
    }
}

fn run_builder(
    deps: &RunnerDeps,
    command: cli::BuilderCommand,
    out: &mut impl Write,
) -> Result<(), RunError> {
    let service = BuilderService::new(Arc::clone(&deps.local));
    match command {
        cli::BuilderCommand::Submit { form } => {
            let raw = std::fs::read_to_string(&form).map_err(|source| RunError::ReadForm {
                path: form.clone(),
                source,
            })?;
            let record: BuilderRecord = serde_json::from_str(&raw)?;
            service.submit(record)?;
            writeln!(out, "Character saved.")?;
            if let Some(view) = service.load_sheet() {
                writeln!(out, "{}", ui::render_builder_sheet(&view))?;
            }
        }
        cli::BuilderCommand::Show => match service.load_sheet() {
            Some(view) => writeln!(out, "{}", ui::render_builder_sheet(&view))?,
            None => writeln!(
                out,
                "No character saved yet. Use `sheetkeep builder submit` to create one."
            )?,
        },
    }
    Ok(())
}

fn session_for(deps: &RunnerDeps, page: &str) -> SheetSession {
    SheetSession::new(
        slug_from_page(page),
        Arc::clone(&deps.records),
        Arc::clone(&deps.clock),
    )
}

fn ensure_ready(session: &SheetSession) -> Result<(), RunError> {
    if session.is_ready() {
        Ok(())
    } else {
        Err(RunError::NotReady(session.status().to_string()))
    }
}

pub async fn run_sheet(
    deps: &RunnerDeps,
    command: cli::SheetCommandArgs,
    input: impl AsyncBufRead + Unpin,
    out: &mut impl Write,
) -> Result<(), RunError> {
    match command {
        cli::SheetCommandArgs::New { page } => {
            let mut session = session_for(deps, &page);
            let created = session.create().await;
            writeln!(out, "{}", ui::render_sheet(&session))?;
            created?;
            ensure_ready(&session)
        }
        cli::SheetCommandArgs::Show { page } => {
            let mut session = session_for(deps, &page);
            session.load().await;
            writeln!(out, "{}", ui::render_sheet(&session))?;
            ensure_ready(&session)
        }
        cli::SheetCommandArgs::Set { page, edits } => {
            let edits = edits
                .iter()
                .map(|raw| parse_edit(raw))
                .collect::<Result<Vec<_>, _>>()?;

            let mut session = session_for(deps, &page);
            session.load().await;
            writeln!(out, "{}", session.key_line())?;
            if let Err(e) = ensure_ready(&session) {
                writeln!(out, "{}", session.status())?;
                return Err(e);
            }

            for (field, value) in &edits {
                session.edit(*field, value);
            }
            let saved = session.save().await;
            writeln!(out, "{}", session.status())?;
            saved?;
            Ok(())
        }
        cli::SheetCommandArgs::Edit { page } => {
            let session = session_for(deps, &page);
            edit_interactively(session, deps.config.autosave_delay, input, out).await
        }
    }
}

/// Feeds stdin lines to a [`SheetRunner`] and prints every status change.
///
/// Lines are `field=value` edits or `save`; end of input flushes any pending
/// autosave before returning.
async fn edit_interactively(
    session: SheetSession,
    delay: std::time::Duration,
    input: impl AsyncBufRead + Unpin,
    out: &mut impl Write,
) -> Result<(), RunError> {
    let (commands, command_rx) = mpsc::channel(32);
    let (events_tx, mut events) = mpsc::unbounded_channel();

    let runner = SheetRunner::new(session, AutosaveState::new(delay)).with_events(events_tx);
    let task = tokio::spawn(runner.run(command_rx));

    let _ = commands.send(SheetCommand::Load).await;

    let mut lines = input.lines();
    let mut last_status = String::new();
    let mut reading = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if reading => match line? {
                Some(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let command = if line == "save" {
                        SheetCommand::Save
                    } else {
                        match parse_edit(line) {
                            Ok((field, value)) => SheetCommand::Edit { field, value },
                            Err(e) => {
                                writeln!(out, "{}", e)?;
                                continue;
                            }
                        }
                    };
                    if commands.send(command).await.is_err() {
                        reading = false;
                    }
                }
                None => reading = false,
            },
            event = events.recv() => match event {
                Some(SheetEvent::Status(status)) => {
                    let status = status.to_string();
                    if status != last_status {
                        writeln!(out, "{}", status)?;
                        last_status = status;
                    }
                }
                Some(SheetEvent::Loaded(_)) => {}
                None => break,
            },
        }

        if !reading {
            // Closing the channel lets the runner flush and finish
            break;
        }
    }

    drop(commands);
    while let Some(event) = events.recv().await {
        if let SheetEvent::Status(status) = event {
            let status = status.to_string();
            if status != last_status {
                writeln!(out, "{}", status)?;
                last_status = status;
            }
        }
    }

    match task.await {
        Ok(session) => {
            writeln!(out, "{}", session.key_line())?;
            ensure_ready(&session)
        }
        Err(e) => Err(RunError::NotReady(format!("sheet task failed: {}", e))),
    }
}

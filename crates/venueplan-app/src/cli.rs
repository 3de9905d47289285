//! Command-line front end.

use crate::session::{load_session, run_session, SessionReport};
use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use venueplan_core::catalog::Catalog;
use venueplan_core::config::EditorConfig;
use venueplan_core::shell::PlannerShell;
use venueplan_core::snapshot::ProjectSnapshot;
use venueplan_render::{GridStyle, RenderContext, Renderer, SvgRenderer};

/// Grid style for the exported scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GridArg {
    None,
    #[default]
    Lines,
    Dots,
}

impl From<GridArg> for GridStyle {
    fn from(arg: GridArg) -> Self {
        match arg {
            GridArg::None => GridStyle::None,
            GridArg::Lines => GridStyle::Lines,
            GridArg::Dots => GridStyle::Dots,
        }
    }
}

/// Replay an editing session against the event-planning catalog.
#[derive(Debug, Parser)]
#[command(name = "venueplan", version, about)]
pub struct Cli {
    /// Session file: a JSON array of editor actions.
    pub session: PathBuf,

    /// Editor configuration (JSON).
    #[arg(short, long, env = "VENUEPLAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Snapshot to start from.
    #[arg(short, long)]
    pub snapshot: Option<PathBuf>,

    /// Where to write the resulting snapshot.
    #[arg(short, long, default_value = "plan.json")]
    pub output: PathBuf,

    /// Also render the plan as SVG.
    #[arg(long)]
    pub svg: Option<PathBuf>,

    /// Grid style of the SVG.
    #[arg(long, value_enum, default_value_t = GridArg::Lines)]
    pub grid: GridArg,
}

/// Run the command.
pub fn run(cli: &Cli) -> anyhow::Result<SessionReport> {
    let config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            EditorConfig::from_json(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => EditorConfig::default(),
    };

    let saves: Arc<Mutex<Vec<ProjectSnapshot>>> = Arc::default();
    let sink = Arc::clone(&saves);
    let mut shell = PlannerShell::new(Arc::new(Catalog::event_planning()), config).with_on_save(
        Box::new(move |snapshot: &ProjectSnapshot| {
            if let Ok(mut saves) = sink.lock() {
                saves.push(snapshot.clone());
            }
        }),
    );

    if let Some(path) = &cli.snapshot {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        let snapshot = ProjectSnapshot::from_json(&json)
            .with_context(|| format!("parsing snapshot {}", path.display()))?;
        shell.load(snapshot);
    }

    let actions = load_session(&cli.session)
        .with_context(|| format!("loading session {}", cli.session.display()))?;
    let report = run_session(&mut shell, &actions)?;

    let snapshot = shell.snapshot();
    std::fs::write(&cli.output, snapshot.to_json()?)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    log::info!(
        "Wrote {} items to {} ({} saves during session)",
        snapshot.items.len(),
        cli.output.display(),
        saves.lock().map(|s| s.len()).unwrap_or_default()
    );

    if let Some(path) = &cli.svg {
        let mut renderer = SvgRenderer::new();
        renderer.build_scene(&RenderContext::from_shell(&shell).with_grid(cli.grid.into()));
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        renderer.write_to(file)?;
        log::info!("Rendered scene to {}", path.display());
    }

    println!("{}", shell.status());
    Ok(report)
}

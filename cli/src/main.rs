use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use floorplan::engine::{Action, EngineConfig, EngineCore};
use floorplan::frame_loop::{CancelToken, FrameLoop};
use floorplan::preset::{EntityKind, PresetError, Presets};
use floorplan::snapshot::{DEFAULT_AC_TEMP, MetricField, MetricLevel, SuggestionResponse, suggestion_lines};
use floorplan::template::RoomTemplate;
use serde_json::Value;


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("unknown furniture or device type: {0}")]
    UnknownType(String),
    #[error("no entity at index {0}")]
    UnknownEntity(usize),
    #[error("entity {0} is not a device and cannot be rotated")]
    NotRotatable(usize),
    #[error("entity {0} is covered by another entity at its center")]
    RotateBlocked(usize),
    #[error("cannot read preset file {path}: {source}")]
    PresetFile { path: PathBuf, source: std::io::Error },
    #[error("invalid preset table: {0}")]
    Presets(#[from] PresetError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "roomflow-cli", about = "Headless room airflow runner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the particle simulation for a number of frames and report counts.
    Simulate {
        #[command(flatten)]
        scene: SceneArgs,
        #[arg(long, default_value_t = 60)]
        frames: usize,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the scene snapshot the page would send for suggestions.
    Snapshot {
        #[command(flatten)]
        scene: SceneArgs,
    },
    /// Post the scene snapshot to a suggestion service.
    Suggest {
        #[command(flatten)]
        scene: SceneArgs,
        #[arg(long, env = "ROOMFLOW_BASE_URL", default_value = "http://127.0.0.1:3000")]
        base_url: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone)]
struct SceneArgs {
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    #[arg(long, default_value_t = 600.0)]
    height: f64,

    #[arg(long, help = "RNG seed for emission and turbulence")]
    seed: Option<u64>,

    #[arg(long, help = "Starter layout: custom, studio, 1br or 2br")]
    template: Option<RoomTemplate>,

    #[arg(long = "add", value_name = "TYPE", help = "Add a preset at the room center (repeatable)")]
    add: Vec<String>,

    #[arg(long = "rotate", value_name = "INDEX", help = "Click a device once to rotate it 45° (repeatable)")]
    rotate: Vec<usize>,

    #[arg(long, default_value_t = DEFAULT_AC_TEMP)]
    ac_temp: f64,

    #[arg(long, help = "JSON preset table replacing the built-in presets")]
    presets: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Simulate { scene, frames, json } => run_simulate(&scene, frames, json),
        Command::Snapshot { scene } => run_snapshot(&scene),
        Command::Suggest { scene, base_url, json } => run_suggest(&scene, &base_url, json).await,
    }
}

fn run_simulate(args: &SceneArgs, frames: usize, json: bool) -> Result<(), CliError> {
    let mut core = build_scene(args)?;
    let report = simulate(&mut core, frames);
    if json {
        return print_json(&report);
    }
    for (name, value) in report.as_object().into_iter().flatten() {
        println!("{name}: {value}");
    }
    Ok(())
}

fn run_snapshot(args: &SceneArgs) -> Result<(), CliError> {
    let core = build_scene(args)?;
    print_json(&serde_json::to_value(core.snapshot())?)
}

async fn run_suggest(args: &SceneArgs, base_url: &str, json: bool) -> Result<(), CliError> {
    let core = build_scene(args)?;
    let url = format!("{}/api/suggestions", base_url.trim_end_matches('/'));

    let client = reqwest::Client::new();
    let response = client.post(url).json(&core.snapshot()).send().await?;
    let status = response.status();
    let value = response.json::<Value>().await.unwrap_or(Value::Null);

    if !status.is_success() {
        let message = value.get("error").and_then(Value::as_str).map_or_else(|| value.to_string(), ToOwned::to_owned);
        return Err(CliError::ServerError { status: status.as_u16(), message });
    }
    if json {
        return print_json(&value);
    }

    let advice: SuggestionResponse = serde_json::from_value(value)?;
    for line in suggestion_lines(&Ok::<_, CliError>(advice.clone())) {
        println!("- {line}");
    }
    if let Some(metrics) = &advice.metrics {
        for readout in metrics.readouts() {
            let level = readout.level.map_or(String::new(), |l| format!(" ({})", level_name(l)));
            println!("{}: {}{level}", field_name(readout.field), readout.text);
        }
    }
    Ok(())
}

/// Build the engine and apply template, additions, then rotations, in that order.
fn build_scene(args: &SceneArgs) -> Result<EngineCore, CliError> {
    let presets = match &args.presets {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|source| CliError::PresetFile { path: path.clone(), source })?;
            Presets::from_json(&raw)?
        }
        None => Presets::builtin(),
    };

    let mut core = EngineCore::new(EngineConfig { seed: args.seed, presets, ..Default::default() });
    core.set_viewport(args.width, args.height, 1.0);
    if let Some(template) = args.template {
        core.load_template(template);
    }
    core.set_ac_temp(args.ac_temp);

    for key in &args.add {
        let added = if core.presets().device(key).is_some() { core.add_device(key) } else { core.add_furniture(key) };
        if added.is_none() {
            return Err(CliError::UnknownType(key.clone()));
        }
    }
    for &index in &args.rotate {
        rotate(&mut core, index)?;
    }
    Ok(core)
}

/// Click the center of entity `index`, as a user would to rotate it.
fn rotate(core: &mut EngineCore, index: usize) -> Result<(), CliError> {
    let entity = core.entity(index).ok_or(CliError::UnknownEntity(index))?;
    if !entity.is_device() {
        return Err(CliError::NotRotatable(index));
    }
    let center = entity.center();
    core.on_pointer_down(center);
    let actions = core.on_pointer_up(center);
    // Another entity stacked on top takes the click.
    if actions.iter().any(|a| matches!(a, Action::EntityRotated { index: i, .. } if *i == index)) {
        Ok(())
    } else {
        Err(CliError::RotateBlocked(index))
    }
}

fn simulate(core: &mut EngineCore, frames: usize) -> Value {
    let mut frame_loop = FrameLoop::new(CancelToken::new());
    let ran = frame_loop.run_steps(core, frames);
    let totals = frame_loop.totals();
    serde_json::json!({
        "frames": ran,
        "entities": core.registry.len(),
        "particles": core.particles.len(),
        "fan_particles": core.particles.count_kind(EntityKind::Fan),
        "ac_particles": core.particles.count_kind(EntityKind::Ac),
        "spawned": totals.spawned,
        "culled": totals.culled,
        "skipped": totals.skipped,
    })
}

fn field_name(field: MetricField) -> &'static str {
    match field {
        MetricField::Comfort => "comfort",
        MetricField::Energy => "energy",
        MetricField::Airflow => "airflow",
        MetricField::RecommendedTemp => "recommended_ac_temp",
    }
}

fn level_name(level: MetricLevel) -> &'static str {
    match level {
        MetricLevel::Low => "low",
        MetricLevel::Mid => "mid",
        MetricLevel::High => "high",
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

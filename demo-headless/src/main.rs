use backtraj_core::{
    backward_times, GriddedField, ScalarField, Timestamp, Trajectory, TrajectoryConfig,
    TrajectoryEngine, EARTH_RADIUS_KM,
};
use chrono::TimeDelta;
use clap::{Parser, ValueEnum};
use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Standard pressure levels used for synthetic fields (hPa)
const SYNTHETIC_LEVELS: [f64; 12] = [
    1000.0, 925.0, 850.0, 700.0, 600.0, 500.0, 400.0, 300.0, 250.0, 200.0, 150.0, 100.0,
];

/// Output format for the computed trajectory
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Lagrangian back-trajectory calculator
#[derive(Parser, Debug)]
#[command(name = "backtraj")]
#[command(about = "Trace an air parcel backward through gridded winds", long_about = None)]
#[command(allow_negative_numbers = true)]
struct Args {
    /// Release latitude in degrees north
    #[arg(long)]
    lat: f64,

    /// Release longitude in degrees east
    #[arg(long)]
    lon: f64,

    /// Release pressure level in hPa
    #[arg(long, default_value_t = 500.0)]
    level: f64,

    /// Release time (RFC 3339, e.g. 2017-08-25T18:00:00Z)
    #[arg(short, long)]
    start: Timestamp,

    /// Hours between trajectory points
    #[arg(long, default_value_t = 6)]
    step_hours: u32,

    /// Number of steps back from the release time
    #[arg(short = 'n', long, default_value_t = 8)]
    steps: usize,

    /// Directory holding u.json, v.json, w.json and optionally t.json
    #[arg(short, long, conflicts_with_all = ["u", "v", "w"])]
    fields: Option<PathBuf>,

    /// Synthetic constant zonal wind (m/s) when no field directory is given
    #[arg(short, long, default_value_t = 10.0)]
    u: f64,

    /// Synthetic constant meridional wind (m/s)
    #[arg(short, long, default_value_t = 0.0)]
    v: f64,

    /// Synthetic constant vertical motion (Pa/s, positive downward)
    #[arg(short, long, default_value_t = 0.0)]
    w: f64,

    /// JSON configuration file (earth radius and sampling window)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

/// Wind fields plus an optional annotation field
struct FieldSet {
    u: GriddedField,
    v: GriddedField,
    w: GriddedField,
    t: Option<GriddedField>,
}

impl FieldSet {
    fn load(dir: &Path) -> Result<Self, Box<dyn Error>> {
        let load = |name: &str| -> Result<GriddedField, Box<dyn Error>> {
            let path = dir.join(format!("{name}.json"));
            GriddedField::load(&path).map_err(|e| format!("{}: {e}", path.display()).into())
        };

        let t_path = dir.join("t.json");
        let t = if t_path.exists() {
            Some(load("t")?)
        } else {
            None
        };

        let set = Self {
            u: load("u")?,
            v: load("v")?,
            w: load("w")?,
            t,
        };
        info!(
            "Loaded fields from {}: {:?} (time, level, lat, lon)",
            dir.display(),
            set.u.shape()
        );
        Ok(set)
    }

    fn synthetic(times: &[Timestamp], u: f64, v: f64, w: f64) -> Result<Self, Box<dyn Error>> {
        let lon: Vec<f64> = (0..144).map(|i| f64::from(i) * 2.5).collect();
        let lat: Vec<f64> = (0..73).map(|j| 90.0 - f64::from(j) * 2.5).collect();
        let levels = SYNTHETIC_LEVELS.to_vec();
        let constant = |name: &str, value: f64| {
            GriddedField::constant(
                name,
                times.to_vec(),
                lon.clone(),
                lat.clone(),
                levels.clone(),
                value,
            )
        };

        info!(
            "Synthetic fields: u={:.1} m/s, v={:.1} m/s, w={:.3} Pa/s on a 2.5° global grid",
            u, v, w
        );
        Ok(Self {
            u: constant("u", u)?,
            v: constant("v", v)?,
            w: constant("w", w)?,
            t: None,
        })
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => TrajectoryConfig::load(path)?,
        None => TrajectoryConfig::default(),
    };
    if (config.earth_radius_km - EARTH_RADIUS_KM).abs() > f64::EPSILON {
        warn!("Using non-standard earth radius {} km", config.earth_radius_km);
    }

    let interval = TimeDelta::hours(i64::from(args.step_hours));
    let times = backward_times(args.start, interval, args.steps + 1);

    let fields = match &args.fields {
        Some(dir) => FieldSet::load(dir)?,
        None => FieldSet::synthetic(&times, args.u, args.v, args.w)?,
    };

    let engine = TrajectoryEngine::new(&fields.u, &fields.v, &fields.w).with_config(config);
    let engine = match &fields.t {
        Some(t) => engine.with_annotation(t),
        None => engine,
    };

    let trajectory = engine.run(args.lat, args.lon, args.level, &times)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Table => {
            let label = fields.t.as_ref().map(|t| t.name().to_string());
            print_table(&mut out, &trajectory, label.as_deref(), config.earth_radius_km)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &trajectory)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => trajectory.write_csv(&mut out)?,
    }
    Ok(())
}

fn print_table<W: Write>(
    out: &mut W,
    trajectory: &Trajectory,
    aux_label: Option<&str>,
    earth_radius_km: f64,
) -> io::Result<()> {
    writeln!(out, "=== Back Trajectory ===\n")?;
    match aux_label {
        Some(label) => {
            writeln!(out, "Time                 | Lat(°N)  | Lon(°E)  | Level(hPa) | {label:>8}")?;
            writeln!(out, "---------------------|----------|----------|------------|---------")?;
        }
        None => {
            writeln!(out, "Time                 | Lat(°N)  | Lon(°E)  | Level(hPa)")?;
            writeln!(out, "---------------------|----------|----------|-----------")?;
        }
    }

    for s in trajectory {
        write!(
            out,
            "{} | {:8.3} | {:8.3} | {:10.1}",
            s.time.format("%Y-%m-%d %H:%M UTC"),
            s.latitude,
            s.longitude,
            s.level
        )?;
        match s.auxiliary {
            Some(value) => writeln!(out, " | {value:8.2}")?,
            None => writeln!(out)?,
        }
    }

    writeln!(out, "\n=== Summary ===")?;
    writeln!(out, "Points: {}", trajectory.len())?;
    writeln!(out, "Duration: {}", trajectory.duration())?;
    writeln!(
        out,
        "Path length: {}",
        trajectory.total_distance(earth_radius_km)
    )?;
    writeln!(out, "Net level change: {}", trajectory.level_change())?;
    Ok(())
}

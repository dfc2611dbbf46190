//! Console lunar landing game: pick a fuel rate every ten seconds and try to touch down gently.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use lunar_lander::config::{LanderConfig, load_or_default};
use lunar_lander::descent::{
    Descent, DescentEvent, DescentRecorder, DescentReport, LandingGrade, LandingOutcome, Telemetry,
};
use lunar_lander::export;
use tracing_subscriber::EnvFilter;

#[path = "lunar/console.rs"]
mod console;

use console::{Console, ConsoleError};

#[derive(Parser, Debug)]
#[command(author, version, about = "Lunar landing simulation (turn-based)")]
struct Cli {
    /// Write every input line back to standard output (useful with redirected input)
    #[arg(long, default_value_t = false)]
    echo: bool,

    /// Scenario file (TOML, or YAML for .yaml/.yml); defaults to the classic mission
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write each descent's telemetry to this CSV path, with a JSON summary alongside
    #[arg(long)]
    flight_log: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock(), cli.echo);

    match play(&cli, &config, &mut console) {
        Err(err) if is_end_of_input(&err) => {
            if let Err(err) = console.out().flush() {
                tracing::warn!(%err, "failed to flush output");
            }
            eprintln!("\nEND OF INPUT");
            std::process::exit(1);
        }
        other => other,
    }
}

fn is_end_of_input(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<ConsoleError>(), Some(ConsoleError::EndOfInput))
}

fn play<R: BufRead, W: Write>(
    cli: &Cli,
    config: &LanderConfig,
    console: &mut Console<R, W>,
) -> anyhow::Result<()> {
    print_banner(console.out(), config)?;

    let mut round = 1;
    loop {
        let report = play_once(config, console)?;
        if let Some(path) = &cli.flight_log {
            let csv_path = numbered_path(path, round);
            let summary = export::write_flight_log(&csv_path, &report, chrono::Utc::now())?;
            tracing::info!(
                csv = %csv_path.display(),
                summary = %summary.display(),
                "flight log written"
            );
        }

        if !console.request_play_again()? {
            break;
        }
        round += 1;
    }

    writeln!(console.out(), "CONTROL OUT\n\n")?;
    Ok(())
}

fn print_banner<W: Write>(out: &mut W, config: &LanderConfig) -> io::Result<()> {
    let controls = &config.controls;
    let vehicle = &config.vehicle;
    writeln!(out, "CONTROL CALLING LUNAR MODULE. MANUAL CONTROL IS NECESSARY")?;
    writeln!(
        out,
        "YOU MAY RESET FUEL RATE K EACH {} SECS TO 0 OR ANY VALUE",
        controls.turn_seconds
    )?;
    writeln!(
        out,
        "BETWEEN {} & {} LBS/SEC. YOU'VE {} LBS FUEL. ESTIMATED",
        controls.min_fuel_rate_lbs_s,
        controls.max_fuel_rate_lbs_s,
        vehicle.fuel_lbs()
    )?;
    writeln!(
        out,
        "FREE FALL IMPACT TIME-{:.0} SECS. CAPSULE WEIGHT-{} LBS\n\n",
        estimated_impact_s(config),
        vehicle.total_weight_lbs
    )
}

/// Rough time to impact at the initial speed, ignoring gravity.
fn estimated_impact_s(config: &LanderConfig) -> f64 {
    let initial = &config.initial;
    if initial.velocity_miles_s > 0.0 {
        initial.altitude_miles / initial.velocity_miles_s
    } else {
        0.0
    }
}

fn play_once<R: BufRead, W: Write>(
    config: &LanderConfig,
    console: &mut Console<R, W>,
) -> anyhow::Result<DescentReport> {
    let out = console.out();
    writeln!(out, "FIRST RADAR CHECK COMING UP\n\n")?;
    writeln!(out, "COMMENCE LANDING PROCEDURE")?;
    writeln!(
        out,
        "TIME,SECS   ALTITUDE,MILES+FEET   VELOCITY,MPH   FUEL,LBS   FUEL RATE"
    )?;

    let mut descent = Descent::from_config(config, &mut *console);
    let mut recorder = DescentRecorder::default();
    while let Some(event) = descent.next() {
        let event = event?;
        let out = descent.controller_mut().out();
        match &event {
            DescentEvent::TurnStarted(telemetry) => print_telemetry(out, telemetry)?,
            DescentEvent::FuelExhausted { elapsed_s } => {
                writeln!(out, "FUEL OUT AT {elapsed_s:8.2} SECS")?
            }
            DescentEvent::Landed(outcome) => print_outcome(out, outcome)?,
        }
        if let Some(report) = recorder.record(&event) {
            return Ok(report);
        }
    }
    anyhow::bail!("descent ended without a landing")
}

fn print_telemetry<W: Write>(out: &mut W, t: &Telemetry) -> io::Result<()> {
    write!(
        out,
        "{:7.0}{:16.0}{:7.0}{:15.2}{:12.1}      ",
        t.elapsed_s, t.altitude_miles, t.altitude_feet, t.speed_mph, t.fuel_lbs
    )
}

fn print_outcome<W: Write>(out: &mut W, outcome: &LandingOutcome) -> io::Result<()> {
    writeln!(out, "ON THE MOON AT {:8.2} SECS", outcome.elapsed_s)?;
    writeln!(out, "IMPACT VELOCITY OF {:8.2} M.P.H.", outcome.impact_mph)?;
    writeln!(out, "FUEL LEFT: {:8.2} LBS", outcome.fuel_remaining_lbs)?;
    match outcome.grade {
        LandingGrade::Perfect => writeln!(out, "PERFECT LANDING !-(LUCKY)"),
        LandingGrade::Good => writeln!(out, "GOOD LANDING-(COULD BE BETTER)"),
        LandingGrade::Poor => writeln!(out, "CONGRATULATIONS ON A POOR LANDING"),
        LandingGrade::CraftDamaged => writeln!(out, "CRAFT DAMAGE. GOOD LUCK"),
        LandingGrade::CrashLanding => writeln!(out, "CRASH LANDING-YOU'VE 5 HRS OXYGEN"),
        LandingGrade::Destroyed { crater_depth_ft } => {
            writeln!(out, "SORRY,BUT THERE WERE NO SURVIVORS-YOU BLEW IT!")?;
            writeln!(
                out,
                "IN FACT YOU BLASTED A NEW LUNAR CRATER {crater_depth_ft:8.2} FT. DEEP"
            )
        }
    }
}

/// `log.csv` for the first round, `log-2.csv`, `log-3.csv`, … afterwards.
fn numbered_path(path: &Path, round: usize) -> PathBuf {
    if round == 1 {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "flight".to_string());
    let name = match path.extension() {
        Some(ext) => format!("{stem}-{round}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{round}"),
    };
    path.with_file_name(name)
}

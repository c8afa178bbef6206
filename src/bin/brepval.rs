use std::path::PathBuf;
use std::process::ExitCode;

use tracing::info;
use tracing_subscriber::EnvFilter;

use brepval::error::ParseError;
use brepval::io::read_shell;
use brepval::model::{GeometryStore, Primitive, Solid};
use brepval::validate::{Config, Mode, Validator};

const USAGE: &str = "\
usage: brepval <inputfile> [options]

Validates the B-rep primitive in <inputfile> (POLY or OFF).

options:
  --ishell <file>        one interior shell in POLY format (repeatable)
  -p, --primitive <x>    what to validate: S (solid, default),
                         CS (composite surface), MS (multi surface)
  --snap_tolerance <d>   vertex snapping tolerance (default 0.001)
  --planarity_d2p <d>    planarity distance-to-plane tolerance (default 0.01)
  --planarity_n <d>      planarity normal deviation in degrees (default 1.0)
  --otxt <file>          write a plain-text report to <file>
  --verbose              verbose logging
";

struct Args {
    input: PathBuf,
    ishells: Vec<PathBuf>,
    mode: Mode,
    config: Config,
    otxt: Option<PathBuf>,
    verbose: bool,
}

fn parse_args(mut argv: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut input = None;
    let mut ishells = Vec::new();
    let mut mode = Mode::default();
    let mut config = Config::default();
    let mut otxt = None;
    let mut verbose = false;

    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--ishell" => ishells.push(PathBuf::from(value(&mut argv, &arg)?)),
            "-p" | "--primitive" => mode = value(&mut argv, &arg)?.parse()?,
            "--snap_tolerance" => config.snap_tolerance = number(&mut argv, &arg)?,
            "--planarity_d2p" => config.planarity_d2p = number(&mut argv, &arg)?,
            "--planarity_n" => config.planarity_n_deg = number(&mut argv, &arg)?,
            "--otxt" => otxt = Some(PathBuf::from(value(&mut argv, &arg)?)),
            "--verbose" => verbose = true,
            other if other.starts_with('-') => {
                return Err(format!("unknown option {other}"));
            }
            _ => {
                if input.replace(PathBuf::from(&arg)).is_some() {
                    return Err("more than one input file given".into());
                }
            }
        }
    }

    let input = input.ok_or("no input file given")?;
    if !ishells.is_empty() && mode != Mode::Solid {
        return Err("--ishell is only meaningful for solids (-p S)".into());
    }
    Ok(Args {
        input,
        ishells,
        mode,
        config,
        otxt,
        verbose,
    })
}

fn value(argv: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    argv.next().ok_or_else(|| format!("{flag} needs a value"))
}

fn number(argv: &mut impl Iterator<Item = String>, flag: &str) -> Result<f64, String> {
    let raw = value(argv, flag)?;
    raw.parse()
        .map_err(|_| format!("{flag} needs a number, got {raw:?}"))
}

fn run(args: &Args) -> brepval::error::Result<bool> {
    let mut store = GeometryStore::new();
    let id = store.add_shell(read_shell(&args.input)?);

    let primitive = match args.mode {
        Mode::Solid => {
            let mut solid = Solid::new(id);
            for file in &args.ishells {
                solid.add_inner(store.add_shell(read_shell(file)?));
            }
            Primitive::Solid(solid)
        }
        Mode::CompositeSurface => Primitive::CompositeSurface(id),
        Mode::MultiSurface => Primitive::MultiSurface(id),
    };

    info!(input = %args.input.display(), "validating");
    let validator = Validator::new(args.config.clone());
    let report = validator.validate(&store, &primitive)?;

    print!("{}", report.summary());

    if let Some(path) = &args.otxt {
        let mut text = format!("Input file: {}\n", args.input.display());
        for file in &args.ishells {
            text.push_str(&format!("Inner shell: {}\n", file.display()));
        }
        text.push_str(&report.summary());
        for record in report.records() {
            text.push_str(&format!("  {}: {}\n", record.context, record.code));
        }
        std::fs::write(path, text).map_err(|source| ParseError::Io {
            path: path.display().to_string(),
            source,
        })?;
        println!("Report saved to {}", path.display());
    }

    Ok(report.is_valid())
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("brepval: {message}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("901 --- invalid input: {err}");
            ExitCode::from(2)
        }
    }
}

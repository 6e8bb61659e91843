//! pulsed - headless host for the pulsenet simulator
//!
//! Steps a simulator without a display and prints what it would draw.
//!
//! Examples:
//!   pulsed run
//!   pulsed run --frames 1200 --fps 30 --seed 7
//!   pulsed run --json --frames 5
//!   pulsed config
//!
//! Config is read from `--config PATH`, else from the OS config dir
//! (`pulsenet/config.json`) when present, else defaults. Flags override it.

use std::path::{Path, PathBuf};
use std::process;

use pulsenet::{LayerSizes, SimConfig, Simulator};
use tracing::{error, info, warn};

mod driver;
mod error;
mod paths;

use driver::RunOptions;
use error::DriverError;
use paths::AppPaths;

#[derive(Debug, Clone)]
struct RunArgs {
    opts: RunOptions,
    width: f32,
    height: f32,
    seed: Option<u64>,
    layers: Option<LayerSizes>,
    config: Option<PathBuf>,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            opts: RunOptions::default(),
            width: 800.0,
            height: 400.0,
            seed: None,
            layers: None,
            config: None,
        }
    }
}

fn print_help() {
    eprintln!("pulsed - headless pulsenet host");
    eprintln!("Usage: pulsed <command> [flags]\n");
    eprintln!("Commands:");
    eprintln!("  run                         Step the simulator and print waves");
    eprintln!("  config                      Print the effective config as JSON");
    eprintln!("  paths                       Show the config file location");
    eprintln!("  help                        Show this help\n");
    eprintln!("Flags:");
    eprintln!("  --frames <n>                Frames to run (default 600)");
    eprintln!("  --fps <f>                   Frame rate (default 60)");
    eprintln!("  --width <w> --height <h>    Viewport size (default 800x400)");
    eprintln!("  --layers <i,h,o>            Neurons per layer (default 3,4,2)");
    eprintln!("  --seed <n>                  Fixed random seed");
    eprintln!("  --config <path>             Config file (JSON)");
    eprintln!("  --hidden-after <n>          Report the viewport hidden from frame n on");
    eprintln!("  --json                      One render snapshot per line");
    eprintln!("  --realtime                  Pace frames by the wall clock");
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, DriverError> {
    let value = value.ok_or_else(|| DriverError::Usage(format!("{flag} needs a value")))?;
    value
        .parse()
        .map_err(|_| DriverError::Usage(format!("{flag}: invalid value '{value}'")))
}

fn parse_layers(value: Option<&String>) -> Result<LayerSizes, DriverError> {
    let raw: String = parse_value("--layers", value)?;
    let counts: Vec<usize> = raw
        .split(',')
        .map(|s| s.trim().parse())
        .collect::<Result<_, _>>()
        .map_err(|_| DriverError::Usage(format!("--layers: invalid value '{raw}'")))?;
    match counts.as_slice() {
        &[input, hidden, output] => Ok(LayerSizes::new(input, hidden, output)),
        _ => Err(DriverError::Usage("--layers expects three counts: i,h,o".into())),
    }
}

fn parse_run_args(args: &[String]) -> Result<RunArgs, DriverError> {
    let mut out = RunArgs::default();
    let mut it = args.iter();
    while let Some(flag) = it.next() {
        match flag.as_str() {
            "--frames" => out.opts.frames = parse_value(flag, it.next())?,
            "--fps" => {
                let fps: f32 = parse_value(flag, it.next())?;
                if !(fps.is_finite() && fps > 0.0) {
                    return Err(DriverError::Usage("--fps must be > 0".into()));
                }
                out.opts.fps = fps;
            }
            "--width" => out.width = parse_value(flag, it.next())?,
            "--height" => out.height = parse_value(flag, it.next())?,
            "--layers" => out.layers = Some(parse_layers(it.next())?),
            "--seed" => out.seed = Some(parse_value(flag, it.next())?),
            "--config" => out.config = Some(PathBuf::from(parse_value::<String>(flag, it.next())?)),
            "--hidden-after" => out.opts.hidden_after = Some(parse_value(flag, it.next())?),
            "--json" => out.opts.json = true,
            "--realtime" => out.opts.realtime = true,
            other => return Err(DriverError::Usage(format!("unknown flag: {other}"))),
        }
    }
    Ok(out)
}

fn read_config(path: &Path) -> Result<SimConfig, DriverError> {
    let text = std::fs::read_to_string(path).map_err(|source| DriverError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SimConfig::from_json_str(&text)?)
}

/// An explicit path must load; the default location falls back to defaults.
fn load_config(explicit: Option<&Path>) -> Result<SimConfig, DriverError> {
    if let Some(path) = explicit {
        let cfg = read_config(path)?;
        info!("Config loaded from {:?}", path);
        return Ok(cfg);
    }

    let default_path = match AppPaths::new() {
        Ok(paths) => paths.config_file(),
        Err(e) => {
            warn!("{}; using defaults", e);
            return Ok(SimConfig::default());
        }
    };
    if !default_path.exists() {
        return Ok(SimConfig::default());
    }
    match read_config(&default_path) {
        Ok(cfg) => {
            info!("Config loaded from {:?}", default_path);
            Ok(cfg)
        }
        Err(e) => {
            warn!("Ignoring config {:?}: {}", default_path, e);
            Ok(SimConfig::default())
        }
    }
}

fn effective_config(args: &RunArgs) -> Result<SimConfig, DriverError> {
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(layers) = args.layers {
        cfg = cfg.with_layers(layers);
    }
    if let Some(seed) = args.seed {
        cfg = cfg.with_seed(seed);
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_run(args: &RunArgs) -> Result<(), DriverError> {
    let cfg = effective_config(args)?;
    let mut sim = Simulator::new(cfg)?;
    sim.resize(args.width, args.height);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = driver::run(&mut sim, &args.opts, &mut out)?;
    if !args.opts.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

fn cmd_config(args: &RunArgs) -> Result<(), DriverError> {
    let cfg = effective_config(args)?;
    println!("{}", serde_json::to_string_pretty(&cfg)?);
    Ok(())
}

fn cmd_paths() -> Result<(), DriverError> {
    let paths = AppPaths::new()?;
    println!("config dir:  {}", paths.config_dir().display());
    println!("config file: {}", paths.config_file().display());
    Ok(())
}

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cmd = args.first().map(String::as_str).unwrap_or("run");
    let rest = args.get(1..).unwrap_or(&[]);

    let result = match cmd {
        "help" | "-h" | "--help" => {
            print_help();
            return;
        }
        "run" => parse_run_args(rest).and_then(|a| cmd_run(&a)),
        "config" => parse_run_args(rest).and_then(|a| cmd_config(&a)),
        "paths" => cmd_paths(),
        other => {
            eprintln!("Unknown command: {}", other);
            print_help();
            process::exit(2);
        }
    };

    if let Err(e) = result {
        error!("{}", e);
        if matches!(e, DriverError::Usage(_)) {
            print_help();
            process::exit(2);
        }
        process::exit(1);
    }
}

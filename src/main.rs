use clap::Parser;
use devframe::{DirArtworkStore, PreviewConfig, Registry, Size};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

/// Render a multi-device preview image of a web page
#[derive(Parser, Debug)]
#[command(name = "devframe", version, about)]
struct Args {
    /// Page to preview, e.g. http://localhost:8080/
    url: String,

    /// Output PNG (defaults to preview.png next to the executable)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON device registry replacing the built-in devices
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Directory that artwork references are resolved against
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Browser binary (probed when omitted)
    #[arg(long, env = "CHROME")]
    browser: Option<PathBuf>,

    /// Wait after the page becomes visible, in milliseconds
    #[arg(long, default_value_t = 3000)]
    settle_ms: u64,

    /// Renderer timeout in milliseconds
    #[arg(long, default_value_t = 30000)]
    timeout_ms: u64,

    /// Canvas size as WIDTHxHEIGHT
    #[arg(long, default_value = "2560x1600", value_parser = parse_canvas)]
    canvas: Size,

    /// Canvas background as RRGGBB or RRGGBBAA
    #[arg(long, default_value = "ffffff", value_parser = parse_color)]
    background: [u8; 4],

    /// Disable the browser sandbox (needed when running as root in containers)
    #[arg(long)]
    no_sandbox: bool,
}

/// Parse WIDTHxHEIGHT
fn parse_canvas(s: &str) -> Result<Size, String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("Invalid canvas '{}'. Use WIDTHxHEIGHT (e.g., 2560x1600)", s))?;
    let width: u32 = w.parse().map_err(|_| format!("Invalid width '{}' in canvas", w))?;
    let height: u32 = h.parse().map_err(|_| format!("Invalid height '{}' in canvas", h))?;
    if width == 0 || height == 0 {
        return Err("Canvas width and height must be greater than 0".to_string());
    }
    Ok(Size { width, height })
}

/// Parse RRGGBB / RRGGBBAA hex, with or without a leading '#'
fn parse_color(s: &str) -> Result<[u8; 4], String> {
    let hex = s.trim_start_matches('#');
    if hex.len() != 6 && hex.len() != 8 {
        return Err(format!("Invalid color '{}'. Use RRGGBB or RRGGBBAA", s));
    }
    let bytes = hex::decode(hex).map_err(|e| format!("Invalid color '{}': {}", s, e))?;
    Ok([bytes[0], bytes[1], bytes[2], bytes.get(3).copied().unwrap_or(255)])
}

fn run(args: Args) -> devframe::Result<PathBuf> {
    let config = PreviewConfig {
        canvas: args.canvas,
        background: args.background,
        settle_delay_ms: args.settle_ms,
        timeout_ms: args.timeout_ms,
        browser_path: args.browser,
        sandbox: !args.no_sandbox,
        ..Default::default()
    };

    let registry = match &args.registry {
        Some(path) => Registry::load(path)?,
        None => Registry::builtin(),
    };
    let output = match args.output {
        Some(p) => p,
        None => devframe::output::default_output_path()?,
    };

    let renderer = devframe::new_renderer(&config)?;
    let artwork = DirArtworkStore::new(&args.assets);

    info!("Capturing {} on {} devices", args.url, registry.len());
    let canvas = devframe::composite(&args.url, &registry, &renderer, &artwork, &config)?;

    devframe::output::save_png(&canvas, &output)?;
    info!("Preview digest: {}", devframe::output::digest(&canvas));
    Ok(output)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(args) {
        Ok(path) => {
            info!("Preview written to {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

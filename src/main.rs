use std::path::{Path, PathBuf};

use log::info;

use pivflow::config::{self, Config};
use pivflow::derived::{self, Quantity};
use pivflow::record::PivRecord;
use pivflow::report::{self, Units};
use pivflow::{synthetic, views, Analysis};

struct Defaults;

impl Defaults {
    const DEMO_NY: usize = 200;
    const DEMO_NX: usize = 193;
    const DEMO_STEP: f64 = 0.5;
    const DEMO_OMEGA: f64 = 2.0;
    const DEMO_INTERFACE_Y: f64 = 50.0;
    const QUIVER_SKIP: usize = 9;
}

/// Value following `flag` on the command line, e.g. `--config run.yaml`.
fn arg_value(flag: &str) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].clone())
}

fn has_flag(flag: &str) -> bool {
    std::env::args().any(|a| a == flag)
}

fn print_usage() {
    println!(
        "usage: pivflow [--config <yaml>] [--data <record>] [--json <out>] [--demo <out>]\n\
         \n\
         --config  analysis config (default: {})\n\
         --data    measurement record, overrides `data` in the config\n\
         --json    also write the results as JSON\n\
         --demo    write a synthetic solid-body rotation record and exit",
        config::DEFAULT_CONFIG_FILE
    );
}

fn write_demo(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let record = synthetic::solid_body_record(
        Defaults::DEMO_NY,
        Defaults::DEMO_NX,
        Defaults::DEMO_STEP,
        Defaults::DEMO_OMEGA,
        Defaults::DEMO_INTERFACE_Y,
    );
    record.save(path)?;
    println!("wrote synthetic record to {}", path.display());
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    if has_flag("--help") || has_flag("-h") {
        print_usage();
        return Ok(());
    }
    if let Some(out) = arg_value("--demo") {
        return write_demo(Path::new(&out));
    }

    let mut cfg: Config = match arg_value("--config") {
        Some(path) => config::load_from(Path::new(&path))?,
        None => config::load()?,
    };
    if let Some(data) = arg_value("--data") {
        cfg.data = PathBuf::from(data);
    }

    let record = PivRecord::load(&cfg.data)?;
    let analysis = Analysis::from_record(record, &cfg)?;
    let grid = &analysis.grid;
    println!("{}", grid);
    match cfg.expected_spacing {
        Some(step) => println!("spacing check: uniform at {} mm", step),
        None => println!("spacing check: uniform at dx={} dy={}", grid.dx(), grid.dy()),
    }

    let units = Units::default();
    let (mask, speed_split) = analysis.phases(cfg.interface_trace)?;
    println!("\n{}", report::phase_summary(&mask, &speed_split, &units));

    for q in [Quantity::Divergence, Quantity::Curl] {
        let field = q.compute(grid);
        let (ny, nx) = field.shape();
        info!("{}: max |.| = {:.4e}", q.label(), field.max_abs_in(0..ny, 0..nx));
    }
    let div = derived::divergence(grid);
    info!("mean divergence {:.4e} 1/s", div.nan_mean().unwrap_or(0.0));
    info!("quiver view: {} arrows", views::quiver(grid, Defaults::QUIVER_SKIP).len());

    let results = analysis.run(&cfg)?;
    print!("{}", report::circulation_table(&results.circulation, &results.stokes, &units));
    print!("{}", report::flux_table(&results.flux, &results.gauss, &units));

    if let Some(out) = arg_value("--json") {
        std::fs::write(&out, serde_json::to_string_pretty(&results)?)?;
        info!("results written to {}", out);
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

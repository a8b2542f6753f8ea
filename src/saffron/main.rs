mod io;

use anyhow::{Context, Result};
use clap::Parser;
use glassbox::matrix::CompatibilityMatrix;
use glassbox::pipeline::{AuditOptions, run_audit};
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Land-use compatibility audit over a parcel set", long_about = None)]
struct Args {
    /// Path to the input parcels (GeoJSON FeatureCollection)
    #[arg(short, long, env = "GLASSBOX_PARCELS")]
    parcels: PathBuf,

    /// Path to the compatibility matrix CSV (wide format, classes on both axes)
    #[arg(short, long, env = "GLASSBOX_MATRIX")]
    matrix: PathBuf,

    /// Directory to write outputs (created if missing)
    #[arg(short, long, env = "GLASSBOX_OUTPUT_DIR", default_value = "data/output")]
    output_dir: PathBuf,

    /// Base name for output files (defaults to the parcel file stem)
    #[arg(short, long)]
    base_name: Option<String>,

    /// Name of the land-use property on each parcel feature
    #[arg(long, default_value = "KARBARI_MO")]
    land_use_col: String,

    /// Adjacency buffer distance, in the unit of the parcel coordinates
    #[arg(long, default_value_t = 10.0)]
    adjacency_distance: f64,

    /// Treat the coordinates as projected even if the file does not say so
    #[arg(long)]
    assume_projected: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let start = Instant::now();
    let args = Args::parse();

    println!("--- Initializing compatibility audit ---");

    println!("[1/5] Loading parcels from {}...", args.parcels.display());
    let loaded = io::load_parcels(&args.parcels, &args.land_use_col, args.assume_projected)?;
    println!("  > Loaded {} parcels.", loaded.parcels.len());

    println!("[2/5] Loading compatibility matrix from {}...", args.matrix.display());
    let matrix_file = File::open(&args.matrix)
        .with_context(|| format!("matrix CSV not found at {}", args.matrix.display()))?;
    let matrix = CompatibilityMatrix::from_wide_csv(matrix_file)?;
    println!("  > Matrix loaded with {} class pairs.", matrix.len());

    println!("[3/5] Running adjacency analysis and scoring...");
    let output = run_audit(
        loaded.parcels,
        &matrix,
        AuditOptions {
            adjacency_distance: args.adjacency_distance,
            coord_space: loaded.coord_space,
        },
    )?;
    println!("  > Found {} adjacent parcel pairs.", output.pair_count);
    if output.distance_caveat {
        println!(
            "  > Warning: coordinate space not confirmed projected; \
             adjacency distances may be inaccurate."
        );
    }

    let base = match &args.base_name {
        Some(base) => base.clone(),
        None => args
            .parcels
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "parcels_processed".to_string()),
    };
    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("could not create output directory {}", args.output_dir.display())
    })?;

    println!("[4/5] Exporting scored parcels...");
    let geojson_path = args.output_dir.join(format!("{base}.geojson"));
    io::write_scored_geojson(&geojson_path, &output.parcels, &args.land_use_col)?;
    println!("  > Main results exported to {}", geojson_path.display());

    println!("[5/5] Writing summary reports...");
    let overall_path = args.output_dir.join(format!("{base}_overall_summary.csv"));
    output
        .overall
        .write_csv(File::create(&overall_path).with_context(|| {
            format!("could not create {}", overall_path.display())
        })?)?;
    let breakdown_path = args
        .output_dir
        .join(format!("{base}_detailed_breakdown.csv"));
    output
        .breakdown
        .write_csv(File::create(&breakdown_path).with_context(|| {
            format!("could not create {}", breakdown_path.display())
        })?)?;
    println!(
        "  > Reports saved to {} and {}",
        overall_path.display(),
        breakdown_path.display()
    );

    println!("--- AUDIT COMPLETE ---");
    println!(
        "  > Total execution time: {:.2} seconds.",
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use heteronym_plots::{
    Config,
    constants::{DEFAULT_DATA_DIR, DEFAULT_OUT_DIR},
    pipeline::{format_summary, run},
};
use log::{debug, error};
use std::{io::Write, path::PathBuf};

#[derive(Parser)]
#[command(author, version, about = "Render heteronym pronunciation charts from CSV data", long_about = None)]
struct Args {
    /// Directory containing heteronyms_*.csv files
    #[arg(long = "data-dir", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Directory the PNG charts are written to
    #[arg(long = "out-dir", default_value = DEFAULT_OUT_DIR)]
    out_dir: PathBuf,
}

fn main() {
    // defaults to RUST_LOG if set, otherwise INFO
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let args = Args::parse();
    match try_main(&args) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            error!("Error: {e}");
            for cause in e.chain().skip(1) {
                error!("  caused by: {cause}");
            }
            let _ = std::io::stderr().flush();
            std::process::exit(1);
        }
    }
}

fn try_main(args: &Args) -> Result<()> {
    let config = Config::from_env(&args.data_dir, &args.out_dir).context("Invalid configuration")?;
    debug!("Configuration: {:?}", config);

    let outputs = run(&config).with_context(|| {
        format!(
            "Failed to render charts from {} into {}",
            config.data_dir.display(),
            config.out_dir.display()
        )
    })?;

    println!("{}", format_summary(&outputs));
    Ok(())
}

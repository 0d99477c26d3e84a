use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use fenci::Model;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(
    name = "compile",
    about = "A program to compile a data directory into a binary model."
)]
struct Args {
    /// Data directory holding vocabulary.dat, custom_words/,
    /// hmm_segment_model/, and hmm_pos_model/.
    #[clap(short = 'd', long)]
    data_dir: PathBuf,

    /// File to which the binary model is output.
    #[clap(short = 'o', long)]
    model_out: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    info!("Compiling the model...");
    let start = Instant::now();
    let model = Model::from_dir(&args.data_dir)?;
    info!("{} seconds", start.elapsed().as_secs_f64());

    info!("Writing the model...: {:?}", &args.model_out);
    let mut wtr = BufWriter::new(File::create(&args.model_out)?);
    let num_bytes = model.write(&mut wtr)?;
    wtr.flush()?;
    info!("{:.3} MiB", num_bytes as f64 / (1024.0 * 1024.0));

    Ok(())
}

use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use fenci::{Model, Tokenizer};

use clap::{error::ErrorKind, CommandFactory, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(
    name = "segment",
    about = "Predicts segmentation and POS tags of sentences read from stdin."
)]
struct Args {
    /// Binary model compiled by the compile command.
    ///
    /// If this argument is not specified, the model is loaded from `--data-dir`.
    #[clap(short = 'i', long)]
    model_in: Option<PathBuf>,

    /// Data directory to load the model from directly.
    #[clap(short = 'd', long)]
    data_dir: Option<PathBuf>,

    /// Outputs the POS tag of each word as `word/tag`.
    #[clap(long)]
    pos: bool,

    /// Segments by character tagging only, without the dictionary.
    #[clap(long, conflicts_with = "pos")]
    hmm: bool,

    /// Delimiter printed between words.
    #[clap(long, default_value = " / ")]
    delimiter: String,

    /// Maximum number of characters of a dictionary word (0 means the default).
    #[clap(long, default_value = "0")]
    max_word_len: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    info!("Loading the model...");
    let model = if let Some(model_in) = &args.model_in {
        Model::read(BufReader::new(File::open(model_in)?))?
    } else if let Some(data_dir) = &args.data_dir {
        Model::from_dir(data_dir)?
    } else {
        Args::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "Either --model-in or --data-dir must be specified.",
            )
            .exit();
    };
    let tokenizer = Tokenizer::new(model).max_word_len(args.max_word_len);
    info!("Ready to segment");

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    let mut buf = vec![];
    #[allow(clippy::significant_drop_in_scrutinee)]
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        buf.clear();
        if args.pos {
            buf.extend(
                tokenizer
                    .segment_and_tag(&line)
                    .map(|(word, tag)| format!("{word}/{tag}")),
            );
        } else if args.hmm {
            buf.extend(tokenizer.segment_hmm(&line).map(String::from));
        } else {
            buf.extend(tokenizer.segment(&line).map(String::from));
        }
        writeln!(out, "{}", buf.join(args.delimiter.as_str()))?;
    }
    out.flush()?;

    Ok(())
}

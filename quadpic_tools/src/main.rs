mod utils;

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use quadpic::CompressedPicture;
use tracing::info;
use tracing_subscriber::EnvFilter;
use utils::{mode, threshold, write_statistics, Mode};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Operation to run: -c1, -c2 or -d
    #[arg(value_parser = mode, allow_hyphen_values = true)]
    mode: Mode,

    /// Operands of the operation
    ///
    ///   -c1 <THRESHOLD> <INPUT.ppm> <OUTPUT.txt>   write tree statistics
    ///   -c2 <THRESHOLD> <INPUT.ppm> <OUTPUT.bin>   write the compressed picture
    ///   -d  <INPUT.bin> <OUTPUT.ppm>               restore a compressed picture
    #[arg(allow_hyphen_values = true, verbatim_doc_comment)]
    operands: Vec<String>,
}

#[derive(Debug)]
struct CompressArgs {
    /// Largest block error that is still merged into one leaf
    threshold: u64,
    /// Input PPM picture
    input: PathBuf,
    /// Output path
    output: PathBuf,
}

impl CompressArgs {
    fn from_operands(operands: &[String]) -> Result<Self> {
        let [threshold_arg, input, output] = operands else {
            bail!("Wrong number of arguments");
        };

        Ok(Self {
            threshold: threshold(threshold_arg).map_err(anyhow::Error::msg)?,
            input: input.into(),
            output: output.into(),
        })
    }
}

#[derive(Debug)]
struct DecompressArgs {
    /// Input compressed picture
    input: PathBuf,
    /// Output PPM path
    output: PathBuf,
}

impl DecompressArgs {
    fn from_operands(operands: &[String]) -> Result<Self> {
        let [input, output] = operands else {
            bail!("Wrong number of arguments");
        };

        Ok(Self {
            input: input.into(),
            output: output.into(),
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = match Cli::try_parse() {
        Ok(args) => args,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            e.print()?;
            std::process::exit(1)
        }
    };

    match args.mode {
        Mode::Statistics => statistics(CompressArgs::from_operands(&args.operands)?),
        Mode::Compress => compress(CompressArgs::from_operands(&args.operands)?),
        Mode::Decompress => decompress(DecompressArgs::from_operands(&args.operands)?),
    }
}

fn statistics(args: CompressArgs) -> Result<()> {
    let (compressed, stats) = compress_input(&args)?;

    let mut output = BufWriter::new(
        File::create(&args.output)
            .with_context(|| format!("Could not create output file {:?}", args.output))?,
    );
    write_statistics(&mut output, compressed.tree.height(), stats.leaves, stats.largest_merged)
        .and_then(|_| output.flush())
        .with_context(|| format!("Could not write statistics to {:?}", args.output))?;

    Ok(())
}

fn compress(args: CompressArgs) -> Result<()> {
    let (compressed, _) = compress_input(&args)?;

    compressed
        .save(&args.output)
        .with_context(|| format!("Could not write compressed picture {:?}", args.output))?;

    info!(output = ?args.output, "saved compressed picture");

    Ok(())
}

fn decompress(args: DecompressArgs) -> Result<()> {
    if !args.input.try_exists()? {
        bail!("Input file {:?} does not exist", args.input);
    }

    let compressed = CompressedPicture::open(&args.input)
        .with_context(|| format!("Could not read compressed picture {:?}", args.input))?;
    let picture = compressed
        .to_picture()
        .with_context(|| format!("Could not restore picture from {:?}", args.input))?;

    info!(
        input = ?args.input,
        size = compressed.size,
        nodes = compressed.tree.node_count(),
        "restored picture"
    );

    picture
        .save(&args.output)
        .with_context(|| format!("Could not write picture {:?}", args.output))?;

    Ok(())
}

/// Read the input picture and build its tree. Nothing is written yet.
fn compress_input(args: &CompressArgs) -> Result<(CompressedPicture, quadpic::BuildStats)> {
    if !args.input.try_exists()? {
        bail!("Input file {:?} does not exist", args.input);
    }

    let picture = quadpic::open(&args.input)
        .with_context(|| format!("Could not read picture {:?}", args.input))?;

    let (compressed, stats) = CompressedPicture::compress(&picture, args.threshold);

    info!(
        input = ?args.input,
        size = picture.size(),
        threshold = args.threshold,
        leaves = stats.leaves,
        "compressed picture"
    );

    Ok((compressed, stats))
}

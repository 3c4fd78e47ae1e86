use std::{
    fmt::Display,
    fs,
    io::{self, Read, Write},
    process::ExitCode,
    str::FromStr,
};

use anyhow::Context;
use clap::Parser;
use wfst_encode_lib::{
    config::{FstEncodeConfig, GeneralConfig},
    encode::{self, EncodeFlags},
    fst::{
        Fst,
        text::{from_text, to_text},
    },
    logger::{LogLevel, Logger},
    weight::{LogWeight, TropicalWeight, Weight},
};

/// The semiring the transducer weights are read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeightType {
    Tropical,
    Log,
}

impl FromStr for WeightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tropical" | "standard" => Ok(WeightType::Tropical),
            "log" => Ok(WeightType::Log),
            _ => Err(format!("Invalid weight type: {}", s)),
        }
    }
}

impl Display for WeightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightType::Tropical => write!(f, "tropical"),
            WeightType::Log => write!(f, "log"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "fstencode")]
#[command(version = "0.1")]
#[command(
    about = "Encodes transducer labels and/or weights as single labels, or decodes them",
    long_about = None
)]
struct Args {
    /// Input transducer in text form, `-` reads stdin.
    in_fst: String,

    /// Codex file, written when encoding and read when decoding.
    codex: String,

    /// Output transducer, stdout if omitted.
    out_fst: Option<String>,

    /// Encode output labels.
    #[arg(long = "encode_labels")]
    encode_labels: bool,

    /// Encode weights.
    #[arg(long = "encode_weights")]
    encode_weights: bool,

    /// Extend the existing codex instead of starting a new one.
    #[arg(long = "encode_reuse")]
    encode_reuse: bool,

    /// Decode instead of encode.
    #[arg(long)]
    decode: bool,

    #[arg(long = "weight_type", default_value_t = WeightType::Tropical)]
    weight_type: WeightType,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<String>,
}

fn read_input(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("failed to read transducer from stdin")?;
        Ok(content)
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read transducer {path}"))
    }
}

fn write_output(path: Option<&str>, content: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("failed to write transducer {path}"))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn run_typed<W: Weight>(
    args: &Args,
    config: &FstEncodeConfig,
    logger: Option<&Logger>,
) -> anyhow::Result<()> {
    let format = config.get_weight_format();
    let input = read_input(&args.in_fst)?;
    let mut fst = from_text::<W>(&input, format)
        .with_context(|| format!("failed to parse transducer {}", args.in_fst))?;
    tracing::debug!(
        "read {} transducer with {} states and {} trs",
        W::weight_type(),
        fst.num_states(),
        fst.num_trs()
    );

    if args.decode {
        encode::decode(&mut fst, &args.codex, logger)?;
    } else {
        let flags = EncodeFlags::new(args.encode_labels, args.encode_weights);
        encode::encode(&mut fst, flags, args.encode_reuse, &args.codex, logger)?;
    }

    write_output(args.out_fst.as_deref(), &to_text(&fst, format))
}

fn init_tracing(logger: Option<&Logger>) {
    let level = logger.map(|l| l.level()).unwrap_or(LogLevel::Warn);
    // Only fails if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level.to_tracing_level())
        .with_writer(io::stderr)
        .try_init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = FstEncodeConfig::from_optional_file(args.config.as_ref())?;
    config.get_weight_format().validate()?;

    let logger = Logger::from_config(config.logger(), "fstencode".into())?;
    init_tracing(logger.as_ref());

    match args.weight_type {
        WeightType::Tropical => run_typed::<TropicalWeight>(&args, &config, logger.as_ref()),
        WeightType::Log => run_typed::<LogWeight>(&args, &config, logger.as_ref()),
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Help and version go to stdout and are not failures.
            let failed = e.use_stderr();
            let _ = e.print();
            return if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fstencode: {e:#}");
            ExitCode::FAILURE
        }
    }
}

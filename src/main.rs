use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use aksara::core::config::{Config, OutputStyle, UnknownClassPolicy};
use aksara::detect::{bridge::parse_detections, DetectorBridge};
use aksara::pipeline::{export_document, Pipeline};
use aksara::translit::ClassTable;
use aksara::Transliteration;

#[derive(Parser, Debug)]
#[command(name = "aksara")]
#[command(version, about = "Javanese script glyph detections to Latin transliteration", long_about = None)]
struct Cli {
    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transliterate a JSON list of glyph detections
    Convert {
        /// Detections file: [{"class_code": .., "bbox": [x1, y1, x2, y2]}, ..]
        input: PathBuf,

        /// Pixel height of the source image
        #[arg(long)]
        height: u32,

        #[command(flatten)]
        opts: RunOptions,
    },

    /// Run the glyph detector on an image, then transliterate
    Image {
        /// Input page image
        input: PathBuf,

        /// Detector script (overrides the config file)
        #[arg(long)]
        detector: Option<PathBuf>,

        #[command(flatten)]
        opts: RunOptions,
    },

    /// Transliterate several detection files
    Batch {
        /// Detection files
        inputs: Vec<PathBuf>,

        /// Pixel height of the source images
        #[arg(long)]
        height: u32,

        #[command(flatten)]
        opts: RunOptions,
    },

    /// Print the class table
    Table {
        /// JSON class table (default: built-in)
        #[arg(long)]
        table: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
struct RunOptions {
    /// Output directory (default: print to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON class table replacing the built-in one
    #[arg(long)]
    table: Option<PathBuf>,

    /// Output rendering of the taling vowel
    #[arg(long, value_enum)]
    style: Option<OutputStyle>,

    /// Fail the whole document on an unknown class code
    #[arg(long)]
    abort_on_unknown: bool,

    /// Suppress progress messages
    #[arg(short, long)]
    quiet: bool,
}

impl RunOptions {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(table) = &self.table {
            config.class_table = Some(table.clone());
        }
        if let Some(style) = self.style {
            config.output_style = style;
        }
        if self.abort_on_unknown {
            config.unknown_class = UnknownClassPolicy::AbortDocument;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Convert {
            input,
            height,
            opts,
        } => {
            let pipeline = Pipeline::from_config(opts.load_config()?)?;
            convert_single(&pipeline, &input, height, &opts)
        }
        Commands::Image {
            input,
            detector,
            opts,
        } => convert_image(input, detector, &opts),
        Commands::Batch {
            inputs,
            height,
            opts,
        } => convert_batch(inputs, height, &opts),
        Commands::Table { table } => show_table(table),
    }
}

fn read_detections(input: &Path) -> Result<Vec<aksara::detect::RawDetection>> {
    if !input.is_file() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read detections: {}", input.display()))?;
    parse_detections(&text).with_context(|| format!("Invalid detections file: {}", input.display()))
}

fn convert_single(pipeline: &Pipeline, input: &Path, height: u32, opts: &RunOptions) -> Result<()> {
    if !opts.quiet {
        eprintln!("[*] Processing: {}", input.display());
    }
    let detections = read_detections(input)?;
    let document = pipeline
        .transliterate(&detections, height)
        .with_context(|| format!("Failed to transliterate: {}", input.display()))?;
    emit(&document, opts.output.as_deref(), opts.quiet)
}

fn convert_image(input: PathBuf, detector: Option<PathBuf>, opts: &RunOptions) -> Result<()> {
    if !input.is_file() {
        anyhow::bail!("Input image does not exist: {}", input.display());
    }
    let mut config = opts.load_config()?;
    if let Some(script) = detector {
        config.detector.script = script;
    }
    let bridge = DetectorBridge::from_config(&config.detector);
    let pipeline = Pipeline::from_config(config)?;

    if !opts.quiet {
        eprintln!("[*] Detecting glyphs: {}", input.display());
    }
    let document = pipeline
        .transliterate_image(&bridge, &input)
        .with_context(|| format!("Failed to process image: {}", input.display()))?;
    emit(&document, opts.output.as_deref(), opts.quiet)
}

fn emit(document: &Transliteration, output: Option<&Path>, quiet: bool) -> Result<()> {
    match output {
        Some(dir) => {
            export_document(document, dir)
                .with_context(|| format!("Failed to export to: {}", dir.display()))?;
            if !quiet {
                eprintln!("[✓] Done! {} line(s) saved to: {}", document.lines.len(), dir.display());
            }
        }
        None => print!("{}", document.text()),
    }
    Ok(())
}

fn convert_batch(inputs: Vec<PathBuf>, height: u32, opts: &RunOptions) -> Result<()> {
    if inputs.is_empty() {
        anyhow::bail!("No input files specified");
    }
    let pipeline = Pipeline::from_config(opts.load_config()?)?;
    let base_output = opts
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("batch_output"));

    eprintln!("[*] Batch processing {} file(s)", inputs.len());
    eprintln!("[*] Base output: {}\n", base_output.display());

    let mut success = 0;
    let mut failed = 0;

    for (i, input) in inputs.iter().enumerate() {
        eprintln!("[{}/{}] Processing: {}", i + 1, inputs.len(), input.display());

        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("input_{}", i + 1));
        let single = RunOptions {
            output: Some(base_output.join(stem)),
            quiet: true,
            ..opts.clone()
        };

        match convert_single(&pipeline, input, height, &single) {
            Ok(()) => {
                eprintln!("  [✓] Success");
                success += 1;
            }
            Err(e) => {
                eprintln!("  [✗] Failed: {e:#}");
                failed += 1;
            }
        }
    }

    eprintln!("\n[*] Summary: {} succeeded, {} failed", success, failed);

    if failed > 0 {
        anyhow::bail!("{} file(s) failed to process", failed);
    }

    Ok(())
}

fn show_table(table: Option<PathBuf>) -> Result<()> {
    let table = match table {
        Some(path) => ClassTable::load(&path)
            .with_context(|| format!("Failed to load class table: {}", path.display()))?,
        None => ClassTable::builtin(),
    };

    println!("Class table ({} entries)", table.len());
    println!("==========================");
    for entry in table.entries() {
        let positions = entry
            .positions
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(",");
        println!(
            "{:<18} {:<6} {:<14} {}",
            entry.class_code,
            format!("{:?}", entry.fragment),
            positions,
            entry.kind.name()
        );
    }

    Ok(())
}

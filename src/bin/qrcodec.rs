use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use qr_codec::{generate_qr_code, read_qr_code_from_image, render, RenderOptions};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "qrcodec", version, about = "Encode and decode alphanumeric QR codes (versions 1 and 2)")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the QR code for a text to an image file
    Encode {
        text: String,
        #[arg(short, long)]
        output: PathBuf,
        /// Pixels per module
        #[arg(long, default_value_t = RenderOptions::default().module_size)]
        module_size: u32,
        /// Width of the white border, in modules
        #[arg(long, default_value_t = RenderOptions::default().quiet_zone)]
        quiet_zone: u32,
        /// Accept lowercase letters by upper-casing the text first
        #[arg(long)]
        uppercase: bool,
    },
    /// Print the text stored in a QR code image
    Decode {
        image: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Encode { text, output, module_size, quiet_zone, uppercase } => {
            let text = if uppercase { text.to_ascii_uppercase() } else { text };
            encode_cmd(&text, &output, RenderOptions::new(module_size, quiet_zone))
        }
        Command::Decode { image } => decode_cmd(&image),
    }
}

fn encode_cmd(text: &str, output: &Path, options: RenderOptions) -> Result<()> {
    let grid = generate_qr_code(text)?;
    let rendered = render(&grid, &options);
    rendered
        .save(output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(path = %output.display(), side = grid.width(), "wrote QR code");
    Ok(())
}

fn decode_cmd(path: &Path) -> Result<()> {
    let image = image::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let text = read_qr_code_from_image(&image)
        .with_context(|| format!("failed to read a QR code from {}", path.display()))?;
    println!("{}", text);
    Ok(())
}

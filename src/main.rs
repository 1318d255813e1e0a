use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use bluecrypt::config::{self, DEFAULT_PSNR_TARGET_DB};
use bluecrypt::{grid, pipeline, BlueCryptConfig};

/// bluecrypt — hide files in lossless images with AES-256-GCM + 2:2:4 LSB embedding.
#[derive(Parser)]
#[command(name = "bluecrypt", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file and hide it in a cover image
    Hide {
        /// Cover image path (png, bmp, tiff, or any decodable format)
        #[arg(short, long)]
        cover: PathBuf,

        /// Secret file to hide
        #[arg(short, long)]
        secret: PathBuf,

        /// Output stego image (.png, .bmp, .tif or .tiff)
        #[arg(short, long)]
        output: PathBuf,

        /// Encryption password
        #[arg(short, long)]
        password: String,

        /// PSNR target in dB (default: 55.0)
        #[arg(long, default_value_t = DEFAULT_PSNR_TARGET_DB)]
        psnr_target: f64,

        /// Re-extract in memory after hiding and compare digests
        #[arg(long)]
        verify: bool,

        /// Overwrite the output if it exists
        #[arg(short, long)]
        force: bool,
    },

    /// Recover a hidden file from a stego image
    Extract {
        /// Stego image path
        #[arg(short, long)]
        input: PathBuf,

        /// Output file, or directory to write the recovered file name into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Decryption password
        #[arg(short, long)]
        password: String,

        /// Overwrite the output if it exists
        #[arg(short, long)]
        force: bool,
    },

    /// Compute PSNR between two images of equal size
    Analyze {
        /// Original image
        #[arg(short = 'a', long)]
        original: PathBuf,

        /// Modified image
        #[arg(short = 'b', long)]
        modified: PathBuf,

        /// PSNR target in dB (default: 55.0)
        #[arg(long, default_value_t = DEFAULT_PSNR_TARGET_DB)]
        psnr_target: f64,
    },

    /// Show how much data an image can carry
    Capacity {
        /// Cover image path
        #[arg(short, long)]
        image: PathBuf,

        /// Secret file name used to account for envelope overhead
        #[arg(short, long, default_value = config::DEFAULT_SECRET_NAME)]
        name: String,
    },
}

fn format_psnr(psnr: f64) -> String {
    if psnr.is_infinite() {
        "Infinity".to_string()
    } else {
        format!("{:.2}", psnr)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Hide {
            cover,
            secret,
            output,
            password,
            psnr_target,
            verify,
            force,
        } => {
            let cfg = BlueCryptConfig {
                psnr_target_db: psnr_target,
                overwrite: force,
            };

            let report = pipeline::hide::hide_file(&cover, &secret, &output, &password, &cfg)?;
            println!(
                "hid {} ({} bytes) in {}: {} of {} bytes used, PSNR {} dB",
                report.secret_name,
                report.secret_len,
                output.display(),
                report.payload_len,
                report.capacity,
                format_psnr(report.psnr)
            );

            if verify {
                let stego = grid::load_image(&output)?;
                let secret_file = pipeline::extract::extract_bytes(&stego, &password)?;
                if secret_file.data != std::fs::read(&secret)? {
                    bail!("verification failed: recovered data differs from {}", secret.display());
                }
                println!("verified: {} recovered intact", secret_file.filename);
            }
        }

        Commands::Extract {
            input,
            output,
            password,
            force,
        } => {
            let cfg = BlueCryptConfig {
                overwrite: force,
                ..Default::default()
            };

            let written = pipeline::extract::extract_file(&input, &output, &password, &cfg)?;
            println!("recovered {}", written.display());
        }

        Commands::Analyze {
            original,
            modified,
            psnr_target,
        } => {
            let cfg = BlueCryptConfig {
                psnr_target_db: psnr_target,
                ..Default::default()
            };

            let report = pipeline::analyze::analyze_files(&original, &modified, &cfg)?;
            println!("PSNR (dB): {}", format_psnr(report.psnr));
            if report.meets_target {
                println!("imperceptibility target achieved (>{} dB)", psnr_target);
            } else {
                println!("below imperceptibility target of {} dB", psnr_target);
            }
        }

        Commands::Capacity { image, name } => {
            let grid = grid::load_image(&image)?;
            let (width, height) = grid.dimensions();
            println!("{}x{} pixels", width, height);
            println!("payload capacity: {} bytes", config::capacity(width, height));
            println!(
                "largest secret file named {:?}: {} bytes",
                name,
                config::max_secret_size(width, height, name.len())
            );
        }
    }

    Ok(())
}

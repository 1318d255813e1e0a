//! BlueCrypt hides a file inside a lossless image.
//!
//! Hide path: secret bytes → [`envelope::pack`] → [`crypto::encrypt`]
//! (AES-256-GCM) → [`stego::embed`] (2:2:4 LSB) → stego grid.
//! Extract path runs the same steps in reverse. [`quality::psnr`] measures
//! the distortion introduced.

pub mod codec;
pub mod config;
pub mod crypto;
pub mod envelope;
pub mod grid;
pub mod pipeline;
pub mod quality;
pub mod stego;

pub use config::BlueCryptConfig;
pub use envelope::SecretFile;
pub use grid::PixelGrid;
pub use pipeline::analyze::analyze_files;
pub use pipeline::extract::{extract_bytes, extract_file};
pub use pipeline::hide::{hide_bytes, hide_file};
pub use pipeline::{roundtrip, RoundtripResult};

use std::fs;
use std::path::PathBuf;

use bluecrypt::crypto::{self, CryptoError};
use bluecrypt::envelope;
use bluecrypt::stego::{self, StegoError};
use bluecrypt::{grid, BlueCryptConfig, PixelGrid};

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bluecrypt_it_{}", name));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn noisy(width: u32, height: u32) -> PixelGrid {
    let mut state = 0x2545_f491u32;
    let data = (0..width * height * 3)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect();
    PixelGrid::from_raw(width, height, data).unwrap()
}

#[test]
fn hunter2_note_in_white_10x10() {
    let key = crypto::derive_key("hunter2").unwrap();
    let cover = PixelGrid::new(10, 10, [255, 255, 255]);

    let packed = envelope::pack("note.txt", b"hello").unwrap();
    let blob = crypto::encrypt(&packed, &key).unwrap();
    let stego_grid = stego::embed(&cover, &blob).unwrap();

    let extracted = stego::extract(&stego_grid).unwrap();
    let plain = crypto::decrypt(&extracted, &key).unwrap();
    let secret = envelope::unpack(&plain).unwrap();

    assert_eq!(secret.filename, "note.txt");
    assert_eq!(secret.data, b"hello");
}

#[test]
fn two_by_two_image_rejects_any_payload() {
    let cover = PixelGrid::new(2, 2, [10, 20, 30]);
    let err = stego::embed(&cover, &[1]).unwrap_err();
    assert!(matches!(
        err,
        StegoError::CapacityExceeded { required: 1, available: 0 }
    ));
}

#[test]
fn zero_length_header_is_invalid() {
    let grid = PixelGrid::new(6, 6, [0xFC, 0xFC, 0xF0]);
    assert!(matches!(
        stego::extract(&grid),
        Err(StegoError::InvalidPayload(0))
    ));
}

#[test]
fn twenty_byte_blob_too_short() {
    let key = crypto::derive_key("pw").unwrap();
    assert!(matches!(
        crypto::decrypt(&[0u8; 20], &key),
        Err(CryptoError::TooShort { .. })
    ));
}

#[test]
fn hide_and_extract_in_memory() {
    let cover = noisy(64, 48);
    let secret: Vec<u8> = (0..1500u32).map(|i| (i % 251) as u8).collect();

    let hidden = bluecrypt::hide_bytes(&cover, "dir/data.bin", &secret, "correct horse").unwrap();
    assert_eq!(hidden.payload_len, secret.len() + 6 + "data.bin".len() + 28);
    assert_eq!(hidden.capacity, 64 * 48 - 4);
    assert!(hidden.psnr.is_finite() && hidden.psnr > 30.0);

    let recovered = bluecrypt::extract_bytes(&hidden.stego, "correct horse").unwrap();
    assert_eq!(recovered.filename, "data.bin");
    assert_eq!(recovered.data, secret);
}

#[test]
fn wrong_password_is_authentication_failure() {
    let cover = noisy(20, 20);
    let hidden = bluecrypt::hide_bytes(&cover, "a.txt", b"top secret", "right").unwrap();

    let err = bluecrypt::extract_bytes(&hidden.stego, "wrong").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CryptoError>(),
        Some(CryptoError::AuthenticationFailed)
    ));
}

#[test]
fn modified_stego_pixel_is_detected() {
    let cover = noisy(20, 20);
    let hidden = bluecrypt::hide_bytes(&cover, "a.txt", b"top secret", "pw").unwrap();

    // Flip a low blue bit in the pixel carrying the last ciphertext byte.
    let mut tampered = hidden.stego.clone();
    let last = (4 + hidden.payload_len - 1) as u32;
    let (row, col) = (last / 20, last % 20);
    let mut px = tampered.pixel(row, col);
    px[2] ^= 0x01;
    tampered.set_pixel(row, col, px);

    let err = bluecrypt::extract_bytes(&tampered, "pw").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CryptoError>(),
        Some(CryptoError::AuthenticationFailed)
    ));
}

#[test]
fn secret_too_large_for_cover() {
    let cover = noisy(8, 8);
    let err = bluecrypt::hide_bytes(&cover, "big.bin", &[7u8; 64], "pw").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StegoError>(),
        Some(StegoError::CapacityExceeded { available: 60, .. })
    ));
}

#[test]
fn roundtrip_through_png() {
    let cover = noisy(40, 30);
    let result = bluecrypt::roundtrip(&cover, "report.pdf", b"%PDF-1.7 fake", "pw").unwrap();
    assert!(result.matched);
    assert_eq!(result.original_hash, result.recovered_hash);
    assert_eq!(result.recovered_name, "report.pdf");
}

#[test]
fn file_pipeline_hide_extract_analyze() {
    let dir = temp_dir("file_pipeline");
    let cover_path = dir.join("cover.png");
    let secret_path = dir.join("note.txt");
    let stego_path = dir.join("stego.png");
    let out_dir = dir.join("out");
    fs::create_dir_all(&out_dir).unwrap();

    grid::save_image(&noisy(32, 32), &cover_path).unwrap();
    fs::write(&secret_path, b"meet at dawn").unwrap();

    let cfg = BlueCryptConfig {
        overwrite: true,
        ..Default::default()
    };

    let report =
        bluecrypt::hide_file(&cover_path, &secret_path, &stego_path, "hunter2", &cfg).unwrap();
    assert_eq!(report.secret_name, "note.txt");
    assert_eq!(report.secret_len, 12);
    assert_eq!(report.capacity, 32 * 32 - 4);

    let written = bluecrypt::extract_file(&stego_path, &out_dir, "hunter2", &cfg).unwrap();
    assert_eq!(written, out_dir.join("note.txt"));
    assert_eq!(fs::read(&written).unwrap(), b"meet at dawn");

    let analysis = bluecrypt::analyze_files(&cover_path, &stego_path, &cfg).unwrap();
    assert!((analysis.psnr - report.psnr).abs() < 1e-12);

    let same = bluecrypt::analyze_files(&cover_path, &cover_path, &cfg).unwrap();
    assert_eq!(same.psnr, f64::INFINITY);
    assert!(same.meets_target);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn file_pipeline_refuses_lossy_output_and_overwrite() {
    let dir = temp_dir("refusals");
    let cover_path = dir.join("cover.bmp");
    let secret_path = dir.join("s.bin");
    grid::save_image(&noisy(16, 16), &cover_path).unwrap();
    fs::write(&secret_path, [1u8, 2, 3]).unwrap();

    let cfg = BlueCryptConfig::default();
    let lossy = bluecrypt::hide_file(&cover_path, &secret_path, &dir.join("out.jpg"), "pw", &cfg);
    assert!(matches!(
        lossy.unwrap_err().downcast_ref::<grid::GridError>(),
        Some(grid::GridError::LossyFormat(_))
    ));

    // The cover itself already exists and overwrite is off.
    assert!(bluecrypt::hide_file(&cover_path, &secret_path, &cover_path, "pw", &cfg).is_err());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn extract_from_unsupported_image() {
    let dir = temp_dir("unsupported");
    let path = dir.join("not_an_image.png");
    fs::write(&path, b"plain text").unwrap();

    let err = bluecrypt::extract_file(&path, &dir, "pw", &BlueCryptConfig::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<grid::GridError>(),
        Some(grid::GridError::UnsupportedImage(_))
    ));

    fs::remove_dir_all(&dir).ok();
}

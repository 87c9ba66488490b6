/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::collections::BTreeSet;
use std::fs::read;

use nanorand::{Rng, WyRand};
use qoi_atlas::{decode, decode_into, DecodeParams, FormatError, QoiChannels, SkyboxAtlas};

use crate::{load_entries, qoi_path};

#[test]
#[allow(clippy::uninlined_format_args)]
fn test_qoi() {
    let paths = load_entries("qoi.json");

    let default_path = qoi_path();
    let mut error = false;
    let mut files = Vec::new();

    for path in &paths {
        let file_name = default_path.join(&path.name);
        let file_contents = read(&file_name).unwrap();

        let result = decode(&file_contents, &path.params());

        let failure = match (&result, path.error, &path.expected) {
            (Err(e), Some(expected), _) if expected.matches(e) => None,
            (Err(e), _, _) => Some(format!("unexpected error {:?}", e)),
            (Ok(_), Some(expected), _) => Some(format!("expected {:?} error", expected)),
            (Ok(image), None, Some(pixels)) => {
                let expected = read(default_path.join(pixels)).unwrap();

                if image.dimensions() != (path.width, path.height) {
                    Some(format!("dimensions {:?}", image.dimensions()))
                } else if image.data != expected {
                    Some(String::from("pixel mismatch"))
                } else {
                    None
                }
            }
            (Ok(_), None, None) => Some(String::from("fixture has no expected output")),
        };
        if let Some(reason) = failure {
            error = true;
            files.push(path.to_owned());
            // report error
            eprintln!(
                "Mismatch for file {:?}: {}\nConfig:{:#?}\n",
                file_name, reason, path
            );
        }
    }
    if error {
        panic!("Errors found during test decoding\n {:#?}", files);
    }
}

/// Every well formed fixture must decode exactly like an independent decoder
#[test]
fn test_matches_reference_decoder() {
    let names: BTreeSet<String> = load_entries("qoi.json")
        .into_iter()
        .filter(|entry| entry.error.is_none())
        .map(|entry| entry.name)
        .collect();

    assert!(!names.is_empty());

    for name in names {
        let data = read(qoi_path().join(&name)).unwrap();

        let (qoi, reference) = rapid_qoi::Qoi::decode_alloc(&data).unwrap();
        let ours = decode(&data, &DecodeParams::default()).unwrap();

        assert_eq!((ours.header.width, ours.header.height), (qoi.width, qoi.height));
        assert!(ours.data == reference, "{name} differs from reference decoder");
    }
}

/// Cutting the stream anywhere before its last opcode never succeeds
#[test]
fn test_truncation_is_reported() {
    let data = read(qoi_path().join("skybox_8.qoi")).unwrap();
    // drop the end marker, the stream proper is everything left
    let stream_end = data.len() - 8;

    assert!(decode(&data[..stream_end], &DecodeParams::default()).is_ok());

    for end in 14..stream_end {
        match decode(&data[..end], &DecodeParams::default()) {
            Err(FormatError::IncompleteImage { decoded, expected }) => {
                assert_eq!(expected, 8 * 48);
                assert!(decoded < expected);
            }
            other => panic!("cut at {end} gave {other:?}"),
        }
    }
}

/// Arbitrary opcode streams may fail but must never panic or overrun
#[test]
fn test_random_streams() {
    let mut rng = WyRand::new_seed(0x5eed);

    for _ in 0..2000 {
        let width: u32 = rng.generate_range(1_u32..=24);
        let height: u32 = rng.generate_range(1_u32..=24);
        let channels = if rng.generate::<u8>() & 1 == 0 { 3 } else { 4 };

        let mut data = Vec::from(*b"qoif");
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&[channels, 0]);

        let stream_len = rng.generate_range(0_usize..512);
        data.extend((0..stream_len).map(|_| rng.generate::<u8>()));

        let params = DecodeParams::new()
            .set_flip_x(rng.generate::<u8>() & 1 == 1)
            .set_flip_y(rng.generate::<u8>() & 1 == 1);

        match decode(&data, &params) {
            Ok(image) => {
                assert_eq!(
                    image.data.len(),
                    width as usize * height as usize * usize::from(channels)
                );
            }
            Err(FormatError::IncompleteImage { decoded, expected }) => {
                assert!(decoded < expected);
            }
            Err(e) => panic!("unexpected error {e:?}"),
        }
    }
}

/// Decoding into a shared buffer gives the same bytes as a fresh allocation
#[test]
fn test_reused_buffer_matches_fresh_decode() {
    let mut buffer = vec![0xAA; 8 * 48 * 4 + 16];

    for name in ["skybox_8.qoi", "gradient_rgb.qoi", "quad.qoi"] {
        let data = read(qoi_path().join(name)).unwrap();
        let params = DecodeParams::new()
            .set_output_channels(QoiChannels::Rgba)
            .set_flip_y(true);

        let fresh = decode(&data, &params).unwrap();
        let info = decode_into(&data, &params, &mut buffer).unwrap();

        assert_eq!(info.data_len(), fresh.data.len());
        assert!(buffer[..info.data_len()] == fresh.data[..], "{name}");
    }
}

#[test]
fn test_skybox_atlas_fixture() {
    let data = read(qoi_path().join("skybox_8.qoi")).unwrap();
    let expected = read(qoi_path().join("skybox_8.rgba")).unwrap();

    let mut atlas = SkyboxAtlas::new();
    atlas.update(&data).unwrap();

    assert_eq!(atlas.data(), &expected[..]);
    // face one is a single solid color
    assert!(atlas
        .face(1)
        .unwrap()
        .chunks_exact(4)
        .all(|px| px == [200_u8, 30, 30, 255]));

    let mut face = Vec::new();
    atlas.copy_face_flipped(0, &mut face).unwrap();
    let row = 8 * 4;
    // last row of the stored face is the first row uploaded
    assert_eq!(face[..row], expected[7 * row..8 * row]);
}

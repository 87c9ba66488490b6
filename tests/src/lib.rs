/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(unused_imports, unused)]

use std::fs::read;
use std::path::{Path, PathBuf};

use qoi_atlas::{DecodeParams, FormatError, QoiChannels};
use serde::Deserialize;

mod qoi;

/// Failure a fixture is expected to produce
#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JsonError {
    Magic,
    Incomplete
}

impl JsonError {
    pub fn matches(self, err: &FormatError) -> bool {
        match self {
            Self::Magic => matches!(err, FormatError::BadMagic),
            Self::Incomplete => matches!(err, FormatError::IncompleteImage { .. })
        }
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct TestEntry {
    pub name:     String,
    /// Raw pixels the decode must produce
    pub expected: Option<String>,
    pub width:    usize,
    pub height:   usize,
    pub channels: u8,
    #[serde(default)]
    pub flip_x:   bool,
    #[serde(default)]
    pub flip_y:   bool,
    pub error:    Option<JsonError>,
    pub comment:  Option<String>
}

impl TestEntry {
    pub fn params(&self) -> DecodeParams {
        let channels = match self.channels {
            3 => QoiChannels::Rgb,
            4 => QoiChannels::Rgba,
            c => panic!("fixture {} has invalid channel count {c}", self.name)
        };
        DecodeParams::new()
            .set_output_channels(channels)
            .set_flip_x(self.flip_x)
            .set_flip_y(self.flip_y)
    }
}

pub fn sample_path() -> PathBuf {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"));
    // get parent path
    path.parent().unwrap().to_owned()
}

pub fn qoi_path() -> PathBuf {
    sample_path().join("test-images/qoi")
}

pub fn load_entries(json: &str) -> Vec<TestEntry> {
    let file = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join(json);
    let json_file = read(file).unwrap();

    serde_json::from_slice(&json_file).unwrap()
}

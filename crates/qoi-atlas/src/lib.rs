/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Decoding Quite Ok Image textures straight into their final layout
//!
//! [Format Specification](https://qoiformat.org/qoi-specification.pdf)
//!
//! The decoder writes every pixel directly to its destination, optionally
//! mirrored on either axis and with 3 or 4 channels regardless of what the
//! file stores, so a texture can land in a reusable upload buffer without
//! a second pass.
//!
//! # Features
//! - Decoding only
//! - Caller owned output buffers and a reusable [`SkyboxAtlas`]
//! - `no_std`
//! - Fuzz tested
//!
//! # Example
//! ```
//! use qoi_atlas::{decode, parse_header, DecodeParams, QoiChannels};
//!
//! let bytes = [
//!     b'q', b'o', b'i', b'f', 0, 0, 0, 2, 0, 0, 0, 1, 3, 0, // 2x1 RGB
//!     0xfe, 10, 20, 30, // QOI_OP_RGB
//!     0xc0,             // QOI_OP_RUN, one more pixel
//! ];
//! let header = parse_header(&bytes).unwrap();
//! assert_eq!(header.channels, QoiChannels::Rgb);
//!
//! let params = DecodeParams::new().set_output_channels(QoiChannels::Rgba);
//! let image = decode(&bytes, &params).unwrap();
//! assert_eq!(image.data, [10, 20, 30, 255, 10, 20, 30, 255]);
//! ```
//!
//! ## `no_std`
//! You can use `no_std` with alloc feature to compile for `no_std` endpoints

#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]
extern crate alloc;
extern crate core;

pub use atlas::*;
pub use decoder::*;
pub use errors::*;
pub use header::*;
pub use options::*;
pub use zune_core;

mod atlas;
mod constants;
mod decoder;
mod errors;
mod header;
mod options;
mod writer;

pub use constants::MAX_PIXELS;

/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during decoding.
use core::fmt::{Debug, Display, Formatter};

/// Possible errors that may occur during decoding
///
/// Every error is terminal for the call that produced it, the decoder
/// never retries and never hands back a partially filled buffer as success.
#[derive(Clone, Eq, PartialEq)]
pub enum FormatError {
    /// The image does not start with QOI magic bytes `qoif`
    ///
    /// Indicates that image is not a qoi file
    BadMagic,
    /// The input is shorter than the fixed size header
    ///
    /// # Arguments
    /// - 1st argument is the number of bytes we expected
    /// - 2nd argument is number of bytes actually present
    TruncatedHeader(usize, usize),
    /// The requested byte window does not fit inside the input
    InvalidByteRange {
        offset:    usize,
        length:    usize,
        available: usize
    },
    /// Width and height describe more pixels than the decoder
    /// is willing to allocate for
    ///
    /// # Arguments
    /// - 1st argument is the image width
    /// - 2nd argument is the image height
    InvalidDimensions(u32, u32),
    /// The header contains an invalid channel number
    ///
    /// The only supported types are `3` and `4`
    InvalidChannels(u8),
    /// The header contains an invalid colorspace value
    ///
    /// The should be `0` or `1`
    InvalidColorspace(u8),
    /// Too small output buffer
    ///
    /// # Arguments
    /// - 1st argument is the number of bytes needed
    /// - 2nd argument is the length of the buffer we were given
    OutputBufferTooSmall(usize, usize),
    /// The opcode stream ran out before every pixel was produced
    IncompleteImage { decoded: usize, expected: usize },
    /// The stream does not end with the 8 byte end marker.
    ///
    /// Only reported in strict mode
    InvalidEndMarker,
    /// The image is not six square faces stacked vertically
    InvalidAtlasLayout(u32, u32),
    /// A cube face index outside `0..6`
    FaceOutOfRange(usize)
}

impl Debug for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            FormatError::BadMagic => {
                writeln!(f, "Wrong magic bytes, expected `qoif` as image start")
            }
            FormatError::TruncatedHeader(expected, found) => {
                writeln!(
                    f,
                    "Insufficient data for header, required {expected} bytes but input has {found}"
                )
            }
            FormatError::InvalidByteRange {
                offset,
                length,
                available
            } => {
                writeln!(
                    f,
                    "Byte range {offset}..{offset}+{length} is outside the {available} byte input"
                )
            }
            FormatError::InvalidDimensions(width, height) => {
                writeln!(f, "Invalid image dimensions {width} x {height}")
            }
            FormatError::InvalidChannels(channel) => {
                writeln!(
                    f,
                    "Unknown channel number {channel}, expected either 3 or 4"
                )
            }
            FormatError::InvalidColorspace(colorspace) => {
                writeln!(
                    f,
                    "Unknown colorspace number {colorspace}, expected either 0 or 1"
                )
            }
            FormatError::OutputBufferTooSmall(expected, found) => {
                writeln!(
                    f,
                    "Too small output size, expected {expected}, but found {found}"
                )
            }
            FormatError::IncompleteImage { decoded, expected } => {
                writeln!(
                    f,
                    "Incomplete image, stream ended after {decoded} of {expected} pixels"
                )
            }
            FormatError::InvalidEndMarker => {
                writeln!(f, "Last bytes do not match QOI end marker")
            }
            FormatError::InvalidAtlasLayout(width, height) => {
                writeln!(
                    f,
                    "Image of {width} x {height} is not six square faces stacked vertically"
                )
            }
            FormatError::FaceOutOfRange(index) => {
                writeln!(f, "Cube face {index} out of range, expected 0..6")
            }
        }
    }
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FormatError {}

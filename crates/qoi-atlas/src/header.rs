/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! QOI header parsing
use zune_core::bytestream::ZByteReader;
use zune_core::colorspace::ColorSpace;
use zune_core::log::trace;

use crate::constants::{MAX_PIXELS, QOI_HEADER_SIZE, QOI_MAGIC};
use crate::errors::FormatError;

/// Number of interleaved channels per pixel
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum QoiChannels {
    Rgb = 3,
    Rgba = 4
}

impl QoiChannels {
    /// Map the header byte to a channel layout
    pub const fn from_u8(value: u8) -> Option<QoiChannels> {
        match value {
            3 => Some(QoiChannels::Rgb),
            4 => Some(QoiChannels::Rgba),
            _ => None
        }
    }
    /// Number of bytes a single pixel occupies
    pub const fn num_components(self) -> usize {
        self as usize
    }
    pub const fn to_colorspace(self) -> ColorSpace {
        match self {
            QoiChannels::Rgb => ColorSpace::RGB,
            QoiChannels::Rgba => ColorSpace::RGBA
        }
    }
}

/// Colorspace tag carried in the header.
///
/// Purely informative, the decoder never converts between the two
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum QoiColorspace {
    /// sRGB color channels with linear alpha
    sRGB = 0,
    /// All channels linear
    Linear = 1
}

impl QoiColorspace {
    pub const fn from_u8(value: u8) -> Option<QoiColorspace> {
        match value {
            0 => Some(QoiColorspace::sRGB),
            1 => Some(QoiColorspace::Linear),
            _ => None
        }
    }
}

/// The 14 byte header at the start of every QOI image
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct QoiHeader {
    pub width:      u32,
    pub height:     u32,
    pub channels:   QoiChannels,
    pub colorspace: QoiColorspace
}

impl QoiHeader {
    /// Number of pixels the opcode stream has to produce
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
    /// Number of bytes needed to hold the image with `channels`
    /// bytes per pixel
    pub const fn output_size(&self, channels: QoiChannels) -> usize {
        self.pixel_count() * channels.num_components()
    }
}

/// Parse and validate the header at the start of `data`
///
/// This does not look at the opcode stream, it is meant to be
/// used to size (or decide whether to reuse) an output buffer
/// before committing to a full decode.
///
/// # Errors
/// - [`FormatError::TruncatedHeader`] if `data` is shorter than 14 bytes
/// - [`FormatError::BadMagic`] if the image doesn't start with `qoif`
/// - [`FormatError::InvalidDimensions`] if `width*height` is above 4096*4096
/// - [`FormatError::InvalidChannels`], [`FormatError::InvalidColorspace`] for
///   out of range header bytes
///
/// # Example
/// ```
/// use qoi_atlas::{parse_header, QoiChannels};
///
/// let bytes = [b'q', b'o', b'i', b'f', 0, 0, 0, 2, 0, 0, 0, 2, 4, 0];
/// let header = parse_header(&bytes).unwrap();
/// assert_eq!((header.width, header.height), (2, 2));
/// assert_eq!(header.channels, QoiChannels::Rgba);
/// ```
pub fn parse_header(data: &[u8]) -> Result<QoiHeader, FormatError> {
    let mut stream = ZByteReader::new(data);

    if !stream.has(QOI_HEADER_SIZE) {
        return Err(FormatError::TruncatedHeader(
            QOI_HEADER_SIZE,
            stream.remaining()
        ));
    }
    // these were confirmed to be inbounds by has so use the non failing
    // routines
    let magic = stream.get_fixed_bytes_or_zero::<4>();

    if magic != QOI_MAGIC {
        return Err(FormatError::BadMagic);
    }
    let width = stream.get_u32_be();
    let height = stream.get_u32_be();
    let channels = stream.get_u8();
    let colorspace = stream.get_u8();

    if u64::from(width) * u64::from(height) > MAX_PIXELS {
        return Err(FormatError::InvalidDimensions(width, height));
    }
    let channels = QoiChannels::from_u8(channels).ok_or(FormatError::InvalidChannels(channels))?;
    let colorspace =
        QoiColorspace::from_u8(colorspace).ok_or(FormatError::InvalidColorspace(colorspace))?;

    trace!("Image width: {:?}", width);
    trace!("Image height: {:?}", height);
    trace!("Image channels: {:?}", channels);

    Ok(QoiHeader {
        width,
        height,
        channels,
        colorspace
    })
}

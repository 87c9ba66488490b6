/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(clippy::identity_op)]

use alloc::vec;
use alloc::vec::Vec;

use zune_core::bit_depth::BitDepth;
use zune_core::bytestream::ZByteReader;
use zune_core::colorspace::ColorSpace;
use zune_core::log::trace;

use crate::constants::{
    QOI_CACHE_SIZE, QOI_END_MARKER, QOI_HEADER_SIZE, QOI_MASK_2, QOI_OP_DIFF, QOI_OP_INDEX,
    QOI_OP_LUMA, QOI_OP_RGB, QOI_OP_RGBA, QOI_OP_RUN
};
use crate::errors::FormatError;
use crate::header::{parse_header, QoiChannels, QoiHeader};
use crate::options::DecodeParams;
use crate::writer::OutputWriter;

/// A fully decoded image owning its pixels
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodedImage {
    /// The header as stored in the file
    pub header:   QoiHeader,
    /// Channels per pixel in `data`, may differ from `header.channels`
    pub channels: QoiChannels,
    /// Exactly `width*height*channels` bytes
    pub data:     Vec<u8>
}

impl DecodedImage {
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.header.width as usize, self.header.height as usize)
    }
    pub const fn colorspace(&self) -> ColorSpace {
        self.channels.to_colorspace()
    }
}

/// Result of decoding into a caller supplied buffer
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DecodedInfo {
    pub header:   QoiHeader,
    pub channels: QoiChannels
}

impl DecodedInfo {
    /// Number of leading bytes of the output buffer that hold pixels
    pub const fn data_len(&self) -> usize {
        self.header.output_size(self.channels)
    }
}

/// A Quite OK Image decoder
///
/// The decoder is initialized by calling `new`
/// and either of [`decode_headers`] to decode headers
/// or [`decode`] to return uncompressed pixels
///
/// Additional methods are provided that give more
/// details of the compressed image like width and height
/// are accessible after decoding headers
///
/// The decoder keeps no state between images, a new one is
/// created for every input.
///
/// [`decode_headers`]:QoiDecoder::decode_headers
/// [`decode`]:QoiDecoder::decode
pub struct QoiDecoder<'a> {
    data:   &'a [u8],
    params: DecodeParams,
    header: Option<QoiHeader>
}

impl<'a> QoiDecoder<'a> {
    /// Create a new QOI format decoder with the default parameters
    ///
    /// # Example
    ///
    /// ```no_run
    /// let mut decoder = qoi_atlas::QoiDecoder::new(&[]);
    /// // additional code
    /// ```
    pub fn new(data: &'a [u8]) -> QoiDecoder<'a> {
        QoiDecoder::new_with_params(data, DecodeParams::default())
    }

    /// Create a new QOI format decoder that writes pixels the way
    /// `params` describe
    ///
    /// # Example
    /// ```
    /// use qoi_atlas::{DecodeParams, QoiChannels, QoiDecoder};
    ///
    /// let params = DecodeParams::new().set_output_channels(QoiChannels::Rgba);
    /// let mut decoder = QoiDecoder::new_with_params(&[], params);
    /// ```
    pub fn new_with_params(data: &'a [u8], params: DecodeParams) -> QoiDecoder<'a> {
        QoiDecoder {
            data,
            params,
            header: None
        }
    }

    /// Decode a QOI header storing needed information into
    /// the decoder instance
    ///
    /// On top of [`parse_header`] this honours the byte window and
    /// the width/height limits set in the parameters
    ///
    /// [`parse_header`]:crate::parse_header
    pub fn decode_headers(&mut self) -> Result<(), FormatError> {
        let window = self.params.window(self.data)?;
        let header = parse_header(window)?;

        let (max_width, max_height) = self.params.max_dimensions();

        if header.width as usize > max_width || header.height as usize > max_height {
            return Err(FormatError::InvalidDimensions(header.width, header.height));
        }
        self.header = Some(header);

        Ok(())
    }

    /// Return the number of bytes required to hold a decoded image frame
    /// with the configured output channels
    ///
    /// # Returns
    ///  - `Some(usize)`: Minimum size for a buffer needed to decode the image
    ///  - `None`: Indicates the headers were not decoded.
    pub fn output_buffer_size(&self) -> Option<usize> {
        self.header
            .map(|header| header.output_size(self.params.output_channels(&header)))
    }

    /// Decode the image, returning the uncompressed bytes
    /// in a freshly allocated buffer
    pub fn decode(&mut self) -> Result<Vec<u8>, FormatError> {
        let header = self.decoded_header()?;
        let mut output = vec![0; header.output_size(self.params.output_channels(&header))];

        self.decode_into(&mut output)?;

        Ok(output)
    }

    /// Decode a compressed Qoi image and store the contents
    /// into the output buffer
    ///
    /// Only the first [`output_buffer_size`] bytes are written,
    /// anything after that is left untouched.
    ///
    /// # Errors
    /// [`FormatError::OutputBufferTooSmall`] if the buffer cannot hold the image,
    /// otherwise any header or stream error
    ///
    /// [`output_buffer_size`]:Self::output_buffer_size
    pub fn decode_into(&mut self, pixels: &mut [u8]) -> Result<(), FormatError> {
        let header = self.decoded_header()?;
        let channels = self.params.output_channels(&header);
        let expected = header.output_size(channels);

        if pixels.len() < expected {
            return Err(FormatError::OutputBufferTooSmall(expected, pixels.len()));
        }
        let window = self.params.window(self.data)?;

        let mut writer = OutputWriter::new(
            pixels,
            header.width as usize,
            header.height as usize,
            channels.num_components(),
            self.params.flip_x(),
            self.params.flip_y()
        );
        decode_opcodes(
            &window[QOI_HEADER_SIZE..],
            header.pixel_count(),
            &mut writer,
            self.params.strict_mode()
        )?;

        trace!("Finished decoding image");

        Ok(())
    }

    fn decoded_header(&mut self) -> Result<QoiHeader, FormatError> {
        if self.header.is_none() {
            self.decode_headers()?;
        }
        self.header.ok_or(FormatError::TruncatedHeader(QOI_HEADER_SIZE, 0))
    }

    /// Return the header, or none if it hasn't been decoded
    pub const fn header(&self) -> Option<QoiHeader> {
        self.header
    }

    /// Returns the colorspace of the output, or none if headers
    /// haven't been decoded
    ///
    /// This follows the requested output channels rather than the
    /// header, so an RGB image decoded with four output channels
    /// reports [RGBA]
    ///
    /// [RGBA]: zune_core::colorspace::ColorSpace::RGBA
    pub fn colorspace(&self) -> Option<ColorSpace> {
        self.header
            .map(|header| self.params.output_channels(&header).to_colorspace())
    }

    /// Return QOI default bit depth
    ///
    /// This is always 8
    pub const fn bit_depth(&self) -> BitDepth {
        BitDepth::Eight
    }

    /// Return the width and height of the image
    ///
    /// Or none if the headers haven't been decoded
    pub const fn dimensions(&self) -> Option<(usize, usize)> {
        match self.header {
            Some(header) => Some((header.width as usize, header.height as usize)),
            None => None
        }
    }
}

/// Decode a QOI image into a newly allocated buffer
///
/// # Example
/// ```
/// use qoi_atlas::{decode, DecodeParams};
///
/// // a single red pixel
/// let bytes = [
///     b'q', b'o', b'i', b'f', 0, 0, 0, 1, 0, 0, 0, 1, 4, 0, // header
///     0xfe, 255, 0, 0, // QOI_OP_RGB
/// ];
/// let image = decode(&bytes, &DecodeParams::default()).unwrap();
/// assert_eq!(image.data, [255, 0, 0, 255]);
/// ```
pub fn decode(data: &[u8], params: &DecodeParams) -> Result<DecodedImage, FormatError> {
    let mut decoder = QoiDecoder::new_with_params(data, *params);
    let pixels = decoder.decode()?;
    let header = decoder.decoded_header()?;

    Ok(DecodedImage {
        header,
        channels: params.output_channels(&header),
        data: pixels
    })
}

/// Decode a QOI image into `output`, typically a buffer reused
/// across many calls
///
/// `output` must hold at least `width*height*channels` bytes,
/// [`parse_header`] can be used to check that before calling this.
///
/// [`parse_header`]:crate::parse_header
pub fn decode_into(
    data: &[u8], params: &DecodeParams, output: &mut [u8]
) -> Result<DecodedInfo, FormatError> {
    let mut decoder = QoiDecoder::new_with_params(data, *params);
    decoder.decode_into(output)?;
    let header = decoder.decoded_header()?;

    Ok(DecodedInfo {
        header,
        channels: params.output_channels(&header)
    })
}

#[inline(always)]
fn color_hash(px: [u8; 4]) -> usize {
    let [r, g, b, a] = px.map(usize::from);

    (r * 3 + g * 5 + b * 7 + a * 11) % QOI_CACHE_SIZE
}

/// Run the opcode state machine over `stream`, handing each of the
/// `pixel_count` pixels to `writer` as soon as it is known.
fn decode_opcodes(
    stream: &[u8], pixel_count: usize, writer: &mut OutputWriter, strict: bool
) -> Result<(), FormatError> {
    let mut stream = ZByteReader::new(stream);

    let mut index = [[0_u8; 4]; QOI_CACHE_SIZE];
    // starting pixel
    let mut px = [0, 0, 0, 255];

    let mut run = 0;

    let incomplete = |decoded: usize| FormatError::IncompleteImage {
        decoded,
        expected: pixel_count
    };

    for decoded in 0..pixel_count {
        if run > 0 {
            run -= 1;
        } else {
            if !stream.has(1) {
                return Err(incomplete(decoded));
            }
            let chunk = stream.get_u8();

            if chunk == QOI_OP_RGB {
                if !stream.has(3) {
                    return Err(incomplete(decoded));
                }
                let packed_bytes = stream.get_fixed_bytes_or_zero::<3>();

                px[0] = packed_bytes[0];
                px[1] = packed_bytes[1];
                px[2] = packed_bytes[2];
            } else if chunk == QOI_OP_RGBA {
                if !stream.has(4) {
                    return Err(incomplete(decoded));
                }
                px = stream.get_fixed_bytes_or_zero::<4>();
            } else {
                match chunk & QOI_MASK_2 {
                    QOI_OP_INDEX => {
                        px = index[usize::from(chunk)];
                    }
                    QOI_OP_DIFF => {
                        px[0] = px[0].wrapping_add(((chunk >> 4) & 0x03).wrapping_sub(2));
                        px[1] = px[1].wrapping_add(((chunk >> 2) & 0x03).wrapping_sub(2));
                        px[2] = px[2].wrapping_add(((chunk >> 0) & 0x03).wrapping_sub(2));
                    }
                    QOI_OP_LUMA => {
                        if !stream.has(1) {
                            return Err(incomplete(decoded));
                        }
                        let b2 = stream.get_u8();
                        let vg = (chunk & 0x3f).wrapping_sub(32);

                        px[0] = px[0].wrapping_add(vg.wrapping_sub(8).wrapping_add((b2 >> 4) & 0x0f));
                        px[1] = px[1].wrapping_add(vg);
                        px[2] = px[2].wrapping_add(vg.wrapping_sub(8).wrapping_add((b2 >> 0) & 0x0f));
                    }
                    QOI_OP_RUN => {
                        // the current pixel is the first of run+1 repeats
                        run = usize::from(chunk & 0x3f);
                    }
                    _ => unreachable!()
                }
            }
            index[color_hash(px)] = px;
        }
        writer.write(px);
    }

    if strict {
        if !stream.has(QOI_END_MARKER.len()) {
            return Err(FormatError::InvalidEndMarker);
        }
        let marker = stream.get_fixed_bytes_or_zero::<8>();

        if marker != QOI_END_MARKER {
            return Err(FormatError::InvalidEndMarker);
        }
    }

    Ok(())
}

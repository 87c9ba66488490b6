/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Per call decoding parameters
use zune_core::options::DecoderOptions;

use crate::errors::FormatError;
use crate::header::{QoiChannels, QoiHeader};

/// Parameters controlling a single decode call
///
/// All fields are optional, the defaults decode the whole input
/// with the channel count stored in the header and no mirroring.
///
/// # Example
/// ```
/// use qoi_atlas::{DecodeParams, QoiChannels};
///
/// // force RGBA output, rows written bottom to top
/// let params = DecodeParams::new()
///     .set_output_channels(QoiChannels::Rgba)
///     .set_flip_y(true);
/// assert!(params.flip_y());
/// ```
#[derive(Copy, Clone, Debug)]
pub struct DecodeParams {
    byte_offset:     usize,
    byte_length:     Option<usize>,
    output_channels: Option<QoiChannels>,
    flip_x:          bool,
    flip_y:          bool,
    options:         Option<DecoderOptions>
}

impl Default for DecodeParams {
    fn default() -> Self {
        DecodeParams {
            byte_offset:     0,
            byte_length:     None,
            output_channels: None,
            flip_x:          false,
            flip_y:          false,
            options:         None
        }
    }
}

impl DecodeParams {
    pub fn new() -> DecodeParams {
        DecodeParams::default()
    }
    /// Start reading the image `offset` bytes into the input
    pub fn set_byte_offset(mut self, offset: usize) -> Self {
        self.byte_offset = offset;
        self
    }
    /// Only consider `length` bytes starting at the byte offset
    ///
    /// Defaults to the rest of the input
    pub fn set_byte_length(mut self, length: usize) -> Self {
        self.byte_length = Some(length);
        self
    }
    /// Number of channels to write per pixel, independent of what
    /// the header says
    pub fn set_output_channels(mut self, channels: QoiChannels) -> Self {
        self.output_channels = Some(channels);
        self
    }
    /// Mirror the image around its vertical axis while writing
    pub fn set_flip_x(mut self, yes: bool) -> Self {
        self.flip_x = yes;
        self
    }
    /// Mirror the image around its horizontal axis while writing
    pub fn set_flip_y(mut self, yes: bool) -> Self {
        self.flip_y = yes;
        self
    }
    /// Set decoder limits and strictness
    ///
    /// The max width and height are honoured on top of the fixed
    /// pixel cap, strict mode additionally requires the 8 byte
    /// end marker after the last opcode.
    ///
    /// Without this call neither applies, only the pixel cap limits
    /// the image and trailing bytes are never read.
    pub fn set_decoder_options(mut self, options: DecoderOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub const fn byte_offset(&self) -> usize {
        self.byte_offset
    }
    pub const fn byte_length(&self) -> Option<usize> {
        self.byte_length
    }
    pub const fn flip_x(&self) -> bool {
        self.flip_x
    }
    pub const fn flip_y(&self) -> bool {
        self.flip_y
    }
    pub const fn decoder_options(&self) -> Option<&DecoderOptions> {
        self.options.as_ref()
    }
    /// The channel count the output will have for an image with `header`
    pub fn output_channels(&self, header: &QoiHeader) -> QoiChannels {
        self.output_channels.unwrap_or(header.channels)
    }

    /// Largest width and height accepted on top of the pixel cap
    pub(crate) fn max_dimensions(&self) -> (usize, usize) {
        match &self.options {
            Some(options) => (options.get_max_width(), options.get_max_height()),
            None => (usize::MAX, usize::MAX)
        }
    }

    /// Whether the end marker must follow the last opcode
    pub(crate) fn strict_mode(&self) -> bool {
        self.options
            .as_ref()
            .map_or(false, |options| options.get_strict_mode())
    }

    /// Narrow `data` to the configured byte window
    pub(crate) fn window<'a>(&self, data: &'a [u8]) -> Result<&'a [u8], FormatError> {
        let available = data.len();
        let offset = self.byte_offset;
        let length = match self.byte_length {
            Some(length) => length,
            None => available.saturating_sub(offset)
        };
        let end = offset.checked_add(length);

        match end {
            Some(end) if end <= available => Ok(&data[offset..end]),
            _ => Err(FormatError::InvalidByteRange {
                offset,
                length,
                available
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::QoiColorspace;

    #[test]
    fn default_window_is_whole_input() {
        let data = [1_u8, 2, 3, 4];
        let params = DecodeParams::new();
        assert_eq!(params.window(&data).unwrap(), &data);
    }

    #[test]
    fn window_honours_offset_and_length() {
        let data = [1_u8, 2, 3, 4, 5];
        let params = DecodeParams::new().set_byte_offset(1).set_byte_length(3);
        assert_eq!(params.window(&data).unwrap(), &[2, 3, 4]);

        let params = DecodeParams::new().set_byte_offset(2);
        assert_eq!(params.window(&data).unwrap(), &[3, 4, 5]);
    }

    #[test]
    fn window_outside_input_fails() {
        let data = [0_u8; 4];
        let params = DecodeParams::new().set_byte_offset(2).set_byte_length(3);
        assert_eq!(
            params.window(&data),
            Err(FormatError::InvalidByteRange {
                offset:    2,
                length:    3,
                available: 4
            })
        );
        let params = DecodeParams::new().set_byte_offset(9);
        assert!(params.window(&data).is_err());
    }

    #[test]
    fn defaults_add_no_limits() {
        let params = DecodeParams::default();

        assert!(params.decoder_options().is_none());
        assert!(!params.strict_mode());
        assert_eq!(params.max_dimensions(), (usize::MAX, usize::MAX));
    }

    #[test]
    fn explicit_options_are_honoured() {
        let options = DecoderOptions::default()
            .set_max_width(10)
            .set_max_height(20)
            .set_strict_mode(true);
        let params = DecodeParams::new().set_decoder_options(options);

        assert!(params.strict_mode());
        assert_eq!(params.max_dimensions(), (10, 20));

        let lenient = DecodeParams::new()
            .set_decoder_options(DecoderOptions::default().set_strict_mode(false));
        assert!(!lenient.strict_mode());
    }

    #[test]
    fn output_channels_default_to_header() {
        let header = QoiHeader {
            width:      1,
            height:     1,
            channels:   QoiChannels::Rgb,
            colorspace: QoiColorspace::Linear
        };
        assert_eq!(DecodeParams::new().output_channels(&header), QoiChannels::Rgb);
        assert_eq!(
            DecodeParams::new()
                .set_output_channels(QoiChannels::Rgba)
                .output_channels(&header),
            QoiChannels::Rgba
        );
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Placement of decoded pixels into the output buffer
//!
//! Pixels arrive in encode order (top to bottom, left to right),
//! the writer maps each one straight to its final position so that
//! mirroring costs nothing on top of decoding.
//!
//!```text
//! flip_x          flip_y          flip_x + flip_y
//! ┌─────┐         ┌─────┐         ┌─────┐
//! │ B A │         │ C D │         │ D C │
//! │ D C │         │ A B │         │ B A │
//! └─────┘         └─────┘         └─────┘
//!```

/// Writes pixels in encode order into a possibly mirrored layout.
///
/// Offsets are signed since mirrored layouts walk the buffer
/// backwards.
pub(crate) struct OutputWriter<'a> {
    output:      &'a mut [u8],
    channels:    usize,
    width:       usize,
    // first byte of the current destination row
    row_start:   isize,
    row_step:    isize,
    // offset of the first pixel written in a row, relative to row_start
    column_base: isize,
    pixel_step:  isize,
    position:    isize,
    column:      usize
}

impl<'a> OutputWriter<'a> {
    /// Create a writer for a `width` x `height` image
    ///
    /// `output` must hold at least `width*height*channels` bytes.
    pub(crate) fn new(
        output: &'a mut [u8], width: usize, height: usize, channels: usize, flip_x: bool,
        flip_y: bool
    ) -> OutputWriter<'a> {
        debug_assert!(channels == 3 || channels == 4);
        debug_assert!(output.len() >= width * height * channels);

        let stride = (width * channels) as isize;

        let (row_start, row_step) = if flip_y {
            (height.saturating_sub(1) as isize * stride, -stride)
        } else {
            (0, stride)
        };
        let (column_base, pixel_step) = if flip_x {
            (
                width.saturating_sub(1) as isize * channels as isize,
                -(channels as isize)
            )
        } else {
            (0, channels as isize)
        };

        OutputWriter {
            output,
            channels,
            width,
            row_start,
            row_step,
            column_base,
            pixel_step,
            position: row_start + column_base,
            column: 0
        }
    }

    /// Write one RGBA pixel and advance to the next destination slot
    #[inline(always)]
    pub(crate) fn write(&mut self, px: [u8; 4]) {
        let start = self.position as usize;
        let dst = &mut self.output[start..start + self.channels];

        // alpha goes first, with three channels it lands on blue
        // and is overwritten right after
        dst[self.channels - 1] = px[3];
        dst[0] = px[0];
        dst[1] = px[1];
        dst[2] = px[2];

        self.column += 1;

        if self.column == self.width {
            self.column = 0;
            self.row_start += self.row_step;
            self.position = self.row_start + self.column_base;
        } else {
            self.position += self.pixel_step;
        }
    }
}

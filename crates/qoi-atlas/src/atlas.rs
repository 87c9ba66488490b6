/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A reusable decode target for cube map skyboxes
//!
//! Skyboxes travel as a single QOI image holding the six cube faces
//! stacked vertically, each face `width` x `width` pixels:
//!
//!```text
//! ┌───┐
//! │ 0 │
//! ├───┤
//! │ 1 │
//! ├───┤
//! │...│
//! ├───┤
//! │ 5 │
//! └───┘
//!```
//! New textures arrive repeatedly and usually share a size, so the atlas
//! keeps one backing buffer around and decodes straight into it.
use alloc::vec::Vec;
use core::slice::ChunksExact;

use zune_core::log::trace;

use crate::decoder::{decode_into, DecodedInfo};
use crate::errors::FormatError;
use crate::header::{parse_header, QoiChannels, QoiHeader};
use crate::options::DecodeParams;

/// Number of faces in a cube map
pub const CUBE_FACES: usize = 6;

/// Owner of the pixel buffer a skybox is decoded into
///
/// # Example
/// ```no_run
/// use qoi_atlas::SkyboxAtlas;
///
/// let mut atlas = SkyboxAtlas::new();
/// # let bytes:Vec<u8> = vec![];
/// match atlas.update(&bytes) {
///     Ok(_) => {
///         let mut face = vec![];
///         atlas.copy_face_flipped(0, &mut face).unwrap();
///         // upload face
///     }
///     // keep showing the previous frame
///     Err(e) => eprintln!("dropping skybox: {e}")
/// }
/// ```
pub struct SkyboxAtlas {
    params:  DecodeParams,
    buffer:  Vec<u8>,
    current: Option<DecodedInfo>
}

impl Default for SkyboxAtlas {
    fn default() -> Self {
        SkyboxAtlas::new()
    }
}

impl SkyboxAtlas {
    /// Create an empty atlas decoding to RGBA
    pub fn new() -> SkyboxAtlas {
        SkyboxAtlas::with_params(DecodeParams::new().set_output_channels(QoiChannels::Rgba))
    }

    /// Create an empty atlas decoding with `params`
    pub fn with_params(params: DecodeParams) -> SkyboxAtlas {
        SkyboxAtlas::with_buffer(params, Vec::new())
    }

    /// Create an atlas adopting an existing allocation
    ///
    /// The buffer contents are ignored until the first successful update
    pub fn with_buffer(params: DecodeParams, buffer: Vec<u8>) -> SkyboxAtlas {
        SkyboxAtlas {
            params,
            buffer,
            current: None
        }
    }

    /// Decode a new image into the atlas
    ///
    /// The backing buffer is reused when the new image needs the same
    /// number of bytes as the previous one, otherwise it is resized.
    ///
    /// On failure the atlas is left empty since its buffer may hold a
    /// partially decoded image.
    pub fn update(&mut self, data: &[u8]) -> Result<DecodedInfo, FormatError> {
        self.current = None;

        let header = parse_header(self.params.window(data)?)?;
        let needed = header.output_size(self.params.output_channels(&header));

        if self.buffer.len() != needed {
            trace!(
                "Resizing atlas buffer from {} to {} bytes",
                self.buffer.len(),
                needed
            );
            self.buffer.resize(needed, 0);
        }
        let info = decode_into(data, &self.params, &mut self.buffer)?;
        self.current = Some(info);

        Ok(info)
    }

    /// Header of the image currently held, if any
    pub fn header(&self) -> Option<QoiHeader> {
        self.current.map(|info| info.header)
    }

    /// Channels per pixel of the image currently held, if any
    pub fn channels(&self) -> Option<QoiChannels> {
        self.current.map(|info| info.channels)
    }

    pub const fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Pixels of the current image, empty if there is none
    pub fn data(&self) -> &[u8] {
        match self.current {
            Some(info) => &self.buffer[..info.data_len()],
            None => &[]
        }
    }

    /// Give back the backing buffer
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    fn face_layout(&self) -> Result<(usize, usize), FormatError> {
        let info = self.current.ok_or(FormatError::InvalidAtlasLayout(0, 0))?;
        let (width, height) = (info.header.width, info.header.height);

        if width == 0 || u64::from(height) != u64::from(width) * CUBE_FACES as u64 {
            return Err(FormatError::InvalidAtlasLayout(width, height));
        }
        let row = width as usize * info.channels.num_components();

        Ok((row, row * width as usize))
    }

    /// Bytes per cube face
    pub fn face_size(&self) -> Result<usize, FormatError> {
        self.face_layout().map(|(_, face)| face)
    }

    /// The six faces as stored in the atlas, top to bottom
    pub fn faces(&self) -> Result<ChunksExact<'_, u8>, FormatError> {
        let (_, face) = self.face_layout()?;

        Ok(self.data().chunks_exact(face))
    }

    /// Rows of face `index` as stored in the atlas
    pub fn face(&self, index: usize) -> Result<&[u8], FormatError> {
        let (_, face) = self.face_layout()?;

        if index >= CUBE_FACES {
            return Err(FormatError::FaceOutOfRange(index));
        }
        Ok(&self.data()[index * face..(index + 1) * face])
    }

    /// Copy face `index` into `out` with its rows in reverse order,
    /// the orientation cube textures expect
    ///
    /// `out` is cleared first, its allocation is reused
    pub fn copy_face_flipped(&self, index: usize, out: &mut Vec<u8>) -> Result<(), FormatError> {
        let (row, _) = self.face_layout()?;
        let face = self.face(index)?;

        out.clear();
        out.reserve(face.len());

        for line in face.chunks_exact(row).rev() {
            out.extend_from_slice(line);
        }
        Ok(())
    }
}

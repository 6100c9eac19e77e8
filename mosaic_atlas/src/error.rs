// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Errors from the layer store and font loading.
#[derive(Debug)]
pub enum AtlasError {
    /// A layer could not be encoded as PNG.
    Encode(png::EncodingError),
    /// A compressed layer could not be decoded.
    Decode(png::DecodingError),
    /// A decoded layer does not match the layer's recorded format.
    Corrupt {
        /// Layer width and height.
        expected: (u16, u16),
        /// What the stored image contained.
        found: (u32, u32),
    },
    /// Font bytes could not be parsed.
    Font(skrifa::raw::ReadError),
}

impl fmt::Display for AtlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode(e) => write!(f, "failed to compress atlas layer: {e}"),
            Self::Decode(e) => write!(f, "failed to decompress atlas layer: {e}"),
            Self::Corrupt { expected, found } => write!(
                f,
                "compressed atlas layer is {}x{}, expected {}x{} RGBA8",
                found.0, found.1, expected.0, expected.1
            ),
            Self::Font(e) => write!(f, "invalid label font: {e}"),
        }
    }
}

impl core::error::Error for AtlasError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Encode(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::Corrupt { .. } | Self::Font(_) => None,
        }
    }
}

impl From<png::EncodingError> for AtlasError {
    fn from(e: png::EncodingError) -> Self {
        Self::Encode(e)
    }
}

impl From<png::DecodingError> for AtlasError {
    fn from(e: png::DecodingError) -> Self {
        Self::Decode(e)
    }
}

impl From<skrifa::raw::ReadError> for AtlasError {
    fn from(e: skrifa::raw::ReadError) -> Self {
        Self::Font(e)
    }
}

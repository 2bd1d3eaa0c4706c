//! Per-block compression for the appended binary section.
//!
//! Codecs are compiled in behind cargo features (`zlib` via `flate2`, `lz4`
//! via `lz4_flex`). Requesting a codec that was not compiled in does **not**
//! fail the write: [`create_compressor`] returns `None` and the writer falls
//! back to uncompressed streaming output. A codec that is present but fails
//! on a block is fatal and aborts the write.

#[cfg(feature = "zlib")]
use std::io::Write as _;

/// Which codec to run the appended data blocks through.
///
/// The selected codec is recorded in the file's `compressor` root attribute
/// so readers know how to undo it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// uncompressed streaming output (the default)
    #[default]
    None,
    /// zlib streams, read back by `vtkZLibDataCompressor`
    Zlib,
    /// LZ4 block format, read back by `vtkLZ4DataCompressor`
    Lz4,
}

impl Compression {
    /// the `compressor="..."` root attribute value
    pub(crate) fn vtk_name(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Zlib => "vtkZLibDataCompressor",
            Self::Lz4 => "vtkLZ4DataCompressor",
        }
    }
}

/// A codec that shrinks one fully materialized data block.
///
/// The writer handles all framing (the four-word block header); `compress`
/// returns only the raw compressed bytes.
pub trait Compressor {
    fn compress(&self, input: &[u8]) -> std::io::Result<Vec<u8>>;
}

/// Look up the codec for `kind`, or `None` when it is not compiled in
/// (or `kind` is [`Compression::None`]).
pub(crate) fn create_compressor(kind: Compression) -> Option<Box<dyn Compressor>> {
    match kind {
        Compression::None => None,
        #[cfg(feature = "zlib")]
        Compression::Zlib => Some(Box::new(ZlibCompressor)),
        #[cfg(not(feature = "zlib"))]
        Compression::Zlib => None,
        #[cfg(feature = "lz4")]
        Compression::Lz4 => Some(Box::new(Lz4Compressor)),
        #[cfg(not(feature = "lz4"))]
        Compression::Lz4 => None,
    }
}

#[cfg(feature = "zlib")]
pub struct ZlibCompressor;

#[cfg(feature = "zlib")]
impl Compressor for ZlibCompressor {
    fn compress(&self, input: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut encoder = flate2::write::ZlibEncoder::new(
            Vec::with_capacity(input.len() / 2 + 64),
            flate2::Compression::default(),
        );
        encoder.write_all(input)?;
        encoder.finish()
    }
}

#[cfg(feature = "lz4")]
pub struct Lz4Compressor;

#[cfg(feature = "lz4")]
impl Compressor for Lz4Compressor {
    fn compress(&self, input: &[u8]) -> std::io::Result<Vec<u8>> {
        Ok(lz4_flex::block::compress(input))
    }
}

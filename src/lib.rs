#![doc = include_str!("../README.md")]

pub mod adapter;
mod compress;
pub mod prelude;
mod pvd;
mod source;
mod traits;
mod write_vtu;
mod writer;

pub use traits::DataSource;
pub use traits::Numeric;
pub use traits::Precision;

pub use source::IterSource;

pub use adapter::{flatten, project, FieldSource, FlatSource, TupleView};

pub use compress::{Compression, Compressor};
#[cfg(feature = "lz4")]
pub use compress::Lz4Compressor;
#[cfg(feature = "zlib")]
pub use compress::ZlibCompressor;

pub use writer::{ArrayBlock, CellType, VtuWriter};

pub use pvd::PvdWriter;

pub use write_vtu::write_appended_dataarray_header;

pub use ndarray;

pub use quick_xml::writer::Writer;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Could not write XML data to file: `{0}`")]
    XmlWrite(#[from] quick_xml::Error),
    #[error(
        "cell arrays must be parallel: `offsets` has {offsets} entries but `types` has {types}"
    )]
    CellSizeMismatch { offsets: usize, types: usize },
    #[error("Failed to compress an appended data block: `{0}`")]
    Compression(std::io::Error),
}

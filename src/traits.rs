//! # Traits
//!
//! The core abstractions for writing appended binary data. [`Numeric`] describes
//! the ten fixed-width element types a VTK `DataArray` may hold, and [`DataSource`]
//! is the capability every registered array exposes to the writer: report an exact
//! byte length and stream little-endian bytes into a sink.

use std::io::Write;

/// The element type names VTK understands inside a `DataArray` header.
///
/// The variant names match the `type` attribute strings written to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
}

impl Precision {
    /// the `type="..."` attribute value for this element kind
    pub fn to_str(&self) -> &'static str {
        match self {
            Self::Int8 => "Int8",
            Self::UInt8 => "UInt8",
            Self::Int16 => "Int16",
            Self::UInt16 => "UInt16",
            Self::Int32 => "Int32",
            Self::UInt32 => "UInt32",
            Self::Int64 => "Int64",
            Self::UInt64 => "UInt64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
        }
    }

    /// width of one element of this kind in bytes
    pub fn size_of(&self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }
}

/// A fixed-width machine number that can appear in a `DataArray`.
///
/// Implemented for the signed / unsigned 8-64 bit integers and both float
/// widths; nothing else can be registered with a writer.
pub trait Numeric: Copy {
    /// width of this type in bytes
    const SIZE: usize;

    /// the VTK type name for this element kind
    fn as_precision() -> Precision;

    /// append the little-endian encoding of `self` to a byte buffer
    fn extend_le_bytes(&self, buffer: &mut Vec<u8>);
}

macro_rules! numeric_impl {
    ($ty:ty, $precision:expr) => {
        impl Numeric for $ty {
            const SIZE: usize = std::mem::size_of::<$ty>();

            fn as_precision() -> Precision {
                $precision
            }

            fn extend_le_bytes(&self, buffer: &mut Vec<u8>) {
                buffer.extend_from_slice(&self.to_le_bytes());
            }
        }
    };
}

numeric_impl!(i8, Precision::Int8);
numeric_impl!(u8, Precision::UInt8);
numeric_impl!(i16, Precision::Int16);
numeric_impl!(u16, Precision::UInt16);
numeric_impl!(i32, Precision::Int32);
numeric_impl!(u32, Precision::UInt32);
numeric_impl!(i64, Precision::Int64);
numeric_impl!(u64, Precision::UInt64);
numeric_impl!(f32, Precision::Float32);
numeric_impl!(f64, Precision::Float64);

/// A non-owning view over a sequence of numbers that can be appended to the
/// binary section of a vtu file.
///
/// A `DataSource` never owns the values it describes; it borrows them from the
/// caller for the lifetime of the [`VtuWriter`](crate::VtuWriter) it is
/// registered with. The writer relies on two guarantees:
///
/// * [`size_bytes`](DataSource::size_bytes) reports *exactly* the number of
///   bytes [`write_to`](DataSource::write_to) will emit. Declared offsets in
///   the schema section are computed from it, so a mismatch corrupts the file.
/// * [`write_to`](DataSource::write_to) emits the elements in declaration
///   order as little-endian bytes.
///
/// Contiguous slices of [`Numeric`] values implement this with a bulk copy;
/// everything else (projections, flattened views, plain iterators) goes
/// through the element-wise encoder.
pub trait DataSource {
    /// number of logical elements in the sequence
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// the element kind of the sequence
    fn precision(&self) -> Precision;

    /// exact number of payload bytes `write_to` will produce
    fn size_bytes(&self) -> u64 {
        (self.len() * self.precision().size_of()) as u64
    }

    /// stream the sequence, in order, as little-endian bytes
    fn write_to(&self, sink: &mut dyn Write) -> std::io::Result<()>;
}

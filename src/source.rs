//! [`DataSource`] implementations for caller-owned containers.
//!
//! Two strategies exist. Contiguous slices take the fast path: on a
//! little-endian host the slice memory is handed to the sink in one
//! `write_all` with no intermediate copy. Everything else is encoded
//! element by element through a bounded scratch buffer that is flushed
//! whenever it fills, so no path ever materializes a full second copy
//! of the data.

use crate::prelude::*;

/// flush threshold for the element-wise scratch buffer
pub(crate) const SCRATCH_LEN: usize = 4096;

/// little-endian encode an element stream through the bounded scratch buffer
pub(crate) fn write_elements<T: Numeric>(
    elements: impl Iterator<Item = T>,
    sink: &mut dyn Write,
) -> std::io::Result<()> {
    let mut scratch: Vec<u8> = Vec::with_capacity(SCRATCH_LEN);

    for value in elements {
        value.extend_le_bytes(&mut scratch);

        if scratch.len() >= SCRATCH_LEN {
            sink.write_all(&scratch)?;
            scratch.clear();
        }
    }

    if !scratch.is_empty() {
        sink.write_all(&scratch)?;
    }

    Ok(())
}

impl<'a, T> DataSource for &'a [T]
where
    T: Numeric,
{
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn precision(&self) -> Precision {
        T::as_precision()
    }

    fn write_to(&self, sink: &mut dyn Write) -> std::io::Result<()> {
        if cfg!(target_endian = "little") {
            // Numeric is a closed set of plain fixed-width machine scalars,
            // so the slice memory is already the wire encoding
            let bytes = unsafe {
                std::slice::from_raw_parts(self.as_ptr().cast::<u8>(), <[T]>::len(self) * T::SIZE)
            };
            sink.write_all(bytes)
        } else {
            write_elements(self.iter().copied(), sink)
        }
    }
}

impl<'a, T> DataSource for &'a Vec<T>
where
    T: Numeric,
{
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn precision(&self) -> Precision {
        T::as_precision()
    }

    fn write_to(&self, sink: &mut dyn Write) -> std::io::Result<()> {
        self.as_slice().write_to(sink)
    }
}

/// Element-wise [`DataSource`] over any cloneable iterator.
///
/// This is the escape hatch for containers without a contiguous memory
/// layout (linked structures, generators, transformed views). The iterator
/// is walked once at construction to learn the element count, then cloned
/// and walked again during the write.
///
/// ```
/// use vtu::{DataSource, IterSource};
///
/// let halved = IterSource::new((0..4u32).map(|x| x as f64 / 2.0));
/// assert_eq!(halved.len(), 4);
/// assert_eq!(halved.size_bytes(), 32);
/// ```
pub struct IterSource<I> {
    iter: I,
    len: usize,
}

impl<T, I> IterSource<I>
where
    T: Numeric,
    I: Iterator<Item = T> + Clone,
{
    pub fn new(iter: I) -> Self {
        let len = iter.clone().count();
        Self { iter, len }
    }
}

impl<T, I> DataSource for IterSource<I>
where
    T: Numeric,
    I: Iterator<Item = T> + Clone,
{
    fn len(&self) -> usize {
        self.len
    }

    fn precision(&self) -> Precision {
        T::as_precision()
    }

    fn write_to(&self, sink: &mut dyn Write) -> std::io::Result<()> {
        write_elements(self.iter.clone(), sink)
    }
}

//! Helpers for emitting the textual schema section of a vtu file.
//!
//! Everything here goes through the `quick-xml` event writer except the
//! `<AppendedData>` element: its body is raw binary, so the element is
//! opened and closed directly on the underlying byte sink.

use crate::prelude::*;
use quick_xml::events::{BytesStart, Event};

/// write the header for a data array whose payload lives in the appended
/// binary section
///
/// if you call this function you are also responsible for writing the
/// payload bytes at exactly `offset` into the appended section
#[inline]
pub fn write_appended_dataarray_header<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    offset: u64,
    components: usize,
    precision: Precision,
) -> Result<(), Error> {
    let mut header = BytesStart::new("DataArray");
    header.push_attribute(("type", precision.to_str()));
    header.push_attribute(("Name", name));
    header.push_attribute(("NumberOfComponents", components.to_string().as_str()));
    header.push_attribute(("format", "appended"));
    header.push_attribute(("offset", offset.to_string().as_str()));

    writer.write_event(Event::Empty(header))?;

    Ok(())
}

/// open the `<AppendedData>` element and write the `_` marker that starts
/// the raw binary body
pub(crate) fn appended_binary_header_start<W: Write>(
    writer: &mut Writer<W>,
) -> Result<(), std::io::Error> {
    let inner = writer.inner();
    inner.write_all(b"<AppendedData encoding=\"raw\">_")?;
    Ok(())
}

/// close the `<AppendedData>` element after the raw binary body
pub(crate) fn appended_binary_header_end<W: Write>(
    writer: &mut Writer<W>,
) -> Result<(), std::io::Error> {
    let inner = writer.inner();
    inner.write_all(b"\n</AppendedData>")?;
    Ok(())
}

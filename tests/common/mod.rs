//! Shared helpers for pulling a written document apart again: locate the raw
//! appended payload and read attributes / blocks back out of it.
#![allow(dead_code)]

/// Split a written document into its textual schema section and the raw
/// appended payload (the bytes after the `>_` marker, before
/// `</AppendedData>`).
pub fn split_document(document: &[u8]) -> (String, &[u8]) {
    let open = b"<AppendedData encoding=\"raw\">_";
    let start = find(document, open).expect("appended data section present") + open.len();

    let close = b"\n</AppendedData>";
    let end = rfind(document, close).expect("appended data section closed");
    assert!(start <= end, "appended section is malformed");

    let schema = String::from_utf8(document[..start].to_vec()).expect("schema section is utf8");
    (schema, &document[start..end])
}

/// Read the attribute `key` of the `DataArray` element named `name`.
pub fn dataarray_attr(schema: &str, name: &str, key: &str) -> String {
    let name_marker = format!("Name=\"{name}\"");
    let pos = schema
        .find(&name_marker)
        .unwrap_or_else(|| panic!("no DataArray named {name}"));

    let start = schema[..pos].rfind("<DataArray").expect("DataArray element");
    let end = start + schema[start..].find("/>").expect("element closed");
    let element = &schema[start..end];

    let key_marker = format!("{key}=\"");
    let value_start = element
        .find(&key_marker)
        .unwrap_or_else(|| panic!("no attribute {key} on {name}"))
        + key_marker.len();
    let value_end = value_start + element[value_start..].find('"').expect("attribute closed");

    element[value_start..value_end].to_string()
}

/// Read one streaming-mode block: an 8 byte little-endian length prefix
/// followed by that many payload bytes.
pub fn read_stream_block(payload: &[u8], offset: usize) -> &[u8] {
    let length = u64::from_le_bytes(payload[offset..offset + 8].try_into().unwrap()) as usize;
    &payload[offset + 8..offset + 8 + length]
}

/// Read one compressed-mode block: the four `UInt64` header words followed
/// by the compressed bytes.
pub fn read_compressed_block(payload: &[u8], offset: usize) -> ([u64; 4], &[u8]) {
    let mut header = [0u64; 4];
    for (i, word) in header.iter_mut().enumerate() {
        let at = offset + i * 8;
        *word = u64::from_le_bytes(payload[at..at + 8].try_into().unwrap());
    }

    let data_start = offset + 32;
    let compressed_size = header[3] as usize;
    (header, &payload[data_start..data_start + compressed_size])
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

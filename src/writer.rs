//! The unstructured grid writer: array registration, layout planning, and
//! the two-mode appended binary encoder.
//!
//! Arrays are registered during a build phase (`set_points`, `set_cells`,
//! `add_point_data`, `add_cell_data`) and consumed by a single `write` /
//! `write_to` call. Registration assigns each array a byte offset into the
//! appended section assuming uncompressed streaming output; if a compressor
//! is active, a pre-pass compresses every block up front and rewrites the
//! offsets before any schema byte is emitted, since the schema must declare
//! final offsets and those depend on compressed sizes.

use crate::compress::{create_compressor, Compression, Compressor};
use crate::prelude::*;
use crate::write_vtu;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use std::fs;
use std::path::{Path, PathBuf};

/// streaming mode length prefix per block (`header_type="UInt64"`)
pub(crate) const STREAM_HEADER_BYTES: u64 = 8;

/// compressed mode block header: count, block size, last block size,
/// compressed size, each a `UInt64`
pub(crate) const COMPRESSED_HEADER_BYTES: u64 = 4 * 8;

/// Standard VTK cell type ids, used as the elements of the `types`
/// array passed to [`VtuWriter::set_cells`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CellType {
    Vertex = 1,
    PolyVertex = 2,
    Line = 3,
    PolyLine = 4,
    Triangle = 5,
    TriangleStrip = 6,
    Polygon = 7,
    Pixel = 8,
    Quad = 9,
    Tetra = 10,
    Voxel = 11,
    Hexahedron = 12,
    Wedge = 13,
    Pyramid = 14,
}

/// Schema-side record of one registered array: everything the `DataArray`
/// header declares about it.
///
/// Immutable after registration except for `offset`, which the compression
/// pre-pass rewrites exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayBlock {
    pub name: String,
    pub precision: Precision,
    pub components: usize,
    pub offset: u64,
}

/// where in the piece a registered array belongs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Points,
    Connectivity,
    Offsets,
    Types,
    PointData,
    CellData,
}

struct Block<'a> {
    info: ArrayBlock,
    section: Section,
    source: Box<dyn DataSource + 'a>,
}

struct CompressedBlock {
    original_size: u64,
    data: Vec<u8>,
}

/// Writer for VTK XML unstructured grid (`.vtu`) files with appended raw
/// binary data.
///
/// The writer borrows every registered array from the caller; nothing is
/// copied at registration time. Data must stay alive (and unchanged) until
/// `write` / `write_to` consumes the writer.
///
/// Arrays are laid out in the appended section in registration order, so
/// registration is expected to happen in document order: points, cells,
/// then point data and cell data. Each of `set_points` / `set_cells` is
/// meant to be called once per writer.
///
/// ```
/// use vtu::{CellType, VtuWriter};
///
/// // one tetrahedron
/// let points: Vec<f64> = vec![
///     0., 0., 0., //
///     1., 0., 0., //
///     0., 1., 0., //
///     0., 0., 1., //
/// ];
/// let connectivity: Vec<i64> = vec![0, 1, 2, 3];
/// let offsets: Vec<i64> = vec![4];
/// let types: Vec<u8> = vec![CellType::Tetra as u8];
/// let temperature: Vec<f64> = vec![0.0, 10.0, 20.0, 30.0];
///
/// let mut writer = VtuWriter::new();
/// writer.set_points(points.as_slice());
/// writer
///     .set_cells(connectivity.as_slice(), offsets.as_slice(), types.as_slice())
///     .unwrap();
/// writer.add_point_data("temperature", &temperature, 1);
///
/// let mut document = Vec::new();
/// writer.write_to(&mut document).unwrap();
/// ```
#[derive(Default)]
pub struct VtuWriter<'a> {
    blocks: Vec<Block<'a>>,
    next_offset: u64,
    compression: Compression,
    number_of_points: usize,
    number_of_cells: usize,
}

impl<'a> VtuWriter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a codec for the appended data blocks.
    ///
    /// If the requested codec was not compiled in (cargo features `zlib` /
    /// `lz4`), the write silently degrades to uncompressed streaming output
    /// instead of failing. The produced file is valid either way; only its
    /// size differs.
    pub fn set_compression(&mut self, compression: Compression) {
        self.compression = compression;
    }

    /// Register the point coordinates: `x, y, z` triplets, flattened.
    ///
    /// The point count reported in the file is `points.len() / 3`.
    pub fn set_points(&mut self, points: impl DataSource + 'a) {
        self.number_of_points = points.len() / 3;
        self.register(Box::new(points), "Points", 3, Section::Points);
    }

    /// Register the cell topology.
    ///
    /// `connectivity` holds the point indices of every cell back to back,
    /// `offsets` the end position of each cell within `connectivity`, and
    /// `types` one [`CellType`] id per cell.
    ///
    /// Fails with [`Error::CellSizeMismatch`] when `offsets` and `types`
    /// disagree in length; no array is registered in that case.
    pub fn set_cells(
        &mut self,
        connectivity: impl DataSource + 'a,
        offsets: impl DataSource + 'a,
        types: impl DataSource + 'a,
    ) -> Result<(), Error> {
        if offsets.len() != types.len() {
            return Err(Error::CellSizeMismatch {
                offsets: offsets.len(),
                types: types.len(),
            });
        }

        self.number_of_cells = types.len();

        self.register(
            Box::new(connectivity),
            "connectivity",
            1,
            Section::Connectivity,
        );
        self.register(Box::new(offsets), "offsets", 1, Section::Offsets);
        self.register(Box::new(types), "types", 1, Section::Types);

        Ok(())
    }

    /// Register a named per-point attribute array with `components` values
    /// per point.
    pub fn add_point_data(
        &mut self,
        name: &str,
        data: impl DataSource + 'a,
        components: usize,
    ) {
        self.register(Box::new(data), name, components, Section::PointData);
    }

    /// Register a named per-cell attribute array with `components` values
    /// per cell.
    pub fn add_cell_data(&mut self, name: &str, data: impl DataSource + 'a, components: usize) {
        self.register(Box::new(data), name, components, Section::CellData);
    }

    /// The registered arrays, in registration order, with their currently
    /// assigned offsets.
    pub fn blocks(&self) -> impl Iterator<Item = &ArrayBlock> {
        self.blocks.iter().map(|block| &block.info)
    }

    fn register(
        &mut self,
        source: Box<dyn DataSource + 'a>,
        name: &str,
        components: usize,
        section: Section,
    ) {
        let info = ArrayBlock {
            name: name.to_owned(),
            precision: source.precision(),
            components,
            offset: self.next_offset,
        };

        // provisional offset assuming streaming output; rewritten by the
        // compression pre-pass when a codec is active
        self.next_offset += STREAM_HEADER_BYTES + source.size_bytes();

        self.blocks.push(Block {
            info,
            section,
            source,
        });
    }

    /// Write the document to `path`.
    ///
    /// The file is staged to a sibling path and renamed into place on
    /// success, so a failing write never leaves a partial document at
    /// `path`.
    pub fn write(self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();

        let mut staging = path.as_os_str().to_os_string();
        staging.push(".partial");
        let staging = PathBuf::from(staging);

        let write_document = |writer: Self| -> Result<(), Error> {
            let file = fs::File::create(&staging)?;
            let mut buffer = std::io::BufWriter::new(file);
            writer.write_to(&mut buffer)?;
            buffer.flush()?;
            Ok(())
        };

        match write_document(self) {
            Ok(()) => {
                fs::rename(&staging, path)?;
                Ok(())
            }
            Err(error) => {
                let _ = fs::remove_file(&staging);
                Err(error)
            }
        }
    }

    /// Write the document to any byte sink, consuming the writer.
    pub fn write_to<W: Write>(mut self, sink: W) -> Result<(), Error> {
        // compression pre-pass: materialize and compress every block first
        // so the schema below can declare the final offsets
        let compressed = match create_compressor(self.compression) {
            Some(codec) => Some(self.compress_blocks(&*codec)?),
            None => None,
        };

        let mut xml = Writer::new(sink);

        let mut root = BytesStart::new("VTKFile");
        root.push_attribute(("type", "UnstructuredGrid"));
        root.push_attribute(("version", "1.0"));
        root.push_attribute(("byte_order", "LittleEndian"));
        root.push_attribute(("header_type", "UInt64"));
        if compressed.is_some() {
            root.push_attribute(("compressor", self.compression.vtk_name()));
        }
        xml.write_event(Event::Start(root))?;

        xml.write_event(Event::Start(BytesStart::new("UnstructuredGrid")))?;

        let mut piece = BytesStart::new("Piece");
        piece.push_attribute(("NumberOfPoints", self.number_of_points.to_string().as_str()));
        piece.push_attribute(("NumberOfCells", self.number_of_cells.to_string().as_str()));
        xml.write_event(Event::Start(piece))?;

        xml.write_event(Event::Start(BytesStart::new("Points")))?;
        self.write_section_headers(&mut xml, &[Section::Points])?;
        xml.write_event(Event::End(BytesEnd::new("Points")))?;

        xml.write_event(Event::Start(BytesStart::new("Cells")))?;
        self.write_section_headers(
            &mut xml,
            &[Section::Connectivity, Section::Offsets, Section::Types],
        )?;
        xml.write_event(Event::End(BytesEnd::new("Cells")))?;

        if self.has_section(Section::PointData) {
            xml.write_event(Event::Start(BytesStart::new("PointData")))?;
            self.write_section_headers(&mut xml, &[Section::PointData])?;
            xml.write_event(Event::End(BytesEnd::new("PointData")))?;
        }

        if self.has_section(Section::CellData) {
            xml.write_event(Event::Start(BytesStart::new("CellData")))?;
            self.write_section_headers(&mut xml, &[Section::CellData])?;
            xml.write_event(Event::End(BytesEnd::new("CellData")))?;
        }

        xml.write_event(Event::End(BytesEnd::new("Piece")))?;
        xml.write_event(Event::End(BytesEnd::new("UnstructuredGrid")))?;

        write_vtu::appended_binary_header_start(&mut xml)?;

        // payload blocks go out in registration order, the same order the
        // offsets above were computed in
        match &compressed {
            Some(payloads) => {
                let sink = xml.inner();
                for payload in payloads {
                    sink.write_all(&1u64.to_le_bytes())?;
                    sink.write_all(&payload.original_size.to_le_bytes())?;
                    sink.write_all(&payload.original_size.to_le_bytes())?;
                    sink.write_all(&(payload.data.len() as u64).to_le_bytes())?;
                    sink.write_all(&payload.data)?;
                }
            }
            None => {
                let sink = xml.inner();
                for block in &self.blocks {
                    sink.write_all(&block.source.size_bytes().to_le_bytes())?;
                    block.source.write_to(&mut *sink)?;
                }
            }
        }

        write_vtu::appended_binary_header_end(&mut xml)?;
        xml.write_event(Event::End(BytesEnd::new("VTKFile")))?;

        Ok(())
    }

    /// Materialize and compress every block, rewriting offsets as a running
    /// sum over the compressed sizes.
    fn compress_blocks(&mut self, codec: &dyn Compressor) -> Result<Vec<CompressedBlock>, Error> {
        let mut compressed = Vec::with_capacity(self.blocks.len());
        let mut running = 0u64;

        for block in &mut self.blocks {
            let mut raw = Vec::with_capacity(block.source.size_bytes() as usize);
            block.source.write_to(&mut raw)?;

            let data = codec.compress(&raw).map_err(Error::Compression)?;
            if data.is_empty() && !raw.is_empty() {
                return Err(Error::Compression(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "codec produced no output for a non-empty block",
                )));
            }

            block.info.offset = running;
            running += COMPRESSED_HEADER_BYTES + data.len() as u64;

            compressed.push(CompressedBlock {
                original_size: raw.len() as u64,
                data,
            });
        }

        Ok(compressed)
    }

    fn write_section_headers<W: Write>(
        &self,
        xml: &mut Writer<W>,
        sections: &[Section],
    ) -> Result<(), Error> {
        for section in sections {
            for block in self.blocks.iter().filter(|b| b.section == *section) {
                write_vtu::write_appended_dataarray_header(
                    xml,
                    &block.info.name,
                    block.info.offset,
                    block.info.components,
                    block.info.precision,
                )?;
            }
        }

        Ok(())
    }

    fn has_section(&self, section: Section) -> bool {
        self.blocks.iter().any(|block| block.section == section)
    }
}

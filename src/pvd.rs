//! ParaView collection (`.pvd`) files: an ordered list of
//! `(time, filename)` pairs pointing at the vtu file for each step.

use crate::prelude::*;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Constructor)]
struct TimeStep {
    time: f64,
    file: String,
}

/// Writer for a `.pvd` collection indexing a vtu time series.
///
/// ```no_run
/// let mut collection = vtu::PvdWriter::new("flow.pvd");
/// collection.add_step(0.0, "flow_000.vtu");
/// collection.add_step(0.1, "flow_001.vtu");
/// collection.save().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct PvdWriter {
    path: PathBuf,
    steps: Vec<TimeStep>,
}

impl PvdWriter {
    /// create a collection that will be saved to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            steps: Vec::new(),
        }
    }

    /// append a time step pointing at `file`, a path relative to the
    /// collection file
    pub fn add_step(&mut self, time: f64, file: impl Into<String>) {
        self.steps.push(TimeStep::new(time, file.into()));
    }

    /// write the collection file
    pub fn save(&self) -> Result<(), Error> {
        let file = fs::File::create(&self.path)?;
        let buffer = std::io::BufWriter::new(file);
        self.write_to(buffer)
    }

    /// write the collection document to any byte sink
    pub fn write_to<W: Write>(&self, sink: W) -> Result<(), Error> {
        let mut xml = Writer::new(sink);

        let mut root = BytesStart::new("VTKFile");
        root.push_attribute(("type", "Collection"));
        root.push_attribute(("version", "1.0"));
        root.push_attribute(("byte_order", "LittleEndian"));
        root.push_attribute(("header_type", "UInt64"));
        xml.write_event(Event::Start(root))?;

        xml.write_event(Event::Start(BytesStart::new("Collection")))?;

        for step in &self.steps {
            let mut buffer = ryu::Buffer::new();

            let mut dataset = BytesStart::new("DataSet");
            dataset.push_attribute(("timestep", buffer.format(step.time)));
            dataset.push_attribute(("group", ""));
            dataset.push_attribute(("part", "0"));
            dataset.push_attribute(("file", step.file.as_str()));
            xml.write_event(Event::Empty(dataset))?;
        }

        xml.write_event(Event::End(BytesEnd::new("Collection")))?;
        xml.write_event(Event::End(BytesEnd::new("VTKFile")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_lists_steps_in_order() {
        let mut collection = PvdWriter::new("unused.pvd");
        collection.add_step(0.0, "step_000.vtu");
        collection.add_step(0.5, "step_001.vtu");

        let mut out = Vec::new();
        collection.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with(
            "<VTKFile type=\"Collection\" version=\"1.0\" \
             byte_order=\"LittleEndian\" header_type=\"UInt64\">"
        ));
        assert!(text.ends_with("</Collection></VTKFile>"));

        let first = text.find("step_000.vtu").unwrap();
        let second = text.find("step_001.vtu").unwrap();
        assert!(first < second);

        assert!(text.contains("<DataSet timestep=\"0.5\" group=\"\" part=\"0\" file=\"step_001.vtu\"/>"));
    }
}

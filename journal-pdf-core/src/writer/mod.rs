//! Serialization of the object graph into a complete PDF 1.4 file.

mod object_graph;

pub use object_graph::ObjectGraph;

use crate::objects::{format_real, Dictionary, Object, ObjectId};
use tracing::debug;

/// Assembles numbered objects into a PDF file held in memory.
///
/// Every byte the writer emits is ASCII, so the buffer length doubles as the
/// byte offset recorded in the cross-reference table.
pub struct PdfWriter {
    buffer: String,
    xref_positions: Vec<(ObjectId, usize)>,
    current_position: usize,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            xref_positions: Vec::new(),
            current_position: 0,
        }
    }

    /// Writes header, objects, cross-reference table and trailer, and returns
    /// the finished file.
    pub fn write_document(mut self, objects: &[(ObjectId, Object)], root: ObjectId) -> String {
        self.write_header();

        for (id, object) in objects {
            self.write_object(*id, object);
        }

        let xref_position = self.current_position;
        self.write_xref();
        self.write_trailer(root, xref_position);

        debug!(
            objects = self.xref_positions.len(),
            bytes = self.buffer.len(),
            "assembled PDF document"
        );
        self.buffer
    }

    fn write_header(&mut self) {
        self.write_str("%PDF-1.4\n");
    }

    fn write_object(&mut self, id: ObjectId, object: &Object) {
        self.xref_positions.push((id, self.current_position));

        self.write_str(&format!("{} {} obj\n", id.number(), id.generation()));
        self.write_object_value(object);
        self.write_str("\nendobj\n");
    }

    fn write_object_value(&mut self, object: &Object) {
        match object {
            Object::Integer(i) => self.write_str(&i.to_string()),
            Object::Real(f) => self.write_str(&format_real(*f)),
            Object::Name(n) => {
                self.write_str("/");
                self.write_str(n);
            }
            Object::Array(arr) => {
                self.write_str("[");
                for (i, obj) in arr.iter().enumerate() {
                    if i > 0 {
                        self.write_str(" ");
                    }
                    self.write_object_value(obj);
                }
                self.write_str("]");
            }
            Object::Dictionary(dict) => self.write_dictionary(dict),
            Object::Stream(dict, data) => {
                self.write_dictionary(dict);
                self.write_str("\nstream\n");
                self.write_str(data);
                self.write_str("\nendstream");
            }
            Object::Reference(id) => self.write_str(&id.to_string()),
        }
    }

    fn write_dictionary(&mut self, dict: &Dictionary) {
        self.write_str("<<");
        for (key, value) in dict.entries() {
            self.write_str("/");
            self.write_str(key);
            self.write_str(" ");
            self.write_object_value(value);
        }
        self.write_str(">>");
    }

    fn write_xref(&mut self) {
        let size = self.xref_positions.len() + 1;
        self.write_str(&format!("xref\n0 {size}\n"));
        self.write_str("0000000000 65535 f \n");

        let mut entries = self.xref_positions.clone();
        entries.sort_by_key(|(id, _)| id.number());
        for (_, position) in entries {
            self.write_str(&format!("{position:010} 00000 n \n"));
        }
    }

    fn write_trailer(&mut self, root: ObjectId, xref_position: usize) {
        let mut trailer = Dictionary::new();
        trailer.set("Size", self.xref_positions.len() + 1);
        trailer.set("Root", root);

        self.write_str("trailer\n");
        self.write_dictionary(&trailer);
        self.write_str("\nstartxref\n");
        self.write_str(&xref_position.to_string());
        self.write_str("\n%%EOF");
    }

    fn write_str(&mut self, data: &str) {
        self.buffer.push_str(data);
        self.current_position += data.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_header() {
        let mut writer = PdfWriter::new();
        writer.write_header();
        assert_eq!(writer.buffer, "%PDF-1.4\n");
        assert_eq!(writer.current_position, 9);
    }

    #[test]
    fn test_write_object() {
        let mut writer = PdfWriter::new();
        let mut dict = Dictionary::new();
        dict.set("Type", Object::name("Catalog"));
        dict.set("Pages", ObjectId::new(2, 0));

        writer.write_object(ObjectId::new(1, 0), &Object::Dictionary(dict));

        assert_eq!(writer.buffer, "1 0 obj\n<</Type /Catalog/Pages 2 0 R>>\nendobj\n");
        assert_eq!(writer.xref_positions, vec![(ObjectId::new(1, 0), 0)]);
    }

    #[test]
    fn test_write_stream() {
        let mut writer = PdfWriter::new();
        let mut dict = Dictionary::new();
        dict.set("Length", 2);
        writer.write_object_value(&Object::Stream(dict, "ET".to_string()));
        assert_eq!(writer.buffer, "<</Length 2>>\nstream\nET\nendstream");
    }

    #[test]
    fn test_write_nested_values() {
        let mut writer = PdfWriter::new();
        let mut font = Dictionary::new();
        font.set("F1", ObjectId::new(3, 0));
        let mut resources = Dictionary::new();
        resources.set("Font", font);
        resources.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(595.0),
                Object::Real(842.0),
            ]),
        );

        writer.write_object_value(&Object::Dictionary(resources));
        assert_eq!(
            writer.buffer,
            "<</Font <</F1 3 0 R>>/MediaBox [0 0 595 842]>>"
        );
    }

    #[test]
    fn test_write_xref_and_trailer() {
        let mut writer = PdfWriter::new();
        writer.xref_positions.push((ObjectId::new(1, 0), 9));
        writer.xref_positions.push((ObjectId::new(2, 0), 58));

        writer.write_xref();
        writer.write_trailer(ObjectId::new(1, 0), 1234);

        assert_eq!(
            writer.buffer,
            "xref\n0 3\n\
             0000000000 65535 f \n\
             0000000009 00000 n \n\
             0000000058 00000 n \n\
             trailer\n<</Size 3/Root 1 0 R>>\nstartxref\n1234\n%%EOF"
        );
    }

    #[test]
    fn test_write_str_tracks_position() {
        let mut writer = PdfWriter::new();
        writer.write_str("Hello");
        assert_eq!(writer.current_position, 5);
        writer.write_str(" World");
        assert_eq!(writer.current_position, 11);
        assert_eq!(writer.buffer, "Hello World");
    }

    #[test]
    fn test_offsets_point_at_object_headers() {
        let config = LayoutConfig::default();
        let mut graph = ObjectGraph::new(&config);
        graph.add_page("BT\n/F1 11 Tf\nET".to_string());
        let root = graph.catalog_id();
        let objects = graph.finish();

        let pdf = PdfWriter::new().write_document(&objects, root);

        let xref_start = pdf.find("xref\n").unwrap();
        let entries: Vec<usize> = pdf[xref_start..]
            .lines()
            .skip(3)
            .take(objects.len())
            .map(|line| line[..10].parse().unwrap())
            .collect();

        for (i, offset) in entries.iter().enumerate() {
            let header = format!("{} 0 obj\n", i + 1);
            assert!(pdf[*offset..].starts_with(&header), "object {}", i + 1);
        }

        let startxref: usize = pdf
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.strip_suffix("\n%%EOF"))
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(startxref, xref_start);
    }
}

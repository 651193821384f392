mod common;

use std::{
    io,
    sync::{Arc, Mutex},
};

use common::{float_document, primitive};
use scenery::{
    document::{Dimensions, Topology},
    primitive::{classify, extract_positions, Extraction},
    resolve::DecodeError,
};

#[test]
fn triangles_yield_vertices_in_order() {
    let floats = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
    let doc = float_document(&floats);
    let prim = primitive(Topology::Triangles, Some(0));
    let mut scratch = Vec::new();
    let res = extract_positions(&doc, &prim, &mut scratch).unwrap();
    assert_eq!(
        res,
        Extraction::Positions(vec![[0.0, 1.0, 2.0], [3.0, 4.0, 5.0], [6.0, 7.0, 8.0]])
    );
    assert_eq!(res.vertices().len(), 3);
}

#[test]
fn other_topologies_are_unsupported() {
    let doc = float_document(&[0.0; 9]);
    let mut scratch = Vec::new();
    for topology in [
        Topology::Points,
        Topology::Lines,
        Topology::LineLoop,
        Topology::LineStrip,
        Topology::TriangleStrip,
        Topology::TriangleFan,
    ] {
        let prim = primitive(topology, Some(0));
        assert_eq!(classify(&prim), topology);
        let res = extract_positions(&doc, &prim, &mut scratch).unwrap();
        assert_eq!(res, Extraction::Unsupported(topology));
        assert!(res.vertices().is_empty());
    }
}

/// Collects formatted events in memory.
#[derive(Debug, Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn unsupported_topology_is_logged_once() {
    let doc = float_document(&[0.0; 9]);
    let prim = primitive(Topology::Lines, Some(0));
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();
    let res = tracing::subscriber::with_default(subscriber, || {
        extract_positions(&doc, &prim, &mut Vec::new())
    });
    assert_eq!(res, Ok(Extraction::Unsupported(Topology::Lines)));

    let log = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert_eq!(log.lines().count(), 1, "{log}");
    assert!(log.contains("WARN"), "{log}");
    assert!(log.contains("unsupported primitive type"), "{log}");
}

#[test]
fn missing_position_attribute() {
    let doc = float_document(&[0.0; 9]);
    let prim = primitive(Topology::Triangles, None);
    assert_eq!(
        extract_positions(&doc, &prim, &mut Vec::new()).unwrap(),
        Extraction::NoPositions
    );
}

#[test]
fn extraction_covers_accessor_range_only() {
    // the view holds four vertices; the accessor covers the middle two
    let floats: Vec<f32> = (0..12).map(|i| i as f32).collect();
    let mut doc = float_document(&floats);
    doc.accessors[0].offset = 12;
    doc.accessors[0].count = 2;
    let prim = primitive(Topology::Triangles, Some(0));
    let mut scratch = vec![99.0; 32];
    assert_eq!(
        extract_positions(&doc, &prim, &mut scratch).unwrap(),
        Extraction::Positions(vec![[3.0, 4.0, 5.0], [6.0, 7.0, 8.0]])
    );
}

#[test]
fn dangling_position_accessor() {
    let doc = float_document(&[0.0; 9]);
    let prim = primitive(Topology::Triangles, Some(4));
    assert!(matches!(
        extract_positions(&doc, &prim, &mut Vec::new()),
        Err(DecodeError::InvalidReference { index: 4, .. })
    ));
}

#[test]
fn non_vec3_positions_are_grouped_in_triples() {
    let mut doc = float_document(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    doc.accessors[0].dimensions = Dimensions::Scalar;
    doc.accessors[0].count = 6;
    let prim = primitive(Topology::Triangles, Some(0));
    assert_eq!(
        extract_positions(&doc, &prim, &mut Vec::new())
            .unwrap()
            .vertices(),
        &[[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]]
    );
}

mod common;

use common::{float_document, triangle_glb};
use quickcheck_macros::quickcheck;
use scenery::{
    document::{Accessor, Buffer, BufferView, ComponentType, Dimensions, Document, Mesh},
    resolve::{self, AccessorView, DecodeError},
    IndexBase, Registry,
};

fn index_document(bytes: Vec<u8>) -> Document {
    let len = bytes.len();
    Document {
        buffers: vec![Buffer::from_bytes(bytes)],
        buffer_views: vec![BufferView {
            length: len,
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn u16_document(values: &[u16]) -> Document {
    index_document(values.iter().flat_map(|v| v.to_le_bytes()).collect())
}

#[test]
fn one_based_indices() {
    let doc = u16_document(&[5, 7, 2]);
    let mut out = Vec::new();
    resolve::read_indices(&doc, 0, 2, IndexBase::One, &mut out).unwrap();
    assert_eq!(out, vec![6, 8, 3]);
}

#[test]
fn zero_based_indices() {
    let doc = u16_document(&[5, 7, 2]);
    let mut out = Vec::new();
    resolve::read_indices(&doc, 0, 2, IndexBase::Zero, &mut out).unwrap();
    assert_eq!(out, vec![5, 7, 2]);
}

#[test]
fn index_widths() {
    let doc = index_document(vec![1, 0, 0, 0, 2, 0, 0, 0]);
    let mut out = Vec::new();
    resolve::read_indices(&doc, 0, 4, IndexBase::Zero, &mut out).unwrap();
    assert_eq!(out, vec![1, 2]);
    out.clear();
    resolve::read_indices(&doc, 0, 1, IndexBase::Zero, &mut out).unwrap();
    assert_eq!(out, vec![1, 0, 0, 0, 2, 0, 0, 0]);
}

#[test]
fn unsupported_index_width() {
    let doc = u16_document(&[1, 2, 3]);
    let mut out = Vec::new();
    assert_eq!(
        resolve::read_indices(&doc, 0, 3, IndexBase::One, &mut out),
        Err(DecodeError::UnsupportedIndexWidth(3))
    );
    assert!(out.is_empty());
    assert!(matches!(
        resolve::read_indices(&doc, 1, 2, IndexBase::One, &mut out),
        Err(DecodeError::InvalidReference { index: 1, .. })
    ));
}

#[quickcheck]
fn index_base_offsets_every_value(values: Vec<u16>) -> bool {
    let doc = u16_document(&values);
    let (mut zero, mut one) = (Vec::new(), Vec::new());
    resolve::read_indices(&doc, 0, 2, IndexBase::Zero, &mut zero).unwrap();
    resolve::read_indices(&doc, 0, 2, IndexBase::One, &mut one).unwrap();
    zero.iter().zip(&values).all(|(&z, &v)| z == v as u32)
        && one.iter().zip(&zero).all(|(&o, &z)| o == z + 1)
        && one.len() == values.len()
}

#[test]
fn read_floats_bounds() {
    let floats: Vec<f32> = (0..9).map(|i| i as f32).collect();
    let doc = float_document(&floats);
    let mut out = Vec::new();
    resolve::read_floats(&doc, 0, 1, 2, &mut out).unwrap();
    assert_eq!(out, floats[3..].to_vec());

    out.clear();
    assert_eq!(
        resolve::read_floats(&doc, 0, 2, 2, &mut out),
        Err(DecodeError::OutOfBounds {
            start: 2,
            end: 4,
            count: 3
        })
    );
    assert_eq!(
        resolve::read_floats(&doc, 0, usize::MAX, 1, &mut out),
        Err(DecodeError::OutOfBounds {
            start: usize::MAX,
            end: usize::MAX,
            count: 3
        })
    );
    assert!(matches!(
        resolve::read_floats(&doc, 0, 1, usize::MAX, &mut out),
        Err(DecodeError::OutOfBounds { start: 1, .. })
    ));
    assert!(out.is_empty());
}

#[test]
fn unaddressable_ranges_are_errors() {
    let mut doc = float_document(&[0.0; 9]);
    doc.buffer_views[0].offset = usize::MAX;
    doc.buffer_views[0].length = 1;
    assert_eq!(
        resolve::resolve_bytes(&doc, 0),
        Err(DecodeError::ByteRange {
            start: usize::MAX,
            end: usize::MAX,
            len: 36
        })
    );

    let mut doc = float_document(&[0.0; 9]);
    doc.accessors[0].count = usize::MAX;
    assert!(matches!(
        AccessorView::new(&doc, 0),
        Err(DecodeError::ByteRange { end: usize::MAX, len: 36, .. })
    ));

    let mut doc = float_document(&[0.0; 9]);
    doc.accessors[0].offset = usize::MAX - 4;
    assert!(matches!(
        resolve::read_floats(&doc, 0, 0, 1, &mut Vec::new()),
        Err(DecodeError::ByteRange { end: usize::MAX, .. })
    ));
}

#[test]
fn signed_index_accessors() {
    let mut doc = u16_document(&[1, 2, 3]);
    doc.accessors.push(Accessor {
        buffer_view: Some(0),
        count: 3,
        component_type: ComponentType::I16,
        ..Default::default()
    });
    let mut out = Vec::new();
    let view = AccessorView::new(&doc, 0).unwrap();
    let err = view.read_indices(IndexBase::Zero, &mut out).unwrap_err();
    assert_eq!(err, DecodeError::UnsupportedIndexType(ComponentType::I16));
    assert_eq!(err.to_string(), "unsupported index component type: I16");
    assert!(out.is_empty());

    doc.accessors[0].component_type = ComponentType::U16;
    let view = AccessorView::new(&doc, 0).unwrap();
    view.read_indices(IndexBase::Zero, &mut out).unwrap();
    assert_eq!(out, vec![1, 2, 3]);
}

#[test]
fn missing_buffer_view() {
    let mut doc = float_document(&[0.0; 3]);
    doc.accessors[0].buffer_view = None;
    assert_eq!(
        resolve::resolve_bytes(&doc, 0),
        Err(DecodeError::MissingBufferView(0))
    );
}

#[test]
fn accessor_past_view_end() {
    let mut doc = float_document(&[0.0; 9]);
    doc.accessors[0].count = 4;
    assert!(matches!(
        AccessorView::new(&doc, 0),
        Err(DecodeError::ByteRange { end: 48, len: 36, .. })
    ));
}

#[test]
fn strided_view_skips_padding() {
    // vec3 positions interleaved with one padding float
    let floats = [1.0f32, 2.0, 3.0, -1.0, 4.0, 5.0, 6.0, -1.0];
    let mut doc = float_document(&floats);
    doc.buffer_views[0].stride = Some(16);
    doc.accessors[0].count = 2;
    let mut out = Vec::new();
    resolve::read_floats(&doc, 0, 0, 2, &mut out).unwrap();
    assert_eq!(out, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(resolve::resolve_bytes(&doc, 0).unwrap().len(), 16 + 12);
}

#[test]
fn view_and_accessor_offsets() {
    let floats: Vec<f32> = (0..12).map(|i| i as f32).collect();
    let mut doc = float_document(&floats);
    doc.buffer_views[0].offset = 4;
    doc.buffer_views[0].length = 44;
    doc.accessors[0].offset = 8;
    doc.accessors[0].count = 3;
    let mut out = Vec::new();
    resolve::read_floats(&doc, 0, 0, 3, &mut out).unwrap();
    assert_eq!(out, (3..12).map(|i| i as f32).collect::<Vec<_>>());
}

#[test]
fn normalized_integers() {
    let mut doc = index_document(vec![0, 255, 51, 0]);
    doc.accessors.push(Accessor {
        buffer_view: Some(0),
        count: 1,
        component_type: ComponentType::U8,
        dimensions: Dimensions::Vec4,
        normalized: true,
        ..Default::default()
    });
    doc.accessors.push(Accessor {
        normalized: false,
        ..doc.accessors[0].clone()
    });
    let mut out = Vec::new();
    resolve::read_floats(&doc, 0, 0, 1, &mut out).unwrap();
    assert_eq!(out, vec![0.0, 1.0, 0.2, 0.0]);
    out.clear();
    resolve::read_floats(&doc, 1, 0, 1, &mut out).unwrap();
    assert_eq!(out, vec![0.0, 255.0, 51.0, 0.0]);
}

#[test]
fn primitive_indices_use_requested_base() {
    let mut registry = Registry::new();
    let id = registry.load_bytes("tri.glb", &triangle_glb()).unwrap();
    let mesh = registry.handles::<Mesh>(id).unwrap()[0];
    let prim = registry.primitives(mesh).unwrap()[0];
    assert_eq!(
        registry.primitive_indices(prim, IndexBase::One).unwrap(),
        Some(vec![1, 2, 3])
    );
    assert_eq!(
        registry.primitive_indices(prim, IndexBase::Zero).unwrap(),
        Some(vec![0, 1, 2])
    );
}

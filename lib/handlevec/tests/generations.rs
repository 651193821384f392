//! Ensure that stale handles are never honored.

use handlevec::HandleVec;
use quickcheck_macros::quickcheck;

#[test]
fn reuse_slot() {
    let mut v = HandleVec::new();
    let a = v.insert("a");
    assert_eq!(v.remove(a), Some("a"));
    let b = v.insert("b");
    assert_eq!(a.index(), b.index());
    assert_ne!(a, b);
    assert_eq!(v.get(a), None);
    assert_eq!(v.get(b), Some(&"b"));
    assert_eq!(v.remove(a), None);
    assert_eq!(v.len(), 1);
}

#[test]
fn clear_invalidates() {
    let mut v: HandleVec<u32> = (0..4).collect();
    let handles: Vec<_> = v.handles().collect();
    v.clear();
    assert!(v.is_empty());
    assert_eq!(v.slot_count(), 4);
    for h in handles {
        assert!(!v.contains(h));
    }
}

#[test]
fn drain_in_slot_order() {
    let mut v: HandleVec<u32> = (0..5).collect();
    let second = v.handles().nth(1).unwrap();
    v.remove(second);
    assert_eq!(v.drain(), vec![0, 2, 3, 4]);
}

/// Every handle issued before a removal stays valid unless it was the one removed.
#[quickcheck]
fn removal_is_local(values: Vec<u8>, victim: usize) -> bool {
    if values.is_empty() {
        return true;
    }
    let mut v = HandleVec::new();
    let handles: Vec<_> = values.iter().map(|x| v.insert(*x)).collect();
    let victim = victim % handles.len();
    v.remove(handles[victim]);
    v.insert(0xff);
    handles.iter().enumerate().all(|(i, h)| {
        if i == victim {
            v.get(*h).is_none()
        } else {
            v.get(*h) == Some(&values[i])
        }
    })
}

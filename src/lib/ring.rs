use super::feature::Position;
use std::borrow::Cow;

/// Returns the ring with its first vertex repeated at the end.
///
/// Rings that are already closed (and empty rings) are passed through
/// borrowed; the input is never modified.
pub fn close_ring(ring: &[Position]) -> Cow<'_, [Position]> {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if first != last => {
            let mut closed = Vec::with_capacity(ring.len() + 1);
            closed.extend_from_slice(ring);
            closed.push(*first);
            Cow::Owned(closed)
        }
        _ => Cow::Borrowed(ring),
    }
}

#[cfg(test)]
mod close_ring {
    use super::*;
    use proptest::collection::vec;
    use proptest::prelude::*;

    #[test]
    fn open_triangle() {
        let ring = vec![(9., 50.), (9., 51.), (10., 51.)];
        let closed = close_ring(&ring).into_owned();
        assert_eq!(closed, vec![(9., 50.), (9., 51.), (10., 51.), (9., 50.)]);
        assert_eq!(ring.len(), 3);
    }

    #[test]
    fn closed_ring_is_borrowed() {
        let ring = vec![(5., 49.), (6., 50.), (7., 49.), (5., 49.)];
        assert!(matches!(close_ring(&ring), Cow::Borrowed(_)));
    }

    #[test]
    fn empty_ring() {
        assert!(close_ring(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn first_equals_last(ring in vec((-180.0f64..180.0, -90.0f64..90.0), 1..20)) {
            let closed = close_ring(&ring);
            prop_assert_eq!(closed.first(), closed.last());
            prop_assert!(closed.len() >= ring.len());
        }

        #[test]
        fn closing_is_idempotent(ring in vec((-180.0f64..180.0, -90.0f64..90.0), 0..20)) {
            let once = close_ring(&ring).into_owned();
            let twice = close_ring(&once).into_owned();
            prop_assert_eq!(once, twice);
        }
    }
}

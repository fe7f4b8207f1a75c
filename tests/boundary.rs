use artmap::{Bitmap64, Error};

#[test]
fn extreme_values_iterate_in_order() {
    let mut b = Bitmap64::new();
    b.add(0);
    b.add(1u64 << 63);
    b.add(u64::MAX);
    assert_eq!(b.iter().collect::<Vec<_>>(), vec![0, 1u64 << 63, u64::MAX]);
    assert_eq!(b.first().unwrap(), 0);
    assert_eq!(b.last().unwrap(), u64::MAX);
}

#[test]
fn add_range_rejects_wraparound_to_two_to_the_64() {
    // `hiExclusive == 0` stands for 2^64, which overflows u64 arithmetic.
    let mut b = Bitmap64::new();
    assert!(matches!(b.add_range(0, 0), Err(Error::InvalidArgument(_))));
}

#[test]
fn add_range_empty_or_reversed_is_rejected() {
    let mut b = Bitmap64::new();
    assert!(matches!(b.add_range(5, 5), Err(Error::InvalidArgument(_))));
    assert!(matches!(b.add_range(5, 3), Err(Error::InvalidArgument(_))));
}

#[test]
fn add_range_single_element_matches_add() {
    let mut a = Bitmap64::new();
    a.add_range(42, 43).unwrap();
    let mut b = Bitmap64::new();
    b.add(42);
    assert_eq!(a, b);
}

#[test]
fn flip_empty_range_is_no_op() {
    let mut b = Bitmap64::new();
    b.add(7);
    b.flip(10, 10).unwrap();
    assert_eq!(b.iter().collect::<Vec<_>>(), vec![7]);
}

#[test]
fn flip_twice_is_identity() {
    let mut b = Bitmap64::from_iter([1u64, 2, 3, 100]);
    let before = b.clone();
    b.flip(0, 200).unwrap();
    b.flip(0, 200).unwrap();
    assert_eq!(b, before);
}

#[test]
fn empty_bitmap_iteration_and_endpoints() {
    let b = Bitmap64::new();
    assert_eq!(b.iter().count(), 0);
    assert!(matches!(b.first(), Err(Error::OutOfRange(_))));
    assert!(matches!(b.last(), Err(Error::OutOfRange(_))));
    assert!(matches!(b.select(0), Err(Error::OutOfRange(_))));
}

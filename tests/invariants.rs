use proptest::collection::btree_set;
use proptest::prelude::*;

use artmap::Bitmap64;

proptest! {
    #[test]
    fn rank_select_inverse(values in btree_set(any::<u64>(), 1..200)) {
        let bitmap: Bitmap64 = values.iter().copied().collect();
        let sorted: Vec<u64> = values.into_iter().collect();

        for (k, &v) in sorted.iter().enumerate() {
            prop_assert_eq!(bitmap.rank(v), (k + 1) as u64);
            prop_assert_eq!(bitmap.select(k as u64).unwrap(), v);
            prop_assert_eq!(bitmap.select(bitmap.rank(v) - 1).unwrap(), v);
        }
    }

    #[test]
    fn contains_agrees_with_iteration(values in btree_set(any::<u64>(), 0..200), probe in any::<u64>()) {
        let bitmap: Bitmap64 = values.iter().copied().collect();
        let forward: Vec<u64> = bitmap.iter().collect();
        let mut reverse: Vec<u64> = bitmap.reverse_iter().collect();
        reverse.reverse();
        prop_assert_eq!(&forward, &reverse);
        prop_assert_eq!(bitmap.cardinality() as usize, forward.len());
        prop_assert_eq!(bitmap.contains(probe), forward.contains(&probe));
    }

    #[test]
    fn union_is_idempotent(a in btree_set(any::<u64>(), 0..100), b in btree_set(any::<u64>(), 0..100)) {
        let mut x: Bitmap64 = a.into_iter().collect();
        let y: Bitmap64 = b.into_iter().collect();
        x.or(&y);
        let once = x.clone();
        x.or(&y);
        prop_assert_eq!(x, once);
    }

    #[test]
    fn xor_and_and_not_self_are_empty(values in btree_set(any::<u64>(), 0..100)) {
        let mut x: Bitmap64 = values.into_iter().collect();
        let snapshot = x.clone();
        x.xor(&snapshot);
        prop_assert_eq!(x.cardinality(), 0);

        let mut y = snapshot.clone();
        y.and_not(&snapshot);
        prop_assert_eq!(y.cardinality(), 0);
    }

    #[test]
    fn serialize_round_trips(values in btree_set(any::<u64>(), 0..300)) {
        let bitmap: Bitmap64 = values.into_iter().collect();
        let mut buf = Vec::new();
        bitmap.serialize_into(&mut buf).unwrap();
        let restored = Bitmap64::deserialize_from(&buf[..]).unwrap();
        prop_assert_eq!(bitmap, restored);
    }

    #[test]
    fn repeated_add_and_remove_are_no_ops(values in btree_set(any::<u64>(), 0..100), extra in any::<u64>()) {
        let mut bitmap: Bitmap64 = values.iter().copied().collect();
        let before = bitmap.clone();
        if values.contains(&extra) {
            prop_assert!(!bitmap.add(extra));
            prop_assert_eq!(&bitmap, &before);
        } else {
            prop_assert!(!bitmap.remove(extra));
            prop_assert_eq!(&bitmap, &before);
        }
    }
}

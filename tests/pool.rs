use pool_bintree::{Error, Pool, PoolConfig};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn grows_one_block_at_a_time() {
    let mut pool = Pool::with_config(PoolConfig::new().block_capacity(10));
    assert_eq!(pool.block_count(), 0);

    let handles: Vec<_> = (0..25).map(|i| pool.allocate(i).unwrap()).collect();
    assert_eq!(pool.block_count(), 3);
    assert_eq!(pool.capacity(), 30);
    assert_eq!(pool.len(), 25);

    for (i, &handle) in handles.iter().enumerate() {
        assert_eq!(pool.get(handle), Some(&i));
    }
}

#[test]
fn exhaustion_and_reuse() {
    let mut pool = Pool::with_config(PoolConfig::new().block_capacity(3).max_blocks(1));
    let a = pool.allocate('a').unwrap();
    let _b = pool.allocate('b').unwrap();
    let _c = pool.allocate('c').unwrap();
    assert_eq!(pool.allocate('d'), Err(Error::OutOfMemory));
    assert_eq!(pool.len(), 3);

    assert_eq!(pool.deallocate(a), Ok('a'));
    let d = pool.allocate('d').unwrap();
    assert_eq!(d, a);
    assert_eq!(pool.get(d), Some(&'d'));
    assert_eq!(pool.block_count(), 1);
}

#[test]
fn double_free_is_reported() {
    let mut pool = Pool::new();
    let handle = pool.allocate(String::from("x")).unwrap();
    assert_eq!(pool.deallocate(handle), Ok(String::from("x")));
    assert_eq!(pool.deallocate(handle), Err(Error::InvalidFree(handle)));
    assert!(pool.is_empty());
}

#[test]
fn foreign_handle_is_rejected() {
    let mut big = Pool::with_config(PoolConfig::new().block_capacity(2));
    let foreign = (0..5).map(|i| big.allocate(i).unwrap()).last().unwrap();

    let mut small = Pool::with_config(PoolConfig::new().block_capacity(2));
    small.allocate(0).unwrap();
    assert_eq!(small.get(foreign), None);
    assert_eq!(small.deallocate(foreign), Err(Error::InvalidFree(foreign)));
    assert_eq!(small.len(), 1);
}

#[test]
fn batch_sizes_other_than_one_are_rejected() {
    let mut pool = Pool::new();
    assert_eq!(pool.allocate_n(0, 1u8), Err(Error::UnsupportedBatchSize(0)));
    assert_eq!(pool.allocate_n(4, 1u8), Err(Error::UnsupportedBatchSize(4)));
    assert!(pool.is_empty());

    let handle = pool.allocate_n(1, 7u8).unwrap();
    assert_eq!(pool.deallocate_n(handle, 2), Err(Error::UnsupportedBatchSize(2)));
    assert_eq!(pool.deallocate_n(handle, 1), Ok(7));
}

#[test]
fn get_mut_updates_in_place() {
    let mut pool = Pool::new();
    let handle = pool.allocate(vec![1, 2]).unwrap();
    pool.get_mut(handle).unwrap().push(3);
    assert_eq!(pool.get(handle), Some(&vec![1, 2, 3]));
}

#[test]
fn error_messages() {
    assert_eq!(
        Error::OutOfMemory.to_string(),
        "out of memory: unable to allocate a new pool block"
    );
    assert_eq!(
        Error::UnsupportedBatchSize(3).to_string(),
        "unsupported batch size 3: only single-object requests are supported"
    );
    assert_eq!(Error::EmptyTree.to_string(), "the tree is empty");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Handles stay unique among live slots, and freed slots are reused before new blocks.
    #[test]
    fn live_handles_are_unique(ops in proptest::collection::vec(any::<bool>(), 1..1_000)) {
        let mut pool = Pool::with_config(PoolConfig::new().block_capacity(8));
        let mut live = Vec::new();
        let mut peak = 0usize;

        for (i, allocate) in ops.into_iter().enumerate() {
            if allocate || live.is_empty() {
                let handle = pool.allocate(i).unwrap();
                prop_assert!(!live.iter().any(|&(h, _)| h == handle), "{:?} handed out twice", handle);
                live.push((handle, i));
            } else {
                let (handle, value) = live.swap_remove(i % live.len());
                prop_assert_eq!(pool.deallocate(handle), Ok(value));
            }
            peak = peak.max(live.len());
            prop_assert_eq!(pool.len(), live.len());
            prop_assert_eq!(pool.block_count(), peak.div_ceil(8));
        }

        for &(handle, value) in &live {
            prop_assert_eq!(pool.get(handle), Some(&value));
        }
    }
}

use fnv::FnvHasher;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use std::{
    collections::{HashMap, HashSet},
    hash::{BuildHasherDefault, Hash},
};

pub type FnvHashSet<T> = HashSet<T, BuildHasherDefault<FnvHasher>>;
pub type FnvHashMap<K, V> = HashMap<K, V, BuildHasherDefault<FnvHasher>>;

/// Construct a hash set with the specified capacity. The hashing algorithm is much faster than the
/// default on short keys such as cell coordinates and has no random state, so iteration order is
/// the same from run to run.
pub fn fnv_hashset<T: Hash + Eq>(capacity: usize) -> FnvHashSet<T> {
    let fnv = BuildHasherDefault::<FnvHasher>::default();
    HashSet::<T, _>::with_capacity_and_hasher(capacity, fnv)
}

/// Construct a hash map with the specified capacity, see `fnv_hashset`.
pub fn fnv_hashmap<K: Hash + Eq, V>(capacity: usize) -> FnvHashMap<K, V> {
    let fnv = BuildHasherDefault::<FnvHasher>::default();
    HashMap::<K, V, _>::with_capacity_and_hasher(capacity, fnv)
}

/// The crate's default random number generator, fully determined by `seed`.
pub fn seeded_rng(seed: u64) -> XorShiftRng {
    XorShiftRng::seed_from_u64(seed)
}

/// A fresh seed from the operating system, for runs where the caller did not pick one.
pub fn random_seed() -> u64 {
    rand::thread_rng().gen()
}

//! An immutable set of UTF-8 strings with union and a dependency-closure
//! operator, used by the `properties`/`dependencies` composite generator to
//! reason about which property names must co-occur.
//!
//! The reference implementation this engine is modelled on treats freshly
//! constructed sets as "floating" until a consumer sinks them — a
//! reference-counting idiom. In a language with move semantics that
//! bookkeeping is just an owned return value, so every constructor below
//! returns a plain, already-owned `StringSet`.

use indexmap::{IndexMap, IndexSet};

/// An immutable, order-independent set of strings.
#[derive(Debug, Clone, Default)]
pub struct StringSet {
    members: IndexSet<String>,
}

impl StringSet {
    pub fn new() -> Self {
        StringSet {
            members: IndexSet::new(),
        }
    }

    pub fn singleton(s: impl Into<String>) -> Self {
        let mut members = IndexSet::new();
        members.insert(s.into());
        StringSet { members }
    }

    pub fn from_object_keys(obj: &IndexMap<String, crate::value::Json>) -> Self {
        StringSet {
            members: obj.keys().cloned().collect(),
        }
    }

    /// Builds a set from a JSON array of string elements. Non-string
    /// entries are skipped; callers validate array element types up
    /// front (`validate_schema`), so by the time a generator calls this
    /// the array is known-well-formed.
    pub fn from_string_array(arr: &[crate::value::Json]) -> Self {
        StringSet {
            members: arr
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
        }
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut members = self.members.clone();
        members.extend(other.members.iter().cloned());
        StringSet { members }
    }

    /// Least fixed point of `X -> X ∪ self ∪ ⋃_{k∈X} deps[k]`, where
    /// `deps[k]` is the array-valued property-dependency list for `k`
    /// (schema-valued dependencies are not arrays and are ignored here,
    /// matching the engine's own closure contract).
    pub fn union_dependencies(&self, deps: &IndexMap<String, Vec<String>>) -> Self {
        let mut members = self.members.clone();
        loop {
            let before = members.len();
            let additions: Vec<String> = members
                .iter()
                .filter_map(|k| deps.get(k))
                .flatten()
                .cloned()
                .collect();
            members.extend(additions);
            if members.len() == before {
                break;
            }
        }
        StringSet { members }
    }

    pub fn contains(&self, s: &str) -> bool {
        self.members.contains(s)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }
}

impl FromIterator<String> for StringSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        StringSet {
            members: iter.into_iter().collect(),
        }
    }
}

impl PartialEq for StringSet {
    fn eq(&self, other: &Self) -> bool {
        self.members.len() == other.members.len()
            && self.members.iter().all(|m| other.members.contains(m))
    }
}
impl Eq for StringSet {}

/// Order-independent hash: XOR of each member's string hash, so union
/// order and construction order never change the result.
pub fn string_set_hash(set: &StringSet) -> u64 {
    set.members.iter().fold(0u64, |acc, s| acc ^ fnv1a(s))
}

fn fnv1a(s: &str) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for b in s.as_bytes() {
        h ^= *b as u64;
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> StringSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn union_is_commutative_associative_idempotent() {
        let a = set(&["a", "b"]);
        let b = set(&["b", "c"]);
        let c = set(&["c", "d"]);

        assert_eq!(a.union(&b), b.union(&a));
        assert_eq!(a.union(&b).union(&c), a.union(&b.union(&c)));
        assert_eq!(a.union(&a), a);

        assert_eq!(string_set_hash(&a.union(&b)), string_set_hash(&b.union(&a)));
    }

    #[test]
    fn dependency_closure_is_a_least_fixed_point_containing_the_seed() {
        let mut deps = IndexMap::new();
        deps.insert("a".to_string(), vec!["b".to_string()]);
        deps.insert("b".to_string(), vec!["c".to_string()]);

        let seed = set(&["a"]);
        let closure = seed.union_dependencies(&deps);

        assert!(closure.contains("a"));
        assert!(closure.contains("b"));
        assert!(closure.contains("c"));

        let closure_of_closure = closure.union_dependencies(&deps);
        assert_eq!(closure, closure_of_closure);
    }

    #[test]
    fn closure_with_no_dependencies_is_the_seed() {
        let deps = IndexMap::new();
        let seed = set(&["x", "y"]);
        assert_eq!(seed.union_dependencies(&deps), seed);
    }
}

//! The JSON value tree the whole engine operates on, plus its equality,
//! hashing, and primitive-type model (draft-04 §3.6).

use std::cmp::Ordering;
use std::fmt::Write as _;

use indexmap::IndexMap;

use crate::error::SchemaError;

/// A JSON value. `Integer` and `Double` are kept as distinct variants on
/// purpose: a value parsed from the literal `1` is `Integer`, one parsed
/// from `1.0` is `Double`, and several keywords (`multipleOf`, `maximum`
/// boundary generation) depend on which form appeared in the source text.
#[derive(Debug, Clone)]
pub enum Json {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Array(Vec<Json>),
    Object(IndexMap<String, Json>),
}

impl Json {
    pub fn object() -> Json {
        Json::Object(IndexMap::new())
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Json>> {
        match self {
            Json::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Json]> {
        match self {
            Json::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Json::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Json::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Json::Integer(i) => Some(*i as f64),
            Json::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Json::Integer(_) | Json::Double(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Json::Object(_))
    }

    /// Parses a UTF-8 JSON document. Lowers through `serde_json::Value` (the
    /// library this crate leans on for turning bytes into *something*) while
    /// preserving the integer/double literal distinction that
    /// `serde_json::Number` itself tracks internally.
    pub fn parse(text: &str) -> Result<Json, SchemaError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Ok(Json::from_serde(value))
    }

    fn from_serde(value: serde_json::Value) -> Json {
        match value {
            serde_json::Value::Null => Json::Null,
            serde_json::Value::Bool(b) => Json::Bool(b),
            serde_json::Value::Number(n) => {
                if n.is_i64() {
                    Json::Integer(n.as_i64().unwrap())
                } else if n.is_u64() {
                    // draft-04 documents rarely carry u64-only literals, but
                    // when they do, fall back to a lossy f64 rather than
                    // widen the Integer variant to u64.
                    Json::Double(n.as_f64().unwrap_or(0.0))
                } else {
                    Json::Double(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Json::String(s),
            serde_json::Value::Array(a) => {
                Json::Array(a.into_iter().map(Json::from_serde).collect())
            }
            serde_json::Value::Object(o) => Json::Object(
                o.into_iter()
                    .map(|(k, v)| (k, Json::from_serde(v)))
                    .collect(),
            ),
        }
    }

    /// Compact (no extraneous whitespace) serialisation, used by the plain
    /// instance-output format and by `generate_instances` equality testing.
    pub fn to_compact_string(&self) -> String {
        let mut out = String::new();
        self.write_compact(&mut out);
        out
    }

    fn write_compact(&self, out: &mut String) {
        match self {
            Json::Null => out.push_str("null"),
            Json::Bool(true) => out.push_str("true"),
            Json::Bool(false) => out.push_str("false"),
            Json::Integer(i) => {
                let _ = write!(out, "{}", i);
            }
            Json::Double(d) => {
                out.push_str(&format_double(*d));
            }
            Json::String(s) => write_json_string(s, out),
            Json::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_compact(out);
                }
                out.push(']');
            }
            Json::Object(map) => {
                out.push('{');
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_json_string(k, out);
                    out.push(':');
                    v.write_compact(out);
                }
                out.push('}');
            }
        }
    }

    /// Projects this value onto the draft-04 primitive-type lattice.
    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            Json::Null => PrimitiveType::Null,
            Json::Bool(_) => PrimitiveType::Boolean,
            Json::Integer(_) => PrimitiveType::Integer,
            Json::Double(_) => PrimitiveType::Number,
            Json::String(_) => PrimitiveType::String,
            Json::Array(_) => PrimitiveType::Array,
            Json::Object(_) => PrimitiveType::Object,
        }
    }
}

/// Locale-independent decimal formatting for doubles that always includes a
/// decimal point, so that round-tripping a generated `Double` through text
/// never silently becomes an `Integer` literal on the other end.
fn format_double(d: f64) -> String {
    if d.is_nan() || d.is_infinite() {
        // Not representable in JSON; callers are expected never to construct
        // these from schema/generator logic.
        return "0.0".to_owned();
    }
    let mut s = format!("{}", d);
    if !s.contains('.') && !s.contains('e') && !s.contains('E') {
        s.push_str(".0");
    }
    s
}

fn write_json_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// The seven draft-04 primitive types, with the single `integer <: number`
/// subtype edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Array,
    Boolean,
    Integer,
    Number,
    Null,
    Object,
    String,
}

impl PrimitiveType {
    pub fn from_name(name: &str) -> Option<PrimitiveType> {
        Some(match name {
            "array" => PrimitiveType::Array,
            "boolean" => PrimitiveType::Boolean,
            "integer" => PrimitiveType::Integer,
            "number" => PrimitiveType::Number,
            "null" => PrimitiveType::Null,
            "object" => PrimitiveType::Object,
            "string" => PrimitiveType::String,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::Array => "array",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Number => "number",
            PrimitiveType::Null => "null",
            PrimitiveType::Object => "object",
            PrimitiveType::String => "string",
        }
    }
}

/// `is_a(sub, sup)`: true iff `sub == sup`, or `sup` is `number` and `sub`
/// is `integer`. No other edges exist in the lattice.
pub fn is_a(sub: PrimitiveType, sup: PrimitiveType) -> bool {
    sub == sup || (sup == PrimitiveType::Number && sub == PrimitiveType::Integer)
}

/// Structural equality per draft-04 §3.6: same variant, or one `Integer`
/// and one `Double` whose values compare bitwise-equal as `f64`. No
/// epsilon tolerance anywhere.
impl PartialEq for Json {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Json::Null, Json::Null) => true,
            (Json::Bool(a), Json::Bool(b)) => a == b,
            (Json::Integer(a), Json::Integer(b)) => a == b,
            (Json::Double(a), Json::Double(b)) => a.to_bits() == b.to_bits(),
            (Json::Integer(a), Json::Double(b)) | (Json::Double(b), Json::Integer(a)) => {
                (*a as f64).to_bits() == b.to_bits()
            }
            (Json::String(a), Json::String(b)) => a == b,
            (Json::Array(a), Json::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
            }
            (Json::Object(a), Json::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).map(|bv| bv == v).unwrap_or(false))
            }
            _ => false,
        }
    }
}
impl Eq for Json {}

const HASH_TRUE: u64 = 0x9e3779b97f4a7c15;
const HASH_FALSE: u64 = 0x517cc1b727220a95;
const HASH_NULL: u64 = 0x2545f4914f6cdd1d;
const HASH_EMPTY_ARRAY: u64 = 0xff51afd7ed558ccd;
const HASH_EMPTY_OBJECT: u64 = 0xc4ceb9fe1a85ec53;

fn hash_str(s: &str) -> u64 {
    // FNV-1a, good enough for a dedup structure keyed on json_eq.
    let mut h: u64 = 0xcbf29ce484222325;
    for b in s.as_bytes() {
        h ^= *b as u64;
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}

/// Structural hash, consistent with `Json`'s `PartialEq`. Doubles and
/// integers that compare equal (via the mixed-path rule above) hash
/// identically because both route through the same `f64` bit pattern.
/// Objects hash on size alone (deliberately coarse, per the reference
/// implementation this engine is modelled on — it tolerates member
/// reordering without sorting keys, at the cost of more hash collisions
/// for same-sized objects, which `Json`'s own `PartialEq` still resolves).
pub fn json_hash(value: &Json) -> u64 {
    match value {
        Json::Bool(true) => HASH_TRUE,
        Json::Bool(false) => HASH_FALSE,
        Json::Null => HASH_NULL,
        Json::Integer(i) => (*i as f64).to_bits(),
        Json::Double(d) => d.to_bits(),
        Json::String(s) => hash_str(s),
        Json::Array(items) if items.is_empty() => HASH_EMPTY_ARRAY,
        Json::Array(items) => (items.len() as u64) ^ json_hash(&items[0]),
        Json::Object(map) if map.is_empty() => HASH_EMPTY_OBJECT,
        Json::Object(map) => (map.len() as u64).wrapping_add(HASH_EMPTY_OBJECT),
    }
}

/// Total order over two numeric `Json` nodes. Integer/integer compares as
/// plain `i64`; any mixed or double/double pair promotes both sides to
/// `f64` and orders them — never via subtraction, which would overflow at
/// the `i64` boundaries.
pub fn json_number_cmp(a: &Json, b: &Json) -> Option<Ordering> {
    match (a, b) {
        (Json::Integer(x), Json::Integer(y)) => Some(x.cmp(y)),
        _ => {
            let x = a.as_f64()?;
            let y = b.as_f64()?;
            x.partial_cmp(&y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_reflexive_symmetric_transitive() {
        let a = Json::Integer(1);
        let b = Json::Double(1.0);
        let c = Json::Double(1.0);

        assert_eq!(a, a);
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_eq!(b, c);
        assert_eq!(a, c);
    }

    #[test]
    fn integer_double_cross_equality_is_bit_exact() {
        assert_eq!(Json::Integer(1), Json::Double(1.0));
        assert_ne!(Json::Integer(1), Json::Double(1.0000000000000002));
    }

    #[test]
    fn double_equality_has_no_epsilon() {
        let d1 = Json::Double(0.1 + 0.2);
        let d2 = Json::Double(0.3);
        assert_ne!(d1, d2);
    }

    #[test]
    fn hash_equality_consistency() {
        let pairs = [
            (Json::Null, Json::Null),
            (Json::Bool(true), Json::Bool(true)),
            (Json::Integer(5), Json::Double(5.0)),
            (Json::String("x".into()), Json::String("x".into())),
            (
                Json::Array(vec![Json::Integer(1)]),
                Json::Array(vec![Json::Double(1.0)]),
            ),
        ];
        for (x, y) in pairs {
            assert_eq!(x, y);
            assert_eq!(json_hash(&x), json_hash(&y));
        }
    }

    #[test]
    fn primitive_type_lattice() {
        use PrimitiveType::*;
        for t in [Array, Boolean, Integer, Number, Null, Object, String] {
            assert!(is_a(t, t));
        }
        assert!(is_a(Integer, Number));
        assert!(!is_a(Number, Integer));
        assert!(!is_a(String, Number));
    }

    #[test]
    fn number_comparison_is_a_total_order() {
        let pairs = [
            (Json::Integer(1), Json::Integer(2)),
            (Json::Integer(1), Json::Double(1.5)),
            (Json::Double(2.5), Json::Integer(2)),
            (Json::Integer(i64::MAX), Json::Integer(i64::MIN)),
        ];
        for (a, b) in pairs {
            let fwd = json_number_cmp(&a, &b).unwrap();
            let rev = json_number_cmp(&b, &a).unwrap();
            assert_eq!(fwd.reverse(), rev);
        }
    }

    #[test]
    fn object_equality_ignores_member_order() {
        let mut m1 = IndexMap::new();
        m1.insert("a".to_string(), Json::Integer(1));
        m1.insert("b".to_string(), Json::Integer(2));
        let mut m2 = IndexMap::new();
        m2.insert("b".to_string(), Json::Integer(2));
        m2.insert("a".to_string(), Json::Integer(1));
        assert_eq!(Json::Object(m1), Json::Object(m2));
    }

    #[test]
    fn double_round_trips_with_decimal_point() {
        assert_eq!(Json::Double(1.0).to_compact_string(), "1.0");
        assert_eq!(Json::Integer(1).to_compact_string(), "1");
    }
}

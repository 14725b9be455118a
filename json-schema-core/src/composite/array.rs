//! `generate_all_items` (spec §4.5.a): the composite generator driving
//! `items`/`additionalItems`/`maxItems`/`minItems`/`uniqueItems` together.
//! Implemented as the five phases the spec names, each a pure function
//! over owned `Json` values.

use indexmap::IndexMap;

use crate::dispatch::Engine;
use crate::value::Json;

/// Defensive bound on shape/pattern enumeration so a pathological schema
/// (e.g. `maxItems: 1000000`) can't make generation run away. The spec
/// does not call for a cap; this one is a deliberate implementation
/// divergence, noted in DESIGN.md, rather than an infinite-loop risk.
const MAX_SHAPE_LEN: usize = 24;

pub fn generate_all_items(engine: &Engine, obj: &IndexMap<String, Json>) -> Vec<Json> {
    let items = engine.keyword_value(obj, "items").unwrap_or_else(Json::object);
    let additional_items = engine
        .keyword_value(obj, "additionalItems")
        .unwrap_or_else(Json::object);
    let min_items = obj
        .get("minItems")
        .and_then(as_non_negative_usize)
        .unwrap_or(0);
    let max_items = obj.get("maxItems").and_then(as_non_negative_usize);
    let unique_items = obj
        .get("uniqueItems")
        .and_then(Json::as_bool)
        .unwrap_or(false);

    let shapes = enumerate_shapes(&items, &additional_items, min_items, max_items);

    let mut cache = SubschemaCache::new();
    let mut out = Vec::new();
    for shape in &shapes {
        let is_positional = matches!(items, Json::Array(_));
        for pattern in enumerate_patterns(shape.len(), is_positional) {
            out.extend(assemble(engine, &mut cache, shape, &pattern));
        }
    }

    let mut mutations = Vec::new();
    for array in &out {
        mutate_boundaries(
            array,
            &items,
            &additional_items,
            min_items,
            max_items,
            unique_items,
            &mut mutations,
        );
    }
    out.extend(mutations);
    out
}

fn as_non_negative_usize(v: &Json) -> Option<usize> {
    match v {
        Json::Integer(i) if *i >= 0 => Some(*i as usize),
        _ => None,
    }
}

/// Phase 1: the family of positional sub-schema lists ("shapes") to build
/// array instances from.
fn enumerate_shapes(
    items: &Json,
    additional_items: &Json,
    min_items: usize,
    max_items: Option<usize>,
) -> Vec<Vec<Json>> {
    let mut shapes = Vec::new();

    match items {
        Json::Array(positional) => {
            let n = positional.len();
            let upper_prefix = max_items.map(|m| n.min(m)).unwrap_or(n).min(min_items + MAX_SHAPE_LEN);
            if min_items <= upper_prefix {
                for i in min_items..=upper_prefix {
                    shapes.push(positional[..i].to_vec());
                }
            }
            if let Json::Object(_) = additional_items {
                let upper = max_items.unwrap_or(n + 1).min(n + MAX_SHAPE_LEN);
                if n + 1 <= upper {
                    for i in (n + 1)..=upper {
                        let mut shape = positional.clone();
                        shape.extend(std::iter::repeat(additional_items.clone()).take(i - n));
                        shapes.push(shape);
                    }
                }
            }
        }
        Json::Object(_) => {
            let upper = match max_items {
                Some(m) => m,
                None if matches!(additional_items, Json::Bool(false)) => min_items,
                None => min_items.max(1) + 1,
            };
            let upper = upper.min(min_items + MAX_SHAPE_LEN);
            if min_items <= upper {
                for i in min_items..=upper {
                    shapes.push(vec![items.clone(); i]);
                }
            }
        }
        _ => {}
    }

    if shapes.is_empty() {
        shapes.push(Vec::new());
    }
    shapes
}

/// Phase 3: validity patterns for a shape of length `m`. All-true and
/// all-false always; positional (`items` is an array) shapes additionally
/// get one "step" pattern per split point, to exercise parsers that loop
/// and bail on the first invalid child.
fn enumerate_patterns(m: usize, is_positional: bool) -> Vec<Vec<bool>> {
    let mut patterns = vec![vec![true; m], vec![false; m]];
    if is_positional {
        for split in 1..m {
            let mut p = vec![true; split];
            p.extend(std::iter::repeat(false).take(m - split));
            patterns.push(p);
        }
    }
    patterns
}

/// Phase 2: per-sub-schema valid/invalid instance partitions, memoised by
/// structural equality of the schema object (schema trees are small, so a
/// linear scan beats introducing a `Hash` impl for `Json` just for this).
struct SubschemaCache {
    entries: Vec<(Json, Vec<Json>, Vec<Json>)>,
}

impl SubschemaCache {
    fn new() -> Self {
        SubschemaCache {
            entries: Vec::new(),
        }
    }

    fn partitions(&mut self, engine: &Engine, schema: &Json) -> (Vec<Json>, Vec<Json>) {
        if let Some((_, valid, invalid)) = self.entries.iter().find(|(s, _, _)| s == schema) {
            return (valid.clone(), invalid.clone());
        }
        let mut valid = Vec::new();
        let mut invalid = Vec::new();
        for candidate in engine.recurse_generate(schema).into_vec() {
            if engine.recurse_apply(schema, &candidate).is_ok() {
                valid.push(candidate);
            } else {
                invalid.push(candidate);
            }
        }
        self.entries
            .push((schema.clone(), valid.clone(), invalid.clone()));
        (valid, invalid)
    }
}

/// Phase 4: lock-step assembly of one shape x one validity pattern into a
/// stream of array instances, cycling short per-position lists so every
/// cached child instance is used by at least one emitted array.
fn assemble(
    engine: &Engine,
    cache: &mut SubschemaCache,
    shape: &[Json],
    pattern: &[bool],
) -> Vec<Json> {
    if shape.is_empty() {
        return vec![Json::Array(Vec::new())];
    }

    let lists: Vec<Vec<Json>> = shape
        .iter()
        .zip(pattern.iter())
        .map(|(schema, &want_valid)| {
            let (valid, invalid) = cache.partitions(engine, schema);
            let primary = if want_valid { &valid } else { &invalid };
            if !primary.is_empty() {
                primary.clone()
            } else if want_valid {
                invalid
            } else {
                valid
            }
        })
        .collect();

    let max_len = lists.iter().map(Vec::len).max().unwrap_or(0).max(1);
    let mut out = Vec::with_capacity(max_len);
    for idx in 0..max_len {
        let mut elements = Vec::with_capacity(shape.len());
        for list in &lists {
            elements.push(if list.is_empty() {
                Json::Null
            } else {
                list[idx % list.len()].clone()
            });
        }
        out.push(Json::Array(elements));
    }
    out
}

/// Phase 5: the four boundary-mutation rules, each producing at most one
/// additional instance per emitted array.
fn mutate_boundaries(
    array: &Json,
    items: &Json,
    additional_items: &Json,
    min_items: usize,
    max_items: Option<usize>,
    unique_items: bool,
    out: &mut Vec<Json>,
) {
    let elements = match array.as_array() {
        Some(a) => a,
        None => return,
    };
    let len = elements.len() as i64;

    if min_items > 0 {
        let drop = len - min_items as i64 + 1;
        if drop >= 1 && drop <= len {
            let mut v = elements.to_vec();
            v.truncate((len - drop) as usize);
            out.push(Json::Array(v));
        }
    }

    if let Some(max) = max_items {
        let pad = max as i64 - len + 1;
        if pad >= 1 {
            let mut v = elements.to_vec();
            v.extend(std::iter::repeat(Json::Null).take(pad as usize));
            out.push(Json::Array(v));
        }
    }

    let matches_positional_len = match items.as_array() {
        Some(positional) => positional.len() as i64 == len,
        None => true, // single-schema `items`: every length is "the" length
    };
    if additional_items == &Json::Bool(false) && matches_positional_len {
        let mut v = elements.to_vec();
        v.push(Json::Null);
        out.push(Json::Array(v));
    }

    if unique_items {
        if let Some(last) = elements.last() {
            let mut v = elements.to_vec();
            v.push(last.clone());
            out.push(Json::Array(v));
        } else {
            out.push(Json::Array(vec![Json::Null, Json::Null]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Engine;

    fn obj(pairs: Vec<(&str, Json)>) -> IndexMap<String, Json> {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn unique_items_generates_a_duplicate_pair() {
        let engine = Engine::with_debug(false);
        let schema = obj(vec![("uniqueItems", Json::Bool(true))]);
        let generated = generate_all_items(&engine, &schema);
        assert!(generated
            .iter()
            .any(|v| v == &Json::Array(vec![Json::Null, Json::Null])));
    }

    #[test]
    fn min_items_and_max_items_boundaries_are_present() {
        let engine = Engine::with_debug(false);
        let mut schema_obj = IndexMap::new();
        let mut item_schema = IndexMap::new();
        item_schema.insert("type".to_string(), Json::String("integer".into()));
        schema_obj.insert("items".to_string(), Json::Object(item_schema));
        schema_obj.insert("minItems".to_string(), Json::Integer(1));
        schema_obj.insert("maxItems".to_string(), Json::Integer(2));

        let generated = generate_all_items(&engine, &schema_obj);
        assert!(generated
            .iter()
            .any(|v| v.as_array().map(|a| a.len() == 1).unwrap_or(false)));
        assert!(generated
            .iter()
            .any(|v| v.as_array().map(|a| a.len() == 2).unwrap_or(false)));
        assert!(generated
            .iter()
            .any(|v| v.as_array().map(|a| a.len() == 3).unwrap_or(false)));
    }

    #[test]
    fn positional_items_generate_step_patterns() {
        let engine = Engine::with_debug(false);
        let mut int_schema = IndexMap::new();
        int_schema.insert("type".to_string(), Json::String("integer".into()));
        let mut str_schema = IndexMap::new();
        str_schema.insert("type".to_string(), Json::String("string".into()));

        let mut schema_obj = IndexMap::new();
        schema_obj.insert(
            "items".to_string(),
            Json::Array(vec![Json::Object(int_schema), Json::Object(str_schema)]),
        );

        let generated = generate_all_items(&engine, &schema_obj);
        assert!(!generated.is_empty());
    }
}

//! `generate_all_properties` (spec §4.5.b): the composite generator
//! driving `properties`/`patternProperties`/`additionalProperties`/
//! `required`/`minProperties`/`maxProperties`/`dependencies` together.

use indexmap::IndexMap;
use regex::Regex;

use crate::dispatch::Engine;
use crate::keywords::object_kw::DependencyKind;
use crate::string_set::StringSet;
use crate::value::Json;

/// Closed candidate list for synthesising one representative instance of
/// a `patternProperties` regex (spec §9 open question 4). When none of
/// the six candidates matches a given regex, the representative is
/// skipped — the reference implementation this engine is modelled on
/// panics in that case; this is a deliberate, documented deviation
/// (DESIGN.md) rather than an abort.
const PATTERN_CANDIDATES: &[&str] = &["a", "A", "0", "aaa", "000", "!"];

const MAX_SHAPE_LEN: usize = 24;

pub fn generate_all_properties(engine: &Engine, obj: &IndexMap<String, Json>) -> Vec<Json> {
    let required: Vec<String> = engine
        .keyword_value(obj, "required")
        .and_then(|v| v.as_array().map(<[Json]>::to_vec))
        .unwrap_or_default()
        .iter()
        .filter_map(|v| v.as_str().map(str::to_owned))
        .collect();
    let min_properties = obj
        .get("minProperties")
        .and_then(as_non_negative_usize)
        .unwrap_or(0);
    let max_properties = obj.get("maxProperties").and_then(as_non_negative_usize);
    let properties = engine
        .keyword_value(obj, "properties")
        .and_then(|v| v.as_object().cloned())
        .unwrap_or_default();
    let pattern_properties = engine
        .keyword_value(obj, "patternProperties")
        .and_then(|v| v.as_object().cloned())
        .unwrap_or_default();
    let additional_properties = engine
        .keyword_value(obj, "additionalProperties")
        .unwrap_or_else(Json::object);
    let dependencies = engine
        .keyword_value(obj, "dependencies")
        .and_then(|v| crate::keywords::object_kw::parse_dependencies(&v))
        .unwrap_or_default();

    let prop_dependencies: IndexMap<String, Vec<String>> = dependencies
        .iter()
        .filter_map(|(k, v)| match v {
            DependencyKind::Properties(names) => Some((k.clone(), names.clone())),
            DependencyKind::Schema(_) => None,
        })
        .collect();

    let pattern_regexes: Vec<(String, Regex)> = pattern_properties
        .keys()
        .filter_map(|p| Regex::new(p).ok().map(|re| (p.clone(), re)))
        .collect();

    // Phase 1: known-property inventory.
    let mut known = StringSet::from_object_keys(&properties);
    for (_, re) in &pattern_regexes {
        if let Some(name) = PATTERN_CANDIDATES
            .iter()
            .find(|c| re.is_match(c) && !properties.contains_key(**c))
        {
            known = known.union(&StringSet::singleton(*name));
        }
    }
    let dependency_keys: Vec<String> = dependencies.keys().cloned().collect();
    known = known.union(&dependency_keys.iter().cloned().collect::<StringSet>());

    let initial_seed: StringSet = required
        .iter()
        .cloned()
        .chain(dependency_keys.iter().cloned())
        .collect();
    let initial = initial_seed.union_dependencies(&prop_dependencies);

    let additional_count = if matches!(additional_properties, Json::Bool(false)) {
        0
    } else {
        let need = min_properties.saturating_sub(initial.len());
        need.max(1).min(initial.len() + MAX_SHAPE_LEN)
    };
    let additional_names: Vec<String> = if additional_count == 0 {
        Vec::new()
    } else {
        synthesize_names(&known, &pattern_regexes, additional_count)
    };
    let additional: StringSet = additional_names.iter().cloned().collect();

    // Phase 2: candidate property-set family.
    let mut family: Vec<StringSet> = vec![StringSet::new(), known.clone(), known.union(&additional)];
    for k in known.iter() {
        family.push(StringSet::singleton(k));
    }
    for a in additional.iter() {
        family.push(StringSet::singleton(a));
    }

    let mut retained: Vec<StringSet> = Vec::new();
    for x in family.drain(..) {
        let closed = initial.union(&x).union_dependencies(&prop_dependencies);
        let size = closed.len();
        let within_min = size >= min_properties;
        let within_max = max_properties.map(|m| size <= m).unwrap_or(true);
        if within_min && within_max && !retained.iter().any(|r| r == &closed) {
            retained.push(closed);
        }
    }
    if retained.is_empty() {
        retained.push(initial.clone());
    }

    // Phase 3: per-property sub-instance cache.
    let mut cache: IndexMap<String, Vec<Json>> = IndexMap::new();
    for set in &retained {
        for p in set.iter() {
            if cache.contains_key(p) {
                continue;
            }
            let schemas = child_schemas(p, &properties, &pattern_regexes, &pattern_properties, &additional_properties);
            let mut instances = Vec::new();
            for schema in &schemas {
                instances.extend(engine.recurse_generate(schema).into_vec());
            }
            cache.insert(p.to_string(), instances);
        }
    }

    // Phase 4: instance assembly.
    let mut out = Vec::new();
    for set in &retained {
        out.extend(assemble(set, &cache));
    }

    // Phase 5: boundary mutations.
    let mut mutations = Vec::new();
    for instance in &out {
        mutate_boundaries(
            instance,
            min_properties,
            max_properties,
            &properties,
            &pattern_properties,
            &additional_properties,
            &required,
            &prop_dependencies,
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

/// One representative synthetic name per slot, skipped if it happens to
/// collide with an existing name or a `patternProperties` regex.
fn synthesize_names(existing: &StringSet, patterns: &[(String, Regex)], count: usize) -> Vec<String> {
    let mut out = Vec::with_capacity(count);
    let mut n = 0u64;
    while out.len() < count && n < count as u64 + MAX_SHAPE_LEN as u64 {
        let candidate = n.to_string();
        n += 1;
        if existing.contains(&candidate) || out.contains(&candidate) {
            continue;
        }
        if patterns.iter().any(|(_, re)| re.is_match(&candidate)) {
            continue;
        }
        out.push(candidate);
    }
    out
}

/// The draft-04 §5.4.4/§8.3.3 child rule: which schemas govern property
/// name `p`.
fn child_schemas(
    p: &str,
    properties: &IndexMap<String, Json>,
    pattern_regexes: &[(String, Regex)],
    pattern_properties: &IndexMap<String, Json>,
    additional_properties: &Json,
) -> Vec<Json> {
    let mut schemas = Vec::new();
    if let Some(s) = properties.get(p) {
        schemas.push(s.clone());
    }
    for (pattern, re) in pattern_regexes {
        if re.is_match(p) {
            if let Some(s) = pattern_properties.get(pattern) {
                schemas.push(s.clone());
            }
        }
    }
    if schemas.is_empty() {
        if let Json::Object(_) = additional_properties {
            schemas.push(additional_properties.clone());
        }
    }
    schemas
}

/// Phase 4: lock-step assembly over a retained property set, cycling each
/// property's cached instance list so every cached child instance is used
/// by at least one emitted object.
fn assemble(set: &StringSet, cache: &IndexMap<String, Vec<Json>>) -> Vec<Json> {
    let names: Vec<&str> = set.iter().collect();
    if names.is_empty() {
        return vec![Json::object()];
    }
    let lists: Vec<&[Json]> = names
        .iter()
        .map(|n| cache.get(*n).map(Vec::as_slice).unwrap_or(&[]))
        .collect();
    let max_len = lists.iter().map(|l| l.len()).max().unwrap_or(0).max(1);

    let mut out = Vec::with_capacity(max_len);
    for idx in 0..max_len {
        let mut map = IndexMap::new();
        for (name, list) in names.iter().zip(lists.iter()) {
            let value = if list.is_empty() {
                Json::Null
            } else {
                list[idx % list.len()].clone()
            };
            map.insert((*name).to_string(), value);
        }
        out.push(Json::Object(map));
    }
    out
}

#[allow(clippy::too_many_arguments)]
fn mutate_boundaries(
    instance: &Json,
    min_properties: usize,
    max_properties: Option<usize>,
    properties: &IndexMap<String, Json>,
    pattern_properties: &IndexMap<String, Json>,
    additional_properties: &Json,
    required: &[String],
    prop_dependencies: &IndexMap<String, Vec<String>>,
    out: &mut Vec<Json>,
) {
    let obj = match instance.as_object() {
        Some(o) => o,
        None => return,
    };
    let len = obj.len() as i64;

    if min_properties > 0 {
        let drop = len - min_properties as i64 + 1;
        if drop >= 1 && drop <= len {
            let mut keys_to_drop: Vec<String> = obj
                .keys()
                .filter(|k| !required.contains(k))
                .take(drop as usize)
                .cloned()
                .collect();
            if keys_to_drop.len() < drop as usize {
                // Not enough non-required properties: fall back to
                // dropping required ones too, per spec §4.5.b phase 5.
                for k in obj.keys() {
                    if keys_to_drop.len() as i64 >= drop {
                        break;
                    }
                    if !keys_to_drop.contains(k) {
                        keys_to_drop.push(k.clone());
                    }
                }
            }
            let mut copy = obj.clone();
            for k in &keys_to_drop {
                copy.shift_remove(k);
            }
            out.push(Json::Object(copy));
        }
    }

    if let Some(max) = max_properties {
        let pad = max as i64 - len + 1;
        if pad >= 1 {
            let mut copy = obj.clone();
            let mut n = 0u64;
            let mut added = 0i64;
            while added < pad {
                let name = format!("additionalProperties-boundary-{}", n);
                n += 1;
                if copy.contains_key(&name) {
                    continue;
                }
                copy.insert(name, Json::Null);
                added += 1;
            }
            out.push(Json::Object(copy));
        }
    }

    let has_shape_constraint = !properties.is_empty()
        || !pattern_properties.is_empty()
        || matches!(additional_properties, Json::Bool(false));
    if has_shape_constraint {
        const EXTRA: &str = "additionalProperties-test-unique";
        if !obj.contains_key(EXTRA) {
            let mut copy = obj.clone();
            copy.insert(EXTRA.to_string(), Json::Null);
            out.push(Json::Object(copy));
        }
    }

    for r in required {
        if obj.contains_key(r) {
            let mut copy = obj.clone();
            copy.shift_remove(r);
            out.push(Json::Object(copy));
        }
    }

    for (_d, names) in prop_dependencies {
        for p in names {
            if obj.contains_key(p) {
                let mut copy = obj.clone();
                copy.shift_remove(p);
                out.push(Json::Object(copy));
            }
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
    fn required_property_generates_a_missing_variant() {
        let engine = Engine::with_debug(false);
        let mut int_schema = IndexMap::new();
        int_schema.insert("type".to_string(), Json::String("integer".into()));
        let mut properties = IndexMap::new();
        properties.insert("a".to_string(), Json::Object(int_schema));

        let schema = obj(vec![
            ("required", Json::Array(vec![Json::String("a".into())])),
            ("properties", Json::Object(properties)),
        ]);

        let generated = generate_all_properties(&engine, &schema);
        assert!(generated.iter().any(|v| {
            v.as_object()
                .map(|o| !o.contains_key("a"))
                .unwrap_or(false)
        }));
        assert!(generated.iter().any(|v| {
            v.as_object()
                .map(|o| o.get("a") == Some(&Json::Integer(0)))
                .unwrap_or(false)
        }));
    }

    #[test]
    fn property_dependency_scenario_is_reachable_through_generation() {
        let engine = Engine::with_debug(false);
        let mut deps = IndexMap::new();
        deps.insert("a".to_string(), Json::Array(vec![Json::String("b".into())]));
        let schema = obj(vec![("dependencies", Json::Object(deps))]);

        let generated = generate_all_properties(&engine, &schema);
        assert!(!generated.is_empty());
    }
}

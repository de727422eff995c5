// JSON rewrite engine
// Applies dot-notation path rules with `*` wildcards to a JSON tree

use serde_json::Value;

use crate::proxy::translator::store::LanguageRuleSet;

/// A single rewrite rule: dot-notation path plus replacement spec.
///
/// The replacement is either a literal value applied unconditionally, or a
/// JSON object mapping the stringified original value to its replacement,
/// with an optional `"*"` default entry.
#[derive(Debug, Clone)]
pub struct TranslationRule {
    pub path: String,
    pub replace: Value,
}

/// Stateless rule applicator built fresh per request from a rule set.
pub struct JsonTranslator {
    rules: Vec<CompiledRule>,
}

#[derive(Debug)]
struct CompiledRule {
    segments: Vec<String>,
    replace: Value,
}

impl JsonTranslator {
    /// Compile an ordered rule document (path -> replacement spec).
    pub fn new(rules: &LanguageRuleSet) -> Self {
        Self::from_rules(
            rules
                .iter()
                .map(|(path, replace)| TranslationRule {
                    path: path.clone(),
                    replace: replace.clone(),
                })
                .collect(),
        )
    }

    /// Compile an explicit rule list. Rules with empty paths are dropped.
    pub fn from_rules(rules: Vec<TranslationRule>) -> Self {
        let rules = rules
            .into_iter()
            .filter(|rule| !rule.path.is_empty())
            .map(|rule| CompiledRule {
                segments: rule.path.split('.').map(str::to_string).collect(),
                replace: rule.replace,
            })
            .collect();
        Self { rules }
    }

    /// Apply every rule in order and return the rewritten tree.
    ///
    /// Scalars and empty rule lists pass through untouched. The input is
    /// owned, so callers keep their original value intact.
    pub fn translate(&self, data: Value) -> Value {
        if self.rules.is_empty() || !(data.is_object() || data.is_array()) {
            return data;
        }

        let mut node = data;
        for rule in &self.rules {
            apply_rule(&mut node, &rule.segments, &rule.replace);
        }
        node
    }
}

fn apply_rule(node: &mut Value, segments: &[String], replace: &Value) {
    let Some((current, remaining)) = segments.split_first() else {
        replace_slot(node, replace);
        return;
    };

    match node {
        Value::Array(items) => {
            if current.as_str() == "*" {
                for item in items.iter_mut() {
                    apply_rule(item, remaining, replace);
                }
            } else {
                // A concrete key against a list is applied to every element
                // with the segment left unconsumed: arrays are transparent
                // to non-wildcard segments.
                for item in items.iter_mut() {
                    apply_rule(item, segments, replace);
                }
            }
        }
        Value::Object(map) => {
            if current.as_str() == "*" {
                for value in map.values_mut() {
                    apply_rule(value, remaining, replace);
                }
            } else if let Some(value) = map.get_mut(current.as_str()) {
                apply_rule(value, remaining, replace);
            }
        }
        // Scalar with segments left: nothing to descend into.
        _ => {}
    }
}

/// Terminal replacement. A mapping spec looks up the stringified current
/// value, then its `"*"` default, and otherwise leaves the slot alone;
/// any other spec replaces the slot unconditionally.
fn replace_slot(slot: &mut Value, replace: &Value) {
    match replace {
        Value::Object(mapping) => {
            let key = stringify(slot);
            if let Some(next) = mapping.get(&key).or_else(|| mapping.get("*")) {
                *slot = next.clone();
            }
        }
        literal => *slot = literal.clone(),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule_set(rules: &[(&str, Value)]) -> LanguageRuleSet {
        rules
            .iter()
            .map(|(path, replace)| (path.to_string(), replace.clone()))
            .collect()
    }

    fn translate(rules: &[(&str, Value)], input: Value) -> Value {
        JsonTranslator::new(&rule_set(rules)).translate(input)
    }

    #[test]
    fn wildcard_replaces_every_map_value() {
        let output = translate(&[("a.*", json!(0))], json!({ "a": { "x": 1, "y": 2 } }));
        assert_eq!(output, json!({ "a": { "x": 0, "y": 0 } }));
    }

    #[test]
    fn mapping_replacement_matches_exact_value() {
        let rules = [("status", json!({ "open": "OPEN", "*": "UNKNOWN" }))];
        assert_eq!(
            translate(&rules, json!({ "status": "open" })),
            json!({ "status": "OPEN" })
        );
        assert_eq!(
            translate(&rules, json!({ "status": "weird" })),
            json!({ "status": "UNKNOWN" })
        );
    }

    #[test]
    fn mapping_without_match_or_default_leaves_value() {
        let output = translate(
            &[("status", json!({ "open": "OPEN" }))],
            json!({ "status": "closed" }),
        );
        assert_eq!(output, json!({ "status": "closed" }));
    }

    #[test]
    fn lists_are_transparent_to_concrete_keys() {
        let output = translate(
            &[("items.name", json!("X"))],
            json!({ "items": [ { "name": "a" }, { "name": "b" } ] }),
        );
        assert_eq!(
            output,
            json!({ "items": [ { "name": "X" }, { "name": "X" } ] })
        );
    }

    #[test]
    fn wildcard_descends_into_list_elements() {
        let output = translate(
            &[("items.*.name", json!("X"))],
            json!({ "items": [ { "name": "a" }, { "name": "b" } ] }),
        );
        assert_eq!(
            output,
            json!({ "items": [ { "name": "X" }, { "name": "X" } ] })
        );
    }

    #[test]
    fn empty_rules_pass_value_through() {
        let input = json!({ "a": { "b": [1, 2, 3] } });
        let output = JsonTranslator::from_rules(Vec::new()).translate(input.clone());
        assert_eq!(output, input);
    }

    #[test]
    fn scalar_input_untouched() {
        let output = translate(&[("a", json!("X"))], json!("scalar"));
        assert_eq!(output, json!("scalar"));
    }

    #[test]
    fn absent_key_is_a_noop() {
        let input = json!({ "a": 1 });
        assert_eq!(translate(&[("missing", json!("X"))], input.clone()), input);
    }

    #[test]
    fn later_rules_overwrite_overlapping_paths() {
        // "a.*" writes both keys, then "a.x" overwrites one of them.
        let output = translate(
            &[("a.*", json!("all")), ("a.x", json!("specific"))],
            json!({ "a": { "x": 1, "y": 2 } }),
        );
        assert_eq!(output, json!({ "a": { "x": "specific", "y": "all" } }));
    }

    #[test]
    fn duplicate_paths_apply_in_list_order() {
        let translator = JsonTranslator::from_rules(vec![
            TranslationRule {
                path: "title".to_string(),
                replace: json!("first"),
            },
            TranslationRule {
                path: "title".to_string(),
                replace: json!("second"),
            },
        ]);
        assert_eq!(
            translator.translate(json!({ "title": "original" })),
            json!({ "title": "second" })
        );
    }

    #[test]
    fn mapping_matches_numbers_through_json_rendering() {
        let output = translate(
            &[("code", json!({ "1": "one", "*": "other" }))],
            json!({ "code": 1 }),
        );
        assert_eq!(output, json!({ "code": "one" }));
    }

    #[test]
    fn mapping_matches_booleans_through_json_rendering() {
        let output = translate(
            &[("active", json!({ "true": "yes" }))],
            json!({ "active": true }),
        );
        assert_eq!(output, json!({ "active": "yes" }));
    }

    #[test]
    fn nested_wildcards_reach_deep_values() {
        let output = translate(
            &[("a.*.y", json!(0))],
            json!({ "a": { "p": { "y": 1 }, "q": { "y": 2, "z": 3 } } }),
        );
        assert_eq!(
            output,
            json!({ "a": { "p": { "y": 0 }, "q": { "y": 0, "z": 3 } } })
        );
    }

    #[test]
    fn literal_replacement_overwrites_subtree() {
        let output = translate(
            &[("meta", json!(["replaced"]))],
            json!({ "meta": { "deep": { "tree": 1 } } }),
        );
        assert_eq!(output, json!({ "meta": ["replaced"] }));
    }

    #[test]
    fn scalar_mid_path_stops_descent() {
        let input = json!({ "a": "leaf" });
        assert_eq!(translate(&[("a.b.c", json!("X"))], input.clone()), input);
    }

    #[test]
    fn empty_path_rules_are_dropped() {
        let input = json!({ "a": 1 });
        let translator = JsonTranslator::from_rules(vec![TranslationRule {
            path: String::new(),
            replace: json!("X"),
        }]);
        assert_eq!(translator.translate(input.clone()), input);
    }
}

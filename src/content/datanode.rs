//! Typed access to the fields of a content node.
//!
//! Every getter takes a default: absent fields quietly fall back to it, and
//! present fields of the wrong kind are reported before falling back too.

use serde_json::Value;

use crate::content::errors::{ContentError, ErrorReporter};
use crate::math::Vec2;

pub struct PropReader<'a> {
    node: &'a Value,
    source_name: &'a str,
}

impl<'a> PropReader<'a> {
    pub fn new(node: &'a Value, source_name: &'a str) -> Self {
        Self { node, source_name }
    }

    pub fn source_name(&self) -> &str {
        self.source_name
    }

    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.node.get(field).filter(|v| !v.is_null())
    }

    fn invalid(&self, field: &str, value: &Value, errors: &mut ErrorReporter) {
        errors.report(ContentError::InvalidValue {
            source_name: self.source_name.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        });
    }

    pub fn f32(&self, field: &str, default: f32, errors: &mut ErrorReporter) -> f32 {
        match self.get(field) {
            None => default,
            Some(v) => match v.as_f64() {
                Some(n) => n as f32,
                None => {
                    self.invalid(field, v, errors);
                    default
                }
            },
        }
    }

    pub fn usize(&self, field: &str, default: usize, errors: &mut ErrorReporter) -> usize {
        match self.get(field) {
            None => default,
            Some(v) => match v.as_u64() {
                Some(n) => n as usize,
                None => {
                    self.invalid(field, v, errors);
                    default
                }
            },
        }
    }

    pub fn bool(&self, field: &str, default: bool, errors: &mut ErrorReporter) -> bool {
        match self.get(field) {
            None => default,
            Some(v) => match v.as_bool() {
                Some(b) => b,
                None => {
                    self.invalid(field, v, errors);
                    default
                }
            },
        }
    }

    pub fn string(&self, field: &str, default: &str, errors: &mut ErrorReporter) -> String {
        match self.get(field) {
            None => default.to_string(),
            Some(v) => match v.as_str() {
                Some(s) => s.to_string(),
                None => {
                    self.invalid(field, v, errors);
                    default.to_string()
                }
            },
        }
    }

    /// Reads a string field and maps it through `parse`. Strings `parse`
    /// rejects are reported.
    pub fn parse_str<T>(
        &self,
        field: &str,
        default: T,
        errors: &mut ErrorReporter,
        parse: impl Fn(&str) -> Option<T>,
    ) -> T {
        match self.get(field) {
            None => default,
            Some(v) => match v.as_str().and_then(&parse) {
                Some(parsed) => parsed,
                None => {
                    self.invalid(field, v, errors);
                    default
                }
            },
        }
    }

    /// Reads a list of `[x, y]` points.
    pub fn points(&self, field: &str, errors: &mut ErrorReporter) -> Vec<Vec2> {
        let Some(v) = self.get(field) else {
            return Vec::new();
        };
        match serde_json::from_value::<Vec<[f32; 2]>>(v.clone()) {
            Ok(list) => list.into_iter().map(Vec2::from).collect(),
            Err(_) => {
                self.invalid(field, v, errors);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_and_errors() {
        let node = json!({ "radius": 12.5, "walkable": "yes", "name": "Bomb" });
        let r = PropReader::new(&node, "tools/bomb");
        let mut errors = ErrorReporter::new();

        assert_eq!(r.f32("radius", 1.0, &mut errors), 12.5);
        assert_eq!(r.f32("height", 7.0, &mut errors), 7.0);
        assert!(!r.bool("walkable", false, &mut errors));
        assert_eq!(r.string("name", "", &mut errors), "Bomb");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn parse_str_reports_unknown_values() {
        let node = json!({ "consumer": "enemies" });
        let r = PropReader::new(&node, "drops/x");
        let mut errors = ErrorReporter::new();
        let parsed = r.parse_str("consumer", 0, &mut errors, |s| match s {
            "pikmin" => Some(1),
            _ => None,
        });
        assert_eq!(parsed, 0);
        assert!(matches!(
            errors.errors()[0],
            ContentError::InvalidValue { .. }
        ));
    }

    #[test]
    fn points_parse() {
        let node = json!({ "checkpoints": [[0, 0], [10, 5.5]] });
        let r = PropReader::new(&node, "tracks/t");
        let mut errors = ErrorReporter::new();
        let pts = r.points("checkpoints", &mut errors);
        assert_eq!(pts, vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 5.5)]);
        assert!(errors.is_empty());
    }
}

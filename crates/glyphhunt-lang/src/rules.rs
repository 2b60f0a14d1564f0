//! Rule nodes compiled from `param` declarations, and their evaluation.
//!
//! Rules are evaluated lazily by the matcher: a tag rule against the set of
//! boundary characters of a component, a pluck rule against its interior
//! text, and a link rule against the boxes of an ordered component pair.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use regex::Regex;
use serde::Serialize;

use glyphhunt_core::{is_valid_type_name, BoundingBox, Error, Result};

use crate::ast::{ParamDecl, RuleKind};

/// A single compiled rule.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Boundary characters must belong to a literal set
    Tag(TagRule),
    /// Interior text must yield a value for a regex
    Pluck(PluckRule),
    /// Two components related by type and geometry
    Link(LinkRule),
}

impl Rule {
    /// Compile a parsed param into a rule.
    ///
    /// Structural problems (bad link arity, unknown geometry) are syntax
    /// errors at the param's position. Invalid pluck regexes are not: they
    /// are kept and reported when evaluated.
    pub fn from_param(param: &ParamDecl) -> Result<Self> {
        match param.kind {
            RuleKind::Tag => Ok(Rule::Tag(TagRule::new(&param.target, param.values.clone()))),
            RuleKind::Pluck => Ok(Rule::Pluck(PluckRule::new(&param.target, &param.values))),
            RuleKind::Link => LinkRule::from_values(&param.target, &param.values)
                .map(Rule::Link)
                .map_err(|message| Error::Syntax {
                    line: param.line,
                    column: param.column,
                    message,
                }),
        }
    }
}

/// Literal-set membership test on boundary characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRule {
    /// Component type (or free-form name) the rule is declared for
    pub target: String,
    /// Accepted literals in declaration order
    pub literals: Vec<String>,
}

impl TagRule {
    /// Create a tag rule.
    pub fn new(target: impl Into<String>, literals: Vec<String>) -> Self {
        Self {
            target: target.into(),
            literals,
        }
    }

    /// Score a set of boundary symbols, `None` when the rule fails.
    ///
    /// Whitespace symbols are ignored. Every remaining symbol must be a
    /// single-character literal (1.0) or a character of a longer literal
    /// (0.5); the score is the mean over the symbols. No symbols at all is
    /// a failure.
    pub fn score(&self, symbols: &BTreeSet<char>) -> Option<f64> {
        let mut total = 0.0;
        let mut count = 0usize;
        for symbol in symbols.iter().filter(|c| !c.is_whitespace()) {
            total += self.symbol_score(*symbol)?;
            count += 1;
        }
        if count == 0 {
            None
        } else {
            Some(total / count as f64)
        }
    }

    fn symbol_score(&self, symbol: char) -> Option<f64> {
        let mut partial = false;
        for literal in &self.literals {
            let mut chars = literal.chars();
            match (chars.next(), chars.next()) {
                (Some(only), None) if only == symbol => return Some(1.0),
                (Some(_), Some(_)) if literal.contains(symbol) => partial = true,
                _ => {}
            }
        }
        partial.then_some(0.5)
    }
}

/// Value pulled out of interior text by a pluck rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    /// Capture group 1 (or the whole match), trimmed
    pub value: String,
    /// Non-empty named captures, trimmed
    pub captures: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
struct PluckExpr {
    source: String,
    compiled: std::result::Result<Regex, String>,
}

/// Regex extraction from interior text.
#[derive(Debug, Clone)]
pub struct PluckRule {
    /// Property the extracted value is stored under
    pub target: String,
    exprs: Vec<PluckExpr>,
}

impl PluckRule {
    /// Create a pluck rule. Expressions are compiled once, up front.
    pub fn new(target: impl Into<String>, expressions: &[String]) -> Self {
        let exprs = expressions
            .iter()
            .map(|source| PluckExpr {
                source: source.clone(),
                compiled: Regex::new(source).map_err(|e| e.to_string()),
            })
            .collect();
        Self {
            target: target.into(),
            exprs,
        }
    }

    /// Expressions that failed to compile, with the regex error.
    pub fn invalid_expressions(&self) -> Vec<(&str, &str)> {
        self.exprs
            .iter()
            .filter_map(|e| match &e.compiled {
                Ok(_) => None,
                Err(msg) => Some((e.source.as_str(), msg.as_str())),
            })
            .collect()
    }

    /// Try each expression in order against `text`.
    ///
    /// The first expression that yields a non-empty value wins. Reaching an
    /// expression that does not compile is an [`Error::InvalidPattern`].
    pub fn extract(&self, text: &str) -> Result<Option<Extraction>> {
        for expr in &self.exprs {
            let re = expr.compiled.as_ref().map_err(|msg| {
                Error::InvalidPattern(format!(
                    "pluck `{}`: invalid regex `{}`: {msg}",
                    self.target, expr.source
                ))
            })?;
            let Some(caps) = re.captures(text) else {
                continue;
            };
            let value = caps
                .get(1)
                .or_else(|| caps.get(0))
                .map(|m| m.as_str().trim())
                .unwrap_or_default();
            if value.is_empty() {
                continue;
            }
            let captures = re
                .capture_names()
                .flatten()
                .filter_map(|name| {
                    let found = caps.name(name)?.as_str().trim();
                    (!found.is_empty()).then(|| (name.to_string(), found.to_string()))
                })
                .collect();
            return Ok(Some(Extraction {
                value: value.to_string(),
                captures,
            }));
        }
        Ok(None)
    }
}

/// Component type filter of a link rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeFilter {
    /// `*`
    Any,
    /// A single component type
    Exact(String),
}

impl TypeFilter {
    /// Whether a component type passes the filter.
    pub fn accepts(&self, component_type: &str) -> bool {
        match self {
            TypeFilter::Any => true,
            TypeFilter::Exact(expected) => expected == component_type,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::Any => f.write_str("*"),
            TypeFilter::Exact(name) => f.write_str(name),
        }
    }
}

/// Geometric condition between the source and target boxes of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Geometry {
    /// Target strictly inside source with a one-cell margin
    #[default]
    Inside,
    /// Boxes share at least one cell
    Overlaps,
    /// Boxes touch without overlapping
    Adjacent,
    /// No geometric condition
    Any,
}

impl Geometry {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "inside" => Some(Geometry::Inside),
            "overlaps" => Some(Geometry::Overlaps),
            "adjacent" => Some(Geometry::Adjacent),
            "any" => Some(Geometry::Any),
            _ => None,
        }
    }

    /// Whether the condition holds from `source` to `target`.
    pub fn holds(&self, source: &BoundingBox, target: &BoundingBox) -> bool {
        match self {
            Geometry::Inside => source.strictly_contains(target, 1),
            Geometry::Overlaps => source.intersects(target),
            Geometry::Adjacent => source.is_adjacent(target),
            Geometry::Any => true,
        }
    }
}

/// Relationship rule between two component types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRule {
    /// Relationship kind produced
    pub kind: String,
    /// Accepted source types
    pub source: TypeFilter,
    /// Accepted target types
    pub target: TypeFilter,
    /// Condition on the two boxes
    pub geometry: Geometry,
}

impl LinkRule {
    /// Build from `(source_type, target_type[, geometry])`.
    pub fn from_values(kind: &str, values: &[String]) -> std::result::Result<Self, String> {
        let (source, target, geometry) = match values {
            [source, target] => (source, target, None),
            [source, target, geometry] => (source, target, Some(geometry)),
            _ => {
                return Err(format!(
                    "link `{kind}` takes (source_type, target_type[, geometry]), got {} values",
                    values.len()
                ))
            }
        };
        let geometry = match geometry {
            None => Geometry::default(),
            Some(g) => Geometry::parse(g).ok_or_else(|| {
                format!("link `{kind}`: unknown geometry `{g}` (expected inside, overlaps, adjacent or any)")
            })?,
        };
        Ok(Self {
            kind: kind.to_string(),
            source: type_filter(kind, source)?,
            target: type_filter(kind, target)?,
            geometry,
        })
    }

    /// Whether an ordered pair of typed boxes satisfies the rule.
    pub fn relates(
        &self,
        source_type: &str,
        source_box: &BoundingBox,
        target_type: &str,
        target_box: &BoundingBox,
    ) -> bool {
        self.source.accepts(source_type)
            && self.target.accepts(target_type)
            && self.geometry.holds(source_box, target_box)
    }
}

fn type_filter(kind: &str, value: &str) -> std::result::Result<TypeFilter, String> {
    if value != "*" && !is_valid_type_name(value) {
        return Err(format!("link `{kind}`: `{value}` is not a component type or `*`"));
    }
    Ok(if value == "*" {
        TypeFilter::Any
    } else {
        TypeFilter::Exact(value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(s: &str) -> BTreeSet<char> {
        s.chars().collect()
    }

    fn checkbox_tag() -> TagRule {
        TagRule::new(
            "checkbox",
            vec!["□".into(), "■".into(), "[ ]".into(), "[X]".into()],
        )
    }

    #[test]
    fn test_tag_exact_literal() {
        assert_eq!(checkbox_tag().score(&symbols("□ ")), Some(1.0));
    }

    #[test]
    fn test_tag_rejects_foreign_symbol() {
        assert_eq!(checkbox_tag().score(&symbols("#")), None);
        assert_eq!(checkbox_tag().score(&symbols("□#")), None);
    }

    #[test]
    fn test_tag_partial_literal() {
        assert_eq!(checkbox_tag().score(&symbols("[]")), Some(0.5));
        assert_eq!(checkbox_tag().score(&symbols("■[")), Some(0.75));
    }

    #[test]
    fn test_tag_blank_boundary_fails() {
        assert_eq!(checkbox_tag().score(&symbols("   ")), None);
        assert_eq!(checkbox_tag().score(&BTreeSet::new()), None);
    }

    #[test]
    fn test_pluck_group_and_fallback() {
        let rule = PluckRule::new(
            "label",
            &[r"\[(.*)\]".to_string(), r"\w+".to_string()],
        );
        assert_eq!(rule.extract("[ OK ]").unwrap().unwrap().value, "OK");
        assert_eq!(rule.extract("  Cancel ").unwrap().unwrap().value, "Cancel");
        assert_eq!(rule.extract("  ").unwrap(), None);
    }

    #[test]
    fn test_pluck_empty_group_tries_next() {
        let rule = PluckRule::new("label", &[r"\[(\s*)\]".to_string(), r"(.+)".to_string()]);
        assert_eq!(rule.extract("[  ]").unwrap().unwrap().value, "[  ]");
    }

    #[test]
    fn test_pluck_named_captures() {
        let rule = PluckRule::new("value", &[r"(?P<done>\d+)/(?P<total>\d+)".to_string()]);
        let extraction = rule.extract("progress 3/10").unwrap().unwrap();
        assert_eq!(extraction.value, "3");
        assert_eq!(extraction.captures["done"], "3");
        assert_eq!(extraction.captures["total"], "10");
    }

    #[test]
    fn test_pluck_invalid_regex() {
        let rule = PluckRule::new("label", &["([unclosed".to_string()]);
        assert_eq!(rule.invalid_expressions().len(), 1);
        assert!(matches!(rule.extract("text"), Err(Error::InvalidPattern(_))));
    }

    #[test]
    fn test_link_parsing() {
        let values: Vec<String> = vec!["window".into(), "*".into()];
        let link = LinkRule::from_values("contains", &values).unwrap();
        assert_eq!(link.source, TypeFilter::Exact("window".into()));
        assert_eq!(link.target, TypeFilter::Any);
        assert_eq!(link.geometry, Geometry::Inside);

        let bad_arity: Vec<String> = vec!["window".into()];
        assert!(LinkRule::from_values("contains", &bad_arity).is_err());

        let bad_geometry: Vec<String> = vec!["a".into(), "b".into(), "near".into()];
        assert!(LinkRule::from_values("k", &bad_geometry).is_err());

        let bad_type: Vec<String> = vec!["two words".into(), "b".into()];
        assert!(LinkRule::from_values("k", &bad_type).is_err());
    }

    #[test]
    fn test_link_relates() {
        let values: Vec<String> = vec!["window".into(), "button".into(), "inside".into()];
        let link = LinkRule::from_values("has_button", &values).unwrap();
        let outer = BoundingBox::new(0, 0, 9, 9);
        let inner = BoundingBox::new(2, 2, 5, 3);
        assert!(link.relates("window", &outer, "button", &inner));
        assert!(!link.relates("window", &inner, "button", &outer));
        assert!(!link.relates("dialog", &outer, "button", &inner));
    }

    #[test]
    fn test_geometry_variants() {
        let a = BoundingBox::new(0, 0, 3, 3);
        let b = BoundingBox::new(4, 0, 6, 3);
        let c = BoundingBox::new(2, 2, 5, 5);
        assert!(Geometry::Adjacent.holds(&a, &b));
        assert!(!Geometry::Overlaps.holds(&a, &b));
        assert!(Geometry::Overlaps.holds(&a, &c));
        assert!(Geometry::Any.holds(&a, &b));
    }
}

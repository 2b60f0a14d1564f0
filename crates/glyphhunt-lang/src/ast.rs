//! Syntax tree of a parsed HUNT source.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Kind of a `param` declaration.
///
/// The set is closed: the parser rejects any other kind, and every
/// consumer matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Literal-set membership test on boundary characters
    Tag,
    /// Regex extraction from interior text
    Pluck,
    /// Relationship between two component types
    Link,
}

impl RuleKind {
    /// Keyword used in source text.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Tag => "tag",
            RuleKind::Pluck => "pluck",
            RuleKind::Link => "link",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tag" => Ok(RuleKind::Tag),
            "pluck" => Ok(RuleKind::Pluck),
            "link" => Ok(RuleKind::Link),
            other => Err(format!(
                "unknown param kind `{other}` (expected tag, pluck or link)"
            )),
        }
    }
}

/// `{param <kind>:<target> = (val v1, v2, ...)}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    /// Param kind
    pub kind: RuleKind,
    /// Target name (component type, property or relationship kind)
    pub target: String,
    /// Values in declaration order, unquoted
    pub values: Vec<String>,
    /// 1-based line of the opening `{`
    pub line: usize,
    /// 1-based column of the opening `{`
    pub column: usize,
}

/// `[INIT GATHER = <param>+]`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GatherClause {
    /// Params in declaration order
    pub params: Vec<ParamDecl>,
}

/// `< hunt <name>: <gather> ><EXEC>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuntBlock {
    /// Track name the patterns are registered under
    pub name: String,
    /// The block's single GATHER clause
    pub gather: GatherClause,
    /// 1-based line of the opening `<`
    pub line: usize,
}

impl HuntBlock {
    /// Params of one kind, in declaration order.
    pub fn params_of(&self, kind: RuleKind) -> impl Iterator<Item = &ParamDecl> {
        self.gather.params.iter().filter(move |p| p.kind == kind)
    }
}

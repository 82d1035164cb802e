//! # Script Parser
//!
//! Turns the line-oriented batch format into a typed [`Script`].
//!
//! ## Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  5                        node count N                                 │
//! │  1 -1 Store               N lines: id price name  (price -1 = category)│
//! │  2 -1 Kitchen                                                          │
//! │  10 100 Kettle                                                         │
//! │  ...                                                                    │
//! │  1 2                      N-1 lines: a b  (attach)                     │
//! │  2 10                                                                   │
//! │  ...                                                                    │
//! │  3                        query count Q                                │
//! │  1 10 20                  1 id pct          percentage discount        │
//! │  2 11 30                  2 id amount       flat discount              │
//! │  3 1                      3 id              max discounted product     │
//! │                           4 parent id price name   add new node        │
//! │                           5 id              remove node                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Blank lines are skipped and never counted. Line numbers in errors refer to
//! the physical line in the input. A query with an unknown type code parses
//! into [`Query::Unknown`] so the run can report it and carry on; every other
//! malformed line is a [`CliError::Parse`].

use std::str::FromStr;

use catalog_core::{Discount, DiscountKind, NodeId};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{CliError, CliResult};

// =============================================================================
// Script Types
// =============================================================================

/// One `id price name` line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLine {
    pub line: usize,
    pub id: NodeId,
    pub price: f64,
    pub name: String,
}

/// One `a b` relationship line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeLine {
    pub line: usize,
    pub a: NodeId,
    pub b: NodeId,
}

/// A parsed query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum Query {
    /// Type 1 or 2.
    Discount { id: NodeId, discount: Discount },
    /// Type 3.
    MaxDiscounted { id: NodeId },
    /// Type 4.
    AddNode {
        parent: NodeId,
        id: NodeId,
        price: f64,
        name: String,
    },
    /// Type 5.
    Remove { id: NodeId },
    /// Any other type code.
    Unknown { code: String },
}

/// A query together with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryLine {
    pub line: usize,
    pub text: String,
    pub query: Query,
}

/// A whole parsed script.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Script {
    pub nodes: Vec<NodeLine>,
    pub edges: Vec<EdgeLine>,
    pub queries: Vec<QueryLine>,
}

impl Script {
    /// Number of queries with an unrecognised type code.
    pub fn unknown_queries(&self) -> usize {
        self.queries
            .iter()
            .filter(|q| matches!(q.query, Query::Unknown { .. }))
            .count()
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Iterator over non-blank lines, keeping 1-based physical line numbers.
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last_line: usize,
}

impl<'a> Lines<'a> {
    fn new(input: &'a str) -> Self {
        Lines {
            inner: input.lines().enumerate(),
            last_line: 0,
        }
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        for (index, text) in self.inner.by_ref() {
            self.last_line = index + 1;
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Some((index + 1, trimmed));
            }
        }
        None
    }

    fn require(&mut self, what: &str) -> CliResult<(usize, &'a str)> {
        self.next_line().ok_or_else(|| {
            CliError::parse(self.last_line + 1, format!("unexpected end of input, expected {}", what))
        })
    }
}

/// Parses a complete script.
///
/// A missing query count after the relationship lines means zero queries.
pub fn parse(input: &str) -> CliResult<Script> {
    let mut lines = Lines::new(input);
    let mut script = Script::default();

    let (line, text) = lines.require("node count")?;
    let node_count: usize = parse_field(line, text, "node count")?;

    for _ in 0..node_count {
        let (line, text) = lines.require("node line")?;
        script.nodes.push(parse_node(line, text)?);
    }

    for _ in 0..node_count.saturating_sub(1) {
        let (line, text) = lines.require("relationship line")?;
        script.edges.push(parse_edge(line, text)?);
    }

    if let Some((line, text)) = lines.next_line() {
        let query_count: usize = parse_field(line, text, "query count")?;
        for _ in 0..query_count {
            let (line, text) = lines.require("query line")?;
            script.queries.push(parse_query(line, text)?);
        }
    }

    if let Some((line, _)) = lines.next_line() {
        warn!(line, "Ignoring input after the last query");
    }

    debug!(
        nodes = script.nodes.len(),
        edges = script.edges.len(),
        queries = script.queries.len(),
        "Script parsed"
    );
    Ok(script)
}

fn parse_node(line: usize, text: &str) -> CliResult<NodeLine> {
    let mut fields = text.split_whitespace();
    let id = next_field(line, &mut fields, "node id")?;
    let price = next_field(line, &mut fields, "price")?;
    let name = rest(line, fields, "name")?;
    Ok(NodeLine {
        line,
        id: NodeId(id),
        price,
        name,
    })
}

fn parse_edge(line: usize, text: &str) -> CliResult<EdgeLine> {
    let mut fields = text.split_whitespace();
    let a = next_field(line, &mut fields, "first node id")?;
    let b = next_field(line, &mut fields, "second node id")?;
    no_more(line, fields)?;
    Ok(EdgeLine {
        line,
        a: NodeId(a),
        b: NodeId(b),
    })
}

fn parse_query(line: usize, text: &str) -> CliResult<QueryLine> {
    let mut fields = text.split_whitespace();
    let code = fields
        .next()
        .ok_or_else(|| CliError::parse(line, "missing query type"))?;

    let discount_kind = code.parse::<u8>().ok().and_then(DiscountKind::from_code);

    let query = match (code, discount_kind) {
        (_, Some(kind)) => {
            let id = next_field(line, &mut fields, "node id")?;
            let value = next_field(line, &mut fields, "discount value")?;
            no_more(line, fields)?;
            Query::Discount {
                id: NodeId(id),
                discount: Discount::new(kind, value),
            }
        }
        ("3", None) => {
            let id = next_field(line, &mut fields, "node id")?;
            no_more(line, fields)?;
            Query::MaxDiscounted { id: NodeId(id) }
        }
        ("4", None) => {
            let parent = next_field(line, &mut fields, "parent id")?;
            let id = next_field(line, &mut fields, "node id")?;
            let price = next_field(line, &mut fields, "price")?;
            let name = rest(line, fields, "name")?;
            Query::AddNode {
                parent: NodeId(parent),
                id: NodeId(id),
                price,
                name,
            }
        }
        ("5", None) => {
            let id = next_field(line, &mut fields, "node id")?;
            no_more(line, fields)?;
            Query::Remove { id: NodeId(id) }
        }
        (other, None) => Query::Unknown {
            code: other.to_string(),
        },
    };

    Ok(QueryLine {
        line,
        text: text.to_string(),
        query,
    })
}

// =============================================================================
// Field Helpers
// =============================================================================

fn parse_field<T: FromStr>(line: usize, raw: &str, what: &str) -> CliResult<T> {
    raw.parse()
        .map_err(|_| CliError::parse(line, format!("invalid {}: '{}'", what, raw)))
}

fn next_field<'a, T: FromStr>(
    line: usize,
    fields: &mut impl Iterator<Item = &'a str>,
    what: &str,
) -> CliResult<T> {
    let raw = fields
        .next()
        .ok_or_else(|| CliError::parse(line, format!("missing {}", what)))?;
    parse_field(line, raw, what)
}

/// Joins the remaining fields into a name.
fn rest<'a>(line: usize, fields: impl Iterator<Item = &'a str>, what: &str) -> CliResult<String> {
    let joined = fields.collect::<Vec<_>>().join(" ");
    if joined.is_empty() {
        return Err(CliError::parse(line, format!("missing {}", what)));
    }
    Ok(joined)
}

fn no_more<'a>(line: usize, mut fields: impl Iterator<Item = &'a str>) -> CliResult<()> {
    match fields.next() {
        Some(extra) => Err(CliError::parse(line, format!("unexpected field '{}'", extra))),
        None => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
5
1 -1 Store
2 -1 Kitchen
3 -1 Garden
10 100 Kettle
11 50 Garden Hose

1 2
1 3
2 10
3 11
4
1 10 20
2 11 30
3 1
7 1
";

    #[test]
    fn test_parse_sample() {
        let script = parse(SAMPLE).unwrap();
        assert_eq!(script.nodes.len(), 5);
        assert_eq!(script.edges.len(), 4);
        assert_eq!(script.queries.len(), 4);

        assert_eq!(script.nodes[0].price, -1.0);
        assert_eq!(script.nodes[4].name, "Garden Hose");
        // Blank line 7 is skipped but still counted
        assert_eq!(script.edges[0].line, 8);
        assert_eq!(
            script.queries[0].query,
            Query::Discount {
                id: NodeId(10),
                discount: Discount::percentage(20.0)
            }
        );
        assert_eq!(
            script.queries[1].query,
            Query::Discount {
                id: NodeId(11),
                discount: Discount::flat(30.0)
            }
        );
        assert_eq!(script.queries[2].query, Query::MaxDiscounted { id: NodeId(1) });
        assert_eq!(script.unknown_queries(), 1);
        assert_eq!(script.queries[3].text, "7 1");
    }

    #[test]
    fn test_add_and_remove_queries() {
        let script = parse("1\n1 -1 Root\n2\n4 1 5 -1 New Shelf\n5 1\n").unwrap();
        assert!(script.edges.is_empty());
        assert_eq!(
            script.queries[0].query,
            Query::AddNode {
                parent: NodeId(1),
                id: NodeId(5),
                price: -1.0,
                name: "New Shelf".to_string()
            }
        );
        assert_eq!(script.queries[1].query, Query::Remove { id: NodeId(1) });
    }

    #[test]
    fn test_discount_codes_are_numeric() {
        let script = parse("1\n1 -1 Root\n3\n01 1 5\n2 1 0.5\n-1 1 5\n").unwrap();
        assert_eq!(
            script.queries[0].query,
            Query::Discount {
                id: NodeId(1),
                discount: Discount::percentage(5.0)
            }
        );
        assert_eq!(
            script.queries[1].query,
            Query::Discount {
                id: NodeId(1),
                discount: Discount::flat(0.5)
            }
        );
        assert_eq!(
            script.queries[2].query,
            Query::Unknown {
                code: "-1".to_string()
            }
        );
    }

    #[test]
    fn test_missing_query_section_means_no_queries() {
        let script = parse("2\n1 -1 Root\n2 5 Pen\n1 2\n").unwrap();
        assert_eq!(script.nodes.len(), 2);
        assert!(script.queries.is_empty());
    }

    #[test]
    fn test_errors_name_the_line() {
        let err = parse("2\n1 -1 Root\n2 abc Pen\n").unwrap_err();
        assert!(matches!(err, CliError::Parse { line: 3, .. }));
        assert!(err.to_string().contains("invalid price"));

        let err = parse("1\n1 -1\n").unwrap_err();
        assert!(matches!(err, CliError::Parse { line: 2, .. }));

        let err = parse("2\n1 -1 Root\n2 5 Pen\n1 2 3\n").unwrap_err();
        assert!(err.to_string().contains("unexpected field '3'"));

        let err = parse("1\n1 -1 Root\n1\n3\n").unwrap_err();
        assert!(matches!(err, CliError::Parse { line: 4, .. }));

        let err = parse("3\n1 -1 Root\n").unwrap_err();
        assert!(err.to_string().contains("unexpected end of input"));

        assert!(parse("").is_err());
        assert!(parse("x\n").is_err());
    }
}

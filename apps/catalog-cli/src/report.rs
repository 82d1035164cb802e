//! # Report Rendering
//!
//! Result types produced by the runner and their text / JSON renderings.
//!
//! ## Text Output
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Discount applied.                   ◄── status of a mutation          │
//! │  Discount cannot be applied.         ◄── rejected query                │
//! │  11 Hose 50.00 20.00                 ◄── type 3: id name orig selling  │
//! │  No product found.                   ◄── type 3 on an empty category   │
//! │  line 4: Invalid ID.                 ◄── failed setup line             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A type 3 query on an existing category with no products prints
//! `No product found.`. Older drivers of this batch format printed
//! `Invalid ID.` there too; `Invalid ID.` is now reserved for ids that name
//! nothing, so golden files from those drivers differ on this line.

use std::fmt::Write as _;

use catalog_core::{Catalog, CatalogError, NodeId, Outcome, Product};
use serde::Serialize;

use crate::config::OutputSettings;
use crate::error::CliResult;
use crate::script::Script;

// =============================================================================
// Report Types
// =============================================================================

/// Which part of the script a report line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Node and relationship lines.
    Setup,
    /// Query lines.
    Query,
}

/// Result of one script line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    Status {
        outcome: Outcome,
    },
    Product {
        id: NodeId,
        name: String,
        original_price: f64,
        selling_price: f64,
    },
    NoProduct {
        node: NodeId,
    },
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    UnknownQuery {
        code: String,
    },
}

impl Entry {
    pub fn product(product: &Product) -> Self {
        Entry::Product {
            id: product.id(),
            name: product.name().to_string(),
            original_price: product.original_price(),
            selling_price: product.selling_price(),
        }
    }

    pub fn error(err: &CatalogError) -> Self {
        let detail = match err {
            CatalogError::DiscountCannotBeApplied { reason, .. } => Some(reason.to_string()),
            _ => None,
        };
        Entry::Error {
            message: err.to_string(),
            detail,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Entry::Error { .. } | Entry::UnknownQuery { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportLine {
    pub line: usize,
    pub phase: Phase,
    pub command: String,
    #[serde(flatten)]
    pub entry: Entry,
}

/// Counts describing a script and its run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub nodes: usize,
    pub relationships: usize,
    pub queries: usize,
    pub unknown_queries: usize,
    pub failures: usize,
}

impl Summary {
    pub fn of_script(script: &Script) -> Self {
        Summary {
            nodes: script.nodes.len(),
            relationships: script.edges.len(),
            queries: script.queries.len(),
            unknown_queries: script.unknown_queries(),
            failures: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub lines: Vec<ReportLine>,
    pub summary: Summary,
}

// =============================================================================
// Text Rendering
// =============================================================================

fn amount(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}

/// Renders one entry the way the batch format prints it.
pub fn entry_text(entry: &Entry, precision: usize) -> String {
    match entry {
        Entry::Status { outcome } => outcome.to_string(),
        Entry::Product {
            id,
            name,
            original_price,
            selling_price,
        } => format!(
            "{} {} {} {}",
            id,
            name,
            amount(*original_price, precision),
            amount(*selling_price, precision)
        ),
        Entry::NoProduct { .. } => "No product found.".to_string(),
        Entry::Error { message, .. } => message.clone(),
        Entry::UnknownQuery { code } => format!("Invalid query type: {}", code),
    }
}

/// Renders a run report, one line per result.
pub fn render_text(report: &Report, output: &OutputSettings) -> String {
    let mut out = String::new();
    for line in &report.lines {
        if output.echo_commands {
            let _ = writeln!(out, "> {}", line.command);
        }
        let text = entry_text(&line.entry, output.precision);
        match line.phase {
            Phase::Setup => {
                let _ = writeln!(out, "line {}: {}", line.line, text);
            }
            Phase::Query => {
                let _ = writeln!(out, "{}", text);
            }
        }
    }
    out
}

pub fn render_summary_text(summary: &Summary) -> String {
    format!(
        "nodes: {}\nrelationships: {}\nqueries: {} ({} unknown)\n",
        summary.nodes, summary.relationships, summary.queries, summary.unknown_queries
    )
}

pub fn render_json<T: Serialize>(value: &T) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

// =============================================================================
// Tree Rendering
// =============================================================================

/// Draws every tree in the catalog with each category's best product.
///
/// Child categories come before products, each group most discounted first.
///
/// ```text
/// 1 Store [best: 11 Hose, discount 30.00]
/// ├── 3 Garden [best: 11 Hose, discount 30.00]
/// │   └── 11 Hose 50.00 -> 20.00
/// └── 2 Kitchen [best: 10 Kettle, discount 20.00]
///     └── 10 Kettle 100.00 -> 80.00
/// ```
pub fn render_tree(catalog: &Catalog, precision: usize) -> String {
    let store = catalog.store();
    let mut out = String::new();

    // (node, prefix for its own line, prefix for its children)
    let mut stack: Vec<(NodeId, String, String)> = store
        .roots()
        .iter()
        .rev()
        .map(|c| (c.id(), String::new(), String::new()))
        .collect();

    while let Some((id, own_prefix, child_prefix)) = stack.pop() {
        if let Some(product) = store.product(id) {
            let _ = writeln!(
                out,
                "{}{} {} {} -> {}",
                own_prefix,
                product.id(),
                product.name(),
                amount(product.original_price(), precision),
                amount(product.selling_price(), precision)
            );
            continue;
        }
        let Some(category) = store.category(id) else {
            continue;
        };

        let best = match catalog.max_discounted_product(id).ok().flatten() {
            Some(p) => format!(
                "[best: {} {}, discount {}]",
                p.id(),
                p.name(),
                amount(p.discount(), precision)
            ),
            None => "[no products]".to_string(),
        };
        let _ = writeln!(out, "{}{} {} {}", own_prefix, id, category.name(), best);

        let children: Vec<NodeId> = category
            .ranked_child_categories()
            .map(|entry| entry.category_id)
            .chain(category.ranked_child_products().map(|entry| entry.product_id))
            .collect();
        let count = children.len();
        for (index, child) in children.into_iter().enumerate().rev() {
            let last = index + 1 == count;
            let own = format!("{}{}", child_prefix, if last { "└── " } else { "├── " });
            let nested = format!("{}{}", child_prefix, if last { "    " } else { "│   " });
            stack.push((child, own, nested));
        }
    }

    let detached: Vec<&Product> = store
        .products()
        .into_iter()
        .filter(|p| p.category().is_none())
        .collect();
    if !detached.is_empty() {
        let _ = writeln!(out, "(unattached)");
        for product in detached {
            let _ = writeln!(
                out,
                "    {} {} {} -> {}",
                product.id(),
                product.name(),
                amount(product.original_price(), precision),
                amount(product.selling_price(), precision)
            );
        }
    }

    out
}

// =============================================================================
// Unit Tests
// =============================================================================

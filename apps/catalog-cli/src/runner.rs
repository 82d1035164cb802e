//! # Script Runner
//!
//! Executes a parsed [`Script`] against a fresh [`Catalog`].
//!
//! ## Run Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Script                                                                 │
//! │    │                                                                    │
//! │    ├── nodes  ──► insert_node   ──┐                                    │
//! │    ├── edges  ──► attach_nodes  ──┼──► only failures are reported      │
//! │    │                              ┘                                    │
//! │    └── queries ─► apply_discount / max_discounted_product /            │
//! │                   add_new_node / remove_node                           │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                  one ReportLine per query, failed or not               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failing line never stops the run.

use catalog_core::Catalog;
use tracing::{debug, warn};

use crate::report::{Entry, Phase, Report, ReportLine, Summary};
use crate::script::{Query, QueryLine, Script};

pub struct Runner {
    catalog: Catalog,
    lines: Vec<ReportLine>,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    pub fn new() -> Self {
        Runner {
            catalog: Catalog::new(),
            lines: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Inserts the script's nodes, then applies its relationship lines.
    pub fn load(&mut self, script: &Script) {
        for node in &script.nodes {
            match self.catalog.insert_node(node.id, &node.name, node.price) {
                Ok(outcome) => debug!(line = node.line, %outcome, "Node inserted"),
                Err(err) => {
                    warn!(line = node.line, error = %err, "Node line rejected");
                    self.lines.push(ReportLine {
                        line: node.line,
                        phase: Phase::Setup,
                        command: format!("{} {} {}", node.id, node.price, node.name),
                        entry: Entry::error(&err),
                    });
                }
            }
        }

        for edge in &script.edges {
            match self.catalog.attach_nodes(edge.a, edge.b) {
                Ok(outcome) => debug!(line = edge.line, %outcome, "Relationship applied"),
                Err(err) => {
                    warn!(line = edge.line, error = %err, "Relationship line rejected");
                    self.lines.push(ReportLine {
                        line: edge.line,
                        phase: Phase::Setup,
                        command: format!("{} {}", edge.a, edge.b),
                        entry: Entry::error(&err),
                    });
                }
            }
        }
    }

    /// Executes one query and records its result.
    pub fn execute(&mut self, query: &QueryLine) -> &ReportLine {
        debug!(line = query.line, command = %query.text, "Executing query");

        let entry = match &query.query {
            Query::Discount { id, discount } => {
                match self.catalog.apply_discount(*id, *discount) {
                    Ok(outcome) => Entry::Status { outcome },
                    Err(err) => Entry::error(&err),
                }
            }
            Query::MaxDiscounted { id } => match self.catalog.max_discounted_product(*id) {
                Ok(Some(product)) => Entry::product(product),
                Ok(None) => Entry::NoProduct { node: *id },
                Err(err) => Entry::error(&err),
            },
            Query::AddNode {
                parent,
                id,
                price,
                name,
            } => match self.catalog.add_new_node(*parent, *id, *price, name) {
                Ok(outcome) => Entry::Status { outcome },
                Err(err) => Entry::error(&err),
            },
            Query::Remove { id } => match self.catalog.remove_node(*id) {
                Ok(outcome) => Entry::Status { outcome },
                Err(err) => Entry::error(&err),
            },
            Query::Unknown { code } => {
                warn!(line = query.line, code = %code, "Unknown query type");
                Entry::UnknownQuery { code: code.clone() }
            }
        };

        if let Entry::Error { message, detail } = &entry {
            debug!(line = query.line, %message, ?detail, "Query failed");
        }

        self.lines.push(ReportLine {
            line: query.line,
            phase: Phase::Query,
            command: query.text.clone(),
            entry,
        });
        &self.lines[self.lines.len() - 1]
    }

    /// Consumes the runner, returning the final catalog and the report.
    pub fn finish(self, script: &Script) -> (Catalog, Report) {
        let mut summary = Summary::of_script(script);
        summary.failures = self.lines.iter().filter(|l| l.entry.is_failure()).count();
        debug!(
            categories = self.catalog.store().category_count(),
            products = self.catalog.store().product_count(),
            failures = summary.failures,
            "Run finished"
        );
        (
            self.catalog,
            Report {
                lines: self.lines,
                summary,
            },
        )
    }
}

/// Loads and runs a whole script.
pub fn run(script: &Script) -> (Catalog, Report) {
    let mut runner = Runner::new();
    runner.load(script);
    for query in &script.queries {
        runner.execute(query);
    }
    runner.finish(script)
}

/// Builds the catalog from the node and relationship lines only.
pub fn build(script: &Script) -> (Catalog, Report) {
    let mut runner = Runner::new();
    runner.load(script);
    runner.finish(script)
}

// =============================================================================
// Unit Tests
// =============================================================================

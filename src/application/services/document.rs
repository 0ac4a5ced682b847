//! Rule document service
//!
//! Loads a TOML rule document, reads every rule's notation into a syntax tree
//! and produces the listing, diagram and diagnostic views of the result.

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::diagram::{to_diagram_with_anchor, DiagramNode};
use crate::domain::{parse, render_rule, CompiledRule, RuleDocument, RuleRecord, SyntaxError};
use crate::infrastructure::traits::FileSystem;

/// A rule whose notation could not be read.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDiagnostic {
    pub rule: String,
    pub error: SyntaxError,
}

/// Diagram model of one rule, ready to hand to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleDiagram {
    pub name: String,
    pub label: String,
    pub diagram: DiagramNode,
}

/// Service for turning rule documents into syntax trees and their projections.
pub struct DocumentService {
    fs: Arc<dyn FileSystem>,
}

impl DocumentService {
    /// Create a new document service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read and deserialize a rule document.
    pub fn load(&self, path: &Path) -> ApplicationResult<RuleDocument> {
        debug!("load: path={}", path.display());
        if !self.fs.is_file(path) {
            return Err(ApplicationError::OperationFailed {
                context: format!("rule document not found: {}", path.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "file does not exist",
                )),
            });
        }

        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read rule document", path)?;
        let doc: RuleDocument =
            toml::from_str(&content).map_err(|e| ApplicationError::Document {
                path: path.to_path_buf(),
                message: e.to_string().trim_end().to_string(),
            })?;

        debug!("load: found {} rules", doc.rules.len());
        Ok(doc)
    }

    /// Read every rule's notation, stopping at the first failure in document order.
    ///
    /// Rules are parsed in parallel with rayon; the result keeps document order.
    pub fn compile(&self, doc: &RuleDocument) -> ApplicationResult<Vec<CompiledRule>> {
        debug!("compile: {} rules", doc.rules.len());

        let results: Vec<ApplicationResult<CompiledRule>> =
            doc.rules.par_iter().map(compile_rule).collect();

        // Collect successes, propagate first error
        let mut compiled = Vec::with_capacity(results.len());
        for result in results {
            compiled.push(result?);
        }

        debug!(
            "compile: {} rules with syntax",
            compiled.iter().filter(|r| r.syntax.is_some()).count()
        );
        Ok(compiled)
    }

    /// Read every rule's notation and report all failures.
    pub fn check(&self, doc: &RuleDocument) -> Vec<RuleDiagnostic> {
        let diagnostics: Vec<RuleDiagnostic> = doc
            .rules
            .par_iter()
            .filter_map(|rule| {
                let source = rule.syntax.as_deref()?;
                parse(source).err().map(|error| RuleDiagnostic {
                    rule: rule.name.clone(),
                    error,
                })
            })
            .collect();

        debug!("check: {} failing rules", diagnostics.len());
        diagnostics
    }

    /// Keep only the rule called `name`.
    pub fn select(
        &self,
        compiled: Vec<CompiledRule>,
        name: &str,
    ) -> ApplicationResult<Vec<CompiledRule>> {
        let selected: Vec<CompiledRule> = compiled.into_iter().filter(|r| r.name == name).collect();
        if selected.is_empty() {
            return Err(ApplicationError::UnknownRule(name.to_string()));
        }
        Ok(selected)
    }

    /// Listing of all rules with syntax: the rule name, then its `::=` body.
    ///
    /// Rules are separated by a blank line.
    pub fn render_listing(&self, compiled: &[CompiledRule], prefix: &str, separator: &str) -> String {
        let blocks: Vec<String> = compiled
            .iter()
            .filter_map(|rule| {
                let syntax = rule.syntax.as_ref()?;
                Some(format!("{}\n{}", rule.name, render_rule(syntax, prefix, separator)))
            })
            .collect();
        blocks.join("\n\n")
    }

    /// Diagram models of all rules with syntax.
    pub fn diagrams(&self, compiled: &[CompiledRule], anchor_prefix: &str) -> Vec<RuleDiagram> {
        compiled
            .iter()
            .filter_map(|rule| {
                let syntax = rule.syntax.as_ref()?;
                Some(RuleDiagram {
                    name: rule.name.clone(),
                    label: rule.label.clone(),
                    diagram: to_diagram_with_anchor(syntax, anchor_prefix),
                })
            })
            .collect()
    }
}

fn compile_rule(rule: &RuleRecord) -> ApplicationResult<CompiledRule> {
    let syntax = match rule.syntax.as_deref() {
        Some(source) => Some(parse(source).map_err(|source| ApplicationError::RuleSyntax {
            rule: rule.name.clone(),
            source,
        })?),
        None => None,
    };
    Ok(CompiledRule {
        name: rule.name.clone(),
        label: rule.label().to_string(),
        syntax,
        fields: rule.fields.clone(),
    })
}

//! Advisory checks over a typed workflow record.
//!
//! Every finding is a warning: these rules never make a folder invalid.

use flowdoc_types::WorkflowRecord;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One finding emitted by a lint rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintResult {
    pub code: String,
    pub message: String,
    pub location: Option<String>,
}

impl LintResult {
    pub fn new(code: impl Into<String>, message: impl Into<String>, location: Option<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            location,
        }
    }
}

impl std::fmt::Display for LintResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.message, self.code)
    }
}

pub trait WorkflowLintRule {
    fn validate(&self, workflow: &WorkflowRecord) -> Vec<LintResult>;
}

/// Runs the built-in rules.
pub struct LintRegistry {
    rules: Vec<Box<dyn WorkflowLintRule>>,
}

impl LintRegistry {
    pub fn new() -> Self {
        let rules: Vec<Box<dyn WorkflowLintRule>> = vec![
            Box::new(DuplicateNodeNamesRule),
            Box::new(UnknownConnectionSourceRule),
            Box::new(UnknownConnectionTargetRule),
        ];
        Self { rules }
    }

    /// Results are sorted by `(code asc, location asc)`.
    pub fn run(&self, workflow: &WorkflowRecord) -> Vec<LintResult> {
        let mut results = Vec::new();
        for rule in &self.rules {
            results.extend(rule.validate(workflow));
        }
        results.sort_by(|a, b| a.code.cmp(&b.code).then(a.location.cmp(&b.location)));
        results
    }
}

impl Default for LintRegistry {
    fn default() -> Self {
        Self::new()
    }
}

struct DuplicateNodeNamesRule;

impl WorkflowLintRule for DuplicateNodeNamesRule {
    fn validate(&self, workflow: &WorkflowRecord) -> Vec<LintResult> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for node in &workflow.nodes {
            *counts.entry(node.name.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, count)| {
                LintResult::new(
                    "WF-LINT-001",
                    format!("workflow.json has {} nodes named '{}'", count, name),
                    Some(name.to_string()),
                )
            })
            .collect()
    }
}

struct UnknownConnectionSourceRule;

impl WorkflowLintRule for UnknownConnectionSourceRule {
    fn validate(&self, workflow: &WorkflowRecord) -> Vec<LintResult> {
        let known = node_names(workflow);
        workflow
            .connections
            .keys()
            .filter(|source| !known.contains(source.as_str()))
            .map(|source| {
                LintResult::new(
                    "WF-LINT-002",
                    format!("workflow.json has connections from unknown node '{}'", source),
                    Some(source.clone()),
                )
            })
            .collect()
    }
}

struct UnknownConnectionTargetRule;

impl WorkflowLintRule for UnknownConnectionTargetRule {
    fn validate(&self, workflow: &WorkflowRecord) -> Vec<LintResult> {
        let known = node_names(workflow);
        let mut out = Vec::new();
        for (source, outputs) in &workflow.connections {
            let targets = outputs.values().flatten().flatten();
            for target in targets {
                if !known.contains(target.node.as_str()) {
                    out.push(LintResult::new(
                        "WF-LINT-003",
                        format!(
                            "workflow.json connection from '{}' targets unknown node '{}'",
                            source, target.node
                        ),
                        Some(source.clone()),
                    ));
                }
            }
        }
        out
    }
}

fn node_names(workflow: &WorkflowRecord) -> HashSet<&str> {
    workflow.nodes.iter().map(|node| node.name.as_str()).collect()
}

// Analysed program snapshots: token arena plus syntax skeleton

use crate::parser::ast::{Node, NodeType};
use crate::parser::lexer::{LexError, Lexer, Token};
use crate::parser::parse::{ParseError, Parser};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from analysing one snapshot
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// One analysed snapshot of a program.
///
/// Owns the token list the tree's spans index into, so nodes can always be
/// resolved back to source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub name: String,
    tokens: Vec<Token>,
    tree: Node,
}

impl Snapshot {
    /// Lex and parse `source`.
    pub fn analyze(name: impl Into<String>, source: &str) -> Result<Self, AnalysisError> {
        let name = name.into();
        let tokens = Lexer::new(source).tokenize()?;
        let tree = Parser::new(&tokens).parse()?;
        debug!(%name, tokens = tokens.len(), "analysed snapshot");
        Ok(Self { name, tokens, tree })
    }

    /// Read and analyse a source file.
    pub fn from_path(path: &Path) -> Result<Self, AnalysisError> {
        let source = read_source(path)?;
        Self::analyze(path.display().to_string(), &source)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Root of the tree, always a [`NodeType::Unit`].
    pub fn tree(&self) -> &Node {
        &self.tree
    }

    /// Source text of `node`, lexemes joined with single spaces.
    pub fn text(&self, node: &Node) -> String {
        node.text(&self.tokens)
    }

    /// Number of nodes of each type in the tree.
    pub fn node_counts(&self) -> FxHashMap<NodeType, usize> {
        let mut counts = FxHashMap::default();
        for (node, _) in self.tree.walk() {
            *counts.entry(node.node_type).or_insert(0) += 1;
        }
        counts
    }

    /// Deepest nesting of control-flow statements (0 when there are none).
    pub fn control_flow_depth(&self) -> usize {
        fn depth(node: &Node) -> usize {
            let below = node.children.iter().map(depth).max().unwrap_or(0);
            if node.node_type.is_control_flow() {
                below + 1
            } else {
                below
            }
        }
        depth(&self.tree)
    }

    /// Names of the functions defined (not just declared) in this snapshot.
    pub fn function_names(&self) -> Vec<&str> {
        self.tree
            .walk()
            .filter(|(node, _)| {
                node.node_type == NodeType::Declarator
                    && node.children_of(NodeType::BlockStatement).next().is_some()
            })
            .filter_map(|(node, _)| node.first_token(&self.tokens))
            .map(|t| t.lexeme.as_str())
            .collect()
    }
}

/// Read a source file, attaching the path to any I/O error.
pub fn read_source(path: &Path) -> Result<String, AnalysisError> {
    fs::read_to_string(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn log_failure(name: &str, result: &Result<Snapshot, AnalysisError>) {
    if let Err(err) = result {
        warn!(%name, %err, "snapshot failed to analyse");
    }
}

/// Analyse independent in-memory sources on the rayon worker pool.
///
/// Results are returned in input order. A failure in one source is logged
/// and returned in its slot without affecting the others.
pub fn analyze_batch(sources: &[(String, String)]) -> Vec<Result<Snapshot, AnalysisError>> {
    sources
        .par_iter()
        .map(|(name, source)| {
            let result = Snapshot::analyze(name.clone(), source);
            log_failure(name, &result);
            result
        })
        .collect()
}

/// Read and analyse files on the rayon worker pool, in input order.
pub fn analyze_paths(paths: &[PathBuf]) -> Vec<Result<Snapshot, AnalysisError>> {
    paths
        .par_iter()
        .map(|path| {
            let result = Snapshot::from_path(path);
            log_failure(&path.display().to_string(), &result);
            result
        })
        .collect()
}

//! Outline reader: builds a forest from the indented text the renderer writes.

use std::path::Path;

use tracing::{debug, instrument};

use crate::application::error_ext::IoResultExt;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Forest, NodeId, OutlineStyle};

/// Forest of string values plus its roots in document order.
#[derive(Debug, Default)]
pub struct OutlineForest {
    pub forest: Forest<String>,
    pub roots: Vec<NodeId>,
}

/// Reads outlines laid out with a given [`OutlineStyle`].
pub struct OutlineReader {
    style: OutlineStyle,
}

impl Default for OutlineReader {
    fn default() -> Self {
        Self::new(OutlineStyle::default())
    }
}

impl OutlineReader {
    pub fn new(style: OutlineStyle) -> Self {
        Self { style }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn read_file(&self, path: &Path) -> ApplicationResult<OutlineForest> {
        let text = std::fs::read_to_string(path).with_path_context("read outline", path)?;
        self.parse(&text)
    }

    /// Parse outline text.
    ///
    /// Blank lines are skipped. Values keep their trailing whitespace; only the
    /// line terminator is dropped. Every other line holds one node; its level is
    /// the leading space count divided by the style's indent. A level-0 line
    /// starts a new root, and a line may be at most one level below the line
    /// before it.
    pub fn parse(&self, text: &str) -> ApplicationResult<OutlineForest> {
        if self.style.indent == 0 {
            return Err(ApplicationError::Config {
                message: "outline indent must be at least 1".to_string(),
            });
        }

        let mut parsed = OutlineForest::default();
        // stack[level] is the most recent node seen at that level
        let mut stack: Vec<NodeId> = Vec::new();

        for (number, line) in text.lines().enumerate().map(|(i, l)| (i + 1, l)) {
            if line.trim().is_empty() {
                continue;
            }

            let body = line.trim_start_matches(' ');
            let width = line.len() - body.len();
            if body.starts_with(char::is_whitespace) {
                return Err(ApplicationError::outline(number, "indentation must use spaces"));
            }
            if width % self.style.indent != 0 {
                return Err(ApplicationError::outline(
                    number,
                    format!(
                        "indentation of {} is not a multiple of {}",
                        width, self.style.indent
                    ),
                ));
            }

            let level = width / self.style.indent;
            if level > stack.len() {
                return Err(ApplicationError::outline(
                    number,
                    format!("jumps to level {} below level {}", level, stack.len().saturating_sub(1)),
                ));
            }

            let value = body.strip_prefix(self.style.prefix.as_str()).unwrap_or(body);
            let node = parsed.forest.new_node(value.to_string());

            stack.truncate(level);
            match stack.last() {
                Some(&parent) => parsed.forest.add(parent, node)?,
                None => parsed.roots.push(node),
            }
            stack.push(node);
        }

        debug!(
            nodes = parsed.forest.len(),
            roots = parsed.roots.len(),
            "outline parsed"
        );
        Ok(parsed)
    }
}

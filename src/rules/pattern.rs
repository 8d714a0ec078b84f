//! Path patterns over the live element stack
//!
//! A pattern is a `/`-separated list of element local names. A leading `*`
//! step stands for any sequence of ancestors (including none), so `*/property`
//! matches every `property` element however deeply it is nested; any other
//! `*` step matches exactly one element. Without a leading `*` the pattern is
//! anchored at the document root. Prefixes are stripped from both the pattern
//! and the path, so matching never depends on namespace bindings.

use crate::names::local_name;
use std::fmt;

/// Local names of the open elements, root first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementPath {
    names: Vec<String>,
}

impl ElementPath {
    /// Create an empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter an element; any prefix is dropped
    pub fn push(&mut self, name: &str) {
        self.names.push(local_name(name).to_string());
    }

    /// Leave the innermost element
    pub fn pop(&mut self) -> Option<String> {
        self.names.pop()
    }

    /// Nesting depth
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True outside the root element
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Local names, root first
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Local name of the innermost element
    pub fn current(&self) -> Option<&str> {
        self.names.last().map(String::as_str)
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names.join("/"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Name(String),
    Any,
}

impl Step {
    fn matches(&self, name: &str) -> bool {
        match self {
            Step::Name(n) => n == name,
            Step::Any => true,
        }
    }
}

/// A compiled path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    anchored: bool,
    steps: Vec<Step>,
}

impl PathPattern {
    /// Compile a pattern such as `*/preferred/term`
    pub fn parse(pattern: &str) -> Self {
        let mut parts = pattern
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .peekable();

        let anchored = parts.peek() != Some(&"*");
        if !anchored {
            parts.next();
        }

        let steps = parts
            .map(|s| match s {
                "*" => Step::Any,
                name => Step::Name(local_name(name).to_string()),
            })
            .collect();

        Self {
            raw: pattern.to_string(),
            anchored,
            steps,
        }
    }

    /// The pattern as registered
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True if the innermost open element is at a location this pattern names
    pub fn matches(&self, path: &ElementPath) -> bool {
        let names = path.names();
        if self.anchored {
            if names.len() != self.steps.len() {
                return false;
            }
        } else if names.len() < self.steps.len() {
            return false;
        }

        let tail = &names[names.len() - self.steps.len()..];
        self.steps
            .iter()
            .zip(tail)
            .all(|(step, name)| step.matches(name))
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

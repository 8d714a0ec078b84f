//! Rule registration and matching
//!
//! A [`RuleEngine`] binds path patterns to ordered lists of [`Rule`]s. On
//! each element event the driver asks for the rules of the matching
//! patterns: patterns in the order they were first registered, rules in the
//! order they were registered under their pattern.

use super::pattern::{ElementPath, PathPattern};
use super::stack::{Field, Link, NodeKind};
use indexmap::IndexMap;

/// When a rule fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// On element start
    Enter,
    /// On element end
    Exit,
}

/// A declarative construction rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Push a new object of this kind
    Create(NodeKind),
    /// Stage the named attribute's value (prefix ignored) as the next call parameter
    CaptureAttribute(&'static str),
    /// Consume the oldest staged parameter and pass it to this setter on the top object
    InvokeSetter(Field),
    /// Pop the top object and add it to the object beneath
    AttachChild(Link),
    /// Attach the vocabulary named by a `thesaurus` attribute to the top object
    ResolveThesaurus,
}

impl Rule {
    /// The event this rule fires on
    pub fn phase(&self) -> Phase {
        match self {
            Rule::Create(_) | Rule::CaptureAttribute(_) | Rule::ResolveThesaurus => Phase::Enter,
            Rule::InvokeSetter(_) | Rule::AttachChild(_) => Phase::Exit,
        }
    }
}

#[derive(Debug, Clone)]
struct Binding {
    pattern: PathPattern,
    rules: Vec<Rule>,
}

/// Pattern-to-rules dispatch table for one document type
#[derive(Debug, Clone)]
pub struct RuleEngine {
    namespace: String,
    bindings: IndexMap<String, Binding>,
}

impl RuleEngine {
    /// Create an engine whose rules belong to `namespace`
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            bindings: IndexMap::new(),
        }
    }

    /// Rule namespace of the documents this engine reads
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Append `rule` to the list bound to `pattern`
    pub fn register(&mut self, pattern: &str, rule: Rule) -> &mut Self {
        self.bindings
            .entry(pattern.to_string())
            .or_insert_with(|| Binding {
                pattern: PathPattern::parse(pattern),
                rules: Vec::new(),
            })
            .rules
            .push(rule);
        self
    }

    /// Populate `field` from `attribute` of elements matching `pattern`
    pub fn call_setter(&mut self, pattern: &str, attribute: &'static str, field: Field) -> &mut Self {
        self.register(pattern, Rule::CaptureAttribute(attribute))
            .register(pattern, Rule::InvokeSetter(field))
    }

    /// Rules bound to `pattern`, in registration order
    pub fn rules(&self, pattern: &str) -> &[Rule] {
        self.bindings
            .get(pattern)
            .map(|b| b.rules.as_slice())
            .unwrap_or(&[])
    }

    /// Number of distinct patterns
    pub fn pattern_count(&self) -> usize {
        self.bindings.len()
    }

    /// Rules of `phase` whose pattern matches `path`, tagged with the pattern's index
    pub fn matching<'a>(
        &'a self,
        path: &'a ElementPath,
        phase: Phase,
    ) -> impl Iterator<Item = (usize, &'a Rule)> + 'a {
        self.bindings
            .values()
            .enumerate()
            .filter(move |(_, binding)| binding.pattern.matches(path))
            .flat_map(move |(index, binding)| {
                binding
                    .rules
                    .iter()
                    .filter(move |rule| rule.phase() == phase)
                    .map(move |rule| (index, rule))
            })
    }

    /// Rules firing when the innermost element of `path` starts
    pub fn on_enter<'a>(&'a self, path: &'a ElementPath) -> impl Iterator<Item = (usize, &'a Rule)> + 'a {
        self.matching(path, Phase::Enter)
    }

    /// Rules firing when the innermost element of `path` ends
    pub fn on_exit<'a>(&'a self, path: &'a ElementPath) -> impl Iterator<Item = (usize, &'a Rule)> + 'a {
        self.matching(path, Phase::Exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(names: &[&str]) -> ElementPath {
        let mut p = ElementPath::new();
        for n in names {
            p.push(n);
        }
        p
    }

    #[test]
    fn test_register_preserves_order() {
        let mut engine = RuleEngine::new("urn:test");
        engine
            .register("*/property", Rule::Create(NodeKind::Property))
            .call_setter("*/property", "name", Field::Name)
            .register("*/property", Rule::AttachChild(Link::AddProperty));

        assert_eq!(
            engine.rules("*/property"),
            &[
                Rule::Create(NodeKind::Property),
                Rule::CaptureAttribute("name"),
                Rule::InvokeSetter(Field::Name),
                Rule::AttachChild(Link::AddProperty),
            ]
        );
        assert_eq!(engine.pattern_count(), 1);
        assert!(engine.rules("*/concept").is_empty());
    }

    #[test]
    fn test_phases_split_rules() {
        let mut engine = RuleEngine::new("urn:test");
        engine
            .register("*/property", Rule::Create(NodeKind::Property))
            .call_setter("*/property", "name", Field::Name)
            .register("*/property", Rule::ResolveThesaurus)
            .register("*/property", Rule::AttachChild(Link::AddProperty));

        let p = path(&["extension", "property"]);
        let enter: Vec<_> = engine.on_enter(&p).map(|(_, r)| *r).collect();
        let exit: Vec<_> = engine.on_exit(&p).map(|(_, r)| *r).collect();

        assert_eq!(
            enter,
            vec![
                Rule::Create(NodeKind::Property),
                Rule::CaptureAttribute("name"),
                Rule::ResolveThesaurus,
            ]
        );
        assert_eq!(
            exit,
            vec![Rule::InvokeSetter(Field::Name), Rule::AttachChild(Link::AddProperty)]
        );
    }

    #[test]
    fn test_matching_across_patterns() {
        let mut engine = RuleEngine::new("urn:test");
        engine
            .call_setter("*/concept", "identifier", Field::Identifier)
            .call_setter("*/preferred/term", "title", Field::Title)
            .call_setter("*/term", "lang", Field::Lang);

        let p = path(&["thesaurus", "concept", "preferred", "term"]);
        let enter: Vec<_> = engine.on_enter(&p).map(|(i, r)| (i, *r)).collect();
        assert_eq!(
            enter,
            vec![
                (1, Rule::CaptureAttribute("title")),
                (2, Rule::CaptureAttribute("lang")),
            ]
        );

        let none = path(&["thesaurus"]);
        assert_eq!(engine.on_enter(&none).count(), 0);
    }
}

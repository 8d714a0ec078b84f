//! Event-driven rule dispatch
//!
//! A [`Digester`] is one parse session: it owns the element path, the
//! construction stack and the staged call parameters, and fires the rules of
//! a [`RuleEngine`] as element events arrive. Events normally come from
//! [`Digester::digest`], which reads them with a namespace-aware
//! `quick_xml::NsReader`, but [`Digester::start_element`] and
//! [`Digester::end_element`] can be driven directly.

use crate::error::{Error, ParseError, Result};
use crate::limits::Limits;
use crate::names::{is_namespace_declaration, local_name};
use crate::namespaces::QName;
use crate::rules::{ConstructionStack, ElementPath, Node, Rule, RuleEngine, ThesaurusResolver};
use crate::terms::TermRegistry;
use indexmap::IndexMap;
use quick_xml::encoding::Decoder;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use std::collections::VecDeque;
use std::fmt::Display;

/// Attribute holding the URL of a property's thesaurus
const THESAURUS_ATTRIBUTE: &str = "thesaurus";

/// Attributes of one element, keyed by local name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    /// Create an empty attribute set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute; the prefix is dropped and namespace declarations are skipped
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        if is_namespace_declaration(name) {
            return;
        }
        self.entries
            .push((local_name(name).to_string(), value.into()));
    }

    /// Value of the first attribute with this local name
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = local_name(name);
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the element has no attributes
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}

/// Call parameters staged by one open element, per pattern
#[derive(Debug, Default)]
struct ParamFrame {
    staged: IndexMap<usize, VecDeque<Option<String>>>,
}

impl ParamFrame {
    fn stage(&mut self, pattern: usize, value: Option<String>) {
        self.staged.entry(pattern).or_default().push_back(value);
    }

    fn take(&mut self, pattern: usize) -> Option<String> {
        self.staged
            .get_mut(&pattern)
            .and_then(VecDeque::pop_front)
            .flatten()
    }
}

/// One parse session over a rule engine
pub struct Digester<'a> {
    engine: &'a RuleEngine,
    terms: &'a dyn TermRegistry,
    limits: &'a Limits,
    resolver: Option<&'a mut dyn ThesaurusResolver>,
    path: ElementPath,
    stack: ConstructionStack,
    frames: Vec<ParamFrame>,
    elements: usize,
}

impl<'a> Digester<'a> {
    /// Create a session with an empty construction stack
    pub fn new(engine: &'a RuleEngine, terms: &'a dyn TermRegistry, limits: &'a Limits) -> Self {
        Self {
            engine,
            terms,
            limits,
            resolver: None,
            path: ElementPath::new(),
            stack: ConstructionStack::new(),
            frames: Vec::new(),
            elements: 0,
        }
    }

    /// Resolve `thesaurus` references through `resolver`
    pub fn with_resolver(mut self, resolver: &'a mut dyn ThesaurusResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Push an object onto the construction stack (normally the root)
    pub fn push(&mut self, node: Node) {
        self.stack.push(node);
    }

    /// The construction stack
    pub fn stack(&self) -> &ConstructionStack {
        &self.stack
    }

    /// The open elements
    pub fn path(&self) -> &ElementPath {
        &self.path
    }

    /// Fire the enter rules of a starting element
    pub fn start_element(&mut self, name: &QName, attributes: &Attributes) -> Result<()> {
        self.limits.check_xml_depth(self.path.len() + 1)?;
        self.limits.check_attributes(attributes.len())?;

        self.path.push(&name.local_name);
        self.frames.push(ParamFrame::default());
        self.elements += 1;

        if name
            .namespace
            .as_deref()
            .is_some_and(|ns| ns != self.engine.namespace())
        {
            tracing::trace!(element = %name, "Element outside the rule namespace");
        }

        let rules: Vec<(usize, Rule)> = self
            .engine
            .on_enter(&self.path)
            .map(|(index, rule)| (index, *rule))
            .collect();
        tracing::trace!(path = %self.path, rules = rules.len(), "Element start");

        for (index, rule) in rules {
            match rule {
                Rule::Create(kind) => self.stack.push(Node::create(kind)),
                Rule::CaptureAttribute(attribute) => {
                    let value = attributes.get(attribute).map(str::to_string);
                    if let Some(frame) = self.frames.last_mut() {
                        frame.stage(index, value);
                    }
                }
                Rule::ResolveThesaurus => self.resolve_thesaurus(attributes)?,
                Rule::InvokeSetter(_) | Rule::AttachChild(_) => {}
            }
        }

        Ok(())
    }

    /// Fire the exit rules of the innermost element and close it
    pub fn end_element(&mut self) -> Result<()> {
        if self.path.is_empty() {
            return Err(ParseError::new("end tag without a matching start tag").into());
        }

        let mut frame = self.frames.pop().unwrap_or_default();
        let rules: Vec<(usize, Rule)> = self
            .engine
            .on_exit(&self.path)
            .map(|(index, rule)| (index, *rule))
            .collect();

        for (index, rule) in rules {
            match rule {
                Rule::InvokeSetter(field) => {
                    // absent attributes leave the field untouched
                    let Some(value) = frame.take(index) else {
                        continue;
                    };
                    let top = self.stack.peek_mut().ok_or_else(|| {
                        Error::Rule(format!("no object to receive {} at {}", field, self.path))
                    })?;
                    top.apply(field, &value, self.terms)?;
                }
                Rule::AttachChild(link) => self.stack.attach(link)?,
                Rule::Create(_) | Rule::CaptureAttribute(_) | Rule::ResolveThesaurus => {}
            }
        }

        self.path.pop();
        Ok(())
    }

    fn resolve_thesaurus(&mut self, attributes: &Attributes) -> Result<()> {
        let Some(url) = attributes
            .get(THESAURUS_ATTRIBUTE)
            .filter(|v| !v.trim().is_empty())
        else {
            return Ok(());
        };

        let location = self.path.to_string();
        let resolver = self.resolver.as_deref_mut().ok_or_else(|| {
            Error::Rule(format!("thesaurus reference at {} but no resolver", location))
        })?;

        let vocabulary = resolver.resolve(url).map_err(|e| match e {
            Error::Resolution(r) => Error::Resolution(r.with_location(location.clone())),
            other => other,
        })?;

        let property = self
            .stack
            .peek_mut()
            .and_then(Node::as_property_mut)
            .ok_or_else(|| Error::Rule(format!("thesaurus reference outside a property at {}", location)))?;
        property.set_vocabulary(vocabulary);

        Ok(())
    }

    /// Read a whole document, firing rules for every element
    ///
    /// The document must be well-formed: exactly one root element, and
    /// nothing but whitespace, comments and processing instructions around it.
    pub fn digest(&mut self, xml: &[u8]) -> Result<()> {
        let mut reader = NsReader::from_reader(xml);
        let mut buf = Vec::new();
        let mut seen_root = false;

        loop {
            let position = reader.buffer_position();
            let (namespace, event) = match reader.read_resolved_event_into(&mut buf) {
                Ok((ns, event)) => (resolved_namespace(ns, position)?, event),
                Err(e) => return Err(syntax_error(e, position)),
            };
            let outside_root = self.path.is_empty();

            match event {
                Event::Start(e) | Event::Empty(e) if outside_root && seen_root => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    return Err(syntax_error(format!("second root element <{}>", name), position));
                }
                Event::Start(e) => {
                    seen_root = true;
                    let (name, attributes) = read_element(&e, namespace, reader.decoder(), position)?;
                    self.start_element(&name, &attributes)?;
                }
                Event::Empty(e) => {
                    seen_root = true;
                    let (name, attributes) = read_element(&e, namespace, reader.decoder(), position)?;
                    self.start_element(&name, &attributes)?;
                    self.end_element()?;
                }
                Event::End(_) => self.end_element()?,
                Event::Text(e) if outside_root && !e.iter().all(u8::is_ascii_whitespace) => {
                    return Err(syntax_error("text outside the root element", position));
                }
                Event::CData(_) if outside_root => {
                    return Err(syntax_error("CDATA outside the root element", position));
                }
                Event::Eof => break,
                _ => {} // Text, comments and processing instructions carry no rule data
            }
            buf.clear();
        }

        if !seen_root {
            return Err(ParseError::new("document has no root element").into());
        }
        if !self.path.is_empty() {
            return Err(ParseError::new("unexpected end of document")
                .with_location(format!("inside {}", self.path))
                .into());
        }

        tracing::debug!(
            namespace = self.engine.namespace(),
            elements = self.elements,
            "Digested document"
        );
        Ok(())
    }

    /// Take the finished root object
    pub fn finish(self) -> Result<Node> {
        self.stack.into_root()
    }
}

fn syntax_error(message: impl Display, position: usize) -> Error {
    ParseError::new(message.to_string())
        .with_location(format!("byte {}", position))
        .into()
}

fn resolved_namespace(ns: ResolveResult, position: usize) -> Result<Option<String>> {
    match ns {
        ResolveResult::Bound(ns) => Ok(Some(String::from_utf8_lossy(ns.as_ref()).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(syntax_error(
            format!(
                "unbound namespace prefix '{}'",
                String::from_utf8_lossy(&prefix)
            ),
            position,
        )),
    }
}

/// Decode an element name and its attributes in the document's encoding
fn read_element(
    start: &BytesStart,
    namespace: Option<String>,
    decoder: Decoder,
    position: usize,
) -> Result<(QName, Attributes)> {
    let local = decoder
        .decode(start.local_name().as_ref())
        .map_err(|e| syntax_error(format!("Invalid element name: {}", e), position))?
        .into_owned();

    let mut attributes = Attributes::new();
    for attr_result in start.attributes() {
        let attr = attr_result
            .map_err(|e| syntax_error(format!("Failed to parse attribute: {}", e), position))?;

        let attr_name = decoder
            .decode(attr.key.as_ref())
            .map_err(|e| syntax_error(format!("Invalid attribute name: {}", e), position))?;

        let raw_value = decoder
            .decode(&attr.value)
            .map_err(|e| syntax_error(format!("Invalid attribute value: {}", e), position))?;
        let attr_value = unescape(&raw_value).map_err(|e| {
            syntax_error(format!("Failed to unescape attribute value: {}", e), position)
        })?;

        attributes.insert(&attr_name, attr_value);
    }

    Ok((QName::new(namespace, local), attributes))
}

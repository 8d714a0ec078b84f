//! XML name utilities
//!
//! Element and attribute names are compared by local part only, so documents
//! may bind their namespaces to any prefix (or none).

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s").unwrap());

/// Split a QName into prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    if let Some((prefix, local)) = qname.split_once(':') {
        (Some(prefix), local)
    } else {
        (None, qname)
    }
}

/// Local part of a possibly prefixed name
pub fn local_name(qname: &str) -> &str {
    split_qname(qname).1
}

/// True for `xmlns` and `xmlns:*` attribute names
pub fn is_namespace_declaration(qname: &str) -> bool {
    qname == "xmlns" || qname.starts_with("xmlns:")
}

/// Extension names are used for tables, files and XML tags: no whitespace allowed
pub fn normalize_extension_name(name: &str) -> String {
    WHITESPACE.replace_all(name, "_").into_owned()
}

//! Extension parsing integration tests
//!
//! Thesauri are served from in-memory fixtures so nothing here touches the
//! network.

use dwca_model::{Error, ExtensionParser, Location, ResolutionScope, Result, VocabularyParser};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use url::Url;

const ALIVE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<thesaurus xmlns="http://rs.gbif.org/thesaurus/" xmlns:dc="http://purl.org/dc/terms/"
           dc:title="Alive or dead">
  <concept dc:identifier="alive">
    <preferred><term xml:lang="en" dc:title="Alive"/></preferred>
  </concept>
</thesaurus>"#;

const SEX: &str = r#"<thesaurus xmlns="http://rs.gbif.org/thesaurus/" title="Sex">
  <concept identifier="female"><preferred><term lang="en" title="Female"/></preferred></concept>
  <concept identifier="male"><preferred><term lang="en" title="Male"/></preferred></concept>
</thesaurus>"#;

/// Serves fixed documents and records every request
#[derive(Clone, Default)]
struct Fixtures {
    documents: HashMap<String, String>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Fixtures {
    fn with(mut self, url: &str, body: &str) -> Self {
        self.documents.insert(url.to_string(), body.to_string());
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());
        self.documents
            .get(url.as_str())
            .map(|body| body.as_bytes().to_vec())
            .ok_or_else(|| Error::Resource(format!("404 {}", url)))
    }
}

fn parser(fixtures: &Fixtures) -> ExtensionParser {
    let fixtures = fixtures.clone();
    ExtensionParser::new().with_fetcher(move |url: &Url| fixtures.fetch(url))
}

fn source() -> Url {
    Url::parse("http://rs.gbif.org/extension/dwc/occurrence.xml").unwrap()
}

#[test]
fn test_name_whitespace_and_required_default() {
    let xml = r#"<extension xmlns="http://rs.gbif.org/extension/"
        name="Occurrence Identifier" rowType="http://rs.tdwg.org/dwc/terms/Occurrence">
      <property qualName="http://rs.tdwg.org/dwc/terms/Locality" name="Locality" required="false"/>
    </extension>"#;

    let ext = parser(&Fixtures::default())
        .parse(xml.as_bytes(), source(), false)
        .unwrap();

    assert_eq!(ext.name.as_deref(), Some("Occurrence_Identifier"));
    assert_eq!(
        ext.row_type.as_ref().map(|t| t.qualified_name()),
        Some("http://rs.tdwg.org/dwc/terms/Occurrence".to_string())
    );
    assert_eq!(ext.properties().len(), 1);
    assert!(!ext.properties()[0].required);
    assert!(ext.has_property("http://rs.tdwg.org/dwc/terms/locality"));
}

#[test]
fn test_thesaurus_attached_to_property() {
    let fixtures = Fixtures::default().with("http://example.org/vocab.xml", ALIVE);
    let xml = r#"<extension xmlns="http://rs.gbif.org/extension/" name="Status">
      <property name="status" qualName="http://example.org/terms/status"
                thesaurus="http://example.org/vocab.xml"/>
    </extension>"#;

    let ext = parser(&fixtures).parse(xml.as_bytes(), source(), false).unwrap();

    let vocab = ext.properties()[0].vocabulary.as_ref().unwrap();
    assert_eq!(vocab.concepts.len(), 1);
    let term = &vocab.concepts[0].preferred_terms[0];
    assert_eq!(term.lang.as_deref(), Some("en"));
    assert_eq!(term.title.as_deref(), Some("Alive"));
    assert_eq!(fixtures.requests(), vec!["http://example.org/vocab.xml"]);
}

#[test]
fn test_malformed_thesaurus_fails_whole_parse() {
    let fixtures = Fixtures::default().with(
        "http://example.org/vocab.xml",
        "<thesaurus><concept><preferred></concept></thesaurus>",
    );
    let xml = r#"<extension xmlns="http://rs.gbif.org/extension/" name="Status">
      <property name="before"/>
      <property name="status" thesaurus="http://example.org/vocab.xml"/>
      <property name="after"/>
    </extension>"#;

    let result = parser(&fixtures).parse(xml.as_bytes(), source(), false);

    match result {
        Err(Error::Resolution(e)) => {
            assert_eq!(e.url, "http://example.org/vocab.xml");
            assert!(e.reason.contains("invalid thesaurus document"));
        }
        other => panic!("expected a resolution error, got {:?}", other),
    }
}

#[test]
fn test_missing_thesaurus_fails_whole_parse() {
    let xml = r#"<extension xmlns="http://rs.gbif.org/extension/">
      <property name="sex" thesaurus="http://example.org/missing.xml"/>
    </extension>"#;

    let err = parser(&Fixtures::default())
        .parse(xml.as_bytes(), source(), false)
        .unwrap_err();

    assert!(err.is_resolution());
    assert!(!err.is_syntax());
}

#[test]
fn test_invalid_relation_leaves_link_empty() {
    let xml = r#"<extension xmlns="http://rs.gbif.org/extension/" xmlns:dc="http://purl.org/dc/terms/"
        dc:title="Measurements" name="Measurement" dc:relation="not a url"
        namespace="http://rs.tdwg.org/dwc/terms/" dc:subject="measurement">
      <property name="measurementType" dc:relation="::broken::" group="Measurement"
                type="string" columnLength="many" examples="tail length"/>
    </extension>"#;

    let ext = parser(&Fixtures::default())
        .parse(xml.as_bytes(), source(), false)
        .unwrap();

    assert_eq!(ext.link, None);
    assert_eq!(ext.title.as_deref(), Some("Measurements"));
    assert_eq!(ext.name.as_deref(), Some("Measurement"));
    assert_eq!(ext.namespace.as_deref(), Some("http://rs.tdwg.org/dwc/terms/"));
    assert_eq!(ext.subject.as_deref(), Some("measurement"));

    let prop = &ext.properties()[0];
    assert_eq!(prop.link, None);
    assert_eq!(prop.column_length, None);
    assert_eq!(prop.group.as_deref(), Some("Measurement"));
    assert_eq!(prop.data_type.as_deref(), Some("string"));
    assert_eq!(prop.examples.as_deref(), Some("tail length"));
}

#[test]
fn test_unresolvable_row_type_is_absorbed() {
    let xml = r#"<extension xmlns="http://rs.gbif.org/extension/" name="Odd" rowType="Occurrence"/>"#;

    let ext = parser(&Fixtures::default())
        .parse(xml.as_bytes(), source(), false)
        .unwrap();

    assert_eq!(ext.row_type, None);
    assert_eq!(ext.name.as_deref(), Some("Odd"));
}

#[test]
fn test_prefixed_row_type() {
    let xml = r#"<extension xmlns="http://rs.gbif.org/extension/" rowType="dwc:Occurrence"/>"#;

    let ext = parser(&Fixtures::default())
        .parse(xml.as_bytes(), source(), false)
        .unwrap();

    let row_type = ext.row_type.unwrap();
    assert_eq!(row_type.qualified_name(), "http://rs.tdwg.org/dwc/terms/Occurrence");
    assert_eq!(row_type.prefixed_name().as_deref(), Some("dwc:Occurrence"));
}

#[test]
fn test_required_is_case_insensitive() {
    let xml = r#"<extension xmlns="http://rs.gbif.org/extension/">
      <property name="a" required="TRUE"/>
      <property name="b" required="yes"/>
      <property name="c" required=" True "/>
      <property name="d"/>
    </extension>"#;

    let ext = parser(&Fixtures::default())
        .parse(xml.as_bytes(), source(), false)
        .unwrap();

    let required: Vec<bool> = ext.properties().iter().map(|p| p.required).collect();
    assert_eq!(required, vec![true, false, true, false]);
}

#[test]
fn test_shared_thesaurus_fetched_once() {
    let fixtures = Fixtures::default()
        .with("http://example.org/sex.xml", SEX)
        .with("http://example.org/vocab.xml", ALIVE);
    let xml = r#"<extension xmlns="http://rs.gbif.org/extension/">
      <property name="sex" thesaurus="http://example.org/sex.xml"/>
      <property name="status" thesaurus="http://example.org/vocab.xml"/>
      <property name="mateSex" thesaurus="http://example.org/sex.xml"/>
    </extension>"#;

    let ext = parser(&fixtures).parse(xml.as_bytes(), source(), false).unwrap();

    let props = ext.properties();
    let first = props[0].vocabulary.as_ref().unwrap();
    let third = props[2].vocabulary.as_ref().unwrap();
    assert!(Arc::ptr_eq(first, third));
    assert!(!Arc::ptr_eq(first, props[1].vocabulary.as_ref().unwrap()));
    assert_eq!(
        fixtures.requests(),
        vec!["http://example.org/sex.xml", "http://example.org/vocab.xml"]
    );
}

#[test]
fn test_each_parse_has_its_own_scope() {
    let fixtures = Fixtures::default().with("http://example.org/sex.xml", SEX);
    let xml = r#"<extension xmlns="http://rs.gbif.org/extension/">
      <property name="sex" thesaurus="http://example.org/sex.xml"/>
    </extension>"#;
    let parser = parser(&fixtures);

    parser.parse(xml.as_bytes(), source(), false).unwrap();
    parser.parse(xml.as_bytes(), source(), false).unwrap();

    assert_eq!(fixtures.requests().len(), 2);
}

#[test]
fn test_batch_scope_spans_documents() {
    let fixtures = Fixtures::default().with("http://example.org/sex.xml", SEX);
    let xml = r#"<extension xmlns="http://rs.gbif.org/extension/">
      <property name="sex" thesaurus="http://example.org/sex.xml"/>
    </extension>"#;
    let parser = parser(&fixtures);
    let fetch = {
        let fixtures = fixtures.clone();
        move |url: &Url| fixtures.fetch(url)
    };
    let mut scope = ResolutionScope::new(&fetch);

    let a = parser.parse_in_scope(xml.as_bytes(), source(), false, &mut scope).unwrap();
    let b = parser.parse_in_scope(xml.as_bytes(), source(), true, &mut scope).unwrap();

    assert!(Arc::ptr_eq(
        a.properties()[0].vocabulary.as_ref().unwrap(),
        b.properties()[0].vocabulary.as_ref().unwrap()
    ));
    assert_eq!(fixtures.requests().len(), 1);
    assert_eq!(scope.len(), 1);
}

#[test]
fn test_properties_keep_document_order_and_owner() {
    let xml = r#"<extension xmlns="http://rs.gbif.org/extension/" rowType="http://rs.tdwg.org/dwc/terms/Event">
      <property name="eventID"/>
      <group>
        <property name="eventDate"/>
      </group>
      <property name="habitat"/>
    </extension>"#;

    let ext = parser(&Fixtures::default())
        .parse(xml.as_bytes(), source(), false)
        .unwrap();

    let names: Vec<_> = ext
        .properties()
        .iter()
        .map(|p| p.name.as_deref().unwrap_or(""))
        .collect();
    assert_eq!(names, vec!["eventID", "eventDate", "habitat"]);
    for prop in ext.properties() {
        assert_eq!(prop.extension(), Some(&source()));
        assert!(ext.owns(prop));
    }
}

#[test]
fn test_repeated_parses_are_identical() {
    let fixtures = Fixtures::default().with("http://example.org/vocab.xml", ALIVE);
    let xml = r#"<extension xmlns="http://rs.gbif.org/extension/" name="Status" rowType="dwc:Occurrence">
      <property name="status" thesaurus="http://example.org/vocab.xml" columnLength="20"/>
    </extension>"#;
    let parser = parser(&fixtures);

    let a = parser.parse(xml.as_bytes(), source(), false).unwrap();
    let b = parser.parse(xml.as_bytes(), source(), false).unwrap();

    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_value(&a).unwrap(),
        serde_json::to_value(&b).unwrap()
    );
}

#[test]
fn test_identity_is_row_type_and_url() {
    let xml = r#"<extension xmlns="http://rs.gbif.org/extension/" rowType="dwc:Occurrence" title="A"/>"#;
    let other = r#"<extension xmlns="http://rs.gbif.org/extension/" rowType="dwc:Occurrence" title="B"/>"#;
    let parser = parser(&Fixtures::default());

    let a = parser.parse(xml.as_bytes(), source(), false).unwrap();
    let b = parser.parse(other.as_bytes(), source(), false).unwrap();
    let c = parser
        .parse(xml.as_bytes(), Url::parse("http://example.org/copy.xml").unwrap(), false)
        .unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(c < a);
}

#[test]
fn test_malformed_extension_is_syntax_error() {
    let xml = r#"<extension xmlns="http://rs.gbif.org/extension/"><property name="a"></extension>"#;
    let err = parser(&Fixtures::default())
        .parse(xml.as_bytes(), source(), false)
        .unwrap_err();
    assert!(err.is_syntax());
}

#[test]
fn test_parse_from_file_location() {
    let mut vocab = NamedTempFile::new().unwrap();
    write!(vocab, "{}", ALIVE).unwrap();
    let vocab_url = Url::from_file_path(vocab.path()).unwrap();

    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"<extension xmlns="http://rs.gbif.org/extension/" name="Status">
             <property name="status" thesaurus="{}"/>
           </extension>"#,
        vocab_url
    )
    .unwrap();

    let location = Location::Path(file.path().to_path_buf());
    let ext = ExtensionParser::new().parse_location(&location, true).unwrap();

    assert_eq!(ext.url(), &Url::from_file_path(file.path()).unwrap());
    assert!(ext.dev);
    let vocab = ext.properties()[0].vocabulary.as_ref().unwrap();
    assert_eq!(vocab.title.as_deref(), Some("Alive or dead"));
}

#[test]
fn test_vocabulary_parser_matches_resolved_thesaurus() {
    let fixtures = Fixtures::default().with("http://example.org/sex.xml", SEX);
    let xml = r#"<extension xmlns="http://rs.gbif.org/extension/">
      <property name="sex" thesaurus="http://example.org/sex.xml"/>
    </extension>"#;

    let ext = parser(&fixtures).parse(xml.as_bytes(), source(), false).unwrap();
    let direct = VocabularyParser::new().parse(SEX.as_bytes()).unwrap();

    assert_eq!(ext.properties()[0].vocabulary.as_deref(), Some(&direct));
    assert_eq!(
        direct.find_concept("MALE").and_then(|c| c.identifier.as_deref()),
        Some("male")
    );
}

#[test]
fn test_thesaurus_with_trailing_content_fails_resolution() {
    let fixtures = Fixtures::default()
        .with("http://example.org/vocab.xml", &format!("{}garbage", ALIVE))
        .with("http://example.org/sex.xml", &format!("junk{}", SEX));
    for thesaurus in ["http://example.org/vocab.xml", "http://example.org/sex.xml"] {
        let xml = format!(
            r#"<extension xmlns="http://rs.gbif.org/extension/">
              <property name="status" thesaurus="{}"/>
            </extension>"#,
            thesaurus
        );

        match parser(&fixtures).parse(xml.as_bytes(), source(), false) {
            Err(Error::Resolution(e)) => {
                assert_eq!(e.url, thesaurus);
                assert!(e.reason.contains("outside the root element"));
            }
            other => panic!("expected a resolution error for {}, got {:?}", thesaurus, other),
        }
    }
}

#[test]
fn test_second_extension_root_is_syntax_error() {
    let xml = r#"<extension xmlns="http://rs.gbif.org/extension/" name="First"/>
<extension xmlns="http://rs.gbif.org/extension/" name="Second"/>"#;
    let err = parser(&Fixtures::default())
        .parse(xml.as_bytes(), source(), false)
        .unwrap_err();
    assert!(err.is_syntax());
}

#[test]
fn test_latin1_extension() {
    let xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n\
<extension xmlns=\"http://rs.gbif.org/extension/\" title=\"Esp\xE8ces\" name=\"Nom vernaculaire\">\n\
  <property name=\"vernacularName\" description=\"Nom commun de l'esp\xE8ce\"/>\n\
</extension>";

    let ext = parser(&Fixtures::default())
        .parse(&xml[..], source(), false)
        .unwrap();

    assert_eq!(ext.title.as_deref(), Some("Esp\u{e8}ces"));
    assert_eq!(ext.name.as_deref(), Some("Nom_vernaculaire"));
    assert_eq!(
        ext.properties()[0].description.as_deref(),
        Some("Nom commun de l'esp\u{e8}ce")
    );
}

//! XML element tree for geodatabase definitions
//!
//! Catalog definitions are small documents that are probed many times with
//! "first of several alternate tags" lookups, so they are read once with
//! `quick-xml` into an owned tree and queried from there.
//!
//! All lookups match on local names; namespace prefixes are ignored.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Error raised when a definition document cannot be read
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum XmlError {
    #[error("Malformed XML: {0}")]
    Malformed(String),
    #[error("Document has no root element")]
    Empty,
    #[error("Document has more than one root element (second root: '{0}')")]
    MultipleRoots(String),
    #[error("Element '{0}' is never closed")]
    Unclosed(String),
    #[error("Elements nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Deepest element nesting accepted by [`parse`]
///
/// Tree traversal, cloning and dropping recurse per level, so the bound keeps
/// every operation on a parsed tree within a small stack.
pub const MAX_DEPTH: usize = 256;

/// Node inside an element: either a child element or a run of text
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// Owned XML element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    nodes: Vec<XmlNode>,
}

/// Parse a definition document and return its root element
pub fn parse(xml: &str) -> Result<XmlElement, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                check_depth(&stack)?;
                stack.push(XmlElement::from_start(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                check_depth(&stack)?;
                let element = XmlElement::from_start(e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::Malformed("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(ref t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| XmlError::Malformed(e.to_string()))?;
                push_text(&mut stack, text.into_owned())?;
            }
            Ok(Event::CData(ref c)) => {
                push_text(&mut stack, String::from_utf8_lossy(c).into_owned())?;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(XmlError::Malformed(format!(
                    "at position {}: {}",
                    reader.error_position(),
                    e
                )));
            }
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name));
    }
    root.ok_or(XmlError::Empty)
}

fn check_depth(stack: &[XmlElement]) -> Result<(), XmlError> {
    if stack.len() >= MAX_DEPTH {
        return Err(XmlError::TooDeep(MAX_DEPTH));
    }
    Ok(())
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.nodes.push(XmlNode::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(XmlError::MultipleRoots(element.name));
    }
    *root = Some(element);
    Ok(())
}

fn push_text(stack: &mut [XmlElement], text: String) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.nodes.push(XmlNode::Text(text));
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(XmlError::Malformed(
            "text content outside of the root element".to_string(),
        )),
    }
}

impl XmlElement {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| XmlError::Malformed(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| XmlError::Malformed(e.to_string()))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            nodes: Vec::new(),
        })
    }

    /// Local name of the element
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by local name (`xsi:type` matches `type`)
    pub fn attribute(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.rsplit(':').next() == Some(local_name))
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text of the element and all of its descendants
    pub fn value(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.nodes {
            match node {
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Element(child) => child.collect_text(out),
            }
        }
    }

    /// Direct child elements in document order
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.nodes.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Direct child elements whose name is one of `names`
    pub fn elements_named<'a>(
        &'a self,
        names: &'a [&'a str],
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.elements().filter(move |e| names.contains(&e.name()))
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    /// First present child among ordered candidate names
    pub fn child_of(&self, names: &[&str]) -> Option<&XmlElement> {
        names.iter().find_map(|name| self.child(name))
    }

    /// Value of the first present child among ordered candidate names
    pub fn child_text_of(&self, names: &[&str]) -> Option<String> {
        self.child_of(names).map(XmlElement::value)
    }

    /// Value of a direct child, or an empty string when absent
    pub fn child_text_or_empty(&self, name: &str) -> String {
        self.child(name).map(XmlElement::value).unwrap_or_default()
    }

    /// Descendant elements in document order, excluding `self`
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.elements().collect::<Vec<_>>().into_iter().rev().collect(),
        }
    }

    /// First element named `name`, checking `self` before its descendants
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        if self.name == name {
            return Some(self);
        }
        self.descendants().find(|e| e.name == name)
    }

    /// First present element among ordered candidate names
    ///
    /// Candidates are tried in order and the whole subtree is searched for each
    /// one before moving to the next; an earlier candidate always wins, even
    /// when its text is empty.
    pub fn find_of(&self, names: &[&str]) -> Option<&XmlElement> {
        names.iter().find_map(|name| self.find(name))
    }

    /// Value of the first present element among ordered candidate names
    pub fn find_text_of(&self, names: &[&str]) -> Option<String> {
        self.find_of(names).map(XmlElement::value)
    }

    /// All elements named `name` in this subtree, `self` included, in document order
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        std::iter::once(self)
            .chain(self.descendants())
            .filter(move |e| e.name == name)
    }

    /// True when an element with the given name exists in this subtree
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// First descendant, in document order, for which `predicate(parent, element)` holds
    pub fn find_with_parent<F>(&self, predicate: F) -> Option<&XmlElement>
    where
        F: Fn(&XmlElement, &XmlElement) -> bool,
    {
        fn walk<'a, F>(parent: &'a XmlElement, predicate: &F) -> Option<&'a XmlElement>
        where
            F: Fn(&XmlElement, &XmlElement) -> bool,
        {
            for child in parent.elements() {
                if predicate(parent, child) {
                    return Some(child);
                }
                if let Some(found) = walk(child, predicate) {
                    return Some(found);
                }
            }
            None
        }
        walk(self, &predicate)
    }
}

/// Depth-first, document-order iterator over descendant elements
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        let children: Vec<&XmlElement> = next.elements().collect();
        self.stack.extend(children.into_iter().rev());
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<esri:DataElement xmlns:esri="http://www.esri.com/schemas/ArcGIS/10.8" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="esri:DEFeatureClassInfo">
  <Name>Parcels</Name>
  <Fields>
    <FieldArray>
      <Field><Name>OBJECTID</Name></Field>
      <Field><Name>OWNER</Name><Domain><Name>Owners</Name></Domain></Field>
    </FieldArray>
  </Fields>
  <ShapeFieldName></ShapeFieldName>
  <GeometryFieldName>SHAPE</GeometryFieldName>
  <Note><![CDATA[a < b]]></Note>
</esri:DataElement>"#;

    #[test]
    fn test_parse_uses_local_names() {
        let root = parse(SAMPLE).unwrap();
        assert_eq!(root.name(), "DataElement");
        assert_eq!(root.attribute("type"), Some("esri:DEFeatureClassInfo"));
    }

    #[test]
    fn test_descendants_follow_document_order() {
        let root = parse(SAMPLE).unwrap();
        let names: Vec<String> = root
            .descendants()
            .filter(|e| e.name() == "Name")
            .map(XmlElement::value)
            .collect();
        assert_eq!(names, vec!["Parcels", "OBJECTID", "OWNER", "Owners"]);
    }

    #[test]
    fn test_first_present_candidate_wins_even_when_empty() {
        let root = parse(SAMPLE).unwrap();
        assert_eq!(
            root.find_text_of(&["ShapeFieldName", "GeometryFieldName"]),
            Some(String::new())
        );
        assert_eq!(
            root.find_text_of(&["Missing", "GeometryFieldName"]),
            Some("SHAPE".to_string())
        );
        assert_eq!(root.find_text_of(&["Missing", "AlsoMissing"]), None);
    }

    #[test]
    fn test_value_concatenates_descendant_text() {
        let root = parse(SAMPLE).unwrap();
        let field = root.find_of(&["FieldArray"]).unwrap().elements().nth(1).unwrap();
        assert_eq!(field.value(), "OWNEROwners");
        assert_eq!(root.find("Note").unwrap().value(), "a < b");
    }

    #[test]
    fn test_find_with_parent_checks_siblings() {
        let root = parse(
            "<R><K><KeyRole>Destination</KeyRole><Key>B</Key></K>\
             <K><KeyRole>Origin</KeyRole><Key>A</Key></K></R>",
        )
        .unwrap();
        let key = root.find_with_parent(|parent, e| {
            e.name() == "Key" && parent.child("KeyRole").map(XmlElement::value).as_deref() == Some("Origin")
        });
        assert_eq!(key.map(XmlElement::value), Some("A".to_string()));
        assert_eq!(root.find_all("Key").count(), 2);
    }

    #[test]
    fn test_entities_are_unescaped() {
        let root = parse("<A><B>x &amp; y</B></A>").unwrap();
        assert_eq!(root.child_text_of(&["B"]), Some("x & y".to_string()));
    }

    #[test]
    fn test_malformed_documents_are_rejected() {
        assert!(matches!(parse("<A><B></A>"), Err(XmlError::Malformed(_))));
        assert!(matches!(parse("<A><B>"), Err(XmlError::Unclosed(_))));
        assert!(matches!(parse("   "), Err(XmlError::Empty)));
        assert!(matches!(parse("<A/><B/>"), Err(XmlError::MultipleRoots(_))));
        assert!(parse("not xml at all").is_err());
    }

    fn nested(depth: usize) -> String {
        format!("<DETableInfo>{}{}</DETableInfo>", "<a>".repeat(depth), "</a>".repeat(depth))
    }

    #[test]
    fn test_nesting_depth_is_bounded() {
        let root = parse(&nested(MAX_DEPTH - 1)).unwrap();
        assert_eq!(root.descendants().count(), MAX_DEPTH - 1);
        assert!(root.contains("a"));

        assert_eq!(parse(&nested(MAX_DEPTH)), Err(XmlError::TooDeep(MAX_DEPTH)));
        assert_eq!(parse(&nested(10_000)), Err(XmlError::TooDeep(MAX_DEPTH)));
        assert_eq!(
            parse(&format!("{}<b/>{}", "<a>".repeat(MAX_DEPTH), "</a>".repeat(MAX_DEPTH))),
            Err(XmlError::TooDeep(MAX_DEPTH))
        );
    }
}

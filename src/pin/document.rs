//! Whole-document parsing and serialization.
//!
//! [`Element::parse`] returns the root element alone, and folds CDATA
//! sections into plain text. A [`Document`] also keeps the comments and
//! processing instructions written before and after the root, and keeps
//! CDATA sections as they were written.

use std::borrow::Cow;
use std::io::{Read, Write};

use xml::attribute::{Attribute, OwnedAttribute};
use xml::common::XmlVersion;
use xml::name::{Name, OwnedName};
use xml::namespace::Namespace;
use xml::reader::{EventReader, ParserConfig, XmlEvent};
use xml::writer::{EventWriter, XmlEvent as WriteEvent};
use xmltree::{EmitterConfig, Element, ParseError, XMLNode};

use crate::Error;

/// A parsed manifest document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Nodes before the root element.
    pub prolog: Vec<XMLNode>,
    /// The root element.
    pub root: Element,
    /// Nodes after the root element.
    pub epilog: Vec<XMLNode>,
}

impl Document {
    /// Parses a document with exactly one root element.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for input that is not well-formed or that
    /// does not have exactly one root element.
    pub fn parse<R: Read>(source: R) -> Result<Self, ParseError> {
        let mut reader = ParserConfig::new()
            .ignore_comments(false)
            .allow_multiple_root_elements(false)
            .create_reader(source);

        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut root = None;

        loop {
            let node = match reader.next().map_err(ParseError::MalformedXml)? {
                XmlEvent::StartElement {
                    name,
                    attributes,
                    namespace,
                } => {
                    if root.is_some() {
                        return Err(ParseError::CannotParse);
                    }
                    let element = new_element(name, attributes, namespace);
                    root = Some(build(&mut reader, element)?);
                    continue;
                }
                XmlEvent::EndDocument => break,
                XmlEvent::StartDocument { .. } | XmlEvent::Whitespace(_) => {
                    continue;
                }
                event => leaf(event).ok_or(ParseError::CannotParse)?,
            };
            if root.is_none() {
                prolog.push(node);
            } else {
                epilog.push(node);
            }
        }

        let root = root.ok_or(ParseError::CannotParse)?;
        Ok(Self {
            prolog,
            root,
            epilog,
        })
    }

    /// Writes the document with an XML declaration.
    pub fn write_with_config<W: Write>(
        &self,
        sink: W,
        config: EmitterConfig,
    ) -> Result<(), xmltree::Error> {
        let mut emitter = EventWriter::new_with_config(sink, config);
        emitter.write(WriteEvent::StartDocument {
            version: XmlVersion::Version10,
            encoding: None,
            standalone: None,
        })?;
        for node in &self.prolog {
            write_node(&mut emitter, node)?;
        }
        write_element(&mut emitter, &self.root)?;
        for node in &self.epilog {
            write_node(&mut emitter, node)?;
        }
        Ok(())
    }

    /// Serializes the document, indenting nested markup with `indent`.
    pub fn to_string_indented(&self, indent: &str) -> crate::Result<String> {
        let config = EmitterConfig::new()
            .perform_indent(true)
            .indent_string(indent.to_string())
            .autopad_comments(false);

        let mut buffer = Vec::new();
        self.write_with_config(&mut buffer, config)?;
        String::from_utf8(buffer)
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }
}

fn new_element(name: OwnedName, attributes: Vec<OwnedAttribute>, namespace: Namespace) -> Element {
    let mut element = Element::new(&name.local_name);
    element.prefix = name.prefix;
    element.namespace = name.namespace;
    if !namespace.is_essentially_empty() {
        element.namespaces = Some(namespace);
    }
    for attribute in attributes {
        element
            .attributes
            .insert(attribute.name.local_name, attribute.value);
    }
    element
}

/// Converts a non-element event into a node.
fn leaf(event: XmlEvent) -> Option<XMLNode> {
    match event {
        XmlEvent::Characters(text) => Some(XMLNode::Text(text)),
        XmlEvent::CData(text) => Some(XMLNode::CData(text)),
        XmlEvent::Comment(text) => Some(XMLNode::Comment(text)),
        XmlEvent::ProcessingInstruction { name, data } => {
            Some(XMLNode::ProcessingInstruction(name, data))
        }
        _ => None,
    }
}

fn build<R: Read>(reader: &mut EventReader<R>, mut element: Element) -> Result<Element, ParseError> {
    loop {
        match reader.next().map_err(ParseError::MalformedXml)? {
            XmlEvent::EndElement { name } => {
                return if name.local_name == element.name {
                    Ok(element)
                } else {
                    Err(ParseError::CannotParse)
                };
            }
            XmlEvent::StartElement {
                name,
                attributes,
                namespace,
            } => {
                let child = build(reader, new_element(name, attributes, namespace))?;
                element.children.push(XMLNode::Element(child));
            }
            XmlEvent::Whitespace(_) => {}
            XmlEvent::StartDocument { .. } | XmlEvent::EndDocument => {
                return Err(ParseError::CannotParse);
            }
            event => {
                if let Some(node) = leaf(event) {
                    element.children.push(node);
                }
            }
        }
    }
}

fn write_node<W: Write>(emitter: &mut EventWriter<W>, node: &XMLNode) -> Result<(), xmltree::Error> {
    match node {
        XMLNode::Element(element) => write_element(emitter, element),
        XMLNode::Text(text) => emitter.write(WriteEvent::Characters(text)),
        XMLNode::CData(text) => emitter.write(WriteEvent::CData(text)),
        XMLNode::Comment(text) => emitter.write(WriteEvent::Comment(text)),
        XMLNode::ProcessingInstruction(name, data) => {
            emitter.write(WriteEvent::ProcessingInstruction {
                name,
                data: data.as_deref(),
            })
        }
    }
}

fn write_element<W: Write>(
    emitter: &mut EventWriter<W>,
    element: &Element,
) -> Result<(), xmltree::Error> {
    let mut name = Name::local(&element.name);
    name.namespace = element.namespace.as_deref();
    name.prefix = element.prefix.as_deref();

    let attributes: Vec<Attribute<'_>> = element
        .attributes
        .iter()
        .map(|(key, value)| Attribute::new(Name::local(key), value))
        .collect();

    let empty = Namespace::empty();
    let namespace = element.namespaces.as_ref().unwrap_or(&empty);

    emitter.write(WriteEvent::StartElement {
        name,
        attributes: Cow::Owned(attributes),
        namespace: Cow::Borrowed(namespace),
    })?;
    for child in &element.children {
        write_node(emitter, child)?;
    }
    emitter.write(WriteEvent::EndElement { name: Some(name) })
}

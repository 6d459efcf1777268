//! A small typed XML element tree, rendered through `quick_xml::Writer`.
//!
//! Vendor XML APIs that expect a fixed, hand-formatted layout are easier to
//! build as an explicit tree than through a serde serializer. Leaf values
//! holding credentials are kept as [`StrongSecret`]s so the same tree can be
//! rendered for the wire or for logs.

use error_stack::ResultExt;
use hyperswitch_masking::{PeekInterface, Secret, StrongSecret};
use quick_xml::{
    events::{BytesEnd, BytesStart, BytesText, Event},
    Writer,
};

use crate::errors::{CustomResult, ParsingError};

pub const XML_PROLOG: &str = "<?xml version='1.0' encoding='UTF-8'?>";
const INDENT_SIZE: usize = 2;
const MASKED_VALUE: &str = "*** masked ***";

#[derive(Clone, Debug)]
pub enum XmlContent {
    Empty,
    Text(String),
    Masked(StrongSecret<String>),
    Children(Vec<XmlElement>),
}

#[derive(Clone, Debug)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub content: XmlContent,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            content: XmlContent::Empty,
        }
    }

    pub fn text(name: impl Into<String>, value: impl ToString) -> Self {
        Self {
            content: XmlContent::Text(value.to_string()),
            ..Self::new(name)
        }
    }

    pub fn secret(name: impl Into<String>, value: StrongSecret<String>) -> Self {
        Self {
            content: XmlContent::Masked(value),
            ..Self::new(name)
        }
    }

    pub fn parent(name: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            content: XmlContent::Children(children),
            ..Self::new(name)
        }
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.push((key.into(), value.to_string()));
        self
    }

    /// Appends a child, turning a leaf element into a parent.
    pub fn child(mut self, child: Self) -> Self {
        match &mut self.content {
            XmlContent::Children(children) => children.push(child),
            _ => self.content = XmlContent::Children(vec![child]),
        }
        self
    }

    pub fn find_child(&self, name: &str) -> Option<&Self> {
        match &self.content {
            XmlContent::Children(children) => children.iter().find(|child| child.name == name),
            _ => None,
        }
    }

    fn write_to<W: std::io::Write>(
        &self,
        writer: &mut Writer<W>,
        mode: RenderMode,
    ) -> Result<(), quick_xml::Error> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        writer.write_event(Event::Start(start))?;
        match &self.content {
            // An empty text event keeps `<name></name>` on one line.
            XmlContent::Empty => writer.write_event(Event::Text(BytesText::new("")))?,
            XmlContent::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
            XmlContent::Masked(secret) => {
                let value = match mode {
                    RenderMode::Exposed => secret.peek().as_str(),
                    RenderMode::Masked => MASKED_VALUE,
                };
                writer.write_event(Event::Text(BytesText::new(value)))?
            }
            XmlContent::Children(children) => {
                for child in children {
                    child.write_to(writer, mode)?;
                }
            }
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))
    }
}

#[derive(Clone, Copy, Debug)]
enum RenderMode {
    Exposed,
    Masked,
}

/// A full XML document: the prolog followed by a single root element.
#[derive(Clone, Debug)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    pub fn new(root: XmlElement) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Renders the document for the wire, secrets included.
    pub fn to_xml_string(&self) -> CustomResult<Secret<String>, ParsingError> {
        self.render(RenderMode::Exposed).map(Secret::new)
    }

    /// Renders the document with every secret leaf replaced, for logging.
    pub fn to_masked_string(&self) -> CustomResult<String, ParsingError> {
        self.render(RenderMode::Masked)
    }

    fn render(&self, mode: RenderMode) -> CustomResult<String, ParsingError> {
        let mut buffer = Vec::with_capacity(1024);
        buffer.extend_from_slice(XML_PROLOG.as_bytes());
        buffer.push(b'\n');
        let mut writer = Writer::new_with_indent(buffer, b' ', INDENT_SIZE);
        self.root
            .write_to(&mut writer, mode)
            .change_context(ParsingError::EncodeError("XML"))?;
        String::from_utf8(writer.into_inner()).change_context(ParsingError::EncodeError("XML"))
    }
}

#[cfg(test)]
mod tests {
    use hyperswitch_masking::ExposeInterface;

    use super::*;

    fn sample() -> XmlDocument {
        XmlDocument::new(XmlElement::parent(
            "Message",
            vec![
                XmlElement::text("RequestType", "Payment"),
                XmlElement::new("List").attribute("count", 1).child(
                    XmlElement::new("Item")
                        .attribute("ID", 1)
                        .child(XmlElement::text("amount", 1999))
                        .child(XmlElement::secret("password", StrongSecret::new("pw".to_string()))),
                ),
            ],
        ))
    }

    #[test]
    fn test_indented_layout() {
        let rendered = sample().to_xml_string().unwrap().expose();
        let expected = "<?xml version='1.0' encoding='UTF-8'?>\n\
<Message>\n\
\x20 <RequestType>Payment</RequestType>\n\
\x20 <List count=\"1\">\n\
\x20   <Item ID=\"1\">\n\
\x20     <amount>1999</amount>\n\
\x20     <password>pw</password>\n\
\x20   </Item>\n\
\x20 </List>\n\
</Message>";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_closing_tags_drop_attributes() {
        let rendered = sample().to_xml_string().unwrap().expose();
        assert!(rendered.contains("</List>"));
        assert!(!rendered.contains("</List count"));
    }

    #[test]
    fn test_masked_rendering_hides_secrets() {
        let rendered = sample().to_masked_string().unwrap();
        assert!(rendered.contains("<password>*** masked ***</password>"));
        assert!(!rendered.contains("<password>pw</password>"));
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let doc = XmlDocument::new(
            XmlElement::parent(
                "Root",
                vec![XmlElement::text("purchaseOrderNo", "A<B & \"C\"")],
            )
            .attribute("note", "x\"y"),
        );
        let rendered = doc.to_xml_string().unwrap().expose();
        assert!(rendered.contains("<purchaseOrderNo>A&lt;B &amp; &quot;C&quot;</purchaseOrderNo>"));
        assert!(rendered.contains("<Root note=\"x&quot;y\">"));
    }

    #[test]
    fn test_empty_element_stays_on_one_line() {
        let doc = XmlDocument::new(XmlElement::parent(
            "Root",
            vec![XmlElement::new("note"), XmlElement::text("name", "O'Brien")],
        ));
        let rendered = doc.to_xml_string().unwrap().expose();
        assert!(rendered.contains("\n  <note></note>\n"));
        assert!(rendered.contains("<name>O&apos;Brien</name>"));
    }

    #[test]
    fn test_find_child() {
        let doc = sample();
        let list = doc.root().find_child("List");
        assert!(list.is_some_and(|list| list.find_child("Item").is_some()));
        assert!(doc.root().find_child("Missing").is_none());
    }
}

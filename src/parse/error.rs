use super::event_summary::EventSummary;

use derive_more::{Constructor, Display};

/// An error caused while reading back a `.vtu` or `.pvtu` document
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to parse an xml element: {0}")]
    MalformedXml(#[from] quick_xml::Error),
    #[error("failed to parse an xml attribute: {0}")]
    MalformedAttribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("{0}")]
    UnexpectedElement(UnexpectedElement),
    #[error("{0}")]
    MissingAttribute(MissingAttribute),
    #[error("{0}")]
    UnexpectedAttributeValue(UnexpectedAttributeValue),
    #[error("document has no `{0}` element")]
    MissingElement(&'static str),
    #[error("unknown DataArray type `{0}`")]
    UnknownPrecision(String),
    #[error("{0}")]
    InvalidValue(InvalidValue),
    #[error("binary payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("binary payload too short to hold its length header ({0} bytes)")]
    TruncatedHeader(usize),
    #[error("binary payload declares {declared} bytes but holds {actual}")]
    LengthMismatch { declared: usize, actual: usize },
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "unexpected {actual_element} in {context}")]
pub struct UnexpectedElement {
    context: &'static str,
    actual_element: EventSummary,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "missing attribute `{attribute_name}` in {element_name} element")]
pub struct MissingAttribute {
    element_name: &'static str,
    attribute_name: &'static str,
}

#[derive(Display, Debug, Constructor)]
#[display(
    fmt = "unexpected attribute value for {attribute_name} in {element_name} element: expected {expected_value}, got {actual_value}"
)]
pub struct UnexpectedAttributeValue {
    element_name: &'static str,
    attribute_name: &'static str,
    expected_value: &'static str,
    actual_value: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "failed to parse `{text}` as {what}")]
pub struct InvalidValue {
    what: String,
    text: String,
}

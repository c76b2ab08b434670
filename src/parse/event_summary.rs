use quick_xml::events::Event;

use std::fmt;

/// what the reader found where it expected something else
#[derive(Debug)]
pub struct EventSummary {
    name: Option<String>,
    e_type: &'static str,
}

impl fmt::Display for EventSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "element {name} with type {}", self.e_type),
            None => write!(f, "unnamed event with type {}", self.e_type),
        }
    }
}

impl EventSummary {
    pub(crate) fn new(e: &Event) -> Self {
        Self {
            name: event_name(e),
            e_type: event_type(e),
        }
    }
}

fn event_name(event: &Event) -> Option<String> {
    let name = match event {
        Event::Start(s) | Event::Empty(s) => s.name(),
        Event::End(e) => e.name(),
        _ => return None,
    };
    Some(String::from_utf8_lossy(name.as_ref()).into_owned())
}

fn event_type(event: &Event) -> &'static str {
    match event {
        Event::Start(_) => "start",
        Event::End(_) => "end",
        Event::Empty(_) => "empty",
        Event::Text(_) => "text",
        Event::Comment(_) => "comment",
        Event::CData(_) => "cdata",
        Event::Decl(_) => "decl",
        Event::PI(_) => "pi",
        Event::DocType(_) => "doctype",
        Event::Eof => "eof",
    }
}

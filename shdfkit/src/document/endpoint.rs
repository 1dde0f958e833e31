//! SHDF connection endpoints: `<component_id>.<pin>` or
//! `breadboard.<position>`.

use crate::mapping::breadboard::BREADBOARD_ID;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    Pin { component: &'a str, pin: &'a str },
    /// Position text after `breadboard.`
    Breadboard(&'a str),
    /// No `.` separator at all
    Malformed(&'a str),
}

impl<'a> Endpoint<'a> {
    pub fn parse(text: &'a str) -> Self {
        match text.split_once('.') {
            Some((BREADBOARD_ID, position)) => Endpoint::Breadboard(position),
            Some((component, pin)) => Endpoint::Pin { component, pin },
            None => Endpoint::Malformed(text),
        }
    }

    pub fn is_breadboard(&self) -> bool {
        matches!(self, Endpoint::Breadboard(_))
    }
}

/// Component id in front of the first `.`, breadboard included.
pub fn component_prefix(endpoint: &str) -> Option<&str> {
    endpoint.split_once('.').map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            Endpoint::parse("btn1.pin1.l"),
            Endpoint::Pin { component: "btn1", pin: "pin1.l" }
        );
        assert_eq!(Endpoint::parse("breadboard.tn.3"), Endpoint::Breadboard("tn.3"));
        assert_eq!(Endpoint::parse("gnd"), Endpoint::Malformed("gnd"));
    }

    #[test]
    fn test_component_prefix() {
        assert_eq!(component_prefix("led1.a"), Some("led1"));
        assert_eq!(component_prefix("breadboard.1a"), Some("breadboard"));
        assert_eq!(component_prefix("led1"), None);
    }
}

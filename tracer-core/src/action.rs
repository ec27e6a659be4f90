//! Inline-button payloads: `repeat:<id>:<true|false>` re-arms a fired target.

use crate::error::HandlerError;

pub const REPEAT_PREFIX: &str = "repeat";
/// Payload of the inert button left on a notification after re-arming.
pub const PLUG_PAYLOAD: &str = "plug";

/// Re-arm request carried by the notification button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatAction {
    pub id: i64,
    pub domain_is_primary: bool,
}

impl RepeatAction {
    pub fn encode(&self) -> String {
        format!("{}:{}:{}", REPEAT_PREFIX, self.id, self.domain_is_primary)
    }
}

/// Decoded button payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionPayload {
    Repeat(RepeatAction),
    /// Any payload with an unrecognized leading token (including [`PLUG_PAYLOAD`]).
    Unknown,
}

impl ActionPayload {
    /// Parses a payload. A `repeat` payload with the wrong argument count or a non-numeric id is
    /// an error; anything that is not `repeat` is `Unknown`.
    pub fn parse(data: &str) -> Result<Self, HandlerError> {
        let mut parts = data.split(':');
        if parts.next() != Some(REPEAT_PREFIX) {
            return Ok(ActionPayload::Unknown);
        }
        let args: Vec<&str> = parts.collect();
        if args.len() != 2 {
            return Err(HandlerError::MalformedAction(data.to_string()));
        }
        let id = args[0]
            .parse::<i64>()
            .map_err(|_| HandlerError::MalformedAction(data.to_string()))?;
        Ok(ActionPayload::Repeat(RepeatAction {
            id,
            domain_is_primary: args[1] == "true",
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_repeat() {
        let action = RepeatAction {
            id: 12345,
            domain_is_primary: true,
        };
        assert_eq!(action.encode(), "repeat:12345:true");
        assert_eq!(
            ActionPayload::parse(&action.encode()).unwrap(),
            ActionPayload::Repeat(action)
        );
    }

    #[test]
    fn test_parse_false_and_unexpected_flag() {
        assert_eq!(
            ActionPayload::parse("repeat:7:false").unwrap(),
            ActionPayload::Repeat(RepeatAction {
                id: 7,
                domain_is_primary: false
            })
        );
        // Anything other than "true" reads as false.
        assert_eq!(
            ActionPayload::parse("repeat:7:yes").unwrap(),
            ActionPayload::Repeat(RepeatAction {
                id: 7,
                domain_is_primary: false
            })
        );
    }

    #[test]
    fn test_parse_malformed_repeat() {
        assert!(ActionPayload::parse("repeat").is_err());
        assert!(ActionPayload::parse("repeat:1").is_err());
        assert!(ActionPayload::parse("repeat:1:true:x").is_err());
        assert!(ActionPayload::parse("repeat:abc:true").is_err());
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(ActionPayload::parse(PLUG_PAYLOAD).unwrap(), ActionPayload::Unknown);
        assert_eq!(ActionPayload::parse("").unwrap(), ActionPayload::Unknown);
        assert_eq!(ActionPayload::parse("other:1:true").unwrap(), ActionPayload::Unknown);
    }
}

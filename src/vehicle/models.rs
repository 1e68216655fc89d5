use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Everything except the RFC 3986 unreserved characters gets escaped, the
/// same set `encodeURIComponent` leaves alone minus `!'()*`.
const MESSAGE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

impl From<Direction> for Command {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Forward => Command::Forward,
            Direction::Backward => Command::Backward,
            Direction::Left => Command::Left,
            Direction::Right => Command::Right,
        }
    }
}

/// A single intent understood by the car's `/action` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Forward,
    Backward,
    Left,
    Right,
    Stop,
    ToggleLight,
    SendMessage(String),
}

impl Command {
    /// Value of the `go` query parameter, already escaped for the URL.
    pub fn query_value(&self) -> String {
        match self {
            Command::Forward => "F".to_string(),
            Command::Backward => "B".to_string(),
            Command::Left => "L".to_string(),
            Command::Right => "R".to_string(),
            Command::Stop => "S".to_string(),
            Command::ToggleLight => "l".to_string(),
            Command::SendMessage(text) => {
                format!("m{}", utf8_percent_encode(text, MESSAGE_ENCODE_SET))
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Command::Forward => "Forward",
            Command::Backward => "Backward",
            Command::Left => "Left",
            Command::Right => "Right",
            Command::Stop => "Stop",
            Command::ToggleLight => "Toggle light",
            Command::SendMessage(_) => "Message",
        }
    }
}

/// Telemetry as reported by `GET /status`.
///
/// The firmware only sends what it knows, so every field is optional and
/// `None` means "not reported", never zero.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_command: Option<String>,
}

impl StatusSnapshot {
    pub fn is_empty(&self) -> bool {
        self == &StatusSnapshot::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_codes() {
        assert_eq!(Command::Forward.query_value(), "F");
        assert_eq!(Command::Backward.query_value(), "B");
        assert_eq!(Command::Left.query_value(), "L");
        assert_eq!(Command::Right.query_value(), "R");
        assert_eq!(Command::Stop.query_value(), "S");
        assert_eq!(Command::ToggleLight.query_value(), "l");
    }

    #[test]
    fn test_message_is_percent_encoded() {
        let cmd = Command::SendMessage("hi & bye=1 #2 ção".to_string());
        assert_eq!(
            cmd.query_value(),
            "mhi%20%26%20bye%3D1%20%232%20%C3%A7%C3%A3o"
        );
    }

    #[test]
    fn test_unreserved_characters_pass_through() {
        let cmd = Command::SendMessage("a-b_c.d~e".to_string());
        assert_eq!(cmd.query_value(), "ma-b_c.d~e");
    }

    #[test]
    fn test_direction_maps_to_command() {
        assert_eq!(Command::from(Direction::Left), Command::Left);
        assert_eq!(Command::from(Direction::Backward), Command::Backward);
    }
}

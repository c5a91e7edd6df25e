/// An inbound chat line tagged with its destination room.
///
/// Created by a connection's read pump, consumed once by the hub.
pub struct RoomMessage {
    pub room_id: String,
    pub payload: String,
}

impl RoomMessage {
    pub fn new(room_id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            payload: payload.into(),
        }
    }
}

/// Collapse embedded newlines to spaces and trim surrounding whitespace,
/// so that one chat line always stays one well-formed frame.
pub fn normalize_line(payload: &str) -> String {
    payload.replace('\n', " ").trim().to_owned()
}

// ============================== // tests // ============================== //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_newlines_become_spaces() {
        assert_eq!(normalize_line("hello\nworld"), "hello world");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(normalize_line("  hi there \n"), "hi there");
    }

    #[test]
    fn plain_lines_pass_through() {
        assert_eq!(normalize_line("hi"), "hi");
    }
}

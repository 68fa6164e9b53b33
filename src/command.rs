//! Command grammar (§4.C): parses an incoming line into a tagged command
//! variant. Sum-type dispatch replaces string-verb branching (§9).

/// Node-local replication consistency, selectable per node via `CONSISTENCY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsistencyMode {
    #[default]
    Eventual,
    Strong,
}

impl ConsistencyMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "eventual" => Some(Self::Eventual),
            "strong" => Some(Self::Strong),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eventual => "eventual",
            Self::Strong => "strong",
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::Eventual => 0,
            Self::Strong => 1,
        }
    }

    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Strong,
            _ => Self::Eventual,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ping,
    Leader,
    Consistency(String),
    Get(String),
    Set(String, String),
    ReplSet(String, String),
    /// `SET` with fewer than two arguments: arity is validated at parse
    /// time so a malformed write never needs to be forwarded to the
    /// leader first (an explicit resolution of an Open Question; see
    /// DESIGN.md).
    InvalidSet,
    Unknown,
}

/// Parses one command line: case-insensitive verb, arguments split on
/// space, max 3 tokens total, value token receives the remainder of the
/// line. Trailing whitespace must already be stripped by the caller.
pub fn parse_command(line: &str) -> Command {
    let mut parts = line.splitn(3, ' ');
    let verb = match parts.next() {
        Some(v) if !v.is_empty() => v,
        _ => return Command::Unknown,
    };

    match verb.to_ascii_uppercase().as_str() {
        "PING" => Command::Ping,
        "LEADER" => Command::Leader,
        "CONSISTENCY" => Command::Consistency(parts.next().unwrap_or("").to_string()),
        "GET" => match parts.next() {
            Some(key) if !key.is_empty() && parts.next().is_none() => {
                Command::Get(key.to_string())
            }
            _ => Command::Unknown,
        },
        "SET" => {
            let key = parts.next();
            let value = parts.next();
            match (key, value) {
                (Some(key), Some(value)) if !key.is_empty() && !value.is_empty() => {
                    Command::Set(key.to_string(), value.to_string())
                }
                _ => Command::InvalidSet,
            }
        }
        "REPL_SET" => {
            let key = parts.next();
            let value = parts.next();
            match (key, value) {
                (Some(key), Some(value)) if !key.is_empty() && !value.is_empty() => {
                    Command::ReplSet(key.to_string(), value.to_string())
                }
                _ => Command::Unknown,
            }
        }
        _ => Command::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ping_and_leader() {
        assert_eq!(parse_command("PING"), Command::Ping);
        assert_eq!(parse_command("ping"), Command::Ping);
        assert_eq!(parse_command("LEADER"), Command::Leader);
    }

    #[test]
    fn parses_get() {
        assert_eq!(parse_command("GET a"), Command::Get("a".to_string()));
        assert_eq!(parse_command("get a"), Command::Get("a".to_string()));
    }

    #[test]
    fn get_without_key_is_unknown() {
        assert_eq!(parse_command("GET"), Command::Unknown);
    }

    #[test]
    fn parses_set_with_multiword_value() {
        assert_eq!(
            parse_command("SET a hello world"),
            Command::Set("a".to_string(), "hello world".to_string())
        );
    }

    #[test]
    fn set_with_fewer_than_two_args_is_invalid_set() {
        assert_eq!(parse_command("SET a"), Command::InvalidSet);
        assert_eq!(parse_command("SET"), Command::InvalidSet);
    }

    #[test]
    fn parses_repl_set() {
        assert_eq!(
            parse_command("REPL_SET a 1"),
            Command::ReplSet("a".to_string(), "1".to_string())
        );
        assert_eq!(
            parse_command("repl_set a 1"),
            Command::ReplSet("a".to_string(), "1".to_string())
        );
    }

    #[test]
    fn parses_consistency() {
        assert_eq!(
            parse_command("CONSISTENCY strong"),
            Command::Consistency("strong".to_string())
        );
    }

    #[test]
    fn empty_or_whitespace_only_is_unknown() {
        assert_eq!(parse_command(""), Command::Unknown);
    }

    #[test]
    fn unrecognized_verb_is_unknown() {
        assert_eq!(parse_command("FOO bar"), Command::Unknown);
    }

    #[test]
    fn consistency_mode_round_trips() {
        assert_eq!(ConsistencyMode::parse("strong"), Some(ConsistencyMode::Strong));
        assert_eq!(ConsistencyMode::parse("Eventual"), Some(ConsistencyMode::Eventual));
        assert_eq!(ConsistencyMode::parse("bogus"), None);
        assert_eq!(
            ConsistencyMode::from_u8(ConsistencyMode::Strong.to_u8()),
            ConsistencyMode::Strong
        );
    }
}

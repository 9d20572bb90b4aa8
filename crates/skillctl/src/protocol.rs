use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/skillring.sock";

/// One line of the daemon control protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Toggle,
    Open,
    Close,
    Select(usize),
    Click(usize),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' expects a slot index")]
    MissingIndex(String),
    #[error("invalid slot index '{0}'")]
    InvalidIndex(String),
    #[error("unexpected trailing input '{0}'")]
    Trailing(String),
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(ProtocolError::Empty)?.to_ascii_lowercase();

        let command = match verb.as_str() {
            "toggle" => Self::Toggle,
            "open" => Self::Open,
            "close" => Self::Close,
            "select" | "click" => {
                let raw = words
                    .next()
                    .ok_or_else(|| ProtocolError::MissingIndex(verb.clone()))?;
                let index = raw
                    .parse()
                    .map_err(|_| ProtocolError::InvalidIndex(raw.to_string()))?;
                if verb == "select" {
                    Self::Select(index)
                } else {
                    Self::Click(index)
                }
            }
            _ => return Err(ProtocolError::Unknown(verb)),
        };

        match words.next() {
            Some(extra) => Err(ProtocolError::Trailing(extra.to_string())),
            None => Ok(command),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toggle => write!(f, "toggle"),
            Self::Open => write!(f, "open"),
            Self::Close => write!(f, "close"),
            Self::Select(index) => write!(f, "select {index}"),
            Self::Click(index) => write!(f, "click {index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        let cases = vec![
            ("toggle", Command::Toggle),
            ("  OPEN ", Command::Open),
            ("close", Command::Close),
            ("select 2", Command::Select(2)),
            ("Click 0", Command::Click(0)),
        ];

        for (line, expected) in cases {
            assert_eq!(line.parse::<Command>(), Ok(expected));
        }
    }

    #[test]
    fn test_command_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(ProtocolError::Empty));
        assert_eq!(
            "spin".parse::<Command>(),
            Err(ProtocolError::Unknown("spin".into()))
        );
        assert_eq!(
            "select".parse::<Command>(),
            Err(ProtocolError::MissingIndex("select".into()))
        );
        assert_eq!(
            "select -1".parse::<Command>(),
            Err(ProtocolError::InvalidIndex("-1".into()))
        );
        assert_eq!(
            "toggle now".parse::<Command>(),
            Err(ProtocolError::Trailing("now".into()))
        );
    }

    #[test]
    fn test_display_is_parseable() {
        for cmd in [Command::Toggle, Command::Select(3), Command::Click(1)] {
            assert_eq!(cmd.to_string().parse::<Command>(), Ok(cmd));
        }
    }
}

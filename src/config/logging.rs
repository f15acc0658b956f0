use serde::Deserialize;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Default, Deserialize)]
pub struct Logging {
    /// **Environment variable**: `SCRIBE_LOGGING_STYLE`
    ///
    /// There are four styles to choose:
    /// - `compact` - compacts logs but it is readable enough
    /// - `full` - default formatter from [`tracing_subscriber`].
    /// - `pretty` - makes logs pretty
    /// - `json` - serializes logs into JSON data
    ///
    /// The default value is `full`, if not set.
    #[serde(default)]
    pub style: LoggingStyle,

    /// **Environment variable**: `SCRIBE_LOGGING_TARGETS`
    ///
    /// This property filters logging events with the use of directives.
    /// `RUST_LOG` is used instead if this is left blank.
    ///
    /// You may refer on how directives work and parse and its examples by going to:
    /// https://docs.rs/tracing-subscriber/0.3.18/tracing_subscriber/filter/struct.EnvFilter.html
    #[serde(default)]
    pub targets: String,

    /// **Environment variable**: `SCRIBE_LOGGING_STREAM`
    ///
    /// What stream should the logger log into? Either `stdout` or `stderr`.
    ///
    /// The default value is `stderr`, if not set.
    #[serde(default)]
    pub stream: ConsoleStream,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoggingStyle {
    Compact,
    #[default]
    Full,
    Pretty,
    JSON,
}

impl Display for LoggingStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compact => f.write_str("compact"),
            Self::Full => f.write_str("full"),
            Self::Pretty => f.write_str("pretty"),
            Self::JSON => f.write_str("json"),
        }
    }
}

impl<'de> Deserialize<'de> for LoggingStyle {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Visitor;

        impl serde::de::Visitor<'_> for Visitor {
            type Value = LoggingStyle;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("logging style")
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                LoggingStyle::from_str(v).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(Visitor)
    }
}

#[derive(Debug, Error)]
#[error("unknown {0:?} logging style")]
pub struct InvalidLoggingStyle(String);

impl FromStr for LoggingStyle {
    type Err = InvalidLoggingStyle;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.to_lowercase();
        match s.as_str() {
            "compact" => Ok(Self::Compact),
            "full" => Ok(Self::Full),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::JSON),
            _ => Err(InvalidLoggingStyle(s)),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleStream {
    Stdout,
    #[default]
    Stderr,
    TestWriter,
}

impl Display for ConsoleStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::Stderr => f.write_str("stderr"),
            Self::TestWriter => f.write_str("test-writer"),
        }
    }
}

impl<'de> Deserialize<'de> for ConsoleStream {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Visitor;

        impl serde::de::Visitor<'_> for Visitor {
            type Value = ConsoleStream;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("console stream")
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                ConsoleStream::from_str(v).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(Visitor)
    }
}

#[derive(Debug, Error)]
#[error("unknown {0:?} console stream")]
pub struct InvalidConsoleStream(String);

impl FromStr for ConsoleStream {
    type Err = InvalidConsoleStream;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.to_lowercase();
        match s.as_str() {
            "stdout" => Ok(Self::Stdout),
            "stderr" => Ok(Self::Stderr),
            _ => Err(InvalidConsoleStream(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_style() {
        assert_eq!(LoggingStyle::from_str("Pretty").unwrap(), LoggingStyle::Pretty);
        assert_eq!(LoggingStyle::from_str("json").unwrap(), LoggingStyle::JSON);
        assert!(LoggingStyle::from_str("fancy").is_err());
    }

    #[test]
    fn test_parse_stream() {
        assert_eq!(ConsoleStream::from_str("STDOUT").unwrap(), ConsoleStream::Stdout);
        assert!(ConsoleStream::from_str("test-writer").is_err());
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CongruenceError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{context}, line {line}: {message}")]
    Parse {
        context: &'static str,
        line: usize,
        message: String,
    },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl CongruenceError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn parse(context: &'static str, line: usize, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            context,
            line,
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_line() {
        let err = CongruenceError::parse("read face series", 7, "bad timestamp");
        assert_eq!(err.to_string(), "read face series, line 7: bad timestamp");
    }
}

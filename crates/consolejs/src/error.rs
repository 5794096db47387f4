use std::{fmt, io, path::PathBuf};

/// A value thrown by evaluated JavaScript, reduced to printable parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsException {
    /// Constructor name of the thrown error (`ReferenceError`, `SyntaxError`, ...).
    ///
    /// `None` when the thrown value was not an error object, e.g. `throw 42`.
    pub name: Option<String>,
    /// The error message, or the stringified thrown value.
    pub message: String,
    /// Stack trace text reported by the engine, if any.
    pub stack: Option<String>,
}

impl JsException {
    /// Returns the identifier named by a "not defined" `ReferenceError`.
    ///
    /// QuickJS reports these as `'Foo' is not defined` (older releases quote the
    /// name, newer ones do not). Any other exception returns `None`.
    #[must_use]
    pub fn undefined_identifier(&self) -> Option<&str> {
        if self.name.as_deref() != Some("ReferenceError") {
            return None;
        }
        let name = self.message.strip_suffix(" is not defined")?;
        let name = name.strip_prefix('\'').and_then(|n| n.strip_suffix('\'')).unwrap_or(name);
        (!name.is_empty()).then_some(name)
    }
}

impl fmt::Display for JsException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) if self.message.is_empty() => write!(f, "{name}"),
            Some(name) => write!(f, "{name}: {}", self.message),
            None => write!(f, "Uncaught {}", self.message),
        }
    }
}

/// Error type for REPL activation and evaluation.
///
/// Keeping construction failures apart from thrown exceptions lets the
/// controller tear down after the former and keep the session after the latter.
#[derive(Debug, Clone)]
pub enum ReplError {
    /// The runtime, the context, or the installed bridges could not be created.
    EngineInit(String),
    /// Evaluated code threw.
    Exception(JsException),
    /// The engine failed without a catchable thrown value.
    Engine(String),
}

impl fmt::Display for ReplError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EngineInit(msg) => write!(f, "failed to start the JavaScript engine: {msg}"),
            Self::Exception(exc) => write!(f, "{exc}"),
            Self::Engine(msg) => write!(f, "engine error: {msg}"),
        }
    }
}

impl std::error::Error for ReplError {}

impl From<JsException> for ReplError {
    fn from(exc: JsException) -> Self {
        Self::Exception(exc)
    }
}

/// Error returned when a config file cannot be used.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io { path: PathBuf, source: io::Error },
    /// The file is not valid TOML, or does not match the config schema.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "error reading {}: {source}", path.display()),
            Self::Parse(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(_) => None,
        }
    }
}

impl From<toml_edit::de::Error> for ConfigError {
    fn from(error: toml_edit::de::Error) -> Self {
        Self::Parse(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_error(message: &str) -> JsException {
        JsException {
            name: Some("ReferenceError".to_owned()),
            message: message.to_owned(),
            stack: None,
        }
    }

    #[test]
    fn undefined_identifier_accepts_quoted_and_bare_names() {
        assert_eq!(reference_error("'Foo' is not defined").undefined_identifier(), Some("Foo"));
        assert_eq!(reference_error("Foo is not defined").undefined_identifier(), Some("Foo"));
    }

    #[test]
    fn undefined_identifier_ignores_other_errors() {
        assert_eq!(reference_error("cannot access 'x' before initialization").undefined_identifier(), None);
        let type_error = JsException {
            name: Some("TypeError".to_owned()),
            message: "'Foo' is not defined".to_owned(),
            stack: None,
        };
        assert_eq!(type_error.undefined_identifier(), None);
    }

    #[test]
    fn display_without_error_name_marks_thrown_value() {
        let thrown = JsException {
            name: None,
            message: "42".to_owned(),
            stack: None,
        };
        assert_eq!(thrown.to_string(), "Uncaught 42");
        assert_eq!(reference_error("x").to_string(), "ReferenceError: x");
    }
}

use std::path::PathBuf;

/// Broad classification of [`Error`] values.
///
/// The CLI maps each kind to its own process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing flag, unknown command, index out of range, unreadable directory.
    Configuration,
    /// Socket or HTTP transport failure, non-2xx status.
    Network,
    /// The bridge (or an SSDP peer) answered with something we can't decode.
    MalformedResponse,
    /// Bad user input, e.g. a color string.
    Validation,
    /// Discovery finished without seeing a bridge.
    NotFound,
    /// The bridge decoded the request and refused it.
    Rejected,
}

impl ErrorKind {
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorKind::Configuration => 2,
            ErrorKind::Network => 3,
            ErrorKind::MalformedResponse => 4,
            ErrorKind::Validation => 5,
            ErrorKind::NotFound => 6,
            ErrorKind::Rejected => 7,
        }
    }
}

/// All error types that can occur when talking to a Hue bridge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to serialize a request body.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// Failed to deserialize a bridge reply.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// A UDP socket operation failed during discovery.
    #[error("socket {action} error: {err:?}")]
    Socket { action: String, err: std::io::Error },

    /// An HTTP request could not be completed.
    #[error("http request to {url} failed: {err}")]
    Http { url: String, err: reqwest::Error },

    /// The bridge answered with a non-2xx status.
    #[error("http request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The reply decoded as JSON but not into the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The bridge reported an error entry for the request.
    #[error("bridge error {code} at {address}: {description}")]
    Api {
        code: u16,
        address: String,
        description: String,
    },

    /// No bridge answered before the discovery deadline.
    #[error("no bridge found on the network")]
    BridgeNotFound,

    /// The bridge record has no username yet.
    #[error("bridge {0} is not paired; run the pair command first")]
    NotPaired(String),

    /// Attempted to send a [`crate::StateUpdate`] with no attributes set.
    #[error("invalid state update; no attributes set")]
    NoAttribute,

    /// Failed to parse an [`crate::Rgb`] from a string.
    #[error("invalid color string: {0}")]
    InvalidColorString(String),

    /// A color channel is outside [0, 1].
    #[error("color channel {0} is outside [0, 1]")]
    ChannelOutOfRange(f64),

    /// Black has no chromaticity.
    #[error("black has no xy chromaticity; turn the light off instead")]
    BlackColor,

    /// The command name is not in the dispatch table.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A command was invoked without a flag it needs.
    #[error("command <{command}> requires --{flag}")]
    MissingArgument { command: String, flag: String },

    /// A bridge or light index does not select anything.
    #[error("{what} index {index} is out of range (have {len})")]
    IndexOutOfRange {
        what: String,
        index: usize,
        len: usize,
    },

    /// The bridge directory file could not be read or written.
    #[error("bridge directory {path:?}: {err:?}")]
    Directory { path: PathBuf, err: std::io::Error },

    /// Writing command output failed.
    #[error("failed to write output: {0:?}")]
    Output(std::io::Error),

    /// The bridge directory file holds something other than bridge records.
    #[error("bridge directory {path:?} is malformed: {err:?}")]
    DirectoryFormat {
        path: PathBuf,
        err: serde_json::Error,
    },
}

impl Error {
    /// Create a new socket error
    pub fn socket(action: &str, err: std::io::Error) -> Self {
        Error::Socket {
            action: action.to_string(),
            err,
        }
    }

    /// Create a new HTTP transport error
    pub fn http(url: &str, err: reqwest::Error) -> Self {
        Error::Http {
            url: url.to_string(),
            err,
        }
    }

    pub fn missing_argument(command: &str, flag: &str) -> Self {
        Error::MissingArgument {
            command: command.to_string(),
            flag: flag.to_string(),
        }
    }

    pub fn index_out_of_range(what: &str, index: usize, len: usize) -> Self {
        Error::IndexOutOfRange {
            what: what.to_string(),
            index,
            len,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::JsonDump(_)
            | Error::NoAttribute
            | Error::InvalidColorString(_)
            | Error::ChannelOutOfRange(_)
            | Error::BlackColor => ErrorKind::Validation,
            Error::JsonLoad(_) | Error::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Error::Socket { .. } | Error::Http { .. } | Error::Status { .. } => ErrorKind::Network,
            Error::Api { .. } => ErrorKind::Rejected,
            Error::BridgeNotFound => ErrorKind::NotFound,
            Error::NotPaired(_)
            | Error::UnknownCommand(_)
            | Error::MissingArgument { .. }
            | Error::IndexOutOfRange { .. }
            | Error::Directory { .. }
            | Error::Output(_)
            | Error::DirectoryFormat { .. } => ErrorKind::Configuration,
        }
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let kinds = [
            ErrorKind::Configuration,
            ErrorKind::Network,
            ErrorKind::MalformedResponse,
            ErrorKind::Validation,
            ErrorKind::NotFound,
            ErrorKind::Rejected,
        ];
        let mut codes: Vec<u8> = kinds.iter().map(ErrorKind::exit_code).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
        assert!(!codes.contains(&0));
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(Error::BridgeNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(
            Error::index_out_of_range("bridge", 3, 1).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            Error::InvalidColorString("0xZZ".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            Error::socket("bind", std::io::Error::other("boom")).kind(),
            ErrorKind::Network
        );
    }
}

/// A reply to the FTP client.
#[derive(Debug, Clone)]
pub enum Reply {
    /// No reply should be sent at all (used for commands served entirely by a spawned transfer
    /// task, which sends its own reply once done).
    None,
    /// A single-line reply.
    CodeAndMsg { code: ReplyCode, msg: String },
    /// A multi-line reply: all lines but the last are sent as `NNN-text`, the last as `NNN text`.
    MultiLine { code: ReplyCode, lines: Vec<String> },
}

/// The reply codes in use, per RFC 959/2228/2389/2428/3659.
//
// From: https://cr.yp.to/ftp/request.html#response
//
// The three digits form a code. Codes between 100 and 199 indicate marks; codes between 200
// and 399 indicate acceptance; codes between 400 and 599 indicate rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ReplyCode {
    FileStatusOkay = 150,

    CommandOkay = 200,
    CommandOkayNotImplemented = 202,
    SystemStatus = 211,
    FileStatus = 213,
    HelpMessage = 214,
    SystemType = 215,
    ServiceReady = 220,
    ClosingControlConnection = 221,
    ClosingDataConnection = 226,
    EnteringPassiveMode = 227,
    EnteringExtendedPassiveMode = 229,
    UserLoggedIn = 230,
    AuthOkayNoDataNeeded = 234,
    FileActionOkay = 250,
    DirCreated = 257,

    NeedPassword = 331,
    FileActionPending = 350,

    ServiceNotAvailable = 421,
    CantOpenDataConnection = 425,
    ConnectionClosed = 426,
    LocalError = 451,

    CommandSyntaxError = 500,
    ParameterSyntaxError = 501,
    CommandNotImplemented = 502,
    BadCommandSequence = 503,
    CommandNotImplementedForParameter = 504,
    NotLoggedIn = 530,
    FtpsRequired = 534,
    ProtNotSupported = 536,
    FileError = 550,
    BadFileName = 553,
    /// Non-standard but what several servers (and the behaviour this crate is matched against)
    /// send when `MKD` targets a path that already exists.
    DirectoryExists = 521,
}

impl Reply {
    /// A single-line reply.
    pub fn new(code: ReplyCode, message: impl Into<String>) -> Self {
        Reply::CodeAndMsg { code, msg: message.into() }
    }

    /// A multi-line reply built from an iterator of displayable lines.
    pub fn new_multiline<I>(code: ReplyCode, lines: I) -> Self
    where
        I: IntoIterator,
        I::Item: std::fmt::Display,
    {
        Reply::MultiLine {
            code,
            lines: lines.into_iter().map(|item| format!("{}", item)).collect(),
        }
    }

    /// No reply at all.
    pub fn none() -> Self {
        Reply::None
    }
}

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PbrtErrorKind {
    Warning,
    Error,
    Fatal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PbrtError {
    pub kind: PbrtErrorKind,
    pub msg: String,
}

impl PbrtError {
    pub fn new(kind: PbrtErrorKind, msg: &str) -> Self {
        PbrtError {
            kind,
            msg: msg.to_string(),
        }
    }

    pub fn warning(msg: &str) -> Self {
        Self::new(PbrtErrorKind::Warning, msg)
    }

    pub fn error(msg: &str) -> Self {
        Self::new(PbrtErrorKind::Error, msg)
    }

    pub fn fatal(msg: &str) -> Self {
        Self::new(PbrtErrorKind::Fatal, msg)
    }

    pub fn is_warning(&self) -> bool {
        return self.kind == PbrtErrorKind::Warning;
    }
}

impl fmt::Display for PbrtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PbrtErrorKind::Warning => write!(f, "Warning: {}", self.msg),
            PbrtErrorKind::Error => write!(f, "Error: {}", self.msg),
            PbrtErrorKind::Fatal => write!(f, "Fatal: {}", self.msg),
        }
    }
}

impl std::error::Error for PbrtError {}

impl From<&str> for PbrtError {
    fn from(msg: &str) -> Self {
        PbrtError::error(msg)
    }
}

impl From<String> for PbrtError {
    fn from(msg: String) -> Self {
        PbrtError::error(&msg)
    }
}

impl From<std::io::Error> for PbrtError {
    fn from(e: std::io::Error) -> Self {
        PbrtError::error(&e.to_string())
    }
}

impl From<std::num::ParseFloatError> for PbrtError {
    fn from(e: std::num::ParseFloatError) -> Self {
        PbrtError::error(&e.to_string())
    }
}

impl From<std::num::ParseIntError> for PbrtError {
    fn from(e: std::num::ParseIntError) -> Self {
        PbrtError::error(&e.to_string())
    }
}

impl<I> From<nom::Err<nom::error::Error<I>>> for PbrtError {
    fn from(e: nom::Err<nom::error::Error<I>>) -> Self {
        match e {
            nom::Err::Incomplete(_) => PbrtError::error("Parse error: unexpected end of input"),
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                PbrtError::error(&format!("Parse error: {:?}", e.code))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let e = PbrtError::warning("Accelerator \"foo\" unknown.");
        assert!(e.is_warning());
        assert_eq!(format!("{}", e), "Warning: Accelerator \"foo\" unknown.");
    }

    #[test]
    fn test_002() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.binary");
        let e = PbrtError::from(io);
        assert_eq!(e.kind, PbrtErrorKind::Error);
        assert!(e.msg.contains("missing.binary"));
    }
}

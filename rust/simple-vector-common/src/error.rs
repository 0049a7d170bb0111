use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn out_of_range(index: usize, len: usize) -> Error {
        Error(ErrorKind::OutOfRange { index, len }.into())
    }

    pub fn capacity_overflow(requested: usize) -> Error {
        Error(ErrorKind::CapacityOverflow { requested }.into())
    }

    pub fn allocation_failed(bytes: usize) -> Error {
        Error(ErrorKind::AllocationFailed { bytes }.into())
    }

    /// Returns `true` if this error reports a checked access past the logical length.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self.kind(), ErrorKind::OutOfRange { .. })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("index {index} is out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("capacity overflow: {requested} slots exceed the addressable size")]
    CapacityOverflow { requested: usize },

    #[error("memory allocation of {bytes} bytes failed")]
    AllocationFailed { bytes: usize },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let e = Error::out_of_range(5, 3);
        assert!(e.is_out_of_range());
        assert_eq!(e.to_string(), "index 5 is out of range for length 3");
        assert_eq!(e.into_kind(), ErrorKind::OutOfRange { index: 5, len: 3 });
    }

    #[test]
    fn test_allocation_errors_are_not_out_of_range() {
        assert!(!Error::allocation_failed(64).is_out_of_range());
        assert!(!Error::capacity_overflow(usize::MAX).is_out_of_range());
        assert!(
            Error::allocation_failed(64)
                .to_string()
                .contains("64 bytes")
        );
    }

    #[test]
    fn test_error_is_std_error() {
        fn takes_error(e: &(dyn std::error::Error + Send + Sync)) -> String {
            e.to_string()
        }
        let e = Error::capacity_overflow(usize::MAX);
        assert!(takes_error(&e).starts_with("capacity overflow"));
    }
}

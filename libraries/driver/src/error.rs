use embedded_hal::i2c::ErrorKind;
use hal::InvalidGnssMode;
use thiserror::Error;

/// Errors reported by the L76K driver
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The write selecting the register to read was not accepted
    #[error("selecting register {register} failed: {kind}")]
    RegisterSelect { register: u8, kind: ErrorKind },

    /// The register was selected but reading it back failed
    #[error("reading {len} bytes from register {register} failed: {kind}")]
    Read { register: u8, len: usize, kind: ErrorKind },

    /// Writing a control register failed
    #[error("writing {value:#04x} to register {register} failed: {kind}")]
    Write { register: u8, value: u8, kind: ErrorKind },

    /// A decoder was handed fewer bytes than the field needs
    #[error("expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// The GNSS mode register holds a value outside 1..=7
    #[error(transparent)]
    UnknownGnssMode(#[from] InvalidGnssMode),
}

impl Error {
    /// Bus-level cause, if the error came from the transport
    pub fn bus_kind(&self) -> Option<ErrorKind> {
        match self {
            Error::RegisterSelect { kind, .. } | Error::Read { kind, .. } | Error::Write { kind, .. } => {
                Some(*kind)
            }
            Error::Truncated { .. } | Error::UnknownGnssMode(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::NoAcknowledgeSource;

    #[test]
    fn test_bus_kind() {
        let err = Error::RegisterSelect {
            register: 19,
            kind: ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
        };
        assert_eq!(
            err.bus_kind(),
            Some(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
        );

        let err = Error::Truncated { expected: 5, actual: 0 };
        assert_eq!(err.bus_kind(), None);
    }

    #[test]
    fn test_display() {
        let err = Error::Truncated { expected: 4, actual: 0 };
        assert_eq!(err.to_string(), "expected at least 4 bytes, got 0");

        let err = Error::Write { register: 36, value: 0x05, kind: ErrorKind::Bus };
        assert!(
            err.to_string().starts_with("writing 0x05 to register 36 failed"),
            "unexpected message: {}",
            err
        );

        let err = Error::from(InvalidGnssMode(0));
        assert_eq!(err.to_string(), "invalid GNSS mode value 0 (expected 1..=7)");
    }
}

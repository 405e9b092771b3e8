//! Error types for the FEC driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Configuration and lifecycle failures
//! - [`DmaError`]: Frame and buffer problems on the data path
//! - [`IoError`]: Management bus and state failures
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most driver methods. Per-frame transfer errors are never returned;
//! they are counted in [`Statistics`](super::stats::Statistics).

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and lifecycle errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Device already opened
    AlreadyOpen,
    /// Invalid configuration parameter
    InvalidConfig,
    /// Invalid PHY address (must be 0-31)
    InvalidPhyAddress,
    /// Station address is multicast or all zeros
    InvalidMacAddress,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::AlreadyOpen => "device already open",
            ConfigError::InvalidConfig => "invalid configuration",
            ConfigError::InvalidPhyAddress => "invalid PHY address",
            ConfigError::InvalidMacAddress => "invalid MAC address",
        }
    }
}

// =============================================================================
// DMA Errors
// =============================================================================

/// Frame and buffer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaError {
    /// Buffer pool could not supply a ring buffer
    OutOfBuffers,
    /// Frame too large for a transmit buffer
    FrameTooLarge,
    /// Invalid frame length (zero)
    InvalidLength,
}

impl core::fmt::Display for DmaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DmaError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DmaError::OutOfBuffers => "out of ring buffers",
            DmaError::FrameTooLarge => "frame too large for buffers",
            DmaError::InvalidLength => "invalid frame length",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Management bus and device state errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// MII management frame did not complete in time
    Timeout,
    /// Invalid state for operation (e.g., device not open)
    InvalidState,
    /// Another management frame is in progress
    Busy,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::Timeout => "operation timed out",
            IoError::InvalidState => "invalid state for operation",
            IoError::Busy => "management bus busy",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Config(ConfigError::InvalidMacAddress)) => { /* ... */ }
///     Err(Error::Dma(DmaError::FrameTooLarge)) => { /* ... */ }
///     Err(Error::Io(IoError::Timeout)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// DMA error
    Dma(DmaError),
    /// I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Dma(e) => write!(f, "dma: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<DmaError> for Error {
    fn from(e: DmaError) -> Self {
        Error::Dma(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for FEC operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for DMA operations
pub type DmaResult<T> = core::result::Result<T, DmaError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;
    use std::format;

    use super::*;

    #[test]
    fn as_str_non_empty_for_every_variant() {
        for s in [
            ConfigError::AlreadyOpen.as_str(),
            ConfigError::InvalidConfig.as_str(),
            ConfigError::InvalidPhyAddress.as_str(),
            ConfigError::InvalidMacAddress.as_str(),
            DmaError::OutOfBuffers.as_str(),
            DmaError::FrameTooLarge.as_str(),
            DmaError::InvalidLength.as_str(),
            IoError::Timeout.as_str(),
            IoError::InvalidState.as_str(),
            IoError::Busy.as_str(),
        ] {
            assert!(!s.is_empty());
        }
    }

    #[test]
    fn io_error_display() {
        assert_eq!(format!("{}", IoError::Timeout), "operation timed out");
    }

    #[test]
    fn error_from_domain_errors() {
        assert_eq!(
            Error::from(ConfigError::InvalidMacAddress),
            Error::Config(ConfigError::InvalidMacAddress)
        );
        assert_eq!(Error::from(DmaError::FrameTooLarge), Error::Dma(DmaError::FrameTooLarge));
        assert_eq!(Error::from(IoError::Timeout), Error::Io(IoError::Timeout));
    }

    #[test]
    fn error_display_prefixes_domain() {
        let display = format!("{}", Error::Io(IoError::Timeout));
        assert!(display.starts_with("io:"));
        assert!(display.contains("timed out"));

        let display = format!("{}", Error::Dma(DmaError::OutOfBuffers));
        assert!(display.starts_with("dma:"));
    }

    #[test]
    fn question_mark_converts() {
        fn inner() -> Result<()> {
            Err(ConfigError::AlreadyOpen)?;
            Ok(())
        }
        assert_eq!(inner(), Err(Error::Config(ConfigError::AlreadyOpen)));
    }
}

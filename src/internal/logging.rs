//! Logging macros.
//!
//! Forward to `defmt` when the `defmt` feature is enabled, otherwise to the
//! `log` facade when `log` is enabled, and compile to nothing when neither
//! is. Format strings must stay within the subset both backends accept
//! (plain `{}` placeholders).

macro_rules! fec_log {
    ($level:ident, $($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::$level!($($arg)*);
        #[cfg(all(feature = "log", not(feature = "defmt")))]
        ::log::$level!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "log")))]
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

macro_rules! fec_debug {
    ($($arg:tt)*) => { $crate::internal::logging::fec_log!(debug, $($arg)*) };
}

macro_rules! fec_info {
    ($($arg:tt)*) => { $crate::internal::logging::fec_log!(info, $($arg)*) };
}

macro_rules! fec_warn {
    ($($arg:tt)*) => { $crate::internal::logging::fec_log!(warn, $($arg)*) };
}

macro_rules! fec_error {
    ($($arg:tt)*) => { $crate::internal::logging::fec_log!(error, $($arg)*) };
}

pub(crate) use fec_debug;
pub(crate) use fec_error;
pub(crate) use fec_info;
pub(crate) use fec_log;
pub(crate) use fec_warn;

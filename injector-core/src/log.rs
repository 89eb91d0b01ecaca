//! Logging macros
//!
//! With the `defmt` feature the macros forward to `defmt`. Without it they
//! expand to nothing at runtime but still type-check their arguments, so
//! host builds see the same unused-variable and format errors as firmware
//! builds. Format strings must stay within the `{}` subset both accept.

#[cfg(feature = "defmt")]
macro_rules! info {
    ($($arg:tt)*) => { ::defmt::info!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($($arg:tt)*) => { ::core::mem::drop(::core::format_args!($($arg)*)) };
}

#[cfg(feature = "defmt")]
macro_rules! warn {
    ($($arg:tt)*) => { ::defmt::warn!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! warn {
    ($($arg:tt)*) => { ::core::mem::drop(::core::format_args!($($arg)*)) };
}

#[cfg(feature = "defmt")]
macro_rules! error {
    ($($arg:tt)*) => { ::defmt::error!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! error {
    ($($arg:tt)*) => { ::core::mem::drop(::core::format_args!($($arg)*)) };
}

#[cfg(feature = "defmt")]
macro_rules! debug {
    ($($arg:tt)*) => { ::defmt::debug!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($arg:tt)*) => { ::core::mem::drop(::core::format_args!($($arg)*)) };
}

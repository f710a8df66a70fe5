// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Logging macros.
//!
//! On the MCU these forward to `defmt` (RTT transport is set up in `main.rs`). On a host build they
//! expand to nothing, but still borrow their arguments so call sites type-check the same way.

#![allow(unused_macros)]

#[cfg(target_os = "none")]
macro_rules! trace {
    ($($arg:tt)*) => { ::defmt::trace!($($arg)*) };
}

#[cfg(target_os = "none")]
macro_rules! debug {
    ($($arg:tt)*) => { ::defmt::debug!($($arg)*) };
}

#[cfg(target_os = "none")]
macro_rules! info {
    ($($arg:tt)*) => { ::defmt::info!($($arg)*) };
}

#[cfg(target_os = "none")]
macro_rules! warn {
    ($($arg:tt)*) => { ::defmt::warn!($($arg)*) };
}

#[cfg(not(target_os = "none"))]
macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {{ let _ = ($( & $x, )*); }};
}

#[cfg(not(target_os = "none"))]
macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {{ let _ = ($( & $x, )*); }};
}

#[cfg(not(target_os = "none"))]
macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {{ let _ = ($( & $x, )*); }};
}

#[cfg(not(target_os = "none"))]
macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {{ let _ = ($( & $x, )*); }};
}

#[cfg(test)]
#[deny(unused_parens)]
mod tests {
    #[test]
    fn host_macros_accept_any_arity() {
        let id = 3u8;
        let len = 6usize;
        trace!("tick");
        debug!("frame {=u8}", id);
        info!("frame {=u8} len {=usize}", id, len);
        warn!("dropped {=usize}", len,);
    }
}

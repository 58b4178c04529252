//! Inert-by-default narration for block/edge construction.
//!
//! An `std`-feature branch vs. a no-op branch, with the narration routed
//! through an injected `core::fmt::Write` sink since this crate has no
//! ambient stdout.

#[macro_export]
macro_rules! trace_lowering {
    ($sink:expr, $($arg:tt)*) => {
        #[cfg(feature = "trace-lowering")]
        {
            use core::fmt::Write as _;
            let _ = writeln!($sink, $($arg)*);
        }
        #[cfg(not(feature = "trace-lowering"))]
        {
            let _ = core::format_args!($($arg)*);
        }
    };
}

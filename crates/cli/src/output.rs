//! Terminal output for command results.
//!
//! Results go to stdout and problems the user must fix go to stderr. Tracing
//! stays for diagnostics and is filtered by `RUST_LOG`.

/// Print a command result line.
macro_rules! say {
    ($($arg:tt)*) => {{
        #[allow(clippy::print_stdout)]
        {
            println!($($arg)*);
        }
    }};
}

/// Print a line the user needs to act on.
macro_rules! complain {
    ($($arg:tt)*) => {{
        #[allow(clippy::print_stderr)]
        {
            eprintln!($($arg)*);
        }
    }};
}

//! Compile-time constants shared across the front end

pub mod compile_time {
    pub mod syntax {
        /// Maximum diagnostics accumulated before the parse loop aborts
        /// with a "too many errors" summary.
        pub const MAX_DIAGNOSTICS: usize = 10;

        /// Sentinel error count set on unexpected end-of-input.
        ///
        /// Any value above `MAX_DIAGNOSTICS` terminates the outer parse
        /// loop; this one additionally suppresses the summary diagnostic.
        pub const FATAL_ERROR_COUNT: usize = 1000;
    }

    pub mod lexical {
        /// Maximum token text length echoed into log context fields.
        pub const MAX_LOGGED_TOKEN_LEN: usize = 64;
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Environment variables consulted by `Config::from_env`
pub mod env {
    /// Base directory the template file list is resolved against
    pub const TEMPLATE_DIR: &str = "TEMPLATEDIR";
    /// Comma-separated, ordered list of template file names
    pub const TEMPLATE_FILE_LIST: &str = "TEMPLATE_FILELIST";
    /// Inline template text, used when no file list is configured
    pub const TEMPLATE_CONTENT: &str = "TEMPLATE_CONTENT";
    /// "true" selects flat output, anything else must be "false"
    pub const FLAT_OUTPUT: &str = "FLAT_OUTPUT";
}

/// Quantity suffixes accepted for the `unit` of an optional resource
pub const VALID_UNITS: &[&str] = &[
    "m", "k", "M", "G", "T", "P", "E", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei",
];

/// Name given to a template supplied inline rather than read from a file
pub const INLINE_TEMPLATE_NAME: &str = "raw_stream";

/// Project name used when rendering templates to show their defaults
pub const SHOW_DEFAULTS_PROJECT: &str = "show-only";

/// Bounds on template parsing and execution
pub mod limits {
    /// Maximum nesting of `if`/`range` blocks
    pub const MAX_NESTING: usize = 32;
    /// Maximum evaluation steps for a single render
    pub const MAX_STEPS: usize = 100_000;
}

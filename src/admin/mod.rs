//! Operator-facing surface: the attribute directory and the raw command
//! path behind its `cmd_cli` entry.

pub mod attrs;
pub mod inject;

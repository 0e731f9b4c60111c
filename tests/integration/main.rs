//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against the scripted mock port.  All tests run on the host (x86_64)
//! with no real hardware required.

mod admin_tests;
mod init_tests;
mod mock_port;
mod session_tests;

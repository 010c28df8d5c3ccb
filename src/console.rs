//! Operator console output.
//!
//! These binaries talk to a human at a terminal; sections and steps keep
//! the transcript scannable when an installer dumps pages of output in
//! between.

/// Print a section banner.
pub fn section(title: &str) {
    println!("\n----------------- {} -----------------", title);
}

/// Print a step line within a section.
pub fn step(msg: &str) {
    println!(" - {}", msg);
}

/// Print an informational line.
pub fn note(msg: &str) {
    println!("{}", msg);
}

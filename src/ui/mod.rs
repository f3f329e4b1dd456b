// UI module
// Console output for operators

pub mod console;
pub mod styles;

pub use console::ConsoleReporter;
pub use styles::Styles;

/// Marshal-to-JSON file conversion command.
pub mod convert;
/// Stdout inspection command.
pub mod show;

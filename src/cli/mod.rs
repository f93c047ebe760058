pub mod shell;

pub use shell::{Command, InteractiveShell};

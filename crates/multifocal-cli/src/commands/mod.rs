pub mod calc;
pub mod common;
pub mod history;
pub mod init;
pub mod shell;

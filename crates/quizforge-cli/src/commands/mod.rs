pub mod init;
pub mod run;
pub mod select;
pub mod validate;

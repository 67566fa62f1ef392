// Low-level building blocks shared by the installers and the orchestration
// logic: the filesystem, command and HTTP seams plus archive/binary helpers.

pub mod binary;
pub mod command_runner;
pub mod compression;
pub mod file_operations;
pub mod http;
pub mod path_helpers;
pub mod platform;

pub mod docker;
pub mod install;
pub mod log;
pub mod pid;
pub mod run;
pub mod start;
pub mod stop;

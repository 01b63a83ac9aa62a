pub mod app;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod info;
pub mod labels;
pub mod output;
pub mod run;
pub mod runtime;

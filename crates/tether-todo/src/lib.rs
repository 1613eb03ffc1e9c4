#![forbid(unsafe_code)]

//! Todo application built on Tether.
//!
//! - [`model`]: the list cell and its mutation helpers.
//! - [`view`]: widgets over the list.
//! - [`app`]: the assembled page.
//! - [`cli`]: the `tether-todo` command line front end.

pub mod app;
pub mod cli;
pub mod error;
pub mod model;
pub mod view;

pub use app::app;
pub use cli::{Cli, render, run_from_env};
pub use error::{CliError, Result};
pub use model::{TodoItem, TodoList, add_item, clear_completed, remove_item, set_all_completed};

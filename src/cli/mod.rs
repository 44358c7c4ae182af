pub mod commands;
pub mod ui;

pub use commands::run::RunArgs;
pub use ui::Output;

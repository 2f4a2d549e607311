//! 命令定义和实现

pub mod config;
pub mod cycle;
pub mod demo;
pub mod goto;
pub mod r#move;
pub mod ports;
pub mod status;

pub use config::ConfigCommand;
pub use cycle::CycleCommand;
pub use demo::DemoCommand;
pub use goto::GotoCommand;
pub use r#move::MoveCommand;

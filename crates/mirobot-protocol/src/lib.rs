//! # Mirobot Protocol
//!
//! WLKATA Mirobot 串口协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `constants`: 协议常量（指令字、关节限位、默认串口参数）
//! - `command`: 运动指令构建（G-code 行）
//! - `status`: 状态报告解析（`<Idle,Angle(...)...>`）
//!
//! ## 帧格式
//!
//! 协议是面向行的 ASCII 文本：每条指令一行，以 `\r\n` 结尾；
//! 固件以 `ok` / `error...` 应答，状态查询 `?` 返回一行 `<...>` 报告。
//!
//! ```rust
//! use mirobot_protocol::{JointAngles, MotionCommand, PositionMode};
//!
//! let cmd = MotionCommand::joint(JointAngles::new([30.0, 0.0, 0.0, 0.0, 0.0, 0.0]), PositionMode::Absolute);
//! assert_eq!(
//!     cmd.encode(),
//!     "M21 G90 G00 X30.000 Y0.000 Z0.000 A0.000 B0.000 C0.000"
//! );
//! ```

pub mod command;
pub mod constants;
pub mod status;

pub use command::*;
pub use constants::*;
pub use status::*;

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    /// 状态报告格式不正确
    #[error("Invalid status report: {0}")]
    InvalidStatus(String),

    /// 数值字段解析失败
    #[error("Invalid number in field '{field}': {value}")]
    InvalidNumber { field: &'static str, value: String },

    /// 固件拒绝了指令（`error:...` 应答）
    #[error("Command rejected by firmware: {0}")]
    Rejected(String),

    /// 枚举原始值无效
    #[error("Unknown value {value} for {kind}")]
    UnknownEnumValue { kind: &'static str, value: u8 },
}

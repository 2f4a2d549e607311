//! 驱动层错误类型定义

use mirobot_protocol::ProtocolError;
use mirobot_serial::SerialError;
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 串口传输错误
    #[error("Serial transport error: {0}")]
    Serial(#[from] SerialError),

    /// 协议解析错误 / 固件拒绝
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 打开串口或初始化机械臂失败
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// 没有可用的机械臂连接（未连接或已断开）
    #[error("Mirobot not initialized")]
    NotConnected,

    /// 等待运动完成超时
    #[error("Timeout waiting for completion after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// 等待被取消（已下发的运动不会被撤回）
    #[error("Wait cancelled")]
    Cancelled,

    /// 机械臂报告故障（如 Alarm 状态）
    #[error("Actuator fault: {0}")]
    Fault(String),
}

impl DriverError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DriverError::Timeout { .. })
    }
}

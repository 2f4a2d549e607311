//! 基于串口 G-code 协议的执行器

use crate::{Actuator, DriverError};
use mirobot_protocol::{
    ACK_ERROR_PREFIX, ACK_OK, ArmStatus, DEFAULT_READ_TIMEOUT_MS, MotionCommand, ProtocolError,
    STATUS_QUERY,
};
use mirobot_serial::{SerialError, Transport};
use std::time::Duration;
use tracing::{debug, trace};

/// 单次应答最多读取的行数（防止固件持续输出日志时陷入死循环）
const MAX_REPLY_LINES: usize = 16;

/// 默认应答超时
pub const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_millis(500);

/// 串口执行器
///
/// 指令应答规则：
/// - `ok`：已接受
/// - `error...`：被拒绝，返回 `ProtocolError::Rejected`
/// - 读超时：容忍，运动是否完成由状态轮询决定（回零等长指令的 `ok` 可能在运动结束后才到）
///
/// 下发前会清空接收缓冲区，上一条指令迟到的 `ok` 不会被当成新指令的应答。
/// 状态查询使用串口读超时，指令应答使用单独的应答超时。
pub struct SerialActuator<T: Transport> {
    transport: T,
    ack_timeout: Duration,
    read_timeout: Duration,
}

impl<T: Transport> SerialActuator<T> {
    pub fn new(transport: T, ack_timeout: Duration) -> Self {
        Self {
            transport,
            ack_timeout,
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
        }
    }

    /// 设置状态查询的读超时（通常取自 `PortConfig::read_timeout`）
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// 丢弃上电横幅等残留输入
    pub fn discard_input(&mut self) -> Result<(), DriverError> {
        self.transport.clear_input()?;
        Ok(())
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn await_ack(&mut self, line: &str) -> Result<(), DriverError> {
        for _ in 0..MAX_REPLY_LINES {
            match self.transport.read_line_timeout(self.ack_timeout) {
                Ok(reply) => {
                    let reply = reply.trim();
                    if reply.eq_ignore_ascii_case(ACK_OK) {
                        trace!("'{}' acknowledged", line);
                        return Ok(());
                    }
                    if reply.starts_with(ACK_ERROR_PREFIX) {
                        return Err(ProtocolError::Rejected(reply.to_string()).into());
                    }
                    debug!("Ignoring firmware output while waiting for ack: {}", reply);
                },
                Err(SerialError::Timeout) => {
                    debug!("No ack for '{}' within {:?}, relying on status polling", line, self.ack_timeout);
                    return Ok(());
                },
                Err(e) => return Err(e.into()),
            }
        }
        debug!("No ack for '{}' after {} lines", line, MAX_REPLY_LINES);
        Ok(())
    }
}

impl<T: Transport> Actuator for SerialActuator<T> {
    fn send(&mut self, command: &MotionCommand) -> Result<(), DriverError> {
        let line = command.encode();
        debug!("Sending: {}", line);
        self.transport.clear_input()?;
        self.transport.write_line(&line)?;
        self.await_ack(&line)
    }

    fn query_status(&mut self) -> Result<ArmStatus, DriverError> {
        self.transport.write_line(STATUS_QUERY)?;
        for _ in 0..MAX_REPLY_LINES {
            let reply = self.transport.read_line_timeout(self.read_timeout)?;
            if ArmStatus::is_report(&reply) {
                let status = ArmStatus::parse(&reply)?;
                trace!("Status: {}", status.state);
                return Ok(status);
            }
            // 上一条指令在应答超时之后才到的拒绝
            let trimmed = reply.trim();
            if trimmed.starts_with(ACK_ERROR_PREFIX) {
                return Err(ProtocolError::Rejected(trimmed.to_string()).into());
            }
            // 上一条指令迟到的 ok 或其他输出
            trace!("Skipping non-status line: {}", reply);
        }
        Err(ProtocolError::InvalidStatus("no status report in reply".to_string()).into())
    }

    fn describe(&self) -> String {
        "mirobot (serial)".to_string()
    }
}

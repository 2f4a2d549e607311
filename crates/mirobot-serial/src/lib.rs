//! # Mirobot Serial Transport Layer
//!
//! 串口传输抽象层：上层只关心"写一行 / 读一行"，不关心底层是真实串口还是模拟设备。
//!
//! - [`SerialTransport`]：基于 `serialport` 的真实串口
//! - [`mock::MockTransport`]：脚本化应答，用于测试（需要 `mock` feature）

use std::time::Duration;
use thiserror::Error;

mod port;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use port::{PortConfig, SerialTransport, available_ports};

/// 传输层统一错误类型
#[derive(Error, Debug)]
pub enum SerialError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serial port error: {0}")]
    Port(#[from] serialport::Error),
    #[error("Read timeout")]
    Timeout,
    #[error("Transport closed")]
    Closed,
}

impl SerialError {
    /// 超时是否可以容忍（继续轮询即可）
    pub fn is_timeout(&self) -> bool {
        matches!(self, SerialError::Timeout)
    }
}

/// 面向行的传输接口
///
/// 实现者负责行结束符的添加与剥离：`write_line` 的参数和 `read_line` 的返回值都不含 `\r\n`。
pub trait Transport {
    fn write_line(&mut self, line: &str) -> Result<(), SerialError>;

    /// 读取一行，使用传输层当前的读超时
    fn read_line(&mut self) -> Result<String, SerialError>;

    fn set_read_timeout(&mut self, _timeout: Duration) -> Result<(), SerialError> {
        Ok(())
    }

    fn read_line_timeout(&mut self, timeout: Duration) -> Result<String, SerialError> {
        self.set_read_timeout(timeout)?;
        self.read_line()
    }

    /// 丢弃输入缓冲区中尚未读取的数据（如固件启动横幅）
    fn clear_input(&mut self) -> Result<(), SerialError> {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write_line(&mut self, line: &str) -> Result<(), SerialError> {
        (**self).write_line(line)
    }

    fn read_line(&mut self) -> Result<String, SerialError> {
        (**self).read_line()
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> Result<(), SerialError> {
        (**self).set_read_timeout(timeout)
    }

    fn read_line_timeout(&mut self, timeout: Duration) -> Result<String, SerialError> {
        (**self).read_line_timeout(timeout)
    }

    fn clear_input(&mut self) -> Result<(), SerialError> {
        (**self).clear_input()
    }
}

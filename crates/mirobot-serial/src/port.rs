//! 基于 `serialport` 的真实串口实现

use crate::{SerialError, Transport};
use mirobot_protocol::{DEFAULT_BAUD_RATE, DEFAULT_PORT, DEFAULT_READ_TIMEOUT_MS, LINE_TERMINATOR};
use serialport::{ClearBuffer, SerialPort};
use std::io::{ErrorKind, Read, Write};
use std::time::Duration;
use tracing::{debug, trace};

/// 串口参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortConfig {
    /// 串口名称（如 "COM3"、"/dev/ttyUSB0"）
    pub port: String,
    /// 波特率
    pub baud_rate: u32,
    /// 单次读超时
    pub read_timeout: Duration,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
        }
    }
}

/// 真实串口传输
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    /// 已读取但尚未组成完整行的字节
    pending: Vec<u8>,
    name: String,
}

impl SerialTransport {
    /// 打开串口
    ///
    /// # Errors
    /// - `SerialError::Port`: 串口不存在、被占用或参数不被支持
    pub fn open(config: &PortConfig) -> Result<Self, SerialError> {
        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(config.read_timeout)
            .open()?;

        debug!(
            "Serial port '{}' opened at {} baud",
            config.port, config.baud_rate
        );

        Ok(Self {
            port,
            pending: Vec::with_capacity(256),
            name: config.port.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 从缓冲区取出一行（不含 `\r\n`）
    fn take_line(&mut self) -> Option<String> {
        let pos = self.pending.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

impl Transport for SerialTransport {
    fn write_line(&mut self, line: &str) -> Result<(), SerialError> {
        trace!("-> {}", line);
        self.port.write_all(line.as_bytes())?;
        self.port.write_all(LINE_TERMINATOR.as_bytes())?;
        self.port.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, SerialError> {
        let mut chunk = [0u8; 256];
        loop {
            if let Some(line) = self.take_line() {
                trace!("<- {}", line);
                return Ok(line);
            }

            match self.port.read(&mut chunk) {
                Ok(0) => return Err(SerialError::Timeout),
                Ok(n) => self.pending.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::TimedOut => return Err(SerialError::Timeout),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> Result<(), SerialError> {
        self.port.set_timeout(timeout)?;
        Ok(())
    }

    fn clear_input(&mut self) -> Result<(), SerialError> {
        self.pending.clear();
        self.port.clear(ClearBuffer::Input)?;
        Ok(())
    }
}

/// 列出系统中可用的串口名称
pub fn available_ports() -> Result<Vec<String>, SerialError> {
    Ok(serialport::available_ports()?
        .into_iter()
        .map(|p| p.port_name)
        .collect())
}

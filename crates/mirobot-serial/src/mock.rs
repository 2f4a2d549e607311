//! Mock 传输
//!
//! 用于测试的脚本化串口：记录所有写入的行，按顺序吐出预置的应答行，
//! 也可以挂一个应答函数，根据写入内容动态生成应答。

use crate::{SerialError, Transport};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

type Responder = Box<dyn FnMut(&str) -> Vec<String> + Send>;

#[derive(Default)]
struct MockState {
    incoming: VecDeque<String>,
    written: Vec<String>,
    read_timeouts: Vec<Duration>,
    responder: Option<Responder>,
    closed: bool,
}

/// 模拟串口
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

/// 测试侧句柄（可在 transport 被移入驱动之后继续检查/注入）
#[derive(Clone)]
pub struct MockHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    pub fn handle(&self) -> MockHandle {
        MockHandle {
            state: self.state.clone(),
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHandle {
    /// 预置一行应答
    pub fn push_line(&self, line: impl Into<String>) {
        self.state.lock().incoming.push_back(line.into());
    }

    /// 设置应答函数：每写入一行调用一次，返回的行追加到接收队列
    pub fn set_responder<F>(&self, responder: F)
    where
        F: FnMut(&str) -> Vec<String> + Send + 'static,
    {
        self.state.lock().responder = Some(Box::new(responder));
    }

    /// 已写入的所有行
    pub fn written(&self) -> Vec<String> {
        self.state.lock().written.clone()
    }

    /// 每次读取前设置过的读超时，按调用顺序
    pub fn read_timeouts(&self) -> Vec<Duration> {
        self.state.lock().read_timeouts.clone()
    }

    /// 尚未被读取的应答行数
    pub fn pending(&self) -> usize {
        self.state.lock().incoming.len()
    }

    /// 模拟线缆断开
    pub fn close(&self) {
        self.state.lock().closed = true;
    }
}

impl Transport for MockTransport {
    fn write_line(&mut self, line: &str) -> Result<(), SerialError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if state.closed {
            return Err(SerialError::Closed);
        }
        state.written.push(line.to_string());
        if let Some(responder) = state.responder.as_mut() {
            let replies = responder(line);
            state.incoming.extend(replies);
        }
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, SerialError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SerialError::Closed);
        }
        state.incoming.pop_front().ok_or(SerialError::Timeout)
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> Result<(), SerialError> {
        self.state.lock().read_timeouts.push(timeout);
        Ok(())
    }

    fn clear_input(&mut self) -> Result<(), SerialError> {
        self.state.lock().incoming.clear();
        Ok(())
    }
}

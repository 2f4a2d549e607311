//! Builder 模式实现
//!
//! 提供链式构造 `RobotController` 的便捷方式。

use crate::controller::{ActuatorHandle, Connector, RobotController};
use crate::serial_actuator::{DEFAULT_ACK_TIMEOUT, SerialActuator};
use crate::sim::SimulatedArm;
use crate::wait::{Backoff, PollPolicy, WaitConfig};
use crate::DriverError;
use mirobot_serial::{PortConfig, SerialTransport};
use std::time::Duration;
use tracing::info;

/// 连接目标
#[derive(Debug, Clone)]
pub enum Target {
    /// 真实串口
    Serial(PortConfig),
    /// 模拟机械臂（无硬件）
    Simulated(SimulatedArm),
}

/// Mirobot Builder（链式构造）
///
/// # Example
///
/// ```no_run
/// use mirobot_driver::MirobotBuilder;
/// use std::time::Duration;
///
/// // 宽松模式：连接失败只记录日志，控制器仍然可用（指令为空操作）
/// let mut robot = MirobotBuilder::new()
///     .port("/dev/ttyUSB0")
///     .baud_rate(115_200)
///     .build();
/// robot.home();
///
/// // 严格模式：连接失败返回错误
/// let robot = MirobotBuilder::new()
///     .port("COM3")
///     .motion_timeout(Duration::from_secs(10))
///     .connect();
/// ```
pub struct MirobotBuilder {
    port: PortConfig,
    ack_timeout: Duration,
    wait: WaitConfig,
    simulated: Option<SimulatedArm>,
}

impl MirobotBuilder {
    /// 创建新的 Builder（默认 COM3 / 115200 / 1s 读超时）
    pub fn new() -> Self {
        Self {
            port: PortConfig::default(),
            ack_timeout: DEFAULT_ACK_TIMEOUT,
            wait: WaitConfig::default(),
            simulated: None,
        }
    }

    /// 设置串口名称
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port.port = port.into();
        self
    }

    /// 设置波特率
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.port.baud_rate = baud_rate;
        self
    }

    /// 设置串口读超时
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.port.read_timeout = timeout;
        self
    }

    /// 设置指令应答超时
    pub fn ack_timeout(mut self, timeout: Duration) -> Self {
        self.ack_timeout = timeout;
        self
    }

    /// 设置每条运动指令的等待上限（默认 30s）
    pub fn motion_timeout(mut self, timeout: Duration) -> Self {
        self.wait.timeout = timeout;
        self
    }

    /// 设置状态轮询间隔（默认 1s）
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.wait.poll.interval = interval;
        self
    }

    /// 设置轮询退避方式（默认固定间隔）
    pub fn backoff(mut self, backoff: Backoff) -> Self {
        self.wait.poll.backoff = backoff;
        self
    }

    /// 整体替换等待配置
    pub fn wait_config(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    pub fn poll_policy(mut self, policy: PollPolicy) -> Self {
        self.wait.poll = policy;
        self
    }

    /// 使用模拟机械臂代替串口
    pub fn simulated(mut self, arm: SimulatedArm) -> Self {
        self.simulated = Some(arm);
        self
    }

    pub fn target(&self) -> Target {
        match &self.simulated {
            Some(arm) => Target::Simulated(arm.clone()),
            None => Target::Serial(self.port.clone()),
        }
    }

    fn connector(&self) -> Connector {
        match self.target() {
            Target::Simulated(arm) => Box::new(move || {
                info!("Connecting to simulated Mirobot");
                Ok::<ActuatorHandle, DriverError>(Box::new(arm.clone()))
            }),
            Target::Serial(port) => {
                let ack_timeout = self.ack_timeout;
                Box::new(move || {
                    info!("Attempting to connect to {}...", port.port);
                    let transport = SerialTransport::open(&port).map_err(|e| {
                        DriverError::ConnectionFailed(format!("{}: {}", port.port, e))
                    })?;
                    info!("Connected to {}", transport.name());
                    let mut actuator = SerialActuator::new(transport, ack_timeout)
                        .with_read_timeout(port.read_timeout);
                    actuator.discard_input()?;
                    Ok::<ActuatorHandle, DriverError>(Box::new(actuator))
                })
            },
        }
    }

    /// 构建控制器并尝试连接（失败不报错，只记录日志）
    pub fn build(self) -> RobotController {
        RobotController::new(self.connector(), self.wait)
    }

    /// 构建控制器并连接，失败时返回错误
    ///
    /// # Errors
    /// - `DriverError::ConnectionFailed`: 串口无法打开
    pub fn connect(self) -> Result<RobotController, DriverError> {
        let mut controller = RobotController::disconnected(self.connector(), self.wait);
        controller.try_connect()?;
        Ok(controller)
    }
}

impl Default for MirobotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

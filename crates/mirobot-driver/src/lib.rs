//! # Mirobot Driver
//!
//! WLKATA Mirobot 机械臂的运动指令序列器。
//!
//! - [`RobotController`]：下发指令并阻塞到机械臂空闲或超时
//! - [`Actuator`]：执行器接口（串口实现 [`SerialActuator`]、模拟实现 [`SimulatedArm`]）
//! - [`wait`]：有界轮询、退避策略与取消令牌
//! - [`state`]：控制器视角的运动状态机
//!
//! # Example
//!
//! ```no_run
//! use mirobot_driver::{MirobotBuilder, JointAngles, PositionMode};
//!
//! let mut robot = MirobotBuilder::new().port("COM3").build();
//! robot.home();
//! robot.set_joint_angles(JointAngles::new([30.0, 0.0, 0.0, 0.0, 0.0, 0.0]), PositionMode::Absolute);
//! ```

mod actuator;
mod builder;
mod controller;
mod error;
mod serial_actuator;
mod sim;
pub mod state;
pub mod wait;

pub use actuator::Actuator;
pub use builder::{MirobotBuilder, Target};
pub use controller::{ActuatorHandle, Connector, RobotController};
pub use error::DriverError;
pub use serial_actuator::{DEFAULT_ACK_TIMEOUT, SerialActuator};
pub use sim::{HOME_POSE, SimulatedArm};
pub use state::{MotionEvent, MotionState};
pub use wait::{Backoff, CancelToken, PollPolicy, PollReport, WaitConfig};

// 常用协议类型
pub use mirobot_protocol::{
    ArmState, ArmStatus, CartesianPose, JointAngles, MotionCommand, MotionStyle, PositionMode,
};

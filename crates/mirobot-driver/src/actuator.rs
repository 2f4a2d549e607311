//! 执行器接口
//!
//! 控制器只通过这个 trait 与机械臂交互：发一条指令、查一次状态。
//! 真实设备见 [`SerialActuator`](crate::SerialActuator)，模拟设备见 [`SimulatedArm`](crate::SimulatedArm)。

use crate::DriverError;
use mirobot_protocol::{ArmStatus, MotionCommand};

pub trait Actuator {
    /// 下发一条运动指令（不等待运动完成）
    fn send(&mut self, command: &MotionCommand) -> Result<(), DriverError>;

    /// 查询一次当前状态
    fn query_status(&mut self) -> Result<ArmStatus, DriverError>;

    /// 设备描述，用于日志
    fn describe(&self) -> String {
        "actuator".to_string()
    }
}

impl<A: Actuator + ?Sized> Actuator for Box<A> {
    fn send(&mut self, command: &MotionCommand) -> Result<(), DriverError> {
        (**self).send(command)
    }

    fn query_status(&mut self) -> Result<ArmStatus, DriverError> {
        (**self).query_status()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

//! 模拟机械臂
//!
//! 无硬件时的执行器实现：每条指令之后先报告若干次 `Busy`，再报告 `Idle`。
//! 克隆共享同一份内部状态，测试可以在执行器被移入控制器之后继续检查/注入故障。

use crate::{Actuator, DriverError};
use mirobot_protocol::{ArmState, ArmStatus, CartesianPose, JointAngles, MotionCommand, PositionMode};
use mirobot_serial::SerialError;
use parking_lot::Mutex;
use std::sync::Arc;

/// 回零后的末端位姿（mm / 度）
pub const HOME_POSE: CartesianPose = CartesianPose {
    x: 198.67,
    y: 0.0,
    z: 230.72,
    roll: 0.0,
    pitch: 0.0,
    yaw: 0.0,
};

#[derive(Debug)]
struct SimState {
    busy_polls_per_move: usize,
    remaining_busy: usize,
    always_busy: bool,
    alarm: bool,
    fail_status: bool,
    commands: Vec<MotionCommand>,
    polls: usize,
    angles: JointAngles,
    pose: CartesianPose,
}

#[derive(Debug, Clone)]
pub struct SimulatedArm {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedArm {
    /// 指令下发后立即空闲
    pub fn new() -> Self {
        Self::with_busy_polls(0)
    }

    /// 每条指令之后先报告 `busy_polls` 次 `Busy`
    pub fn with_busy_polls(busy_polls: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                busy_polls_per_move: busy_polls,
                remaining_busy: 0,
                always_busy: false,
                alarm: false,
                fail_status: false,
                commands: Vec::new(),
                polls: 0,
                angles: JointAngles::ZERO,
                pose: HOME_POSE,
            })),
        }
    }

    /// 永远不报告空闲（用于超时测试）
    pub fn set_always_busy(&self, always_busy: bool) {
        self.state.lock().always_busy = always_busy;
    }

    /// 进入/退出 Alarm 状态
    pub fn set_alarm(&self, alarm: bool) {
        self.state.lock().alarm = alarm;
    }

    /// 状态查询返回传输错误
    pub fn set_fail_status(&self, fail: bool) {
        self.state.lock().fail_status = fail;
    }

    /// 已收到的全部指令
    pub fn commands(&self) -> Vec<MotionCommand> {
        self.state.lock().commands.clone()
    }

    /// 已响应的状态查询次数
    pub fn polls(&self) -> usize {
        self.state.lock().polls
    }

    pub fn angles(&self) -> JointAngles {
        self.state.lock().angles
    }

    pub fn pose(&self) -> CartesianPose {
        self.state.lock().pose
    }
}

impl Default for SimulatedArm {
    fn default() -> Self {
        Self::new()
    }
}

impl Actuator for SimulatedArm {
    fn send(&mut self, command: &MotionCommand) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        state.commands.push(*command);
        state.remaining_busy = state.busy_polls_per_move;

        // 只记录目标，不做运动学：关节指令不更新位姿，反之亦然
        match *command {
            MotionCommand::Home => {
                state.angles = JointAngles::ZERO;
                state.pose = HOME_POSE;
            },
            MotionCommand::Joint { angles, mode } => {
                state.angles = match mode {
                    PositionMode::Absolute => angles,
                    PositionMode::Incremental => {
                        let mut next = state.angles.0;
                        for (a, d) in next.iter_mut().zip(angles.0) {
                            *a += d;
                        }
                        JointAngles(next)
                    },
                };
            },
            MotionCommand::Cartesian { pose, mode, .. } => {
                state.pose = match mode {
                    PositionMode::Absolute => pose,
                    PositionMode::Incremental => {
                        let cur = state.pose.to_array();
                        let d = pose.to_array();
                        CartesianPose::from(std::array::from_fn::<f64, 6, _>(|i| cur[i] + d[i]))
                    },
                };
            },
        }
        Ok(())
    }

    fn query_status(&mut self) -> Result<ArmStatus, DriverError> {
        let mut state = self.state.lock();
        if state.fail_status {
            return Err(SerialError::Closed.into());
        }
        state.polls += 1;

        let arm_state = if state.alarm {
            ArmState::Alarm
        } else if state.always_busy {
            ArmState::Busy("Run".to_string())
        } else if state.remaining_busy > 0 {
            state.remaining_busy -= 1;
            ArmState::Busy("Run".to_string())
        } else {
            ArmState::Idle
        };

        let mut status = ArmStatus::with_state(arm_state);
        status.angles = state.angles;
        status.pose = state.pose;
        Ok(status)
    }

    fn describe(&self) -> String {
        "mirobot (simulated)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirobot_protocol::MotionStyle;

    #[test]
    fn test_busy_then_idle() {
        let mut arm = SimulatedArm::with_busy_polls(2);
        arm.send(&MotionCommand::Home).unwrap();

        assert!(!arm.query_status().unwrap().is_idle());
        assert!(!arm.query_status().unwrap().is_idle());
        assert!(arm.query_status().unwrap().is_idle());
        assert_eq!(arm.polls(), 3);
    }

    #[test]
    fn test_incremental_moves_accumulate() {
        let mut arm = SimulatedArm::new();
        let step = JointAngles::new([10.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        arm.send(&MotionCommand::joint(step, PositionMode::Incremental))
            .unwrap();
        arm.send(&MotionCommand::joint(step, PositionMode::Incremental))
            .unwrap();
        assert_eq!(arm.angles()[0], 20.0);
        assert_eq!(arm.angles()[5], 2.0);

        let pose = CartesianPose::new(150.0, 50.0, 50.0, 0.0, 0.0, 0.0);
        arm.send(&MotionCommand::cartesian(pose, MotionStyle::Linear, PositionMode::Absolute))
            .unwrap();
        assert_eq!(arm.pose(), pose);
    }

    #[test]
    fn test_clones_share_state() {
        let arm = SimulatedArm::new();
        let mut moved = arm.clone();
        moved.send(&MotionCommand::Home).unwrap();
        assert_eq!(arm.commands(), vec![MotionCommand::Home]);

        arm.set_alarm(true);
        assert!(moved.query_status().unwrap().state.is_alarm());

        arm.set_fail_status(true);
        assert!(moved.query_status().is_err());
    }
}

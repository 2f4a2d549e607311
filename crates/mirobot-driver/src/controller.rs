//! 运动指令序列器
//!
//! `RobotController` 独占一条机械臂连接，把"下发一条指令"和"等到机械臂空闲"
//! 组合成同步调用：调用线程会被占用到运动结束（或超时）。
//!
//! 提供两套入口：
//!
//! - **记录型**（`home` / `set_joint_angles` / `set_coordinates` / `wait_for_completion`）：
//!   失败只写日志、不返回错误，未连接时是带警告的空操作，超时与成功在调用方不可区分。
//!   这是厂商示例脚本的语义，保留用于演示流程。
//! - **结果型**（`try_*` / `wait_until_idle`）：所有失败都以 [`DriverError`] 返回。

use crate::state::{MotionEvent, MotionState};
use crate::wait::{CancelToken, WaitConfig, poll_until_idle};
use crate::{Actuator, DriverError};
use mirobot_protocol::{ArmStatus, CartesianPose, JointAngles, MotionCommand, MotionStyle, PositionMode};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// 执行器句柄
pub type ActuatorHandle = Box<dyn Actuator + Send>;

/// 建立连接的函数（每次 `connect()` 调用一次）
pub type Connector = Box<dyn FnMut() -> Result<ActuatorHandle, DriverError> + Send>;

pub struct RobotController {
    connector: Connector,
    actuator: Option<ActuatorHandle>,
    wait: WaitConfig,
    state: MotionState,
    cancel: CancelToken,
    last_status: Option<ArmStatus>,
}

impl RobotController {
    /// 创建控制器并尝试连接
    ///
    /// 连接失败不会返回错误：控制器处于未连接状态，后续运动指令都是空操作。
    /// 需要严格失败语义时使用 [`MirobotBuilder::connect`](crate::MirobotBuilder::connect)。
    pub fn new(connector: Connector, wait: WaitConfig) -> Self {
        let mut controller = Self::disconnected(connector, wait);
        controller.connect();
        info!("Robot controller initialized.");
        controller
    }

    /// 创建控制器但不连接
    pub fn disconnected(connector: Connector, wait: WaitConfig) -> Self {
        Self {
            connector,
            actuator: None,
            wait,
            state: MotionState::Idle,
            cancel: CancelToken::new(),
            last_status: None,
        }
    }

    /// 建立连接（已有连接会先被关闭）
    pub fn try_connect(&mut self) -> Result<(), DriverError> {
        self.disconnect();
        let actuator = (self.connector)()?;
        info!("Mirobot initialized successfully ({}).", actuator.describe());
        self.actuator = Some(actuator);
        self.state = MotionState::Idle;
        Ok(())
    }

    /// 建立连接，失败时记录日志并返回 `false`
    pub fn connect(&mut self) -> bool {
        match self.try_connect() {
            Ok(()) => true,
            Err(e) => {
                error!("Connection failed: {}", e);
                false
            },
        }
    }

    /// 关闭连接；未连接时什么也不做
    pub fn disconnect(&mut self) {
        if let Some(actuator) = self.actuator.take() {
            info!("Closing connection to {}...", actuator.describe());
            drop(actuator);
            info!("Connection closed.");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.actuator.is_some()
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn wait_config(&self) -> &WaitConfig {
        &self.wait
    }

    pub fn set_wait_config(&mut self, wait: WaitConfig) {
        self.wait = wait;
    }

    /// 取消令牌（可交给其他线程，用于打断正在进行的等待）
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// 最近一次观察到的状态
    pub fn last_status(&self) -> Option<&ArmStatus> {
        self.last_status.as_ref()
    }

    // ==================== 结果型接口 ====================

    /// 查询一次状态
    pub fn status(&mut self) -> Result<ArmStatus, DriverError> {
        let actuator = self.actuator.as_mut().ok_or(DriverError::NotConnected)?;
        let status = actuator.query_status()?;
        self.last_status = Some(status.clone());
        Ok(status)
    }

    /// 回到参考位姿并等待完成
    pub fn try_home(&mut self) -> Result<(), DriverError> {
        self.execute(MotionCommand::Home)
    }

    /// 关节空间运动并等待完成
    pub fn try_set_joint_angles(
        &mut self,
        angles: JointAngles,
        mode: PositionMode,
    ) -> Result<(), DriverError> {
        self.execute(MotionCommand::joint(angles, mode))
    }

    /// 笛卡尔空间运动并等待完成
    pub fn try_set_coordinates(
        &mut self,
        pose: CartesianPose,
        motion: MotionStyle,
        mode: PositionMode,
    ) -> Result<(), DriverError> {
        self.execute(MotionCommand::cartesian(pose, motion, mode))
    }

    /// 下发任意指令，并用配置中的超时等待完成
    ///
    /// 未连接时返回 `NotConnected`，不会触达执行器。
    pub fn execute(&mut self, command: MotionCommand) -> Result<(), DriverError> {
        let actuator = self.actuator.as_mut().ok_or(DriverError::NotConnected)?;
        info!("Sending {} command: {}", command.kind(), command);
        if let Err(e) = actuator.send(&command) {
            self.apply(MotionEvent::Fault);
            return Err(e);
        }
        self.apply(MotionEvent::CommandSent);
        let timeout = self.wait.timeout;
        self.wait_until_idle(timeout)
    }

    /// 轮询直到空闲
    ///
    /// # Errors
    /// - `NotConnected`: 没有连接
    /// - `Timeout`: 超时（状态进入 `TimedOut`）
    /// - `Cancelled`: 令牌被取消（状态不变）
    /// - `Fault` / 传输错误: 状态进入 `Faulted`
    pub fn wait_until_idle(&mut self, timeout: Duration) -> Result<(), DriverError> {
        let actuator = self.actuator.as_mut().ok_or(DriverError::NotConnected)?;
        let result = poll_until_idle(
            || actuator.query_status(),
            timeout,
            &self.wait.poll,
            &self.cancel,
        );

        match result {
            Ok(report) => {
                debug!(
                    "Idle after {} polls ({:?})",
                    report.polls, report.elapsed
                );
                self.last_status = Some(report.status);
                self.apply(MotionEvent::ReportedIdle);
                Ok(())
            },
            Err(e) => {
                let event = match e {
                    DriverError::Timeout { .. } => MotionEvent::Deadline,
                    DriverError::Cancelled => MotionEvent::Cancelled,
                    _ => MotionEvent::Fault,
                };
                self.apply(event);
                Err(e)
            },
        }
    }

    fn apply(&mut self, event: MotionEvent) {
        let next = self.state.on(event);
        if next != self.state {
            debug!("Motion state {:?} -> {:?} ({:?})", self.state, next, event);
        }
        self.state = next;
    }

    // ==================== 记录型接口 ====================

    /// 回零；未连接时记录警告并跳过
    pub fn home(&mut self) {
        let result = self.try_home();
        log_outcome("Homing", result);
    }

    /// 设置关节角度；未连接时记录警告并跳过
    pub fn set_joint_angles(&mut self, angles: JointAngles, mode: PositionMode) {
        let result = self.try_set_joint_angles(angles, mode);
        log_outcome("Joint move", result);
    }

    /// 设置末端坐标；未连接时记录警告并跳过
    pub fn set_coordinates(&mut self, pose: CartesianPose, motion: MotionStyle, mode: PositionMode) {
        let result = self.try_set_coordinates(pose, motion, mode);
        log_outcome("Cartesian move", result);
    }

    /// 等待当前操作完成
    ///
    /// 无论空闲还是超时都直接返回，调用方无法区分。需要区分时用 [`wait_until_idle`](Self::wait_until_idle)
    /// 或之后检查 [`state`](Self::state)。
    pub fn wait_for_completion(&mut self, timeout: Duration) {
        match self.wait_until_idle(timeout) {
            Ok(()) => info!("Operation completed."),
            Err(DriverError::Timeout { .. }) => warn!("Timeout waiting for completion."),
            Err(DriverError::NotConnected) => warn!("Mirobot not initialized! Nothing to wait for."),
            Err(e) => warn!("Stopped waiting for completion: {}", e),
        }
    }
}

impl Drop for RobotController {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn log_outcome(operation: &str, result: Result<(), DriverError>) {
    match result {
        Ok(()) => info!("{} completed.", operation),
        Err(DriverError::NotConnected) => {
            warn!("Mirobot not initialized! {} command not sent.", operation)
        },
        Err(DriverError::Timeout { .. }) => warn!("Timeout waiting for completion."),
        Err(e) => error!("{} failed: {}", operation, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimulatedArm;
    use crate::wait::PollPolicy;

    fn fast_wait() -> WaitConfig {
        WaitConfig {
            timeout: Duration::from_millis(200),
            poll: PollPolicy::fixed(Duration::from_millis(5)),
        }
    }

    fn sim_connector(arm: &SimulatedArm) -> Connector {
        let arm = arm.clone();
        Box::new(move || Ok::<ActuatorHandle, DriverError>(Box::new(arm.clone())))
    }

    #[test]
    fn test_new_connects() {
        let arm = SimulatedArm::new();
        let controller = RobotController::new(sim_connector(&arm), fast_wait());
        assert!(controller.is_connected());
        assert_eq!(controller.state(), MotionState::Idle);
    }

    #[test]
    fn test_failed_connection_is_not_fatal() {
        let connector: Connector = Box::new(|| -> Result<ActuatorHandle, DriverError> {
            Err(DriverError::ConnectionFailed("no port".to_string()))
        });
        let mut controller = RobotController::new(connector, fast_wait());
        assert!(!controller.is_connected());
        assert!(!controller.connect());

        // 记录型接口：空操作
        controller.home();
        controller.wait_for_completion(Duration::from_millis(10));
        assert!(matches!(
            controller.try_home(),
            Err(DriverError::NotConnected)
        ));
        assert!(matches!(controller.status(), Err(DriverError::NotConnected)));
    }

    #[test]
    fn test_disconnect_then_commands_skip_actuator() {
        let arm = SimulatedArm::new();
        let mut controller = RobotController::new(sim_connector(&arm), fast_wait());
        controller.disconnect();
        assert!(!controller.is_connected());

        controller.set_joint_angles(JointAngles::ZERO, PositionMode::Absolute);
        controller.set_coordinates(
            CartesianPose::default(),
            MotionStyle::Linear,
            PositionMode::Absolute,
        );
        assert!(arm.commands().is_empty());
        assert_eq!(arm.polls(), 0);

        // 重新连接后恢复
        assert!(controller.connect());
        controller.home();
        assert_eq!(arm.commands(), vec![MotionCommand::Home]);
    }

    #[test]
    fn test_try_home_reaches_idle() {
        let arm = SimulatedArm::with_busy_polls(2);
        let mut controller = RobotController::new(sim_connector(&arm), fast_wait());
        controller.try_home().unwrap();
        assert_eq!(arm.polls(), 3);
        assert_eq!(controller.state(), MotionState::Idle);
        assert!(controller.last_status().unwrap().is_idle());
    }

    #[test]
    fn test_timeout_sets_timed_out_state() {
        let arm = SimulatedArm::new();
        arm.set_always_busy(true);
        let mut controller = RobotController::new(sim_connector(&arm), fast_wait());

        let err = controller
            .try_set_joint_angles(JointAngles::ZERO, PositionMode::Absolute)
            .unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(controller.state(), MotionState::TimedOut);
    }

    #[test]
    fn test_alarm_sets_faulted_state() {
        let arm = SimulatedArm::new();
        arm.set_alarm(true);
        let mut controller = RobotController::new(sim_connector(&arm), fast_wait());

        let err = controller.try_home().unwrap_err();
        assert!(matches!(err, DriverError::Fault(_)));
        assert_eq!(controller.state(), MotionState::Faulted);
    }

    #[test]
    fn test_status_failure_is_fault() {
        let arm = SimulatedArm::new();
        let mut controller = RobotController::new(sim_connector(&arm), fast_wait());
        arm.set_fail_status(true);

        assert!(controller.try_home().is_err());
        assert_eq!(controller.state(), MotionState::Faulted);
    }

    #[test]
    fn test_cancelled_wait_keeps_moving_state() {
        let arm = SimulatedArm::new();
        arm.set_always_busy(true);
        let mut controller = RobotController::new(sim_connector(&arm), fast_wait());
        controller.cancel_token().cancel();

        let err = controller.try_home().unwrap_err();
        assert!(matches!(err, DriverError::Cancelled));
        // 指令已经下发，不会被撤回
        assert_eq!(arm.commands(), vec![MotionCommand::Home]);
        assert_eq!(controller.state(), MotionState::Moving);
    }

    #[test]
    fn test_status_query() {
        let arm = SimulatedArm::new();
        let mut controller = RobotController::new(sim_connector(&arm), fast_wait());
        let status = controller.status().unwrap();
        assert!(status.is_idle());
        assert_eq!(controller.last_status(), Some(&status));
    }
}

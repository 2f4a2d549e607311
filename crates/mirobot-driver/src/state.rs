//! 运动状态机
//!
//! ```text
//!            CommandSent
//!   Idle ─────────────────► Moving ──ReportedIdle──► Idle
//!                            │  │
//!                    Deadline│  │Fault
//!                            ▼  ▼
//!                     TimedOut  Faulted
//! ```
//!
//! 任何状态收到 `CommandSent` 都进入 `Moving`；`Cancelled` 不改变状态
//! （机械臂可能仍在运动，只是调用方不再等待）。

/// 控制器视角的运动状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionState {
    /// 没有运动在进行
    #[default]
    Idle,
    /// 指令已下发，尚未观察到空闲
    Moving,
    /// 等待超时，机械臂状态未知
    TimedOut,
    /// 机械臂报告故障或通信失败
    Faulted,
}

/// 驱动状态机的事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionEvent {
    CommandSent,
    ReportedIdle,
    Deadline,
    Fault,
    Cancelled,
}

impl MotionState {
    pub fn on(self, event: MotionEvent) -> MotionState {
        match event {
            MotionEvent::CommandSent => MotionState::Moving,
            MotionEvent::ReportedIdle => MotionState::Idle,
            MotionEvent::Deadline => MotionState::TimedOut,
            MotionEvent::Fault => MotionState::Faulted,
            MotionEvent::Cancelled => self,
        }
    }

    pub fn is_idle(self) -> bool {
        self == MotionState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let s = MotionState::default();
        assert!(s.is_idle());
        let s = s.on(MotionEvent::CommandSent);
        assert_eq!(s, MotionState::Moving);
        assert_eq!(s.on(MotionEvent::ReportedIdle), MotionState::Idle);
    }

    #[test]
    fn test_deadline_and_fault() {
        let moving = MotionState::Moving;
        assert_eq!(moving.on(MotionEvent::Deadline), MotionState::TimedOut);
        assert_eq!(moving.on(MotionEvent::Fault), MotionState::Faulted);
    }

    #[test]
    fn test_cancel_keeps_state() {
        assert_eq!(
            MotionState::Moving.on(MotionEvent::Cancelled),
            MotionState::Moving
        );
    }

    #[test]
    fn test_recovery_after_timeout() {
        let s = MotionState::TimedOut.on(MotionEvent::ReportedIdle);
        assert_eq!(s, MotionState::Idle);
        let s = MotionState::Faulted.on(MotionEvent::CommandSent);
        assert_eq!(s, MotionState::Moving);
    }
}

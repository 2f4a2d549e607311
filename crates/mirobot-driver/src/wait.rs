//! 运动完成等待
//!
//! 机械臂的运动发生在物理时间里，而指令在微秒内就发完了。
//! 这里把"等到空闲"实现为有界轮询：
//!
//! 1. 查询一次状态
//! 2. 空闲 → 结束（不再发起下一次查询）
//! 3. 已到超时 → 以超时结束
//! 4. 休眠 `min(间隔, 剩余时间)`，回到 1
//!
//! 因此对任意 `T ≥ 0`，等待在 `T + 间隔` 之内返回；永不空闲时约在 `T` 返回。

use crate::DriverError;
use mirobot_protocol::ArmStatus;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

/// 默认轮询间隔
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// 默认运动超时
pub const DEFAULT_MOTION_TIMEOUT: Duration = Duration::from_secs(30);

/// 轮询间隔的增长方式
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Backoff {
    /// 固定间隔
    #[default]
    Fixed,
    /// 每次乘以 `factor`，不超过 `max_interval`
    Exponential { factor: f64, max_interval: Duration },
}

/// 轮询策略
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    /// 首次间隔
    pub interval: Duration,
    pub backoff: Backoff,
}

impl PollPolicy {
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            backoff: Backoff::Fixed,
        }
    }

    pub fn exponential(interval: Duration, factor: f64, max_interval: Duration) -> Self {
        Self {
            interval,
            backoff: Backoff::Exponential {
                factor,
                max_interval,
            },
        }
    }

    /// 计算下一次间隔
    pub fn next_interval(&self, current: Duration) -> Duration {
        match self.backoff {
            Backoff::Fixed => current,
            Backoff::Exponential {
                factor,
                max_interval,
            } => {
                let factor = if factor.is_finite() && factor >= 1.0 {
                    factor
                } else {
                    1.0
                };
                current.mul_f64(factor).min(max_interval.max(self.interval))
            },
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_POLL_INTERVAL)
    }
}

/// 等待配置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitConfig {
    /// 每条运动指令的等待上限
    pub timeout: Duration,
    pub poll: PollPolicy,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_MOTION_TIMEOUT,
            poll: PollPolicy::default(),
        }
    }
}

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

/// 取消令牌
///
/// 可跨线程克隆。取消会立即唤醒正在休眠的等待，但不会撤回已下发给机械臂的运动。
/// 取消是粘性的：之后的每次等待都立即以 `Cancelled` 返回，直到 `reset()`。
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        *self.inner.cancelled.lock() = true;
        self.inner.wake.notify_all();
    }

    pub fn reset(&self) {
        *self.inner.cancelled.lock() = false;
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.cancelled.lock()
    }

    /// 休眠 `duration`，期间被取消则提前返回 `true`
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut cancelled = self.inner.cancelled.lock();
        while !*cancelled {
            if self
                .inner
                .wake
                .wait_until(&mut cancelled, deadline)
                .timed_out()
            {
                break;
            }
        }
        *cancelled
    }
}

/// 一次成功等待的统计
#[derive(Debug, Clone, PartialEq)]
pub struct PollReport {
    /// 查询次数（包含最后一次报告空闲的查询）
    pub polls: usize,
    pub elapsed: Duration,
    /// 最后一次状态
    pub status: ArmStatus,
}

/// 轮询直到空闲、超时、取消或故障
///
/// # Errors
/// - `DriverError::Timeout`: 到达 `timeout` 仍未空闲
/// - `DriverError::Cancelled`: 令牌被取消
/// - `DriverError::Fault`: 机械臂报告 Alarm
/// - 状态查询本身的错误原样返回
pub fn poll_until_idle<F>(
    mut query: F,
    timeout: Duration,
    policy: &PollPolicy,
    cancel: &CancelToken,
) -> Result<PollReport, DriverError>
where
    F: FnMut() -> Result<ArmStatus, DriverError>,
{
    let start = Instant::now();
    let mut interval = policy.interval;
    let mut polls = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(DriverError::Cancelled);
        }

        let status = query()?;
        polls += 1;
        trace!("Poll #{}: {}", polls, status.state);

        if status.state.is_alarm() {
            return Err(DriverError::Fault(format!(
                "actuator reported {}",
                status.state
            )));
        }

        if status.is_idle() {
            return Ok(PollReport {
                polls,
                elapsed: start.elapsed(),
                status,
            });
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Err(DriverError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            });
        }

        let sleep = interval.min(timeout - elapsed);
        if cancel.sleep(sleep) {
            return Err(DriverError::Cancelled);
        }
        interval = policy.next_interval(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn scripted(states: &[&str]) -> impl FnMut() -> Result<ArmStatus, DriverError> {
        let mut queue: VecDeque<ArmStatus> = states
            .iter()
            .map(|s| ArmStatus::parse(&format!("<{}>", s)).unwrap())
            .collect();
        move || Ok(queue.pop_front().unwrap_or_else(|| ArmStatus::busy("Run")))
    }

    #[test]
    fn test_fixed_policy_keeps_interval() {
        let p = PollPolicy::fixed(Duration::from_millis(100));
        assert_eq!(p.next_interval(p.interval), Duration::from_millis(100));
    }

    #[test]
    fn test_exponential_policy_caps() {
        let p = PollPolicy::exponential(Duration::from_millis(100), 2.0, Duration::from_millis(300));
        let i1 = p.next_interval(p.interval);
        let i2 = p.next_interval(i1);
        let i3 = p.next_interval(i2);
        assert_eq!(i1, Duration::from_millis(200));
        assert_eq!(i2, Duration::from_millis(300));
        assert_eq!(i3, Duration::from_millis(300));
    }

    #[test]
    fn test_exponential_policy_ignores_shrinking_factor() {
        let p = PollPolicy::exponential(Duration::from_millis(100), 0.5, Duration::from_secs(1));
        assert_eq!(p.next_interval(p.interval), Duration::from_millis(100));
    }

    #[test]
    fn test_default_wait_config() {
        let c = WaitConfig::default();
        assert_eq!(c.timeout, Duration::from_secs(30));
        assert_eq!(c.poll.interval, Duration::from_secs(1));
        assert_eq!(c.poll.backoff, Backoff::Fixed);
    }

    #[test]
    fn test_idle_on_first_poll_does_not_sleep() {
        let start = Instant::now();
        let report = poll_until_idle(
            scripted(&["Idle"]),
            Duration::from_secs(5),
            &PollPolicy::fixed(Duration::from_secs(1)),
            &CancelToken::new(),
        )
        .unwrap();
        assert_eq!(report.polls, 1);
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_alarm_is_fault() {
        let err = poll_until_idle(
            scripted(&["Run", "Alarm"]),
            Duration::from_secs(1),
            &PollPolicy::fixed(Duration::from_millis(5)),
            &CancelToken::new(),
        )
        .unwrap_err();
        assert!(matches!(err, DriverError::Fault(_)));
    }

    #[test]
    fn test_zero_timeout_polls_once() {
        let mut calls = 0;
        let err = poll_until_idle(
            || {
                calls += 1;
                Ok(ArmStatus::busy("Run"))
            },
            Duration::ZERO,
            &PollPolicy::fixed(Duration::from_secs(1)),
            &CancelToken::new(),
        )
        .unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_query_error_propagates() {
        let err = poll_until_idle(
            || Err(DriverError::NotConnected),
            Duration::from_secs(1),
            &PollPolicy::default(),
            &CancelToken::new(),
        )
        .unwrap_err();
        assert!(matches!(err, DriverError::NotConnected));
    }

    #[test]
    fn test_pre_cancelled_token_skips_polling() {
        let token = CancelToken::new();
        token.cancel();
        let mut calls = 0;
        let err = poll_until_idle(
            || {
                calls += 1;
                Ok(ArmStatus::idle())
            },
            Duration::from_secs(1),
            &PollPolicy::default(),
            &token,
        )
        .unwrap_err();
        assert!(matches!(err, DriverError::Cancelled));
        assert_eq!(calls, 0);

        token.reset();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_wakes_sleep() {
        let token = CancelToken::new();
        let remote = token.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            remote.cancel();
        });

        let start = Instant::now();
        assert!(token.sleep(Duration::from_secs(5)));
        assert!(start.elapsed() < Duration::from_secs(2));
        handle.join().unwrap();
    }

    #[test]
    fn test_sleep_without_cancel_runs_full_duration() {
        let token = CancelToken::new();
        let start = Instant::now();
        assert!(!token.sleep(Duration::from_millis(30)));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}

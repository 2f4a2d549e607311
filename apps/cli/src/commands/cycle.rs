//! 往复运动演示
//!
//! 工作线程独占控制器：回零后在两个关节位姿之间往复。
//! 主线程只负责监听 Ctrl+C 并通过取消令牌通知工作线程，两边不共享机械臂状态。

use crate::connection::ConnectionArgs;
use anyhow::{Context, Result};
use clap::Args;
use crossbeam_channel::{bounded, select};
use mirobot_driver::{CancelToken, DriverError, JointAngles, PositionMode, RobotController};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

pub const FORWARD_JOINTS: [f64; 6] = [45.0, -15.0, 30.0, 0.0, 0.0, 0.0];
pub const BACKWARD_JOINTS: [f64; 6] = [-45.0, 15.0, -30.0, 0.0, 0.0, 0.0];

/// 往复参数
#[derive(Args, Debug)]
pub struct CycleCommand {
    /// 每个位姿停留时间（毫秒）
    #[arg(long, default_value_t = 2000)]
    pub dwell_ms: u64,

    /// 往复次数（省略时一直运行到 Ctrl+C）
    #[arg(long)]
    pub cycles: Option<u32>,
}

/// 工作线程主体，返回完成的往复次数
///
/// 被取消时返回 `Err(DriverError::Cancelled)`。
pub fn run_cycles(
    robot: &mut RobotController,
    token: &CancelToken,
    dwell: Duration,
    cycles: Option<u32>,
) -> Result<u32, DriverError> {
    robot.try_home()?;

    let mut completed = 0;
    while cycles.is_none_or(|n| completed < n) {
        for joints in [FORWARD_JOINTS, BACKWARD_JOINTS] {
            robot.try_set_joint_angles(JointAngles::new(joints), PositionMode::Absolute)?;
            if token.sleep(dwell) {
                return Err(DriverError::Cancelled);
            }
        }
        completed += 1;
        info!("Cycle {} complete", completed);
    }
    Ok(completed)
}

impl CycleCommand {
    pub fn execute(&self, connection: &ConnectionArgs) -> Result<()> {
        let mut robot = connection.connect()?;
        let token = robot.cancel_token();

        let (interrupt_tx, interrupt_rx) = bounded::<()>(1);
        ctrlc::set_handler(move || {
            let _ = interrupt_tx.try_send(());
        })
        .context("设置 Ctrl+C 处理失败")?;

        let (done_tx, done_rx) = bounded(1);
        let dwell = Duration::from_millis(self.dwell_ms);
        let cycles = self.cycles;
        let worker_token = token.clone();
        let worker = thread::Builder::new()
            .name("robot-worker".into())
            .spawn(move || {
                let result = run_cycles(&mut robot, &worker_token, dwell, cycles);
                let _ = done_tx.send(result);
            })
            .context("启动工作线程失败")?;

        println!("🔁 往复运动中，按 Ctrl+C 停止");

        let result = select! {
            recv(interrupt_rx) -> _ => {
                println!("\n⏳ 收到中断，等待当前运动结束...");
                token.cancel();
                done_rx.recv().context("工作线程异常退出")?
            },
            recv(done_rx) -> msg => msg.context("工作线程异常退出")?,
        };

        if worker.join().is_err() {
            anyhow::bail!("工作线程 panic");
        }

        match result {
            Ok(n) => {
                println!("✅ 完成 {} 次往复", n);
                Ok(())
            },
            Err(DriverError::Cancelled) => {
                println!("✅ 已停止");
                Ok(())
            },
            Err(e) => {
                warn!("Cycle stopped: {}", e);
                Err(e).context("往复运动失败")
            },
        }
    }
}

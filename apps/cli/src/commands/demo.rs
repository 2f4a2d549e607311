//! 读码演示流程
//!
//! 回零 -> 读码 -> 关节运动 -> 暂停 -> 移动到码中给出的位姿。
//! 使用记录型接口：连接失败时每一步只记录警告，流程照常走完。

use crate::connection::ConnectionArgs;
use crate::scanner::{CodeSource, FixedCode, LineReader, pose_from_code};
use anyhow::Result;
use clap::Args;
use mirobot_driver::{CartesianPose, JointAngles, MotionStyle, PositionMode};
use std::io;
use std::thread;
use std::time::Duration;
use tracing::info;

/// 读码后的关节位姿
pub const SCAN_JOINTS: [f64; 6] = [45.0, -15.0, 30.0, 0.0, 0.0, 0.0];

/// 码中没有位姿时的默认目标
pub const DEFAULT_TARGET: [f64; 6] = [150.0, 50.0, 50.0, 0.0, 0.0, 0.0];

/// 演示参数
#[derive(Args, Debug)]
pub struct DemoCommand {
    /// 码内容；省略时从标准输入读取一行
    #[arg(long, allow_hyphen_values = true)]
    pub code: Option<String>,

    /// 关节运动后的停顿（毫秒）
    #[arg(long, default_value_t = 1000)]
    pub pause_ms: u64,
}

/// 由码内容决定笛卡尔目标
pub fn target_for(code: Option<&str>) -> CartesianPose {
    match code.and_then(pose_from_code) {
        Some(pose) => pose,
        None => CartesianPose::from(DEFAULT_TARGET),
    }
}

impl DemoCommand {
    pub fn execute(&self, connection: &ConnectionArgs) -> Result<()> {
        let mut robot = connection.open_lenient()?;

        println!("⏳ 回零...");
        robot.home();

        let code = match &self.code {
            Some(code) => FixedCode(Some(code.clone())).scan(),
            None => {
                println!("📷 等待读码（输入一行后回车）...");
                LineReader::new(io::stdin().lock()).scan()
            },
        };
        match &code {
            Some(c) => println!("✅ 读到码: {}", c),
            None => println!("⚠️  未读到码，使用默认目标"),
        }

        println!("⏳ 关节运动到 {:?}", SCAN_JOINTS);
        robot.set_joint_angles(JointAngles::new(SCAN_JOINTS), PositionMode::Absolute);

        thread::sleep(Duration::from_millis(self.pause_ms));

        let target = target_for(code.as_deref());
        info!(
            "Moving to target x={:.1} y={:.1} z={:.1}",
            target.x, target.y, target.z
        );
        println!(
            "⏳ 移动到 X={:.1} Y={:.1} Z={:.1}",
            target.x, target.y, target.z
        );
        robot.set_coordinates(target, MotionStyle::Linear, PositionMode::Absolute);

        println!("✅ 演示结束 (状态: {:?})", robot.state());
        Ok(())
    }
}

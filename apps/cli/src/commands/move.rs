//! 移动命令
//!
//! 关节空间运动，包含限位检查

use crate::connection::ConnectionArgs;
use crate::validation::{JointValidator, parse_values};
use anyhow::{Context, Result};
use clap::Args;
use mirobot_driver::{JointAngles, PositionMode};

/// 移动命令参数
#[derive(Args, Debug)]
pub struct MoveCommand {
    /// 目标关节角度（度），逗号分隔，共 6 个
    /// 例如：45,-15,30,0,0,0
    #[arg(short, long, allow_hyphen_values = true)]
    pub joints: String,

    /// 增量模式（相对当前角度）
    #[arg(long)]
    pub incremental: bool,
}

impl MoveCommand {
    pub fn mode(&self) -> PositionMode {
        if self.incremental {
            PositionMode::Incremental
        } else {
            PositionMode::Absolute
        }
    }

    /// 解析并验证关节角度
    ///
    /// 增量目标无法在不知道当前角度时检查限位，只检查数值本身。
    pub fn parse_joints(&self) -> Result<JointAngles> {
        let angles = JointAngles::new(parse_values::<6>(&self.joints, "关节角度")?);
        if self.mode() == PositionMode::Absolute {
            JointValidator::mirobot().validate(&angles)?;
        }
        Ok(angles)
    }

    /// 执行移动
    pub fn execute(&self, connection: &ConnectionArgs) -> Result<()> {
        let angles = self.parse_joints()?;

        println!("⏳ 正在移动到目标关节角度 ({:?})...", self.mode());
        for (i, a) in angles.as_array().iter().enumerate() {
            println!("  J{}: {:.1}°", i + 1, a);
        }

        let mut robot = connection.connect()?;
        robot
            .try_set_joint_angles(angles, self.mode())
            .context("关节运动失败")?;

        println!("✅ 移动完成");
        Ok(())
    }
}

//! 笛卡尔运动命令

use crate::connection::ConnectionArgs;
use crate::validation::parse_values;
use anyhow::{Context, Result};
use clap::Args;
use mirobot_driver::{CartesianPose, MotionStyle, PositionMode};

/// 笛卡尔运动参数
#[derive(Args, Debug)]
pub struct GotoCommand {
    /// 目标位姿 x,y,z,roll,pitch,yaw（毫米 / 度）
    #[arg(long, allow_hyphen_values = true)]
    pub pose: String,

    /// 快速运动（G00），默认直线插补（G01）
    #[arg(long)]
    pub fast: bool,

    /// 增量模式
    #[arg(long)]
    pub incremental: bool,
}

impl GotoCommand {
    fn motion(&self) -> MotionStyle {
        if self.fast { MotionStyle::Fast } else { MotionStyle::Linear }
    }

    fn mode(&self) -> PositionMode {
        if self.incremental {
            PositionMode::Incremental
        } else {
            PositionMode::Absolute
        }
    }

    pub fn parse_pose(&self) -> Result<CartesianPose> {
        Ok(CartesianPose::from(parse_values::<6>(&self.pose, "位姿")?))
    }

    pub fn execute(&self, connection: &ConnectionArgs) -> Result<()> {
        let pose = self.parse_pose()?;
        let mut robot = connection.connect()?;

        println!(
            "⏳ 正在移动到 X={:.1} Y={:.1} Z={:.1} ({:?}, {:?})...",
            pose.x,
            pose.y,
            pose.z,
            self.motion(),
            self.mode()
        );
        robot
            .try_set_coordinates(pose, self.motion(), self.mode())
            .context("笛卡尔运动失败")?;

        println!("✅ 移动完成");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pose() {
        let cmd = GotoCommand {
            pose: "150,50,50,0,0,-90".to_string(),
            fast: true,
            incremental: false,
        };
        let pose = cmd.parse_pose().unwrap();
        assert_eq!(pose.x, 150.0);
        assert_eq!(pose.yaw, -90.0);
        assert_eq!(cmd.motion(), MotionStyle::Fast);
    }

    #[test]
    fn test_parse_pose_wrong_count() {
        let cmd = GotoCommand {
            pose: "150,50".to_string(),
            fast: false,
            incremental: false,
        };
        assert!(cmd.parse_pose().is_err());
    }
}

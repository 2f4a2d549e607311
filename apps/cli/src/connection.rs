//! 连接参数
//!
//! 命令行参数优先，其次是配置文件，最后是驱动默认值。

use crate::commands::config::CliConfig;
use anyhow::{Context, Result};
use clap::Args;
use mirobot_driver::{MirobotBuilder, RobotController, SimulatedArm};
use std::path::PathBuf;
use std::time::Duration;

/// 全局连接参数
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// 串口名称（如 COM3、/dev/ttyUSB0）
    #[arg(short, long, global = true)]
    pub port: Option<String>,

    /// 波特率
    #[arg(short, long, global = true)]
    pub baud: Option<u32>,

    /// 每条运动指令的等待上限（秒）
    #[arg(long, global = true)]
    pub timeout: Option<f64>,

    /// 状态轮询间隔（毫秒）
    #[arg(long, global = true)]
    pub poll_interval_ms: Option<u64>,

    /// 使用模拟机械臂（无硬件）
    #[arg(long, global = true)]
    pub simulate: bool,

    /// 配置文件路径（默认 <config_dir>/mirobot/config.toml）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl ConnectionArgs {
    pub fn load_config(&self) -> Result<CliConfig> {
        CliConfig::load(self.config.as_deref())
    }

    /// 合并参数与配置，生成 Builder
    pub fn builder(&self) -> Result<MirobotBuilder> {
        let config = self.load_config()?;
        let mut builder = MirobotBuilder::new();

        if let Some(port) = self.port.clone().or(config.port) {
            builder = builder.port(port);
        }
        if let Some(baud) = self.baud.or(config.baud_rate) {
            builder = builder.baud_rate(baud);
        }
        if let Some(ms) = config.read_timeout_ms {
            builder = builder.read_timeout(Duration::from_millis(ms));
        }

        let timeout = match self.timeout {
            Some(secs) => Some(
                Duration::try_from_secs_f64(secs).context("--timeout 必须是非负秒数")?,
            ),
            None => config.motion_timeout_ms.map(Duration::from_millis),
        };
        if let Some(timeout) = timeout {
            builder = builder.motion_timeout(timeout);
        }
        if let Some(ms) = self.poll_interval_ms.or(config.poll_interval_ms) {
            builder = builder.poll_interval(Duration::from_millis(ms));
        }

        if self.simulate {
            builder = builder.simulated(SimulatedArm::with_busy_polls(1));
        }

        Ok(builder)
    }

    /// 连接机器人，失败时返回错误
    pub fn connect(&self) -> Result<RobotController> {
        println!("🔌 连接到机器人...");
        let robot = self.builder()?.connect().context("连接机器人失败")?;
        println!("✅ 已连接");
        Ok(robot)
    }

    /// 创建控制器，连接失败只记录日志（后续指令为空操作）
    pub fn open_lenient(&self) -> Result<RobotController> {
        Ok(self.builder()?.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let args = ConnectionArgs {
            config: Some(dir.path().join("absent.toml")),
            simulate: true,
            ..Default::default()
        };
        assert!(args.builder().is_ok());
    }

    #[test]
    fn test_negative_timeout_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let args = ConnectionArgs {
            config: Some(dir.path().join("absent.toml")),
            timeout: Some(-1.0),
            ..Default::default()
        };
        assert!(args.builder().is_err());
    }

    #[test]
    fn test_simulated_connect() {
        let dir = tempfile::tempdir().unwrap();
        let args = ConnectionArgs {
            config: Some(dir.path().join("absent.toml")),
            simulate: true,
            poll_interval_ms: Some(1),
            ..Default::default()
        };
        let mut robot = args.connect().unwrap();
        robot.try_home().unwrap();
    }
}

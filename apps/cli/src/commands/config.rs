//! 配置管理命令
//!
//! 用于管理 CLI 配置（串口、波特率、等待参数）

use crate::connection::ConnectionArgs;
use anyhow::{Context, Result};
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 默认配置文件路径
fn default_config_file() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;
    path.push("mirobot");
    path.push("config.toml");
    Ok(path)
}

fn resolve(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_file(),
    }
}

/// CLI 配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// 默认串口
    pub port: Option<String>,
    /// 波特率
    pub baud_rate: Option<u32>,
    /// 串口读超时（毫秒）
    pub read_timeout_ms: Option<u64>,
    /// 每条运动指令的等待上限（毫秒）
    pub motion_timeout_ms: Option<u64>,
    /// 状态轮询间隔（毫秒）
    pub poll_interval_ms: Option<u64>,
}

impl CliConfig {
    /// 加载配置；文件不存在时返回默认配置
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = resolve(path)?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("解析配置文件失败: {}", path.display()))
    }

    /// 保存配置
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = resolve(path)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("创建配置目录失败")?;
        }

        let content = format!(
            "# Mirobot CLI Configuration\n\n{}",
            toml::to_string_pretty(self).context("序列化配置失败")?
        );
        fs::write(&path, content).context("写入配置文件失败")?;
        Ok(path)
    }
}

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 设置配置项
    ///
    /// 串口、波特率、运动超时与轮询间隔取自全局参数，例如：
    /// `mirobot-cli config set --port /dev/ttyUSB0 --baud 115200 --timeout 20`
    Set {
        /// 串口读超时（毫秒）
        #[arg(long)]
        read_timeout_ms: Option<u64>,
    },

    /// 获取配置项
    Get {
        /// 配置项名称
        #[arg(default_value = "all")]
        key: String,
    },

    /// 检查配置
    Check,
}

impl ConfigCommand {
    pub fn execute(self, connection: &ConnectionArgs) -> Result<()> {
        let path = connection.config.as_deref();
        match self {
            ConfigCommand::Set { read_timeout_ms } => {
                let mut config = CliConfig::load(path)?;
                if let Some(p) = connection.port.clone() {
                    println!("✅ 设置默认串口: {}", p);
                    config.port = Some(p);
                }
                if let Some(b) = connection.baud {
                    println!("✅ 设置波特率: {}", b);
                    config.baud_rate = Some(b);
                }
                if let Some(ms) = read_timeout_ms {
                    config.read_timeout_ms = Some(ms);
                }
                if let Some(secs) = connection.timeout {
                    let timeout = Duration::try_from_secs_f64(secs)
                        .context("--timeout 必须是非负秒数")?;
                    config.motion_timeout_ms = Some(timeout.as_millis() as u64);
                }
                if let Some(ms) = connection.poll_interval_ms {
                    config.poll_interval_ms = Some(ms);
                }
                let saved = config.save(path)?;
                println!("配置已保存: {}", saved.display());
                Ok(())
            },

            ConfigCommand::Get { key } => {
                let config = CliConfig::load(path)?;
                let value = match key.as_str() {
                    "port" => config.port.clone(),
                    "baud" | "baud_rate" => config.baud_rate.map(|v| v.to_string()),
                    "read_timeout_ms" => config.read_timeout_ms.map(|v| v.to_string()),
                    "motion_timeout_ms" => config.motion_timeout_ms.map(|v| v.to_string()),
                    "poll_interval_ms" => config.poll_interval_ms.map(|v| v.to_string()),
                    _ => {
                        print!("{}", toml::to_string_pretty(&config)?);
                        return Ok(());
                    },
                };
                println!("{}", value.unwrap_or_else(|| "(未设置)".to_string()));
                Ok(())
            },

            ConfigCommand::Check => {
                let file = resolve(path)?;
                let config = CliConfig::load(path)?;
                println!("配置文件: {}", file.display());
                println!("  串口: {:?}", config.port);
                println!("  波特率: {:?}", config.baud_rate);
                println!("  读超时: {:?} ms", config.read_timeout_ms);
                println!("  运动超时: {:?} ms", config.motion_timeout_ms);
                println!("  轮询间隔: {:?} ms", config.poll_interval_ms);
                Ok(())
            },
        }
    }
}

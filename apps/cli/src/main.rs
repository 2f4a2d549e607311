//! # Mirobot CLI
//!
//! Command-line interface for WLKATA Mirobot arm control.
//!
//! ```bash
//! # 配置默认串口
//! mirobot-cli config set --port /dev/ttyUSB0
//!
//! # 单次操作（内部：连接 -> 运动 -> 等待空闲 -> 断开）
//! mirobot-cli home
//! mirobot-cli move --joints 45,-15,30,0,0,0
//! mirobot-cli goto --pose 150,50,50,0,0,0
//!
//! # 演示流程：回零 -> 读码 -> 关节运动 -> 移到码中的位姿
//! mirobot-cli demo --code "150,50,50,0,0,0"
//!
//! # 无硬件
//! mirobot-cli --simulate demo
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod connection;
mod scanner;
mod validation;

use commands::{ConfigCommand, CycleCommand, DemoCommand, GotoCommand, MoveCommand};
use connection::ConnectionArgs;

/// Mirobot CLI - 机械臂命令行工具
#[derive(Parser, Debug)]
#[command(name = "mirobot-cli")]
#[command(about = "Command-line interface for WLKATA Mirobot arm control", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 列出可用串口
    Ports,

    /// 查询当前状态
    Status,

    /// 回到参考位姿
    Home,

    /// 关节空间运动
    Move {
        #[command(flatten)]
        args: MoveCommand,
    },

    /// 笛卡尔空间运动
    Goto {
        #[command(flatten)]
        args: GotoCommand,
    },

    /// 读码后移动到对应位姿的演示流程
    Demo {
        #[command(flatten)]
        args: DemoCommand,
    },

    /// 在两个关节位姿之间往复运动，直到 Ctrl+C
    Cycle {
        #[command(flatten)]
        args: CycleCommand,
    },
}

fn main() -> Result<()> {
    // 初始化日志（输出到 stderr，stdout 留给命令结果）
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("mirobot_cli=info,mirobot_driver=info")
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config(cmd) => cmd.execute(&cli.connection),

        Commands::Ports => commands::ports::execute(),

        Commands::Status => commands::status::execute(&cli.connection),

        Commands::Home => commands::status::home(&cli.connection),

        Commands::Move { args } => args.execute(&cli.connection),

        Commands::Goto { args } => args.execute(&cli.connection),

        Commands::Demo { args } => args.execute(&cli.connection),

        Commands::Cycle { args } => args.execute(&cli.connection),
    }
}

//! 状态与回零命令

use crate::connection::ConnectionArgs;
use anyhow::{Context, Result};
use mirobot_driver::ArmStatus;

/// 查询并打印当前状态
pub fn execute(connection: &ConnectionArgs) -> Result<()> {
    let mut robot = connection.connect()?;
    let status = robot.status().context("查询状态失败")?;
    print_status(&status);
    Ok(())
}

/// 回零并等待完成
pub fn home(connection: &ConnectionArgs) -> Result<()> {
    let mut robot = connection.connect()?;

    println!("⏳ 正在回零...");
    robot.try_home().context("回零失败")?;
    println!("✅ 回零完成");
    Ok(())
}

fn print_status(status: &ArmStatus) {
    println!("📊 机器人状态");
    println!("  状态: {}", status.state);

    println!("  关节角度:");
    for (i, a) in status.angles.as_array().iter().enumerate() {
        println!("    J{}: {:8.3}°", i + 1, a);
    }
    if status.rail != 0.0 {
        println!("    滑轨: {:8.3}", status.rail);
    }

    let p = &status.pose;
    println!("  末端位姿:");
    println!("    X: {:8.3}  Y: {:8.3}  Z: {:8.3}", p.x, p.y, p.z);
    println!("    R: {:8.3}  P: {:8.3}  Y: {:8.3}", p.roll, p.pitch, p.yaw);
    println!(
        "  气泵 PWM: {}  阀门 PWM: {}  运动模式: {}",
        status.pump_pwm, status.valve_pwm, status.motion_mode
    );
}

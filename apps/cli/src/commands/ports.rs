//! 串口列表

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    let ports = mirobot_serial::available_ports().context("枚举串口失败")?;
    if ports.is_empty() {
        println!("(未发现串口)");
    }
    for port in ports {
        println!("{}", port);
    }
    Ok(())
}

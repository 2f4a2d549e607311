//! 读码来源
//!
//! 相机和解码由外部完成，这里只关心"有没有读到一个码"。

use mirobot_driver::CartesianPose;
use std::io::BufRead;
use tracing::{debug, warn};

/// 一次扫描，返回解码出的文本（没有码时为 `None`）
pub trait CodeSource {
    fn scan(&mut self) -> Option<String>;
}

/// 固定内容（来自 `--code`）
pub struct FixedCode(pub Option<String>);

impl CodeSource for FixedCode {
    fn scan(&mut self) -> Option<String> {
        self.0.take()
    }
}

/// 从输入流读取一行作为码内容
pub struct LineReader<R: BufRead> {
    reader: R,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> CodeSource for LineReader<R> {
    fn scan(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let code = line.trim();
                if code.is_empty() {
                    None
                } else {
                    Some(code.to_string())
                }
            },
            Err(e) => {
                warn!("Failed to read code: {}", e);
                None
            },
        }
    }
}

/// 从码内容解析目标位姿
///
/// 接受 `x,y,z` 或 `x,y,z,roll,pitch,yaw`（逗号或空白分隔），
/// 只给出位置时姿态取 0。无法解析时返回 `None`。
pub fn pose_from_code(code: &str) -> Option<CartesianPose> {
    let values: Vec<f64> = code
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect::<Option<Vec<_>>>()?;

    let pose = match values.as_slice() {
        &[x, y, z] => CartesianPose::new(x, y, z, 0.0, 0.0, 0.0),
        &[x, y, z, roll, pitch, yaw] => CartesianPose::new(x, y, z, roll, pitch, yaw),
        _ => {
            debug!("Code payload is not a pose: {:?}", code);
            return None;
        },
    };
    Some(pose)
}

//! 运动指令构建
//!
//! 将运动意图编码为 Mirobot 固件可识别的 G-code 行（不含行结束符）。

use crate::ProtocolError;
use crate::constants::{CARTESIAN_MODE, HOMING, JOINT_COUNT, JOINT_LIMITS_DEG, JOINT_MODE};
use std::fmt;

/// 位置模式
///
/// 数值与厂商 SDK 的参数约定一致（0 = 绝对，1 = 增量）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, num_enum::IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum PositionMode {
    /// 目标即最终位姿（G90）
    #[default]
    Absolute = 0,
    /// 目标为相对当前位姿的增量（G91）
    Incremental = 1,
}

impl PositionMode {
    /// 对应的 G-code 字
    pub fn gcode(self) -> &'static str {
        match self {
            PositionMode::Absolute => "G90",
            PositionMode::Incremental => "G91",
        }
    }
}

impl TryFrom<u8> for PositionMode {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PositionMode::Absolute),
            1 => Ok(PositionMode::Incremental),
            _ => Err(ProtocolError::UnknownEnumValue {
                kind: "PositionMode",
                value,
            }),
        }
    }
}

/// 插补方式（仅笛卡尔指令）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, num_enum::IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MotionStyle {
    /// 时间最优、非直线路径（G00）
    Fast = 0,
    /// 笛卡尔空间直线路径（G01）
    #[default]
    Linear = 1,
}

impl MotionStyle {
    /// 对应的 G-code 字
    pub fn gcode(self) -> &'static str {
        match self {
            MotionStyle::Fast => "G00",
            MotionStyle::Linear => "G01",
        }
    }
}

impl TryFrom<u8> for MotionStyle {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MotionStyle::Fast),
            1 => Ok(MotionStyle::Linear),
            _ => Err(ProtocolError::UnknownEnumValue {
                kind: "MotionStyle",
                value,
            }),
        }
    }
}

/// 六关节角度（度），按 J1..J6 排列
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointAngles(pub [f64; JOINT_COUNT]);

impl JointAngles {
    pub const ZERO: JointAngles = JointAngles([0.0; JOINT_COUNT]);

    pub fn new(angles: [f64; JOINT_COUNT]) -> Self {
        Self(angles)
    }

    /// 从切片构造，长度必须为 6
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        let arr: [f64; JOINT_COUNT] = values.try_into().ok()?;
        Some(Self(arr))
    }

    pub fn as_array(&self) -> &[f64; JOINT_COUNT] {
        &self.0
    }

    /// 返回第一个超出限位的关节（索引, 角度），全部合法时返回 `None`
    ///
    /// 只对绝对模式有意义：增量目标无法在不知道当前位姿的情况下检查。
    pub fn first_out_of_range(&self) -> Option<(usize, f64)> {
        self.0
            .iter()
            .zip(JOINT_LIMITS_DEG.iter())
            .enumerate()
            .find(|(_, (a, (min, max)))| !a.is_finite() || **a < *min || **a > *max)
            .map(|(i, (a, _))| (i, *a))
    }
}

impl From<[f64; JOINT_COUNT]> for JointAngles {
    fn from(angles: [f64; JOINT_COUNT]) -> Self {
        Self(angles)
    }
}

impl std::ops::Index<usize> for JointAngles {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

/// 末端位姿：位置（mm）+ 姿态（度）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CartesianPose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl CartesianPose {
    pub fn new(x: f64, y: f64, z: f64, roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            x,
            y,
            z,
            roll,
            pitch,
            yaw,
        }
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.x, self.y, self.z, self.roll, self.pitch, self.yaw]
    }
}

impl From<[f64; 6]> for CartesianPose {
    fn from(v: [f64; 6]) -> Self {
        Self::new(v[0], v[1], v[2], v[3], v[4], v[5])
    }
}

/// 运动指令
///
/// 构造后立即发送，不做持久化。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotionCommand {
    /// 回到参考位姿
    Home,
    /// 关节空间运动
    Joint {
        angles: JointAngles,
        mode: PositionMode,
    },
    /// 笛卡尔空间运动
    Cartesian {
        pose: CartesianPose,
        motion: MotionStyle,
        mode: PositionMode,
    },
}

impl MotionCommand {
    pub fn joint(angles: JointAngles, mode: PositionMode) -> Self {
        MotionCommand::Joint { angles, mode }
    }

    pub fn cartesian(pose: CartesianPose, motion: MotionStyle, mode: PositionMode) -> Self {
        MotionCommand::Cartesian { pose, motion, mode }
    }

    /// 编码为 G-code 行
    ///
    /// - 关节：`M21 G90 G00 X.. Y.. Z.. A.. B.. C..`（关节运动固定用 G00）
    /// - 笛卡尔：`M20 G90 G01 X.. Y.. Z.. A.. B.. C..`
    pub fn encode(&self) -> String {
        match self {
            MotionCommand::Home => HOMING.to_string(),
            MotionCommand::Joint { angles, mode } => format!(
                "{} {} G00 {}",
                JOINT_MODE,
                mode.gcode(),
                axis_words(angles.as_array())
            ),
            MotionCommand::Cartesian { pose, motion, mode } => format!(
                "{} {} {} {}",
                CARTESIAN_MODE,
                mode.gcode(),
                motion.gcode(),
                axis_words(&pose.to_array())
            ),
        }
    }

    /// 简短名称，用于日志
    pub fn kind(&self) -> &'static str {
        match self {
            MotionCommand::Home => "home",
            MotionCommand::Joint { .. } => "joint",
            MotionCommand::Cartesian { .. } => "cartesian",
        }
    }
}

impl fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

fn axis_words(values: &[f64; 6]) -> String {
    const AXES: [char; 6] = ['X', 'Y', 'Z', 'A', 'B', 'C'];
    AXES.iter()
        .zip(values.iter())
        .map(|(axis, v)| format!("{}{:.3}", axis, v))
        .collect::<Vec<_>>()
        .join(" ")
}

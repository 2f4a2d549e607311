//! 状态报告解析
//!
//! 固件对 `?` 的应答格式：
//!
//! ```text
//! <Idle,Angle(ABCDXYZ):0.000,0.000,0.000,0.000,0.000,0.000,0.000,Cartesian coordinate(XYZ RxRyRz):198.670,0.000,230.720,0.000,0.000,0.000,Pump PWM:0,Valve PWM:0,Motion_MODE:0>
//! ```
//!
//! 角度块的顺序是 J4, J5, J6, 滑轨(D), J1, J2, J3。
//! 只有状态字段是必需的，缺失的后续字段按 0 处理。

use crate::ProtocolError;
use crate::command::{CartesianPose, JointAngles};
use std::fmt;
use std::str::FromStr;

/// 机械臂运行状态
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArmState {
    /// 空闲（没有运动在进行）
    Idle,
    /// 运动中 / 回零中 / 暂停等非空闲状态，保留固件原始名称
    Busy(String),
    /// 报警（限位触发、未回零等），需要人工处理
    Alarm,
}

impl ArmState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ArmState::Idle)
    }

    pub fn is_alarm(&self) -> bool {
        matches!(self, ArmState::Alarm)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ArmState::Idle => "Idle",
            ArmState::Busy(name) => name,
            ArmState::Alarm => "Alarm",
        }
    }
}

impl FromStr for ArmState {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(ProtocolError::InvalidStatus("empty state".to_string())),
            "Idle" => Ok(ArmState::Idle),
            "Alarm" => Ok(ArmState::Alarm),
            other => Ok(ArmState::Busy(other.to_string())),
        }
    }
}

impl fmt::Display for ArmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一次状态查询的结果
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmStatus {
    pub state: ArmState,
    /// 关节角度（度），J1..J6
    pub angles: JointAngles,
    /// 滑轨位置（第 7 轴 D）
    pub rail: f64,
    /// 末端位姿
    pub pose: CartesianPose,
    pub pump_pwm: i32,
    pub valve_pwm: i32,
    pub motion_mode: i32,
}

impl ArmStatus {
    /// 只带状态、其余字段为 0 的报告
    pub fn with_state(state: ArmState) -> Self {
        Self {
            state,
            angles: JointAngles::ZERO,
            rail: 0.0,
            pose: CartesianPose::default(),
            pump_pwm: 0,
            valve_pwm: 0,
            motion_mode: 0,
        }
    }

    pub fn idle() -> Self {
        Self::with_state(ArmState::Idle)
    }

    pub fn busy(name: impl Into<String>) -> Self {
        Self::with_state(ArmState::Busy(name.into()))
    }

    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    /// 判断一行应答是否为状态报告
    pub fn is_report(line: &str) -> bool {
        line.trim_start().starts_with('<')
    }

    /// 解析一行状态报告
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let body = line
            .trim()
            .strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
            .ok_or_else(|| ProtocolError::InvalidStatus(line.to_string()))?;

        let mut tokens = body.split(',');
        let state: ArmState = tokens.next().unwrap_or_default().parse()?;
        let mut status = ArmStatus::with_state(state);

        // 以 "key:value" 开启一个字段，后续不带冒号的 token 追加为该字段的值
        let mut fields: Vec<(&str, Vec<&str>)> = Vec::new();
        for token in tokens {
            if let Some((key, value)) = token.split_once(':') {
                fields.push((key.trim(), vec![value.trim()]));
            } else if let Some((_, values)) = fields.last_mut() {
                values.push(token.trim());
            } else {
                return Err(ProtocolError::InvalidStatus(line.to_string()));
            }
        }

        for (key, values) in fields {
            if key.starts_with("Angle") {
                let v = parse_floats::<7>("Angle", &values)?;
                status.angles = JointAngles::new([v[4], v[5], v[6], v[0], v[1], v[2]]);
                status.rail = v[3];
            } else if key.starts_with("Cartesian") {
                let v = parse_floats::<6>("Cartesian", &values)?;
                status.pose = CartesianPose::from(v);
            } else if key.starts_with("Pump") {
                status.pump_pwm = parse_int("Pump PWM", &values)?;
            } else if key.starts_with("Valve") {
                status.valve_pwm = parse_int("Valve PWM", &values)?;
            } else if key.starts_with("Motion") {
                status.motion_mode = parse_int("Motion_MODE", &values)?;
            }
            // 其他字段（新固件扩展）忽略
        }

        Ok(status)
    }

    /// 按固件格式输出，与 [`parse`](Self::parse) 互逆（测试中用来编写固件应答）
    pub fn to_report(&self) -> String {
        let a = self.angles.as_array();
        let p = self.pose.to_array();
        format!(
            "<{},Angle(ABCDXYZ):{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},Cartesian coordinate(XYZ RxRyRz):{:.3},{:.3},{:.3},{:.3},{:.3},{:.3},Pump PWM:{},Valve PWM:{},Motion_MODE:{}>",
            self.state,
            a[3],
            a[4],
            a[5],
            self.rail,
            a[0],
            a[1],
            a[2],
            p[0],
            p[1],
            p[2],
            p[3],
            p[4],
            p[5],
            self.pump_pwm,
            self.valve_pwm,
            self.motion_mode
        )
    }
}

impl FromStr for ArmStatus {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArmStatus::parse(s)
    }
}

fn parse_floats<const N: usize>(
    field: &'static str,
    values: &[&str],
) -> Result<[f64; N], ProtocolError> {
    if values.len() != N {
        return Err(ProtocolError::InvalidStatus(format!(
            "{} expects {} values, got {}",
            field,
            N,
            values.len()
        )));
    }
    let mut out = [0.0; N];
    for (slot, raw) in out.iter_mut().zip(values) {
        *slot = raw.parse().map_err(|_| ProtocolError::InvalidNumber {
            field,
            value: raw.to_string(),
        })?;
    }
    Ok(out)
}

fn parse_int(field: &'static str, values: &[&str]) -> Result<i32, ProtocolError> {
    let raw = values.first().copied().unwrap_or_default();
    raw.parse().map_err(|_| ProtocolError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

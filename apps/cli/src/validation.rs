//! 输入验证模块
//!
//! 解析逗号分隔的 6 元组，并对绝对关节目标做限位检查

use anyhow::{Context, Result};
use mirobot_protocol::{JOINT_COUNT, JOINT_LIMITS_DEG, JointAngles};

/// 解析恰好 `N` 个逗号（或空白）分隔的有限数值
pub fn parse_values<const N: usize>(input: &str, what: &str) -> Result<[f64; N]> {
    let values: Vec<f64> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("解析{}失败: {}", what, input))?;

    if values.len() != N {
        anyhow::bail!("{}需要 {} 个数值，得到 {} 个", what, N, values.len());
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        anyhow::bail!("{}包含无效数值: {}", what, bad);
    }

    let mut out = [0.0; N];
    out.copy_from_slice(&values);
    Ok(out)
}

/// 关节角度验证器（度）
pub struct JointValidator {
    limits: [(f64, f64); JOINT_COUNT],
}

impl JointValidator {
    /// 使用 Mirobot 出厂限位
    pub fn mirobot() -> Self {
        Self {
            limits: JOINT_LIMITS_DEG,
        }
    }

    /// 验证单个关节角度
    pub fn validate_joint(&self, index: usize, angle: f64) -> Result<()> {
        let (min, max) = self.limits[index];
        if angle < min || angle > max {
            anyhow::bail!(
                "关节 J{} 角度 {:.1}° 超出范围 [{:.0}°, {:.0}°]",
                index + 1,
                angle,
                min,
                max
            );
        }
        Ok(())
    }

    /// 验证全部关节
    pub fn validate(&self, angles: &JointAngles) -> Result<()> {
        for (i, &a) in angles.as_array().iter().enumerate() {
            self.validate_joint(i, a)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_values() {
        let v = parse_values::<6>("45,-15, 30,0,0,0", "关节角度").unwrap();
        assert_eq!(v, [45.0, -15.0, 30.0, 0.0, 0.0, 0.0]);

        let v = parse_values::<3>("1 2 3", "位置").unwrap();
        assert_eq!(v, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_parse_values_errors() {
        assert!(parse_values::<6>("1,2,3", "关节角度").is_err());
        assert!(parse_values::<6>("1,2,x,4,5,6", "关节角度").is_err());
        assert!(parse_values::<6>("1,2,inf,4,5,6", "关节角度").is_err());
    }

    #[test]
    fn test_joint_validator() {
        let v = JointValidator::mirobot();
        assert!(
            v.validate(&JointAngles::new([45.0, -15.0, 30.0, 0.0, 0.0, 0.0]))
                .is_ok()
        );
        assert!(
            v.validate(&JointAngles::new([-45.0, 15.0, -30.0, 0.0, 0.0, 0.0]))
                .is_ok()
        );

        let err = v
            .validate(&JointAngles::new([0.0, 90.0, 0.0, 0.0, 0.0, 0.0]))
            .unwrap_err();
        assert!(err.to_string().contains("J2"));
    }
}

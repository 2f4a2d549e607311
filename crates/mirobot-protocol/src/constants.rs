//! 协议常量定义

/// 回零指令
pub const HOMING: &str = "$H";

/// 状态查询指令
pub const STATUS_QUERY: &str = "?";

/// 关节空间运动模式前缀
pub const JOINT_MODE: &str = "M21";

/// 笛卡尔空间运动模式前缀
pub const CARTESIAN_MODE: &str = "M20";

/// 指令行结束符
pub const LINE_TERMINATOR: &str = "\r\n";

/// 固件接受指令时的应答
pub const ACK_OK: &str = "ok";

/// 固件拒绝指令时的应答前缀
pub const ACK_ERROR_PREFIX: &str = "error";

/// 默认串口（与厂商示例保持一致）
pub const DEFAULT_PORT: &str = "COM3";

/// 默认波特率
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// 默认读超时（毫秒）
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1_000;

/// 关节数量
pub const JOINT_COUNT: usize = 6;

/// 各关节限位（度），按 J1..J6 排列
pub const JOINT_LIMITS_DEG: [(f64, f64); JOINT_COUNT] = [
    (-110.0, 160.0),
    (-35.0, 70.0),
    (-120.0, 60.0),
    (-180.0, 180.0),
    (-200.0, 30.0),
    (-360.0, 360.0),
];

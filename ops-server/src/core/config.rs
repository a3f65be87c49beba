use crate::auth::JwtConfig;
use crate::core::ServerError;

/// 开发环境使用的支付网关密钥占位符
const DEV_PAYMENT_SECRET: &str = "dev-payment-gateway-secret";

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | DATABASE_URL | sqlite://data/ops.db | SQLite 数据库路径 |
/// | ENVIRONMENT | development | 运行环境 |
/// | PARTNER_ETA_MINUTES | 15 | 配送员到店预估 (分钟) |
/// | PAYMENT_GATEWAY_SECRET | (dev 占位符) | 支付网关签名密钥 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | JWT_SECRET / JWT_EXPIRATION_MINUTES | 见 [`JwtConfig`] | JWT 配置 |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 DATABASE_URL=sqlite://ops.db cargo run -p ops-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SQLite 连接串 (`sqlite://path` 或 `sqlite::memory:`)
    pub database_url: String,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 配送员 ETA，用于计算预计出餐/发车时间
    pub partner_eta_minutes: i64,
    /// 支付网关 HMAC 密钥
    pub payment_secret: String,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data/ops.db".into()),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            partner_eta_minutes: std::env::var("PARTNER_ETA_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|m: &i64| *m >= 0)
                .unwrap_or(15),
            payment_secret: std::env::var("PAYMENT_GATEWAY_SECRET")
                .unwrap_or_else(|_| DEV_PAYMENT_SECRET.into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(database_url: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.database_url = database_url.into();
        config.http_port = http_port;
        config
    }

    /// 启动前检查：非开发环境必须显式配置密钥
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.is_development() {
            return Ok(());
        }
        if std::env::var("JWT_SECRET").is_err() {
            return Err(ServerError::Config(
                "JWT_SECRET must be set outside development".into(),
            ));
        }
        if self.payment_secret == DEV_PAYMENT_SECRET {
            return Err(ServerError::Config(
                "PAYMENT_GATEWAY_SECRET must be set outside development".into(),
            ));
        }
        Ok(())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

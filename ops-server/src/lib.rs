//! Zomato Ops Pro Server - 订单配送协调服务
//!
//! # 架构概述
//!
//! - **订单生命周期** (`orders`): 状态机、配送员分配、订单号生成、输入校验
//! - **数据库** (`db`): SQLite (sqlx) 存储订单、用户、支付记录
//! - **认证** (`auth`): JWT + Argon2 认证，`can_perform` 角色授权
//! - **实时通知** (`notify`): broadcast 分发 + WebSocket 推送
//! - **支付** (`payments`): 网关签名校验
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! ops-server/src/
//! ├── core/          # 配置、状态、服务器、错误
//! ├── auth/          # JWT 认证、权限、密码
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 错误、日志、校验
//! ├── db/            # 数据库层
//! ├── orders/        # 订单生命周期与分配
//! ├── notify/        # 实时通知
//! └── payments/      # 支付签名校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notify;
pub mod orders;
pub mod payments;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use notify::{NotificationChannel, NotificationHub};
pub use orders::{OrderError, OrderService};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: 加载 .env、初始化日志
pub fn setup_environment() -> anyhow::Result<()> {
    // .env 不存在时忽略
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_json = std::env::var("LOG_JSON").ok().and_then(|v| v.parse().ok());
    let log_dir = std::env::var("LOG_DIR").ok();
    if let Some(dir) = &log_dir {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(log_level.as_deref(), log_json, log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ____                    ____
  / __ \____  _____       / __ \_________
 / / / / __ \/ ___/______/ /_/ / ___/ __ \
/ /_/ / /_/ (__  )______/ ____/ /  / /_/ /
\____/ .___/____/      /_/   /_/   \____/
    /_/
    "#
    );
}

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::notify::{NotificationChannel, NotificationHub};
use crate::orders::OrderService;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求 clone 一份。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | hub | Arc<NotificationHub> | 实时通知中心 |
/// | orders | OrderService | 订单生命周期服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 数据库
    pub db: DbService,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 实时通知中心 (WebSocket 订阅来源)
    pub hub: Arc<NotificationHub>,
    /// 订单服务 (发布事件到 hub)
    pub orders: OrderService,
}

impl ServerState {
    /// 由已打开的数据库构造状态
    ///
    /// 测试中配合 [`DbService::in_memory`] 使用
    pub fn new(config: Config, db: DbService) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let hub = Arc::new(NotificationHub::new());
        let channel: Arc<dyn NotificationChannel> = hub.clone();
        let orders = OrderService::new(db.pool.clone(), channel, config.partner_eta_minutes);

        Self {
            config,
            db,
            jwt_service,
            hub,
            orders,
        }
    }

    /// 打开数据库 (含迁移) 并初始化所有服务
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_url).await?;
        Ok(Self::new(config.clone(), db))
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 获取数据库连接池
    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }
}

use thiserror::Error;

use crate::utils::AppError;

/// 启动与运行期错误 (请求级错误见 [`AppError`])
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库初始化失败: {0}")]
    Database(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

impl From<AppError> for ServerError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::Database(msg) => ServerError::Database(msg),
            other => ServerError::Internal(anyhow::anyhow!(other.to_string())),
        }
    }
}

/// 服务器启动 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;

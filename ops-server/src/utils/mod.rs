//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型
//! - [`AppResponse`] - API 响应结构
//! - [`Json`] - 请求体提取器 (格式错误返回 E0002)
//! - [`validation`] - 输入校验 (`Validated<T>`)
//! - 日志初始化

pub mod error;
pub mod json;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResponse, AppResult};
pub use error::{ok, ok_with_message};
pub use json::Json;
pub use validation::{FieldError, FieldErrors, Validated};

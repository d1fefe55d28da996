//! 配置管理
//!
//! 配置按 `config.toml` → `config.{APP_ENV}.toml` → `RECORDS_*` 环境变量的顺序叠加，
//! 启动时加载一次，之后通过 [`AppConfig::get`] 读取。

mod loader;
mod structs;

pub use structs::*;

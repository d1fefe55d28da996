//! 照片对象存储
//!
//! 键格式为 `{studentId}-{random}.{ext}`，写入后不可覆盖。

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::UploadConfig;
use crate::errors::{RecordsError, Result};

static OBJECT_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]+-[A-Za-z0-9]+\.[a-z0-9]{1,8}$").expect("Invalid object key regex")
});

/// 校验对象键，拒绝路径穿越等非法键
pub fn validate_object_key(key: &str) -> Result<()> {
    if OBJECT_KEY_RE.is_match(key) {
        Ok(())
    } else {
        Err(RecordsError::validation(format!("Invalid object key: {key}")))
    }
}

/// 生成照片键
pub fn photo_key(student_id: i64, extension: &str) -> String {
    format!(
        "{}-{}.{}",
        student_id,
        uuid::Uuid::new_v4().simple(),
        extension.trim_start_matches('.').to_lowercase()
    )
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 写入对象；键已存在时返回 Conflict
    async fn upload(&self, key: &str, bytes: &[u8]) -> Result<()>;
    /// 读取对象，不存在时返回 None
    async fn download(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn public_url(&self, key: &str) -> String;
}

/// 本地磁盘实现
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(&config.photo_dir, &config.public_base_url)
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_object_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn upload(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root)
            .map_err(|e| RecordsError::object_store(format!("创建照片目录失败: {e}")))?;

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(RecordsError::conflict(format!("Object already exists: {key}")));
            }
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = file.write_all(bytes) {
            let _ = fs::remove_file(&path);
            return Err(e.into());
        }
        Ok(())
    }

    async fn download(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), key)
    }
}

//! 统一错误处理模块
//!
//! 错误类型由宏生成，每个变体带有错误代码、类型名称和详情。

use std::fmt;

use actix_web::http::StatusCode;

/// 定义错误类型的宏
///
/// 生成 enum、`code()`、`error_type()`、`message()` 以及 snake_case 构造函数。
macro_rules! define_records_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum RecordsError {
            $($variant(String),)*
        }

        impl RecordsError {
            pub fn code(&self) -> &'static str {
                match self {
                    $(RecordsError::$variant(_) => $code,)*
                }
            }

            pub fn error_type(&self) -> &'static str {
                match self {
                    $(RecordsError::$variant(_) => $type_name,)*
                }
            }

            pub fn message(&self) -> &str {
                match self {
                    $(RecordsError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl RecordsError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        RecordsError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_records_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    Persistence("E005", "Persistence Error"),
    ObjectStore("E006", "Object Store Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Conflict("E009", "Conflict"),
    Serialization("E010", "Serialization Error"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
}

impl RecordsError {
    /// HTTP 状态码映射
    pub fn status_code(&self) -> StatusCode {
        match self {
            RecordsError::Validation(_) | RecordsError::DateParse(_) => StatusCode::BAD_REQUEST,
            RecordsError::Authentication(_) => StatusCode::UNAUTHORIZED,
            RecordsError::Authorization(_) => StatusCode::FORBIDDEN,
            RecordsError::NotFound(_) => StatusCode::NOT_FOUND,
            RecordsError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for RecordsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for RecordsError {}

impl From<sea_orm::DbErr> for RecordsError {
    fn from(err: sea_orm::DbErr) -> Self {
        RecordsError::Persistence(err.to_string())
    }
}

impl From<std::io::Error> for RecordsError {
    fn from(err: std::io::Error) -> Self {
        RecordsError::ObjectStore(err.to_string())
    }
}

impl From<serde_json::Error> for RecordsError {
    fn from(err: serde_json::Error) -> Self {
        RecordsError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for RecordsError {
    fn from(err: chrono::ParseError) -> Self {
        RecordsError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RecordsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(RecordsError::cache_connection("test").code(), "E001");
        assert_eq!(RecordsError::persistence("test").code(), "E005");
        assert_eq!(RecordsError::validation("test").code(), "E007");
        assert_eq!(RecordsError::conflict("test").code(), "E009");
        assert_eq!(RecordsError::authentication("test").code(), "E012");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            RecordsError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RecordsError::authentication("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            RecordsError::authorization("x").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            RecordsError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RecordsError::conflict("x").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            RecordsError::persistence("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_format_simple() {
        let err = RecordsError::validation("Grade must be between 1.0 and 5.0");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("between 1.0 and 5.0"));
    }

    #[test]
    fn test_db_error_becomes_persistence() {
        let err: RecordsError = sea_orm::DbErr::Custom("boom".into()).into();
        assert!(matches!(err, RecordsError::Persistence(_)));
    }
}

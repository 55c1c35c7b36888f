use std::fmt;

#[derive(Debug, Clone)]
pub enum DocadsError {
    Validation(String),
    FileOperation(String),
    Serialization(String),
    ConfigLoad(String),
    Delivery(String),
    NotFound(String),
}

impl DocadsError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            DocadsError::Validation(_) => "E001",
            DocadsError::FileOperation(_) => "E002",
            DocadsError::Serialization(_) => "E003",
            DocadsError::ConfigLoad(_) => "E004",
            DocadsError::Delivery(_) => "E005",
            DocadsError::NotFound(_) => "E006",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            DocadsError::Validation(_) => "Validation Error",
            DocadsError::FileOperation(_) => "File Operation Error",
            DocadsError::Serialization(_) => "Serialization Error",
            DocadsError::ConfigLoad(_) => "Config Load Error",
            DocadsError::Delivery(_) => "Delivery Error",
            DocadsError::NotFound(_) => "Resource Not Found",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            DocadsError::Validation(msg) => msg,
            DocadsError::FileOperation(msg) => msg,
            DocadsError::Serialization(msg) => msg,
            DocadsError::ConfigLoad(msg) => msg,
            DocadsError::Delivery(msg) => msg,
            DocadsError::NotFound(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 CLI 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for DocadsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 默认使用简洁格式
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for DocadsError {}

// 便捷的构造函数
impl DocadsError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        DocadsError::Validation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        DocadsError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        DocadsError::Serialization(msg.into())
    }

    pub fn config_load<T: Into<String>>(msg: T) -> Self {
        DocadsError::ConfigLoad(msg.into())
    }

    pub fn delivery<T: Into<String>>(msg: T) -> Self {
        DocadsError::Delivery(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        DocadsError::NotFound(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for DocadsError {
    fn from(err: std::io::Error) -> Self {
        DocadsError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for DocadsError {
    fn from(err: serde_json::Error) -> Self {
        DocadsError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for DocadsError {
    fn from(err: toml::de::Error) -> Self {
        DocadsError::ConfigLoad(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DocadsError>;

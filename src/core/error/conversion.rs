//! 参数转换错误类型

use thiserror::Error;

/// 宿主值无法转换为线上值
///
/// 转换在发起任何远程调用之前完成，列表或映射中任意一个元素
/// 转换失败都会使整个参数转换失败，不保留部分结果
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("只支持将 bool/int/float/string/null/list/map 及时间、地理类型转换为 Value，但收到了 {type_name}")]
    UnsupportedType { type_name: String },

    #[error("参数 `{key}` 转换失败: {source}")]
    Parameter {
        key: String,
        #[source]
        source: Box<ConversionError>,
    },
}

impl ConversionError {
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        ConversionError::UnsupportedType {
            type_name: type_name.into(),
        }
    }

    /// 返回导致失败的宿主类型名
    pub fn type_name(&self) -> &str {
        match self {
            ConversionError::UnsupportedType { type_name } => type_name,
            ConversionError::Parameter { source, .. } => source.type_name(),
        }
    }
}

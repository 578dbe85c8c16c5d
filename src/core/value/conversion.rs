//! 宿主值到线上值的转换
//!
//! `HostValue` 是调用方可以传入的参数值集合，`convert` 把它转换为协议使用的 `Value`。
//! 转换规则：
//! - 浮点数没有小数部分时编码为整数，保证服务端整数比较语义
//! - f32 同样按整数折叠，否则放宽为 f64
//! - 字符串按原始字节传输
//! - 列表、映射递归转换，任意元素失败则整体失败
//! - 已经是线上表示的值（含时间、地理类型）原样透传
//! - 其它宿主类型返回 `ConversionError`

use std::collections::HashMap;

use super::date_time::{DateTimeValue, DateValue, DurationValue, TimeValue};
use super::geography::Geography;
use super::types::{NullType, Value};
use crate::core::error::ConversionError;

/// 调用方传入的参数值
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Float32(f32),
    String(String),
    Null,
    List(Vec<HostValue>),
    Map(HashMap<String, HostValue>),
    /// 已转换好的线上值
    Wire(Value),
    Date(DateValue),
    DateTime(DateTimeValue),
    Duration(DurationValue),
    Time(TimeValue),
    Geography(Geography),
    /// 没有线上表示的宿主类型，只记录类型名
    Unsupported { type_name: String },
}

impl HostValue {
    /// 以类型 `T` 的名字构造一个不受支持的值
    pub fn unsupported<T: ?Sized>() -> Self {
        HostValue::Unsupported {
            type_name: std::any::type_name::<T>().to_string(),
        }
    }
}

/// 把宿主值转换为线上值
pub fn convert(value: &HostValue) -> Result<Value, ConversionError> {
    match value {
        HostValue::Bool(b) => Ok(Value::Bool(*b)),
        HostValue::Int(i) => Ok(Value::Int(*i)),
        HostValue::Float(f) => Ok(collapse_float(*f)),
        HostValue::Float32(f) => Ok(collapse_float(*f as f64)),
        HostValue::String(s) => Ok(Value::String(s.as_bytes().to_vec())),
        HostValue::Null => Ok(Value::Null(NullType::Null)),
        HostValue::List(items) => items
            .iter()
            .map(convert)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        HostValue::Map(kvs) => convert_params(kvs).map(Value::Map),
        HostValue::Wire(v) => Ok(v.clone()),
        HostValue::Date(d) => Ok(Value::Date(*d)),
        HostValue::DateTime(dt) => Ok(Value::DateTime(*dt)),
        HostValue::Duration(du) => Ok(Value::Duration(*du)),
        HostValue::Time(t) => Ok(Value::Time(*t)),
        HostValue::Geography(g) => Ok(Value::Geography(g.clone())),
        HostValue::Unsupported { type_name } => Err(ConversionError::unsupported(type_name.clone())),
    }
}

/// 转换整个参数表，遇到第一个失败的参数即返回
pub fn convert_params(
    params: &HashMap<String, HostValue>,
) -> Result<HashMap<String, Value>, ConversionError> {
    params
        .iter()
        .map(|(k, v)| {
            convert(v)
                .map(|nv| (k.clone(), nv))
                .map_err(|e| ConversionError::Parameter {
                    key: k.clone(),
                    source: Box::new(e),
                })
        })
        .collect()
}

// i64::MAX as f64 是 2^63，本身已越界，所以上界用严格小于
fn collapse_float(f: f64) -> Value {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Value::Int(f as i64)
    } else {
        Value::Float(f)
    }
}

impl From<bool> for HostValue {
    fn from(value: bool) -> Self {
        HostValue::Bool(value)
    }
}

impl From<i64> for HostValue {
    fn from(value: i64) -> Self {
        HostValue::Int(value)
    }
}

impl From<i32> for HostValue {
    fn from(value: i32) -> Self {
        HostValue::Int(value as i64)
    }
}

impl From<f64> for HostValue {
    fn from(value: f64) -> Self {
        HostValue::Float(value)
    }
}

impl From<f32> for HostValue {
    fn from(value: f32) -> Self {
        HostValue::Float32(value)
    }
}

impl From<String> for HostValue {
    fn from(value: String) -> Self {
        HostValue::String(value)
    }
}

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        HostValue::String(value.to_string())
    }
}

impl<T: Into<HostValue>> From<Option<T>> for HostValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(HostValue::Null, Into::into)
    }
}

impl<T: Into<HostValue>> From<Vec<T>> for HostValue {
    fn from(value: Vec<T>) -> Self {
        HostValue::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<HostValue>> From<HashMap<String, T>> for HostValue {
    fn from(value: HashMap<String, T>) -> Self {
        HostValue::Map(value.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl From<Value> for HostValue {
    fn from(value: Value) -> Self {
        HostValue::Wire(value)
    }
}

impl From<DateValue> for HostValue {
    fn from(value: DateValue) -> Self {
        HostValue::Date(value)
    }
}

impl From<DateTimeValue> for HostValue {
    fn from(value: DateTimeValue) -> Self {
        HostValue::DateTime(value)
    }
}

impl From<DurationValue> for HostValue {
    fn from(value: DurationValue) -> Self {
        HostValue::Duration(value)
    }
}

impl From<TimeValue> for HostValue {
    fn from(value: TimeValue) -> Self {
        HostValue::Time(value)
    }
}

impl From<Geography> for HostValue {
    fn from(value: Geography) -> Self {
        HostValue::Geography(value)
    }
}

impl From<serde_json::Value> for HostValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => HostValue::Null,
            serde_json::Value::Bool(b) => HostValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    HostValue::Int(i)
                } else if n.is_u64() {
                    HostValue::unsupported::<u64>()
                } else {
                    n.as_f64().map_or_else(HostValue::unsupported::<serde_json::Number>, HostValue::Float)
                }
            }
            serde_json::Value::String(s) => HostValue::String(s),
            serde_json::Value::Array(items) => {
                HostValue::List(items.into_iter().map(HostValue::from).collect())
            }
            serde_json::Value::Object(kvs) => {
                HostValue::Map(kvs.into_iter().map(|(k, v)| (k, HostValue::from(v))).collect())
            }
        }
    }
}

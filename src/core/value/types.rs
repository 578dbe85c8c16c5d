use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::date_time::{DateTimeValue, DateValue, DurationValue, TimeValue};
use super::geography::Geography;

/// Value类型定义枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueTypeDef {
    Null,
    Bool,
    Int,
    Float,
    String,
    List,
    Map,
    Date,
    DateTime,
    Duration,
    Time,
    Geography,
}

/// Null类型定义
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum NullType {
    #[default]
    Null,
    NaN,
    BadData,
    BadType,
    Overflow,
    UnknownProp,
    DivByZero,
    OutOfRange,
}

/// 线上值
///
/// 查询参数和结果单元格在协议中的表示，每个值只携带一个变体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null(NullType),
    Bool(bool),
    Int(i64),
    Float(f64),
    /// 字符串按原始字节传输
    String(Vec<u8>),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
    Date(DateValue),
    DateTime(DateTimeValue),
    Duration(DurationValue),
    Time(TimeValue),
    Geography(Geography),
}

impl Value {
    /// 构造字符串值
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(s.as_ref().as_bytes().to_vec())
    }

    /// 获取值的类型
    pub fn get_type(&self) -> ValueTypeDef {
        match self {
            Value::Null(_) => ValueTypeDef::Null,
            Value::Bool(_) => ValueTypeDef::Bool,
            Value::Int(_) => ValueTypeDef::Int,
            Value::Float(_) => ValueTypeDef::Float,
            Value::String(_) => ValueTypeDef::String,
            Value::List(_) => ValueTypeDef::List,
            Value::Map(_) => ValueTypeDef::Map,
            Value::Date(_) => ValueTypeDef::Date,
            Value::DateTime(_) => ValueTypeDef::DateTime,
            Value::Duration(_) => ValueTypeDef::Duration,
            Value::Time(_) => ValueTypeDef::Time,
            Value::Geography(_) => ValueTypeDef::Geography,
        }
    }

    /// 检查值是否为null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// 以 UTF-8 解释字符串字节，非法字节返回 None
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Map(kvs) => Some(kvs),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null(NullType::Null)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null(NullType::Null) => write!(f, "NULL"),
            Value::Null(other) => write!(f, "NULL({:?})", other),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(bytes) => write!(f, "{:?}", String::from_utf8_lossy(bytes)),
            Value::List(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Value::Map(kvs) => {
                // HashMap 无序，按键排序保证输出稳定
                let mut keys: Vec<&String> = kvs.keys().collect();
                keys.sort();
                write!(f, "{{")?;
                for (i, k) in keys.into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, kvs[k])?;
                }
                write!(f, "}}")
            }
            Value::Date(d) => write!(f, "{}", d),
            Value::DateTime(dt) => write!(f, "{}", dt),
            Value::Duration(du) => write!(f, "{}", du),
            Value::Time(t) => write!(f, "{}", t),
            Value::Geography(g) => write!(f, "{}", g),
        }
    }
}

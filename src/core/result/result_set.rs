//! 查询结果集
//!
//! 封装 `ExecutionResponse`，提供按行、按列名的访问方法。
//! DateTime / Time 单元格在服务端以 UTC 存储，按行读取时用会话的时区偏移转换为本地时间。

use std::collections::HashMap;

use crate::core::error::{ClientError, ClientResult, ErrorCode};
use crate::core::result::response::{ExecutionResponse, PlanDescription};
use crate::core::value::Value;

/// 会话时区信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimezoneInfo {
    /// 相对 UTC 的偏移，东区为正，单位秒
    pub offset: i32,
    pub name: Vec<u8>,
}

impl TimezoneInfo {
    pub fn new(offset: i32, name: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            name: name.into(),
        }
    }
}

/// 查询结果集
#[derive(Debug, Clone)]
pub struct ResultSet {
    resp: ExecutionResponse,
    column_names: Vec<String>,
    col_name_index: HashMap<String, usize>,
    timezone: TimezoneInfo,
}

impl ResultSet {
    /// 从响应构建结果集
    ///
    /// 没有数据的响应（如 DDL、失败的查询）得到一个空结果集。
    /// 列名按原始字节传输，非法的 UTF-8 字节替换为 U+FFFD
    pub fn new(resp: ExecutionResponse, timezone: TimezoneInfo) -> Self {
        let column_names: Vec<String> = match &resp.data {
            Some(data) => data
                .column_names
                .iter()
                .map(|name| String::from_utf8_lossy(name).into_owned())
                .collect(),
            None => Vec::new(),
        };
        let col_name_index = column_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        Self {
            resp,
            column_names,
            col_name_index,
            timezone,
        }
    }

    pub fn is_succeed(&self) -> bool {
        self.resp.error_code == ErrorCode::Succeeded.as_i32()
    }

    /// 原始错误码
    pub fn error_code(&self) -> i32 {
        self.resp.error_code
    }

    pub fn error_msg(&self) -> String {
        self.resp.error_msg_lossy()
    }

    pub fn latency_in_us(&self) -> i64 {
        self.resp.latency_in_us
    }

    pub fn space_name(&self) -> String {
        self.resp
            .space_name
            .as_deref()
            .map(|s| String::from_utf8_lossy(s).into_owned())
            .unwrap_or_default()
    }

    pub fn comment(&self) -> String {
        self.resp
            .comment
            .as_deref()
            .map(|s| String::from_utf8_lossy(s).into_owned())
            .unwrap_or_default()
    }

    pub fn plan_desc(&self) -> Option<&PlanDescription> {
        self.resp.plan_desc.as_ref()
    }

    pub fn col_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn col_size(&self) -> usize {
        self.column_names.len()
    }

    pub fn row_size(&self) -> usize {
        self.resp.data.as_ref().map_or(0, |d| d.rows.len())
    }

    pub fn is_empty(&self) -> bool {
        self.row_size() == 0
    }

    pub fn timezone(&self) -> &TimezoneInfo {
        &self.timezone
    }

    /// 原始行，不做时区转换
    pub fn raw_row(&self, index: usize) -> Option<&[Value]> {
        self.resp
            .data
            .as_ref()
            .and_then(|d| d.rows.get(index))
            .map(|r| r.values.as_slice())
    }

    /// 按下标获取一行，时间值已转换为本地时间
    pub fn row_values_by_index(&self, index: usize) -> ClientResult<Vec<Value>> {
        let row = self.raw_row(index).ok_or_else(|| {
            ClientError::Decode(format!("行下标越界: {}，共 {} 行", index, self.row_size()))
        })?;
        Ok(row.iter().map(|v| self.localize(v)).collect())
    }

    /// 按列名获取整列，时间值已转换为本地时间
    pub fn values_by_col_name(&self, col_name: &str) -> ClientResult<Vec<Value>> {
        let index = *self
            .col_name_index
            .get(col_name)
            .ok_or_else(|| ClientError::Decode(format!("列不存在: {}", col_name)))?;
        let rows = self.resp.data.as_ref().map_or(&[][..], |d| d.rows.as_slice());
        rows.iter()
            .map(|row| {
                row.values
                    .get(index)
                    .map(|v| self.localize(v))
                    .ok_or_else(|| ClientError::Decode(format!("行缺少第 {} 列", index)))
            })
            .collect()
    }

    /// 取出底层响应
    pub fn into_response(self) -> ExecutionResponse {
        self.resp
    }

    fn localize(&self, value: &Value) -> Value {
        let offset = self.timezone.offset;
        match value {
            // 非法的时间值原样返回，交给调用方判断
            Value::DateTime(dt) => dt.to_local(offset).map_or_else(|| value.clone(), Value::DateTime),
            Value::Time(t) => t.to_local(offset).map_or_else(|| value.clone(), Value::Time),
            Value::List(values) => Value::List(values.iter().map(|v| self.localize(v)).collect()),
            Value::Map(kvs) => Value::Map(
                kvs.iter()
                    .map(|(k, v)| (k.clone(), self.localize(v)))
                    .collect(),
            ),
            _ => value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::result::response::{DataSet, Row};
    use crate::core::value::{DateTimeValue, DateValue, TimeValue};

    fn sample(timezone: TimezoneInfo) -> ResultSet {
        let dt = DateTimeValue::new(DateValue::new(2024, 3, 1), TimeValue::new(23, 0, 0, 0));
        let data = DataSet {
            column_names: vec![b"name".to_vec(), b"created".to_vec()],
            rows: vec![
                Row::new(vec![Value::string("alice"), Value::DateTime(dt)]),
                Row::new(vec![Value::string("bob"), Value::Time(TimeValue::new(1, 0, 0, 0))]),
            ],
        };
        ResultSet::new(ExecutionResponse::succeeded(data), timezone)
    }

    #[test]
    fn test_basic_accessors() {
        let rs = sample(TimezoneInfo::default());
        assert!(rs.is_succeed());
        assert_eq!(rs.col_names(), &["name".to_string(), "created".to_string()]);
        assert_eq!(rs.col_size(), 2);
        assert_eq!(rs.row_size(), 2);
        assert!(!rs.is_empty());
        assert!(rs.plan_desc().is_none());
    }

    #[test]
    fn test_timezone_applied_on_read() {
        let rs = sample(TimezoneInfo::new(8 * 3600, "Asia/Shanghai"));
        let row = rs.row_values_by_index(0).expect("row exists");
        let Value::DateTime(local) = &row[1] else {
            panic!("expected datetime");
        };
        assert_eq!(local.date(), DateValue::new(2024, 3, 2));
        assert_eq!(local.hour, 7);

        // 原始行保持 UTC
        let raw = rs.raw_row(0).expect("row exists");
        assert!(matches!(&raw[1], Value::DateTime(dt) if dt.hour == 23));

        let created = rs.values_by_col_name("created").expect("column exists");
        assert_eq!(created[1], Value::Time(TimeValue::new(9, 0, 0, 0)));
    }

    #[test]
    fn test_missing_row_and_column() {
        let rs = sample(TimezoneInfo::default());
        assert!(matches!(rs.row_values_by_index(5), Err(ClientError::Decode(_))));
        assert!(matches!(rs.values_by_col_name("age"), Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_failed_response() {
        let resp = ExecutionResponse::failed(ErrorCode::SyntaxError, "syntax error near `RETRUN`");
        let rs = ResultSet::new(resp, TimezoneInfo::default());
        assert!(!rs.is_succeed());
        assert_eq!(rs.error_code(), -1004);
        assert_eq!(rs.error_msg(), "syntax error near `RETRUN`");
        assert!(rs.is_empty());
        assert_eq!(rs.col_size(), 0);
    }

    #[test]
    fn test_non_utf8_column_name() {
        let data = DataSet {
            column_names: vec![vec![0xff, 0x61], b"id".to_vec()],
            rows: vec![Row::new(vec![Value::Int(1), Value::Int(2)])],
        };
        let rs = ResultSet::new(ExecutionResponse::succeeded(data), TimezoneInfo::default());
        assert!(rs.is_succeed());
        assert_eq!(rs.col_names(), &["\u{FFFD}a".to_string(), "id".to_string()]);
        assert_eq!(rs.values_by_col_name("\u{FFFD}a").expect("column exists"), vec![Value::Int(1)]);
        assert_eq!(rs.values_by_col_name("id").expect("column exists"), vec![Value::Int(2)]);
    }
}

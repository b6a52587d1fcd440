//! 位置数组的结构描述与校验

use super::error::DecodeError;
use rmpv::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SlotKind {
    /// 有符号整数
    Integer,
    /// 非负整数
    Count,
    Text,
    Flag,
    /// 字符串数组
    TextList,
    /// 嵌套数组
    Record,
    /// 嵌套数组的数组
    RecordList,
}

impl SlotKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            SlotKind::Integer => value.as_i64().is_some(),
            SlotKind::Count => value.as_u64().is_some(),
            SlotKind::Text => value.as_str().is_some(),
            SlotKind::Flag => value.as_bool().is_some(),
            SlotKind::TextList => value
                .as_array()
                .is_some_and(|items| items.iter().all(|v| v.as_str().is_some())),
            SlotKind::Record => value.is_array(),
            SlotKind::RecordList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_array)),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            SlotKind::Integer => "integer",
            SlotKind::Count => "non-negative integer",
            SlotKind::Text => "string",
            SlotKind::Flag => "boolean",
            SlotKind::TextList => "array of strings",
            SlotKind::Record => "array",
            SlotKind::RecordList => "array of arrays",
        }
    }
}

#[derive(Debug)]
pub(super) struct Slot {
    pub name: &'static str,
    pub kind: SlotKind,
    pub required: bool,
}

const fn required(name: &'static str, kind: SlotKind) -> Slot {
    Slot { name, kind, required: true }
}

const fn optional(name: &'static str, kind: SlotKind) -> Slot {
    Slot { name, kind, required: false }
}

#[derive(Debug)]
pub(super) struct Schema {
    pub entity: &'static str,
    pub slots: &'static [Slot],
}

impl Schema {
    /// 最后一个必需字段之后的槽位都可以省略
    pub fn min_len(&self) -> usize {
        self.slots
            .iter()
            .rposition(|slot| slot.required)
            .map_or(0, |index| index + 1)
    }

    pub fn max_len(&self) -> usize {
        self.slots.len()
    }
}

pub(super) static EXIT: Schema = Schema {
    entity: "Exit",
    slots: &[
        required("exit_code", SlotKind::Integer),
        required("real_command", SlotKind::Text),
        required("out", SlotKind::Text),
        optional("packages_response", SlotKind::Record),
        optional("error_message", SlotKind::Text),
    ],
};

pub(super) static PACKAGES_RESPONSE: Schema = Schema {
    entity: "PackagesResponse",
    slots: &[
        required("subcommand", SlotKind::Text),
        required("messages", SlotKind::TextList),
        required("packages", SlotKind::RecordList),
        optional("packages_size", SlotKind::Text),
        optional("packages_length", SlotKind::Count),
        required("uninstalled_packages", SlotKind::RecordList),
        optional("uninstalled_packages_size", SlotKind::Text),
        optional("uninstalled_packages_length", SlotKind::Count),
    ],
};

pub(super) static PACKAGE: Schema = Schema {
    entity: "Package",
    slots: &[
        required("name", SlotKind::Text),
        required("arch", SlotKind::Text),
        optional("version", SlotKind::Text),
        optional("old_version", SlotKind::Text),
        optional("repository", SlotKind::Text),
        optional("size", SlotKind::Text),
        optional("download", SlotKind::Text),
        optional("description", SlotKind::Text),
        optional("url", SlotKind::Text),
        optional("license", SlotKind::Text),
        optional("installed", SlotKind::Flag),
    ],
};

/// MessagePack 值的类型名，用于错误信息
pub(super) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Nil => "nil",
        Value::Boolean(_) => "boolean",
        Value::Integer(_) => "integer",
        Value::F32(_) | Value::F64(_) => "float",
        Value::String(s) if !s.is_str() => "invalid UTF-8 string",
        Value::String(_) => "string",
        Value::Binary(_) => "binary",
        Value::Array(_) => "array",
        Value::Map(_) => "map",
        Value::Ext(..) => "ext",
    }
}

/// 已通过 schema 校验的位置数组
///
/// `open` 成功后每个槽位的类型都已确认，取值方法仍返回 `Result`，
/// 以便 schema 与取值方法不一致时报错而不是 panic。
pub(super) struct Record<'a> {
    schema: &'static Schema,
    values: &'a [Value],
    path: String,
}

impl<'a> Record<'a> {
    pub fn open(
        value: &'a Value,
        schema: &'static Schema,
        path: String,
    ) -> Result<Self, DecodeError> {
        let Some(values) = value.as_array() else {
            return Err(DecodeError::malformed(
                path,
                format!("{} must be an array, got {}", schema.entity, value_kind(value)),
            ));
        };

        let (min, max) = (schema.min_len(), schema.max_len());
        if values.len() < min || values.len() > max {
            return Err(DecodeError::malformed(
                path,
                format!(
                    "{} expects {}..={} elements, got {}",
                    schema.entity,
                    min,
                    max,
                    values.len()
                ),
            ));
        }

        for (index, slot) in schema.slots.iter().enumerate() {
            match values.get(index) {
                None | Some(Value::Nil) => {
                    if slot.required {
                        return Err(DecodeError::malformed(
                            format!("{path}[{index}]"),
                            format!("missing required field `{}`", slot.name),
                        ));
                    }
                }
                Some(value) if !slot.kind.accepts(value) => {
                    return Err(DecodeError::malformed(
                        format!("{path}[{index}]"),
                        format!(
                            "field `{}` expects {}, got {}",
                            slot.name,
                            slot.kind.describe(),
                            value_kind(value)
                        ),
                    ));
                }
                Some(_) => {}
            }
        }

        Ok(Self {
            schema,
            values: values.as_slice(),
            path,
        })
    }

    pub fn slot_path(&self, index: usize) -> String {
        format!("{}[{}]", self.path, index)
    }

    /// 缺失与 nil 同样视为未设置
    fn slot(&self, index: usize) -> Option<&'a Value> {
        self.values.get(index).filter(|value| !value.is_nil())
    }

    fn missing(&self, index: usize) -> DecodeError {
        let name = self.schema.slots.get(index).map_or("?", |slot| slot.name);
        DecodeError::malformed(self.slot_path(index), format!("missing required field `{name}`"))
    }

    fn mismatch(&self, index: usize, value: &Value) -> DecodeError {
        let (name, expected) = self
            .schema
            .slots
            .get(index)
            .map_or(("?", "?"), |slot| (slot.name, slot.kind.describe()));
        DecodeError::malformed(
            self.slot_path(index),
            format!("field `{name}` expects {expected}, got {}", value_kind(value)),
        )
    }

    pub fn integer(&self, index: usize) -> Result<i64, DecodeError> {
        let value = self.slot(index).ok_or_else(|| self.missing(index))?;
        value.as_i64().ok_or_else(|| self.mismatch(index, value))
    }

    pub fn text(&self, index: usize) -> Result<String, DecodeError> {
        self.opt_text(index)?.ok_or_else(|| self.missing(index))
    }

    pub fn opt_text(&self, index: usize) -> Result<Option<String>, DecodeError> {
        match self.slot(index) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(|text| Some(text.to_string()))
                .ok_or_else(|| self.mismatch(index, value)),
        }
    }

    pub fn opt_count(&self, index: usize) -> Result<Option<u64>, DecodeError> {
        match self.slot(index) {
            None => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| self.mismatch(index, value)),
        }
    }

    pub fn opt_flag(&self, index: usize) -> Result<Option<bool>, DecodeError> {
        match self.slot(index) {
            None => Ok(None),
            Some(value) => value.as_bool().map(Some).ok_or_else(|| self.mismatch(index, value)),
        }
    }

    pub fn text_list(&self, index: usize) -> Result<Vec<String>, DecodeError> {
        let value = self.slot(index).ok_or_else(|| self.missing(index))?;
        let items = value.as_array().ok_or_else(|| self.mismatch(index, value))?;
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.mismatch(index, item))
            })
            .collect()
    }

    pub fn opt_record(&self, index: usize) -> Option<&'a Value> {
        self.slot(index)
    }

    /// 按原顺序解码嵌套数组的每个元素
    pub fn records<T>(
        &self,
        index: usize,
        decode: impl Fn(&'a Value, String) -> Result<T, DecodeError>,
    ) -> Result<Vec<T>, DecodeError> {
        let value = self.slot(index).ok_or_else(|| self.missing(index))?;
        let items = value.as_array().ok_or_else(|| self.mismatch(index, value))?;
        let base = self.slot_path(index);
        items
            .iter()
            .enumerate()
            .map(|(position, item)| decode(item, format!("{base}[{position}]")))
            .collect()
    }
}

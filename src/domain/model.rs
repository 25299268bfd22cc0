use crate::utils::error::{Result, YamodoolError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// 欄位的額外設定，原樣轉交給欄位建構器（保留文件順序）
pub type FieldOptions = serde_yaml::Mapping;

/// 模型類別本身佔用的屬性名稱，欄位與計算方法不可使用
pub const RESERVED_ATTRIBUTES: [&str; 6] = [
    "_name",
    "_order",
    "_description",
    "_inherit",
    "_sql_constraints",
    "__module__",
];

/// Field kinds known to the host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Boolean,
    Integer,
    Float,
    Monetary,
    Char,
    Text,
    Html,
    Selection,
    Date,
    Datetime,
    Binary,
    Image,
    Many2one,
    One2many,
    Many2many,
    Reference,
    Many2oneReference,
    Json,
}

impl FieldKind {
    pub const ALL: [FieldKind; 18] = [
        FieldKind::Boolean,
        FieldKind::Integer,
        FieldKind::Float,
        FieldKind::Monetary,
        FieldKind::Char,
        FieldKind::Text,
        FieldKind::Html,
        FieldKind::Selection,
        FieldKind::Date,
        FieldKind::Datetime,
        FieldKind::Binary,
        FieldKind::Image,
        FieldKind::Many2one,
        FieldKind::One2many,
        FieldKind::Many2many,
        FieldKind::Reference,
        FieldKind::Many2oneReference,
        FieldKind::Json,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Boolean => "Boolean",
            FieldKind::Integer => "Integer",
            FieldKind::Float => "Float",
            FieldKind::Monetary => "Monetary",
            FieldKind::Char => "Char",
            FieldKind::Text => "Text",
            FieldKind::Html => "Html",
            FieldKind::Selection => "Selection",
            FieldKind::Date => "Date",
            FieldKind::Datetime => "Datetime",
            FieldKind::Binary => "Binary",
            FieldKind::Image => "Image",
            FieldKind::Many2one => "Many2one",
            FieldKind::One2many => "One2many",
            FieldKind::Many2many => "Many2many",
            FieldKind::Reference => "Reference",
            FieldKind::Many2oneReference => "Many2oneReference",
            FieldKind::Json => "Json",
        }
    }
}

impl FromStr for FieldKind {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        FieldKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base class of a generated model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModelKind {
    #[default]
    Model,
    TransientModel,
    AbstractModel,
}

impl ModelKind {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "model" => Ok(ModelKind::Model),
            "transient" => Ok(ModelKind::TransientModel),
            "abstract" => Ok(ModelKind::AbstractModel),
            other => Err(YamodoolError::UnsupportedModelKind {
                kind: other.to_string(),
            }),
        }
    }
}

/// `_inherit` accepts a single model name or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Inherit {
    Single(String),
    Multiple(Vec<String>),
}

impl fmt::Display for Inherit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inherit::Single(name) => f.write_str(name),
            Inherit::Multiple(names) => write!(f, "[{}]", names.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    /// 計算方法名稱（Counter 欄位會自動設定）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute: Option<String>,
    pub options: FieldOptions,
}

/// Generated `_compute_*` method of a Counter field.
///
/// Declared as depending on `count_field`; when applied it stores the size of
/// each record's `count_field` collection into `field`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputeMethod {
    pub name: String,
    pub field: String,
    pub count_field: String,
}

impl ComputeMethod {
    pub fn depends(&self) -> Vec<&str> {
        vec![self.count_field.as_str()]
    }

    pub fn apply(&self, records: &mut [Record]) -> Result<()> {
        for record in records.iter_mut() {
            let count = match record.data.get(&self.count_field) {
                Some(serde_json::Value::Array(items)) => items.len(),
                Some(serde_json::Value::Null) => 0,
                Some(other) => {
                    return Err(YamodoolError::Compute {
                        method: self.name.clone(),
                        message: format!(
                            "field '{}' is not a collection: {}",
                            self.count_field, other
                        ),
                    })
                }
                None => {
                    return Err(YamodoolError::Compute {
                        method: self.name.clone(),
                        message: format!("record has no field '{}'", self.count_field),
                    })
                }
            };
            record.set(&self.field, serde_json::Value::from(count));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConstraintKind {
    Unique { fields: Vec<String> },
    Check { expression: String },
}

/// One `_sql_constraints` entry: `(name, sql, message)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlConstraint {
    pub name: String,
    pub kind: ConstraintKind,
    pub message: String,
}

impl SqlConstraint {
    pub fn sql(&self) -> String {
        match &self.kind {
            ConstraintKind::Unique { fields } => format!("UNIQUE ({})", fields.join(", ")),
            ConstraintKind::Check { expression } => format!("CHECK ({})", expression),
        }
    }

    pub fn as_tuple(&self) -> (String, String, String) {
        (self.name.clone(), self.sql(), self.message.clone())
    }
}

/// The attributes a generated model class is built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelAttributes {
    #[serde(rename = "_name")]
    pub name: Option<String>,
    #[serde(rename = "_order", skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(rename = "_description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "_inherit", skip_serializing_if = "Option::is_none")]
    pub inherit: Option<Inherit>,
    #[serde(rename = "__module__", skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    pub fields: Vec<FieldDescriptor>,
    pub compute_methods: Vec<ComputeMethod>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sql_constraints: Vec<SqlConstraint>,
}

impl ModelAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    fn contains_attribute(&self, name: &str) -> bool {
        RESERVED_ATTRIBUTES.contains(&name)
            || self.fields.iter().any(|f| f.name == name)
            || self.compute_methods.iter().any(|m| m.name == name)
    }

    fn ensure_free(&self, name: &str) -> Result<()> {
        if self.contains_attribute(name) {
            return Err(YamodoolError::DuplicateAttribute {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    pub fn add_field(&mut self, field: FieldDescriptor) -> Result<()> {
        self.ensure_free(&field.name)?;
        self.fields.push(field);
        Ok(())
    }

    pub fn add_compute_method(&mut self, method: ComputeMethod) -> Result<()> {
        self.ensure_free(&method.name)?;
        self.compute_methods.push(method);
        Ok(())
    }

    pub fn add_constraint(&mut self, constraint: SqlConstraint) {
        self.sql_constraints.push(constraint);
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn compute_method(&self, name: &str) -> Option<&ComputeMethod> {
        self.compute_methods.iter().find(|m| m.name == name)
    }

    /// 與 ORM 的 `_sql_constraints` 相同格式
    pub fn sql_constraint_tuples(&self) -> Vec<(String, String, String)> {
        self.sql_constraints.iter().map(SqlConstraint::as_tuple).collect()
    }
}

/// A model class ready for registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelClass {
    pub kind: ModelKind,
    pub attributes: ModelAttributes,
}

impl ModelClass {
    pub fn name(&self) -> Option<&str> {
        self.attributes.name.as_deref()
    }

    pub fn inherit(&self) -> Option<&Inherit> {
        self.attributes.inherit.as_ref()
    }

    pub fn module(&self) -> Option<&str> {
        self.attributes.module.as_deref()
    }
}

/// A single record as seen by compute methods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: serde_json::Value) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.data.get(field)
    }

    pub fn set(&mut self, field: &str, value: serde_json::Value) {
        self.data.insert(field.to_string(), value);
    }
}

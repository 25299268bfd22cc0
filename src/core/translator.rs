use crate::core::document::{value_type_name, YamlDocument};
use crate::domain::model::{
    ComputeMethod, ConstraintKind, FieldDescriptor, FieldKind, FieldOptions, Inherit,
    ModelAttributes, SqlConstraint,
};
use crate::utils::error::{Result, YamodoolError};
use serde_yaml::{Mapping, Value};
use std::path::Path;

const COUNTER: &str = "Counter";

/// Keys consumed by field translation and never forwarded as options.
const FIELD_KEYS: [&str; 4] = ["type", "special", "count_field", "compute_fn_name"];

/// Boolean field options where YAML 1.1 words like `yes` or `off` are accepted.
const BOOLEAN_OPTIONS: [&str; 12] = [
    "required",
    "readonly",
    "index",
    "store",
    "copy",
    "translate",
    "tracking",
    "company_dependent",
    "sanitize",
    "prefetch",
    "change_default",
    "auto_join",
];

/// Result of translating one entry of `fields`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTranslation {
    pub field: FieldDescriptor,
    pub compute_method: Option<ComputeMethod>,
}

/// Turns one [`YamlDocument`] into [`ModelAttributes`].
///
/// Every call to [`ModelTranslator::translate`] starts from an empty
/// accumulator, so translating the same document twice yields equal results.
pub struct ModelTranslator<'a> {
    document: &'a YamlDocument,
}

impl<'a> ModelTranslator<'a> {
    pub fn new(document: &'a YamlDocument) -> Self {
        Self { document }
    }

    pub fn translate(&self) -> Result<ModelAttributes> {
        let path = self.document.path();
        tracing::info!("Parsing yamodool data: {}", path.display());

        let mut attrs = ModelAttributes::new();
        attrs.name = self.optional_string("name")?.filter(|name| !name.is_empty());
        if attrs.name.is_none() {
            attrs.name = Some(default_model_name(path)?);
        }
        attrs.order = self.optional_string("order")?;
        attrs.description = self.optional_string("description")?;
        attrs.inherit = self.optional_inherit()?;

        self.add_fields(&mut attrs)?;
        self.add_constraints(&mut attrs)?;

        tracing::info!("yamodool data parsed: {}", path.display());
        Ok(attrs)
    }

    fn optional_string(&self, key: &str) -> Result<Option<String>> {
        match self.document.get(key)? {
            None => Ok(None),
            Some(value) => string_value("model", key, value).map(Some),
        }
    }

    fn optional_inherit(&self) -> Result<Option<Inherit>> {
        let Some(value) = self.document.get("inherit")? else {
            return Ok(None);
        };

        serde_yaml::from_value(value.clone())
            .map(Some)
            .map_err(|_| {
                YamodoolError::invalid(
                    "model",
                    "inherit",
                    format!(
                        "expected a model name or a list of model names, found {}",
                        value_type_name(value)
                    ),
                )
            })
    }

    fn add_fields(&self, attrs: &mut ModelAttributes) -> Result<()> {
        let Some(fields) = self.section("fields")? else {
            return Ok(());
        };

        for (key, value) in fields {
            let name = key_name("fields", key)?;
            let field_attrs = value.as_mapping().ok_or_else(|| {
                YamodoolError::invalid(
                    name,
                    "attributes",
                    format!("expected a mapping, found {}", value_type_name(value)),
                )
            })?;

            let translated = translate_field(name, field_attrs)?;
            tracing::debug!(
                "Field {} -> {}{}",
                name,
                translated.field.kind,
                if translated.compute_method.is_some() { " (counter)" } else { "" }
            );

            attrs.add_field(translated.field)?;
            if let Some(method) = translated.compute_method {
                attrs.add_compute_method(method)?;
            }
        }

        Ok(())
    }

    fn add_constraints(&self, attrs: &mut ModelAttributes) -> Result<()> {
        let Some(constraints) = self.section("constraints")? else {
            return Ok(());
        };

        for (key, value) in constraints {
            let name = key_name("constraints", key)?;
            let constraint_attrs = value.as_mapping().ok_or_else(|| {
                YamodoolError::invalid(
                    name,
                    "attributes",
                    format!("expected a mapping, found {}", value_type_name(value)),
                )
            })?;

            let constraint = translate_constraint(name, constraint_attrs)?;
            tracing::debug!("Constraint {} -> {}", name, constraint.sql());
            attrs.add_constraint(constraint);
        }

        Ok(())
    }

    fn section(&self, key: &str) -> Result<Option<&'a Mapping>> {
        match self.document.get(key)? {
            None => Ok(None),
            Some(Value::Mapping(mapping)) => Ok(Some(mapping)),
            Some(other) => Err(YamodoolError::invalid(
                "model",
                key,
                format!("expected a mapping, found {}", value_type_name(other)),
            )),
        }
    }
}

/// `sale_order_tag.yml` -> `sale.order.tag`
pub fn default_model_name(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| YamodoolError::InvalidPath {
            path: path.to_path_buf(),
        })?;

    Ok(stem.to_lowercase().replace('_', "."))
}

pub fn translate_field(name: &str, attrs: &Mapping) -> Result<FieldTranslation> {
    // special 優先於 type
    if let Some(special) = optional_attr(name, attrs, "special")? {
        if special != COUNTER {
            return Err(YamodoolError::UnknownSpecial {
                field: name.to_string(),
                special,
            });
        }
        return translate_counter(name, attrs);
    }

    let type_name =
        optional_attr(name, attrs, "type")?.ok_or_else(|| YamodoolError::missing(name, "type"))?;
    let kind = type_name
        .parse::<FieldKind>()
        .map_err(|_| YamodoolError::UnknownFieldKind {
            field: name.to_string(),
            kind: type_name.clone(),
        })?;

    Ok(FieldTranslation {
        field: FieldDescriptor {
            name: name.to_string(),
            kind,
            compute: None,
            options: field_options(attrs),
        },
        compute_method: None,
    })
}

fn translate_counter(name: &str, attrs: &Mapping) -> Result<FieldTranslation> {
    let count_field = optional_attr(name, attrs, "count_field")?
        .ok_or_else(|| YamodoolError::missing(name, "count_field"))?;
    let compute_fn_name = optional_attr(name, attrs, "compute_fn_name")?
        .unwrap_or_else(|| format!("_compute_{}", name));

    if attrs.contains_key("compute") {
        return Err(YamodoolError::invalid(
            name,
            "compute",
            "Counter fields generate their own compute method",
        ));
    }
    if let Some(type_name) = attrs.get("type").and_then(Value::as_str) {
        if type_name != FieldKind::Integer.as_str() {
            tracing::warn!(
                "Field {} is a Counter, ignoring declared type {}",
                name,
                type_name
            );
        }
    }

    Ok(FieldTranslation {
        field: FieldDescriptor {
            name: name.to_string(),
            kind: FieldKind::Integer,
            compute: Some(compute_fn_name.clone()),
            options: field_options(attrs),
        },
        compute_method: Some(ComputeMethod {
            name: compute_fn_name,
            field: name.to_string(),
            count_field,
        }),
    })
}

pub fn translate_constraint(name: &str, attrs: &Mapping) -> Result<SqlConstraint> {
    let kind_name =
        optional_attr(name, attrs, "type")?.ok_or_else(|| YamodoolError::missing(name, "type"))?;

    let kind = match kind_name.as_str() {
        "unique" => {
            let value = attrs
                .get("fields")
                .filter(|value| !value.is_null())
                .ok_or_else(|| YamodoolError::missing(name, "fields"))?;
            let fields: Vec<String> = serde_yaml::from_value(value.clone()).map_err(|_| {
                YamodoolError::invalid(name, "fields", "expected a list of field names")
            })?;
            if fields.is_empty() {
                return Err(YamodoolError::invalid(
                    name,
                    "fields",
                    "at least one field is required",
                ));
            }
            ConstraintKind::Unique { fields }
        }
        "check" => {
            let expression = optional_attr(name, attrs, "check")?
                .ok_or_else(|| YamodoolError::missing(name, "check"))?;
            ConstraintKind::Check { expression }
        }
        _ => {
            return Err(YamodoolError::UnsupportedConstraintType {
                constraint: name.to_string(),
                kind: kind_name,
            })
        }
    };

    let message = optional_attr(name, attrs, "message")?
        .ok_or_else(|| YamodoolError::missing(name, "message"))?;

    Ok(SqlConstraint {
        name: name.to_string(),
        kind,
        message,
    })
}

/// 建立新的設定表，排除已消耗的鍵，保留原始順序
fn field_options(attrs: &Mapping) -> FieldOptions {
    attrs
        .iter()
        .filter(|(key, _)| {
            key.as_str()
                .map(|key| !FIELD_KEYS.contains(&key))
                .unwrap_or(true)
        })
        .map(|(key, value)| {
            let value = match key.as_str() {
                Some(name) if BOOLEAN_OPTIONS.contains(&name) => yaml11_bool(value),
                _ => value.clone(),
            };
            (key.clone(), value)
        })
        .collect()
}

/// YAML 1.2 解析器把 yes/no/on/off 視為字串，這裡轉回布林值
fn yaml11_bool(value: &Value) -> Value {
    match value.as_str() {
        Some("yes" | "Yes" | "YES" | "on" | "On" | "ON") => Value::Bool(true),
        Some("no" | "No" | "NO" | "off" | "Off" | "OFF") => Value::Bool(false),
        _ => value.clone(),
    }
}

fn optional_attr(owner: &str, attrs: &Mapping, key: &str) -> Result<Option<String>> {
    match attrs.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => string_value(owner, key, value).map(Some),
    }
}

fn string_value(owner: &str, key: &str, value: &Value) -> Result<String> {
    value.as_str().map(str::to_string).ok_or_else(|| {
        YamodoolError::invalid(
            owner,
            key,
            format!("expected a string, found {}", value_type_name(value)),
        )
    })
}

fn key_name<'v>(section: &str, key: &'v Value) -> Result<&'v str> {
    key.as_str().ok_or_else(|| {
        YamodoolError::invalid(
            section,
            "key",
            format!("names must be strings, found {}", value_type_name(key)),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn translate(path: &str, yaml: &str) -> Result<ModelAttributes> {
        let document = YamlDocument::from_yaml_str(path, yaml)?;
        ModelTranslator::new(&document).translate()
    }

    #[test]
    fn test_default_model_name() {
        assert_eq!(
            default_model_name(Path::new("addon/yamodools/sale_order_tag.yml")).unwrap(),
            "sale.order.tag"
        );
        assert_eq!(default_model_name(Path::new("Res_Partner.yml")).unwrap(), "res.partner");
        assert_eq!(default_model_name(Path::new("x.backup.yml")).unwrap(), "x.backup");
        assert!(default_model_name(Path::new("")).is_err());
    }

    #[test]
    fn test_name_from_document_wins() {
        let attrs = translate("sale_order_tag.yml", "name: crm.tag\n").unwrap();
        assert_eq!(attrs.name.as_deref(), Some("crm.tag"));
    }

    #[test]
    fn test_empty_or_null_name_falls_back_to_file_name() {
        let attrs = translate("sale_order_tag.yml", "name: ''\n").unwrap();
        assert_eq!(attrs.name.as_deref(), Some("sale.order.tag"));

        let attrs = translate("sale_order_tag.yml", "name: ~\n").unwrap();
        assert_eq!(attrs.name.as_deref(), Some("sale.order.tag"));
    }

    #[test]
    fn test_optional_scalars() {
        let attrs = translate(
            "tag.yml",
            "order: sequence, id\ndescription: Sale Order Tag\ninherit: [mail.thread, mail.activity.mixin]\n",
        )
        .unwrap();

        assert_eq!(attrs.order.as_deref(), Some("sequence, id"));
        assert_eq!(attrs.description.as_deref(), Some("Sale Order Tag"));
        assert_eq!(
            attrs.inherit,
            Some(Inherit::Multiple(vec![
                "mail.thread".to_string(),
                "mail.activity.mixin".to_string()
            ]))
        );

        let attrs = translate("tag.yml", "inherit: sale.order\n").unwrap();
        assert_eq!(attrs.inherit, Some(Inherit::Single("sale.order".to_string())));
        assert!(attrs.order.is_none());
        assert!(attrs.description.is_none());
    }

    #[test]
    fn test_non_string_scalar_is_rejected() {
        let err = translate("tag.yml", "description: [a, b]\n").unwrap_err();
        assert!(matches!(
            err,
            YamodoolError::InvalidAttribute { ref attribute, .. } if attribute == "description"
        ));

        assert!(translate("tag.yml", "inherit: {a: b}\n").is_err());
    }

    #[test]
    fn test_plain_field_keeps_options_in_order() {
        let attrs = mapping("type: Char\nstring: Code\nrequired: true\nsize: 16\n");
        let translated = translate_field("code", &attrs).unwrap();

        assert_eq!(translated.field.kind, FieldKind::Char);
        assert!(translated.field.compute.is_none());
        assert!(translated.compute_method.is_none());

        let keys: Vec<&str> = translated
            .field
            .options
            .keys()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(keys, vec!["string", "required", "size"]);
        // 輸入不被修改
        assert!(attrs.contains_key("type"));
    }

    #[test]
    fn test_yaml11_booleans_in_boolean_options() {
        let attrs = mapping(
            "type: Char\nrequired: yes\nreadonly: Off\nindex: ON\nstring: yes\nhelp: no\n",
        );
        let options = translate_field("code", &attrs).unwrap().field.options;

        assert_eq!(options.get("required"), Some(&Value::Bool(true)));
        assert_eq!(options.get("readonly"), Some(&Value::Bool(false)));
        assert_eq!(options.get("index"), Some(&Value::Bool(true)));
        // 非布林選項保持原樣
        assert_eq!(options.get("string").and_then(Value::as_str), Some("yes"));
        assert_eq!(options.get("help").and_then(Value::as_str), Some("no"));
    }

    #[test]
    fn test_unknown_field_kind() {
        let err = translate_field("code", &mapping("type: Strng\n")).unwrap_err();
        assert!(matches!(
            err,
            YamodoolError::UnknownFieldKind { ref kind, .. } if kind == "Strng"
        ));

        let err = translate_field("code", &mapping("string: Code\n")).unwrap_err();
        assert!(matches!(
            err,
            YamodoolError::MissingAttribute { ref attribute, .. } if attribute == "type"
        ));
    }

    #[test]
    fn test_counter_field() {
        let attrs = mapping("special: Counter\ncount_field: order_line_ids\nstring: Lines\n");
        let translated = translate_field("line_count", &attrs).unwrap();

        assert_eq!(translated.field.kind, FieldKind::Integer);
        assert_eq!(translated.field.compute.as_deref(), Some("_compute_line_count"));
        assert_eq!(translated.field.options.len(), 1);
        assert_eq!(
            translated.field.options.get("string").and_then(Value::as_str),
            Some("Lines")
        );

        let method = translated.compute_method.unwrap();
        assert_eq!(method.name, "_compute_line_count");
        assert_eq!(method.field, "line_count");
        assert_eq!(method.depends(), vec!["order_line_ids"]);
    }

    #[test]
    fn test_counter_custom_compute_name_and_priority_over_type() {
        let attrs = mapping(
            "special: Counter\ntype: Char\ncount_field: tag_ids\ncompute_fn_name: _count_tags\n",
        );
        let translated = translate_field("tag_count", &attrs).unwrap();

        assert_eq!(translated.field.kind, FieldKind::Integer);
        assert_eq!(translated.field.compute.as_deref(), Some("_count_tags"));
        assert!(translated.field.options.is_empty());
        assert_eq!(translated.compute_method.unwrap().name, "_count_tags");
    }

    #[test]
    fn test_counter_errors() {
        let err = translate_field("line_count", &mapping("special: Counter\n")).unwrap_err();
        assert!(matches!(
            err,
            YamodoolError::MissingAttribute { ref attribute, .. } if attribute == "count_field"
        ));

        let err = translate_field(
            "line_count",
            &mapping("special: Counter\ncount_field: line_ids\ncompute: _other\n"),
        )
        .unwrap_err();
        assert!(matches!(err, YamodoolError::InvalidAttribute { .. }));

        let err = translate_field("line_count", &mapping("special: Sum\n")).unwrap_err();
        assert!(matches!(
            err,
            YamodoolError::UnknownSpecial { ref special, .. } if special == "Sum"
        ));
    }

    #[test]
    fn test_constraints() {
        let unique = translate_constraint(
            "uniq_code",
            &mapping("type: unique\nfields: [code, company_id]\nmessage: Code must be unique\n"),
        )
        .unwrap();
        assert_eq!(unique.sql(), "UNIQUE (code, company_id)");
        assert_eq!(unique.message, "Code must be unique");

        let check = translate_constraint(
            "positive_qty",
            &mapping("type: check\ncheck: qty > 0\nmessage: Qty must be positive\n"),
        )
        .unwrap();
        assert_eq!(check.sql(), "CHECK (qty > 0)");
    }

    #[test]
    fn test_constraint_errors() {
        let err =
            translate_constraint("bad", &mapping("type: foo\nmessage: x\n")).unwrap_err();
        assert!(matches!(
            err,
            YamodoolError::UnsupportedConstraintType { ref kind, .. } if kind == "foo"
        ));
        assert!(err.to_string().contains("Unsupported constraint type foo"));

        assert!(translate_constraint("u", &mapping("type: unique\nmessage: x\n")).is_err());
        assert!(translate_constraint("u", &mapping("type: unique\nfields: []\nmessage: x\n")).is_err());
        assert!(translate_constraint("u", &mapping("type: unique\nfields: code\nmessage: x\n")).is_err());
        assert!(translate_constraint("c", &mapping("type: check\nmessage: x\n")).is_err());

        let err = translate_constraint("c", &mapping("type: check\ncheck: qty > 0\n")).unwrap_err();
        assert!(matches!(
            err,
            YamodoolError::MissingAttribute { ref attribute, .. } if attribute == "message"
        ));
    }

    #[test]
    fn test_constraints_follow_document_order() {
        let attrs = translate(
            "tag.yml",
            r#"
constraints:
  z_check:
    type: check
    check: "qty >= 0"
    message: z
  a_unique:
    type: unique
    fields: [code]
    message: a
"#,
        )
        .unwrap();

        let names: Vec<&str> = attrs.sql_constraints.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["z_check", "a_unique"]);
    }

    #[test]
    fn test_malformed_sections() {
        assert!(translate("tag.yml", "fields: [code]\n").is_err());
        assert!(translate("tag.yml", "fields:\n  code: Char\n").is_err());
        assert!(translate("tag.yml", "constraints: true\n").is_err());
        assert!(matches!(
            translate("tag.yml", "- just\n- a list\n"),
            Err(YamodoolError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_counter_compute_name_clash() {
        let err = translate(
            "order.yml",
            r#"
fields:
  _compute_line_count:
    type: Integer
  line_count:
    special: Counter
    count_field: line_ids
"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            YamodoolError::DuplicateAttribute { ref name } if name == "_compute_line_count"
        ));
    }
}

use serde_json::Value;

use crate::response::types::{Schema, ValidationError, Validator};
use crate::{ReqstackError, Result};

impl Schema for jsonschema::Validator {
    fn validate(&self, data: &Value) -> Option<ValidationError> {
        let details: Vec<String> = self
            .iter_errors(data)
            .map(|e| e.to_string())
            .collect();

        if details.is_empty() {
            None
        } else {
            Some(ValidationError::with_details(
                format!("Response does not match schema: {}", details.join("; ")),
                details,
            ))
        }
    }
}

impl Validator {
    /// 从 JSON Schema 构建校验器
    pub fn json_schema(schema: &Value) -> Result<Self> {
        let compiled = jsonschema::validator_for(schema)
            .map_err(|e| ReqstackError::Config(format!("Invalid JSON schema: {}", e)))?;
        Ok(Validator::schema(compiled))
    }

    /// 执行单个校验器
    pub fn check(&self, data: &Value, args: &[Value]) -> Option<ValidationError> {
        match self {
            Validator::Schema(schema) => schema.validate(data),
            Validator::Predicate(predicate) => predicate(data, args),
        }
    }
}

/// 依次执行校验器，遇到第一个失败即返回
pub fn validate_all(
    validators: &[Validator],
    data: &Value,
    args: &[Value],
) -> std::result::Result<(), ValidationError> {
    match validators.iter().find_map(|v| v.check(data, args)) {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

use crate::placeholder::types::{
    HeaderBinding, HeaderBindings, HeaderFragment, ParamBindings, Symbol, Template,
};
use crate::{ReqstackError, Result};
use serde_json::{Map, Value};
use tracing::warn;

/// 占位符解析器，把模板中的符号替换为字面量或调用参数
pub struct PlaceholderResolver;

impl PlaceholderResolver {
    /// 解析模板
    ///
    /// 纯函数：不修改绑定，也不修改参数。未被引用的占位符无需绑定。
    pub fn resolve(template: &Template, bindings: &ParamBindings, args: &[Value]) -> Result<Value> {
        match template {
            Template::Literal(value) => Ok(value.clone()),
            Template::Placeholder(symbol) => Self::resolve_symbol(symbol, bindings, args),
            Template::Object(fields) => {
                let mut resolved = Map::with_capacity(fields.len());
                for (key, field) in fields {
                    resolved.insert(key.clone(), Self::resolve(field, bindings, args)?);
                }
                Ok(Value::Object(resolved))
            }
            Template::Array(items) => items
                .iter()
                .map(|item| Self::resolve(item, bindings, args))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
        }
    }

    /// 解析一组模板（匿名请求的 send 参数）
    pub fn resolve_all(
        templates: &[Template],
        bindings: &ParamBindings,
        args: &[Value],
    ) -> Result<Vec<Value>> {
        templates
            .iter()
            .map(|t| Self::resolve(t, bindings, args))
            .collect()
    }

    fn resolve_symbol(symbol: &Symbol, bindings: &ParamBindings, args: &[Value]) -> Result<Value> {
        let binding = bindings
            .get(symbol)
            .ok_or_else(|| ReqstackError::UnboundPlaceholder(symbol.to_string()))?;

        if let Some(value) = &binding.value {
            return Ok(value.clone());
        }

        let index = binding
            .index
            .ok_or_else(|| ReqstackError::UnboundPlaceholder(symbol.to_string()))?;

        // 调用方少传的参数视为 null
        let argument = args.get(index).cloned().unwrap_or(Value::Null);

        Ok(match &binding.transform {
            Some(transform) => transform(&argument),
            None => argument,
        })
    }

    /// 解析请求头绑定为请求头片段
    pub fn resolve_headers(
        key: &str,
        bindings: &HeaderBindings,
        args: &[Value],
    ) -> HeaderFragment {
        match bindings.get(key) {
            None => HeaderFragment::new(),
            Some(HeaderBinding::Stashed(fragment)) => fragment.clone(),
            Some(HeaderBinding::Argument(index)) => match args.get(*index) {
                Some(Value::Object(fields)) => header_fragment_from(fields),
                Some(Value::Null) | None => HeaderFragment::new(),
                Some(other) => {
                    warn!(
                        "Header argument {} for key '{}' is not an object: {}",
                        index, key, other
                    );
                    HeaderFragment::new()
                }
            },
        }
    }
}

/// 把 JSON 对象转换为请求头片段，非字符串值按 JSON 文本写入
pub fn header_fragment_from(fields: &Map<String, Value>) -> HeaderFragment {
    fields
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let value = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::types::ParamBinding;
    use serde_json::json;
    use std::sync::Arc;

    fn bindings() -> ParamBindings {
        let mut bindings = ParamBindings::new();
        bindings.insert(Symbol::for_key("name"), ParamBinding::argument(0));
        bindings.insert(
            Symbol::for_key("upper"),
            ParamBinding::transformed(
                1,
                Arc::new(|v: &Value| json!(v.as_str().unwrap_or_default().to_uppercase())),
            ),
        );
        bindings.insert(Symbol::for_key("token"), ParamBinding::literal(json!("abc")));
        bindings
    }

    #[test]
    fn test_resolve_literal_unchanged() {
        let value =
            PlaceholderResolver::resolve(&Template::literal(json!([1, 2])), &bindings(), &[])
                .unwrap();
        assert_eq!(value, json!([1, 2]));
    }

    #[test]
    fn test_resolve_symbol_from_argument() {
        let args = vec![json!("Alice"), json!("bob")];
        let value =
            PlaceholderResolver::resolve(&Template::symbol("name"), &bindings(), &args).unwrap();
        assert_eq!(value, json!("Alice"));
    }

    #[test]
    fn test_resolve_symbol_with_transform() {
        let args = vec![json!("Alice"), json!("bob")];
        let value =
            PlaceholderResolver::resolve(&Template::symbol("upper"), &bindings(), &args).unwrap();
        assert_eq!(value, json!("BOB"));
    }

    #[test]
    fn test_resolve_literal_binding_ignores_arguments() {
        for args in [vec![], vec![json!("x")], vec![json!(1), json!(2), json!(3)]] {
            let value = PlaceholderResolver::resolve(&Template::symbol("token"), &bindings(), &args)
                .unwrap();
            assert_eq!(value, json!("abc"));
        }
    }

    #[test]
    fn test_resolve_unbound_symbol() {
        let result = PlaceholderResolver::resolve(&Template::symbol("missing"), &bindings(), &[]);
        assert!(matches!(
            result,
            Err(ReqstackError::UnboundPlaceholder(ref s)) if s == "Symbol(missing)"
        ));
    }

    #[test]
    fn test_resolve_binding_without_index_or_value() {
        let mut bindings = bindings();
        bindings.insert(Symbol::for_key("empty"), ParamBinding::default());
        let result = PlaceholderResolver::resolve(&Template::symbol("empty"), &bindings, &[]);
        assert!(matches!(result, Err(ReqstackError::UnboundPlaceholder(_))));
    }

    #[test]
    fn test_resolve_missing_argument_is_null() {
        let value =
            PlaceholderResolver::resolve(&Template::symbol("name"), &bindings(), &[]).unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn test_resolve_object_and_array() {
        let template = Template::object([
            ("name", Template::symbol("name")),
            ("limit", Template::literal(10)),
            (
                "list",
                Template::array([
                    Template::symbol("token"),
                    Template::literal("raw"),
                    Template::symbol("upper"),
                ]),
            ),
        ]);
        let args = vec![json!("Alice"), json!("bob")];

        let value = PlaceholderResolver::resolve(&template, &bindings(), &args).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Alice",
                "limit": 10,
                "list": ["abc", "raw", "BOB"]
            })
        );
    }

    #[test]
    fn test_resolve_headers() {
        let mut headers = HeaderBindings::new();
        headers.insert("auth".to_string(), HeaderBinding::Argument(0));
        headers.insert(
            "session".to_string(),
            HeaderBinding::Stashed(HeaderFragment::from([(
                "X-Session".to_string(),
                "s1".to_string(),
            )])),
        );
        let args = vec![json!({"Authorization": "Bearer t", "X-Retry": 2})];

        let auth = PlaceholderResolver::resolve_headers("auth", &headers, &args);
        assert_eq!(auth.get("Authorization"), Some(&"Bearer t".to_string()));
        assert_eq!(auth.get("X-Retry"), Some(&"2".to_string()));

        let session = PlaceholderResolver::resolve_headers("session", &headers, &args);
        assert_eq!(session.get("X-Session"), Some(&"s1".to_string()));

        assert!(PlaceholderResolver::resolve_headers("none", &headers, &args).is_empty());
    }
}

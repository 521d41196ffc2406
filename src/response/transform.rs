use serde_json::Value;
use tracing::warn;

use crate::response::types::Transformer;

/// 从左到右执行转换函数
///
/// 某个转换失败时记录警告并保留上一个值，后续转换继续执行。
pub fn transform_all(transformers: &[Transformer], data: Value, args: &[Value]) -> Value {
    transformers
        .iter()
        .enumerate()
        .fold(data, |current, (index, transformer)| {
            match transformer(&current, args) {
                Ok(next) => next,
                Err(e) => {
                    warn!(
                        "Transformer #{} failed, keeping previous value. Try adding a validator: {:#}",
                        index, e
                    );
                    current
                }
            }
        })
}

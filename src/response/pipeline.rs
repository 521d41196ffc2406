use serde_json::Value;
use std::future::Future;
use tracing::debug;

use crate::Result;
use crate::response::transform::transform_all;
use crate::response::types::ResponseConfig;
use crate::response::validate::validate_all;

/// 响应流水线
///
/// 阶段顺序固定：原始响应、before_validate、校验、after_validate、
/// before_transform、转换、after_transform。catcher 包住包括发送在内的所有阶段。
pub struct ResponsePipeline;

impl ResponsePipeline {
    /// 对一个待定响应执行完整流水线
    ///
    /// `injection` 指定的位置会在传给校验器和转换函数的调用参数中替换为原始响应。
    pub async fn run<F>(
        response: F,
        config: &ResponseConfig,
        args: &[Value],
        injection: Option<usize>,
    ) -> Result<Value>
    where
        F: Future<Output = Result<Value>>,
    {
        match Self::stages(response, config, args, injection).await {
            Err(e) => match &config.catcher {
                Some(catcher) => {
                    debug!("Response pipeline failed, handing over to catcher: {}", e);
                    Ok(catcher(e))
                }
                None => Err(e),
            },
            ok => ok,
        }
    }

    async fn stages<F>(
        response: F,
        config: &ResponseConfig,
        args: &[Value],
        injection: Option<usize>,
    ) -> Result<Value>
    where
        F: Future<Output = Result<Value>>,
    {
        let raw = response.await?;

        let injected;
        let args = match injection {
            Some(index) => {
                injected = Self::inject(args, index, &raw);
                injected.as_slice()
            }
            None => args,
        };

        config.before_validate.iter().for_each(|hook| hook(&raw));

        validate_all(&config.validators, &raw, args)?;

        config.after_validate.iter().for_each(|hook| hook(&raw));

        let working = config
            .before_transform
            .iter()
            .fold(raw, |value, preprocess| preprocess(value));

        let transformed = transform_all(&config.transformers, working, args);

        config.after_transform.iter().for_each(|hook| hook(&transformed));

        Ok(transformed)
    }

    /// 把原始响应放到调用参数的指定位置，参数不足时用 null 补齐
    fn inject(args: &[Value], index: usize, raw: &Value) -> Vec<Value> {
        let mut out = args.to_vec();
        if out.len() <= index {
            out.resize(index.saturating_add(1), Value::Null);
        }
        out[index] = raw.clone();
        out
    }
}

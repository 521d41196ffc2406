pub mod pipeline;
pub mod transform;
pub mod types;
/// 响应处理模块 - 校验、转换与钩子
pub mod validate;

pub use pipeline::ResponsePipeline;
pub use transform::transform_all;
pub use types::{
    Catcher, Inspect, Predicate, Preprocess, ResponseConfig, Schema, Transformer,
    ValidationError, Validator,
};
pub use validate::validate_all;

pub mod builder;
/// 请求模块 - 请求描述与发送操作的构建
pub mod types;

pub use builder::RequestBuilder;
pub use types::{
    AnonymousRequest, RequestDescriptor, RequestEntry, RequestKind, RequestList, SendFn,
    SendOperation,
};

pub mod resolver;
pub mod types;

pub use resolver::{PlaceholderResolver, header_fragment_from};
pub use types::{
    ArgTransform, HeaderBinding, HeaderBindings, HeaderFragment, ParamBinding, ParamBindings,
    Symbol, Template,
};

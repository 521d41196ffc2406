pub mod chain;
/// 合并模块 - 把同一成员上堆叠的多个请求结果合并为一个
pub mod reducer;

pub use chain::{MergeChain, MergeEntry};
pub use reducer::{ReduceFn, Reducer};

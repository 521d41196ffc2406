use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// 两参数合并函数：`(已合并结果, 下一个响应) -> 新的合并结果`
pub type ReduceFn = Arc<dyn Fn(Value, Value) -> Value + Send + Sync>;

/// 合并状态机
///
/// 每次 `feed` 提供一个参数并返回新的状态；`complete` 用最后一个响应完成合并。
/// `priming` 为真时，第一次 `feed` 只吸收原始成员的返回值，不参与合并。
#[derive(Clone)]
pub struct Reducer {
    func: ReduceFn,
    priming: bool,
    primed: bool,
    accumulator: Option<Value>,
}

impl Reducer {
    pub fn new(func: ReduceFn, priming: bool) -> Self {
        Self {
            func,
            priming,
            primed: false,
            accumulator: None,
        }
    }

    /// 提供下一个参数，返回后续状态
    pub fn feed(&self, value: Value) -> Self {
        let mut next = self.clone();

        if next.priming && !next.primed {
            next.primed = true;
            return next;
        }

        next.accumulator = Some(match next.accumulator.take() {
            Some(acc) => (self.func)(acc, value),
            None => value,
        });
        next
    }

    /// 用最后一个响应完成合并
    pub fn complete(&self, value: Value) -> Value {
        match &self.accumulator {
            Some(acc) => (self.func)(acc.clone(), value),
            None => value,
        }
    }

    /// 回到初始状态
    pub fn reset(&self) -> Self {
        Self::new(self.func.clone(), self.priming)
    }

    pub fn is_priming(&self) -> bool {
        self.priming
    }

    pub fn accumulator(&self) -> Option<&Value> {
        self.accumulator.as_ref()
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reducer")
            .field("priming", &self.priming)
            .field("primed", &self.primed)
            .field("accumulator", &self.accumulator)
            .finish()
    }
}

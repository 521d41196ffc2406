use once_cell::sync::Lazy;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::debug;

/// 元数据种类，区分同一 owner/member 下相互独立的子记录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    GlobalConfig,
    Config,
    Param,
    Header,
    Request,
    ResponseInjection,
    Mock,
    Merge,
    Info,
    Members,
}

type StoreKey = (StoreKind, TypeId, String, Option<String>);

static REGISTRY: Lazy<Mutex<HashMap<StoreKey, Arc<dyn Any + Send + Sync>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// 单个元数据记录的句柄
///
/// 同一 (种类, owner, member) 只对应一个句柄。句柄内保存 `Arc` 快照，
/// 更新时换入新快照，已经 `get()` 到的快照不会被修改。
pub struct MetadataHandle<T> {
    slot: RwLock<Arc<T>>,
}

impl<T: Clone + Send + Sync + 'static> MetadataHandle<T> {
    fn new(initial: T) -> Self {
        Self {
            slot: RwLock::new(Arc::new(initial)),
        }
    }

    /// 当前快照
    pub fn get(&self) -> Arc<T> {
        Arc::clone(&self.slot.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// 整体替换
    pub fn replace(&self, value: T) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(value);
    }

    /// 写时复制更新
    ///
    /// `recipe` 作用在当前值的副本上，结果作为新快照保存；
    /// 之前 `get()` 拿到的快照保持不变。
    pub fn set(&self, recipe: impl FnOnce(&mut T)) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        let mut draft = T::clone(&slot);
        recipe(&mut draft);
        *slot = Arc::new(draft);
    }

    /// 写时复制更新并返回 recipe 的结果
    pub fn update<R>(&self, recipe: impl FnOnce(&mut T) -> R) -> R {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        let mut draft = T::clone(&slot);
        let result = recipe(&mut draft);
        *slot = Arc::new(draft);
        result
    }
}

/// 获取（或首次创建）指定作用域的元数据句柄
///
/// 同一 `(kind, owner, member)` 的重复调用返回同一个句柄，`initial` 只在首次创建时生效。
pub fn create<T: Clone + Send + Sync + 'static>(
    kind: StoreKind,
    initial: T,
    owner: &str,
    member: Option<&str>,
) -> Arc<MetadataHandle<T>> {
    let key: StoreKey = (
        kind,
        TypeId::of::<T>(),
        owner.to_string(),
        member.map(str::to_string),
    );

    let mut registry = REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(existing) = registry.get(&key) {
        if let Ok(handle) = Arc::clone(existing).downcast::<MetadataHandle<T>>() {
            return handle;
        }
    }

    debug!(
        "Creating {:?} metadata for {}{}",
        kind,
        owner,
        member.map(|m| format!("::{}", m)).unwrap_or_default()
    );

    let handle = Arc::new(MetadataHandle::new(initial));
    let erased: Arc<dyn Any + Send + Sync> = handle.clone();
    registry.insert(key, erased);
    handle
}

/// 清空所有元数据（测试用）
///
/// 已经持有的句柄仍然可用，但之后的 `create` 会得到新的句柄。
pub fn clear() {
    REGISTRY
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
}

//! インスタンスごとの上限付きメモ化キャッシュ
//!
//! 辞書データは不変なので、エントリが無効化されることはなく、
//! 容量超過時に追い出されるだけです。

use std::hash::Hash;

use moka::sync::Cache;

use crate::errors::Result;

/// キャッシュ1つあたりのデフォルトの最大エントリ数
pub const DEFAULT_CACHE_CAPACITY: u64 = 1024;

/// スレッド間で共有できる上限付きキャッシュ
pub(crate) struct MemoCache<K, V> {
    inner: Cache<K, V>,
}

impl<K, V> MemoCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// キャッシュされた値を返すか、`init`で計算して格納します。
    ///
    /// `init`が失敗した場合は何も格納しません。
    #[inline]
    pub fn get_or_try_insert<F>(&self, key: K, init: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        if let Some(v) = self.inner.get(&key) {
            return Ok(v);
        }
        let v = init()?;
        self.inner.insert(key, v.clone());
        Ok(v)
    }
}

//! ダブル配列トライ
//!
//! 各ノードは`(base, check)`の組で表されます。ノードのbaseが`b`のとき、
//! バイト`c`による遷移先は`b + c + 1`で、遷移は`check[b + c + 1] == b`のときに限り有効です。
//! 終端は`check[b] == b && base[b] < 0`で表され、値は`-base[b] - 1`です。

use crate::cache::MemoCache;
use crate::errors::{MecabDicError, Result};
use crate::region::ByteRegion;

const NODE_LEN: usize = 8;

/// ダブル配列の1要素
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BaseCheck {
    /// 子ノードへのオフセット。負の値は終端で、`-base - 1`が値になります
    pub base: i32,
    /// 親ノードのbase
    pub check: u32,
}

impl BaseCheck {
    /// 親のbaseが`parent`であるノードの終端値を返します。
    #[inline(always)]
    fn terminal_value(self, parent: i64) -> Option<u32> {
        if i64::from(self.check) == parent && self.base < 0 {
            // -base - 1 lies in 0..=i32::MAX for any negative base.
            Some((-i64::from(self.base) - 1) as u32)
        } else {
            None
        }
    }
}

/// トライマッチング結果
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct TrieMatch {
    /// 終端に格納された値
    pub value: u32,
    /// 一致したキーのバイト長
    pub length: usize,
}

impl TrieMatch {
    /// 新しいマッチング結果を作成します。
    #[inline(always)]
    pub const fn new(value: u32, length: usize) -> Self {
        Self { value, length }
    }
}

/// 辞書ファイル内のダブル配列領域
pub(crate) struct Trie {
    offset: usize,
    num_nodes: usize,
    cache: MemoCache<usize, BaseCheck>,
}

impl Trie {
    pub fn new(offset: usize, size: usize, cache_capacity: u64) -> Self {
        Self {
            offset,
            num_nodes: size / NODE_LEN,
            cache: MemoCache::new(cache_capacity),
        }
    }

    #[inline(always)]
    pub const fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// `index`番目の`(base, check)`を読み出します。
    pub fn base_check(&self, region: &ByteRegion, index: usize) -> Result<BaseCheck> {
        if index >= self.num_nodes {
            return Err(MecabDicError::out_of_range(
                "double-array index",
                index as u64,
                self.num_nodes as u64,
            ));
        }
        self.cache.get_or_try_insert(index, || {
            let pos = self.offset + index * NODE_LEN;
            Ok(BaseCheck {
                base: region.i32_at(pos)?,
                check: region.u32_at(pos + 4)?,
            })
        })
    }

    /// 探索用のノード取得。配列外のスロットは未使用として扱います。
    #[inline]
    fn node(&self, region: &ByteRegion, index: i64) -> Option<BaseCheck> {
        let index = usize::try_from(index).ok()?;
        self.base_check(region, index).ok()
    }

    /// `key`に完全一致する値を返します。
    pub fn exact_match_search(&self, region: &ByteRegion, key: &[u8]) -> Option<u32> {
        let mut b = i64::from(self.node(region, 0)?.base);
        for &c in key {
            let n = self.node(region, b + i64::from(c) + 1)?;
            if i64::from(n.check) != b {
                return None;
            }
            b = i64::from(n.base);
        }
        self.node(region, b)?.terminal_value(b)
    }

    /// `key`の接頭辞に一致する値を、一致長の昇順で返します。
    ///
    /// 遷移に失敗した時点で探索を打ち切り、それまでの結果だけを返します。
    pub fn common_prefix_search(&self, region: &ByteRegion, key: &[u8]) -> Vec<TrieMatch> {
        let mut results = vec![];
        let Some(root) = self.node(region, 0) else {
            return results;
        };
        let mut b = i64::from(root.base);
        for (i, &c) in key.iter().enumerate() {
            if let Some(value) = self.node(region, b).and_then(|n| n.terminal_value(b)) {
                results.push(TrieMatch::new(value, i));
            }
            match self.node(region, b + i64::from(c) + 1) {
                Some(n) if i64::from(n.check) == b => b = i64::from(n.base),
                _ => return results,
            }
        }
        if let Some(value) = self.node(region, b).and_then(|n| n.terminal_value(b)) {
            results.push(TrieMatch::new(value, key.len()));
        }
        results
    }
}

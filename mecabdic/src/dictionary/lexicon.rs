//! 辞書の語彙情報を管理するモジュール
//!
//! `sys.dic`と`unk.dic`は同じレイアウトを持ちます:
//!
//! ```text
//! [ヘッダ 72バイト][ダブル配列 dsize][トークン表 tsize][素性文字列 fsize]
//! ```
//!
//! トライの値は、同じ表層形を持つトークンの連続区間を`index << 8 | count`として
//! 格納しています。

mod feature;
mod header;
mod param;
mod trie;

use std::path::Path;
use std::sync::Arc;

use crate::cache::MemoCache;
use crate::dictionary::LexType;
use crate::errors::{MecabDicError, Result};
use crate::region::ByteRegion;

pub use crate::dictionary::lexicon::feature::{head_fields, ExtraFeatures, POS_FIELDS};
pub use crate::dictionary::lexicon::header::{Header, DIC_MAGIC_ID, HEADER_LEN};
pub use crate::dictionary::lexicon::param::{WordEntry, WordParam, TOKEN_LEN};
pub use crate::dictionary::lexicon::trie::{BaseCheck, TrieMatch};

use crate::dictionary::lexicon::trie::Trie;

const COUNT_BITS: u32 = 8;
const COUNT_MASK: u32 = (1 << COUNT_BITS) - 1;

/// トライの値を`(開始トークン番号, トークン数)`に分解します。
#[inline(always)]
pub const fn unpack_value(value: u32) -> (u32, u32) {
    (value >> COUNT_BITS, value & COUNT_MASK)
}

/// 語彙辞書の検索結果
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct LexMatch {
    /// 左文脈ID
    pub left_id: u16,
    /// 右文脈ID
    pub right_id: u16,
    /// 品詞ID
    pub pos_id: u16,
    /// 単語コスト
    pub word_cost: i16,
    /// 一致した表層形のバイト長
    pub length: usize,
    /// トークン番号
    pub token_index: u32,
}

/// ダブル配列辞書ファイル（`sys.dic`または`unk.dic`）
pub struct Lexicon {
    region: ByteRegion,
    header: Header,
    trie: Trie,
    num_tokens: u32,
    entries_cache: MemoCache<(u32, u32), Arc<[WordEntry]>>,
    lex_type: LexType,
}

impl Lexicon {
    /// 辞書ファイルを読み込み、ヘッダを検証します。
    ///
    /// # エラー
    ///
    /// ファイルを開けない場合は構成エラー、ヘッダの検証に失敗した場合は
    /// フォーマットエラーを返します。
    pub fn from_path<P>(path: P, lex_type: LexType, cache_capacity: u64) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let region = ByteRegion::open(path.as_ref(), lex_type.file_name())?;
        let header = Header::parse(&region)?;
        log::debug!(
            "[mecabdic] {}: version={}, dictype={}, lexsize={}, lsize={}, rsize={}, dsize={}, tsize={}, fsize={}, charset={}",
            lex_type.file_name(),
            header.version,
            header.dictype,
            header.lexsize,
            header.lsize,
            header.rsize,
            header.dsize,
            header.tsize,
            header.fsize,
            header.charset,
        );
        if !header.is_utf8() {
            log::warn!(
                "[mecabdic] {} declares charset {:?}; feature strings are decoded as UTF-8",
                lex_type.file_name(),
                header.charset,
            );
        }

        let trie = Trie::new(header.da_offset(), header.dsize as usize, cache_capacity);
        let num_tokens = header.tsize / TOKEN_LEN as u32;

        Ok(Self {
            region,
            header,
            trie,
            num_tokens,
            entries_cache: MemoCache::new(cache_capacity),
            lex_type,
        })
    }

    /// ヘッダを返します。
    #[inline(always)]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    #[inline(always)]
    pub const fn lex_type(&self) -> LexType {
        self.lex_type
    }

    /// トークン表のレコード数
    #[inline(always)]
    pub const fn num_tokens(&self) -> u32 {
        self.num_tokens
    }

    /// ダブル配列の要素数
    #[inline(always)]
    pub const fn num_nodes(&self) -> usize {
        self.trie.num_nodes()
    }

    /// ダブル配列の`index`番目の要素を取得します。
    ///
    /// # エラー
    ///
    /// `index`がダブル配列の範囲外の場合は[`MecabDicError::OutOfRange`]を返します。
    #[inline]
    pub fn base_check(&self, index: usize) -> Result<BaseCheck> {
        self.trie.base_check(&self.region, index)
    }

    /// `key`に完全一致するエントリの値を返します。一致しない場合は`None`です。
    pub fn exact_match_search(&self, key: &[u8]) -> Option<u32> {
        self.trie.exact_match_search(&self.region, key)
    }

    /// `key`の接頭辞に一致するエントリを一致長の昇順で返します。
    ///
    /// 遷移に失敗した時点で探索を終了します。失敗位置より先に、
    /// 別の経路でより長く一致する可能性があっても探索しません。
    pub fn common_prefix_search(&self, key: &[u8]) -> Vec<TrieMatch> {
        self.trie.common_prefix_search(&self.region, key)
    }

    /// `key`の接頭辞に一致するすべてのトークンを返します。
    ///
    /// 結果は一致長の昇順、同じ一致長の中ではトークン番号の昇順です。
    pub fn lookup(&self, key: &[u8]) -> Result<Vec<LexMatch>> {
        let mut results = vec![];
        for m in self.common_prefix_search(key) {
            let (start, count) = unpack_value(m.value);
            let entries = self.entries_by_index(start, count)?;
            for (token_index, e) in (start..).zip(entries.iter()) {
                results.push(LexMatch {
                    left_id: e.param.left_id,
                    right_id: e.param.right_id,
                    pos_id: e.param.pos_id,
                    word_cost: e.param.word_cost,
                    length: m.length,
                    token_index,
                });
            }
        }
        Ok(results)
    }

    /// トライの値が指すトークンの連続区間を返します。
    pub fn entries(&self, value: u32) -> Result<Arc<[WordEntry]>> {
        let (start, count) = unpack_value(value);
        self.entries_by_index(start, count)
    }

    /// `start`番目から`count`件のトークンを、素性文字列を解決して返します。
    ///
    /// # エラー
    ///
    /// 区間がトークン表の範囲外の場合、または素性文字列がUTF-8でない場合に
    /// エラーを返します。
    pub fn entries_by_index(&self, start: u32, count: u32) -> Result<Arc<[WordEntry]>> {
        self.entries_cache
            .get_or_try_insert((start, count), || self.read_entries(start, count))
    }

    fn read_entries(&self, start: u32, count: u32) -> Result<Arc<[WordEntry]>> {
        let end = u64::from(start) + u64::from(count);
        if end > u64::from(self.num_tokens) {
            return Err(MecabDicError::out_of_range(
                "token index",
                end,
                u64::from(self.num_tokens),
            ));
        }
        let offset = self.header.token_offset() + start as usize * TOKEN_LEN;
        let records = self.region.bytes(offset, count as usize * TOKEN_LEN)?;
        records
            .chunks_exact(TOKEN_LEN)
            .map(|rec| -> Result<WordEntry> {
                let param = WordParam::decode(rec);
                let feature = std::str::from_utf8(self.feature_bytes(param.feature)?)?;
                Ok(WordEntry {
                    param,
                    feature: feature.to_string(),
                })
            })
            .collect()
    }

    /// トークンのレコードを読み出します。
    pub fn word_param(&self, token_index: u32) -> Result<WordParam> {
        if token_index >= self.num_tokens {
            return Err(MecabDicError::out_of_range(
                "token index",
                u64::from(token_index),
                u64::from(self.num_tokens),
            ));
        }
        let offset = self.header.token_offset() + token_index as usize * TOKEN_LEN;
        Ok(WordParam::decode(self.region.bytes(offset, TOKEN_LEN)?))
    }

    /// トークンの素性文字列を生のバイト列として返します。
    pub fn feature(&self, token_index: u32) -> Result<&[u8]> {
        let param = self.word_param(token_index)?;
        self.feature_bytes(param.feature)
    }

    /// トークンの素性文字列を返します。
    pub fn word_feature(&self, token_index: u32) -> Result<&str> {
        Ok(std::str::from_utf8(self.feature(token_index)?)?)
    }

    fn feature_bytes(&self, offset: u32) -> Result<&[u8]> {
        if offset >= self.header.fsize {
            return Err(MecabDicError::out_of_range(
                "feature offset",
                u64::from(offset),
                u64::from(self.header.fsize),
            ));
        }
        self.region
            .cstr_at(self.header.feature_offset() + offset as usize)
    }
}

//! 未知語処理モジュール
//!
//! 辞書を開いた時点で、文字カテゴリごとの未知語処理ポリシーと未知語エントリを
//! 事前計算します。

use hashbrown::HashMap;

use crate::dictionary::character::{CharProperty, MAX_CODE_POINT};
use crate::dictionary::lexicon::{head_fields, Lexicon, POS_FIELDS};
use crate::errors::Result;

/// 未知語エントリ
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnkEntry {
    /// 左文脈ID
    pub left_id: u16,
    /// 右文脈ID
    pub right_id: u16,
    /// 単語コスト
    pub word_cost: i16,
    /// 素性文字列の先頭4フィールド
    pub feature: String,
}

/// カテゴリごとの未知語処理ポリシー
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CategoryPolicy {
    /// 未知語としてまとめる最大文字数
    pub length: u16,
    /// 同じカテゴリの文字をグループ化するかどうか
    pub group: bool,
    /// 常に未知語処理を起動するかどうか
    pub invoke: bool,
}

/// 未知語ハンドラー
pub struct UnkHandler {
    policies: HashMap<String, CategoryPolicy>,
    entries: HashMap<String, Vec<UnkEntry>>,
}

impl UnkHandler {
    /// 文字プロパティと未知語辞書から未知語ハンドラーを構築します。
    ///
    /// ポリシーはコードポイント`0..0xFFFF`を昇順に走査し、代表カテゴリ名ごとに
    /// 最後に現れた文字の設定を採用します。
    pub fn new(char_prop: &CharProperty, unk_lexicon: &Lexicon) -> Result<Self> {
        let mut policies = HashMap::new();
        for code_point in 0..MAX_CODE_POINT {
            let info = char_prop.char_info(code_point)?;
            let name = char_prop.base_name(info)?;
            let policy = CategoryPolicy {
                length: info.length(),
                group: info.group(),
                invoke: info.invoke(),
            };
            match policies.get_mut(name) {
                Some(p) => *p = policy,
                None => {
                    policies.insert(name.to_string(), policy);
                }
            }
        }

        let mut entries = HashMap::new();
        for name in char_prop.category_names() {
            let mut cate_entries = vec![];
            match unk_lexicon.exact_match_search(name.as_bytes()) {
                Some(value) => {
                    for e in unk_lexicon.entries(value)?.iter() {
                        cate_entries.push(UnkEntry {
                            left_id: e.param.left_id,
                            right_id: e.param.right_id,
                            word_cost: e.param.word_cost,
                            feature: head_fields(&e.feature, POS_FIELDS),
                        });
                    }
                }
                None => log::warn!("[mecabdic] unk.dic has no entry for category {name}"),
            }
            entries.insert(name.clone(), cate_entries);
        }

        Ok(Self { policies, entries })
    }

    /// カテゴリのポリシーを返します。
    #[inline]
    pub fn policy(&self, cate: &str) -> Option<CategoryPolicy> {
        self.policies.get(cate).copied()
    }

    /// カテゴリの未知語エントリを返します。未知のカテゴリでは空です。
    #[inline]
    pub fn entries(&self, cate: &str) -> &[UnkEntry] {
        self.entries.get(cate).map_or(&[], Vec::as_slice)
    }
}

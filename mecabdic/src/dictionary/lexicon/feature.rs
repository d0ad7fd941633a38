//! 単語の素性情報
//!
//! 素性文字列はカンマ区切りで、先頭4フィールドが品詞、続いて活用型、活用形、
//! 原形、読み、発音が並びます。

use crate::errors::{MecabDicError, Result};

/// 品詞として扱う先頭フィールドの数
pub const POS_FIELDS: usize = 4;

const EXTRA_FIELDS: usize = POS_FIELDS + 5;

/// 素性文字列の先頭`n`フィールドをカンマで連結して返します。
pub fn head_fields(feature: &str, n: usize) -> String {
    feature.split(',').take(n).collect::<Vec<_>>().join(",")
}

/// 品詞以外の付加情報
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ExtraFeatures {
    /// 品詞（先頭4フィールドをカンマで連結したもの）
    pub pos: String,
    /// 活用型
    pub conjugation_type: String,
    /// 活用形
    pub conjugation_form: String,
    /// 原形
    pub base_form: String,
    /// 読み
    pub reading: String,
    /// 発音
    pub pronunciation: String,
}

impl ExtraFeatures {
    /// 素性文字列を分解します。
    ///
    /// # エラー
    ///
    /// フィールドが9個未満の場合はフォーマットエラーを返します。
    pub fn parse(feature: &str) -> Result<Self> {
        let fields: Vec<&str> = feature.split(',').collect();
        if fields.len() < EXTRA_FIELDS {
            return Err(MecabDicError::invalid_format(
                "feature",
                format!(
                    "expected at least {EXTRA_FIELDS} comma-separated fields, but got {}: {feature}",
                    fields.len()
                ),
            ));
        }
        Ok(Self {
            pos: fields[..POS_FIELDS].join(","),
            conjugation_type: fields[4].to_string(),
            conjugation_form: fields[5].to_string(),
            base_form: fields[6].to_string(),
            reading: fields[7].to_string(),
            pronunciation: fields[8].to_string(),
        })
    }
}

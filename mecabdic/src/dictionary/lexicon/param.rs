//! トークンレコード
//!
//! トークン表は16バイト固定長のレコードの列です。

use byteorder::{ByteOrder, LittleEndian};

/// トークンレコード1件のバイト長
pub const TOKEN_LEN: usize = 16;

/// 単語のパラメータ（文脈IDとコスト）
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
pub struct WordParam {
    /// 左文脈ID（接続行列の列）
    pub left_id: u16,
    /// 右文脈ID（接続行列の行）
    pub right_id: u16,
    /// 品詞ID
    pub pos_id: u16,
    /// 単語コスト。小さいほど出現しやすい
    pub word_cost: i16,
    /// 素性文字列領域内のオフセット
    pub feature: u32,
    /// 複合語情報（未使用）
    pub compound: u32,
}

impl WordParam {
    /// 16バイトのレコードをデコードします。
    #[inline]
    pub fn decode(bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), TOKEN_LEN);
        Self {
            left_id: LittleEndian::read_u16(&bytes[0..2]),
            right_id: LittleEndian::read_u16(&bytes[2..4]),
            pos_id: LittleEndian::read_u16(&bytes[4..6]),
            word_cost: LittleEndian::read_i16(&bytes[6..8]),
            feature: LittleEndian::read_u32(&bytes[8..12]),
            compound: LittleEndian::read_u32(&bytes[12..16]),
        }
    }
}

/// 素性文字列を解決済みのトークン
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct WordEntry {
    /// トークンレコード
    pub param: WordParam,
    /// 解決済みの素性文字列
    pub feature: String,
}

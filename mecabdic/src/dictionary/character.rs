//! 文字プロパティ定義
//!
//! このモジュールは、`char.bin`で定義される文字情報を管理します。
//! 各文字のカテゴリ、グループ化、未知語処理などの属性を保持します。

use std::fmt;
use std::path::Path;

use crate::errors::{MecabDicError, Result};
use crate::region::{decode_fixed_name, ByteRegion};

const CATE_IDSET_BITS: usize = 18;
const CATE_IDSET_MASK: u32 = (1 << CATE_IDSET_BITS) - 1;
const BASE_ID_BITS: usize = 8;
const BASE_ID_MASK: u32 = (1 << BASE_ID_BITS) - 1;
const LENGTH_BITS: usize = 4;
const LENGTH_MASK: u32 = (1 << LENGTH_BITS) - 1;
const GROUP_SHIFT: usize = CATE_IDSET_BITS + BASE_ID_BITS + LENGTH_BITS;
const INVOKE_SHIFT: usize = GROUP_SHIFT + 1;

const CATEGORY_NAME_LEN: usize = 32;

/// `char.bin`がカバーする最大のコードポイント
pub const MAX_CODE_POINT: u32 = 0xFFFF;

/// `char.bin`に格納される文字の情報
///
/// この構造体は、文字の各種属性を32ビット整数にパックして保持します。
///
/// # メモリレイアウト
///
/// ```text
/// cate_idset = 18 ビット (bit 0..18)
///    base_id =  8 ビット (bit 18..26)
///     length =  4 ビット (bit 26..30)
///      group =  1 ビット (bit 30)
///     invoke =  1 ビット (bit 31)
/// ```
#[derive(Default, Clone, Copy, Eq, PartialEq)]
pub struct CharInfo(u32);

impl fmt::Debug for CharInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharInfo")
            .field("cate_idset", &self.cate_idset())
            .field("base_id", &self.base_id())
            .field("length", &self.length())
            .field("group", &self.group())
            .field("invoke", &self.invoke())
            .finish()
    }
}

impl CharInfo {
    /// パック済みの32ビット値から作成します。
    #[inline(always)]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// パック済みの32ビット値を返します。
    #[inline(always)]
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// この文字が属するカテゴリIDのビット集合（`type`）を取得します。
    #[inline(always)]
    pub const fn cate_idset(&self) -> u32 {
        self.0 & CATE_IDSET_MASK
    }

    /// 代表カテゴリID（`default_type`）を取得します。
    #[inline(always)]
    pub const fn base_id(&self) -> u32 {
        (self.0 >> CATE_IDSET_BITS) & BASE_ID_MASK
    }

    /// 未知語としてまとめる最大文字数を取得します。
    #[inline(always)]
    pub const fn length(&self) -> u16 {
        ((self.0 >> (CATE_IDSET_BITS + BASE_ID_BITS)) & LENGTH_MASK) as u16
    }

    /// 同じカテゴリの文字をグループ化するかどうか
    #[inline(always)]
    pub const fn group(&self) -> bool {
        (self.0 >> GROUP_SHIFT) & 1 != 0
    }

    /// 辞書に一致があっても常に未知語処理を起動するかどうか
    #[inline(always)]
    pub const fn invoke(&self) -> bool {
        (self.0 >> INVOKE_SHIFT) & 1 != 0
    }
}

/// 1文字のカテゴリ分類結果
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CharCategories<'a> {
    /// 代表カテゴリ名
    pub primary: &'a str,
    /// 代表カテゴリ以外に該当するカテゴリ名（カテゴリID順）
    pub secondary: Vec<&'a str>,
}

/// 文字から情報へのマッピング
///
/// `char.bin`の内容を保持します。レイアウトは、u32のカテゴリ数、
/// 32バイトのNUL詰めカテゴリ名の列、65536個の4バイト[`CharInfo`]です。
pub struct CharProperty {
    region: ByteRegion,
    categories: Vec<String>,
    table_offset: usize,
}

impl CharProperty {
    /// `char.bin`を読み込みます。
    ///
    /// # エラー
    ///
    /// ファイルを開けない場合は構成エラー、カテゴリ数やファイル長が
    /// 不正な場合はフォーマットエラーを返します。
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let region = ByteRegion::open(path.as_ref(), "char.bin")?;
        if region.len() < 4 {
            return Err(MecabDicError::invalid_format(
                "char.bin",
                format!("file is too short to hold the category count: {} bytes", region.len()),
            ));
        }

        let num_categories = usize::try_from(region.u32_at(0)?)?;
        if num_categories == 0 || num_categories > CATE_IDSET_BITS {
            return Err(MecabDicError::invalid_format(
                "char.bin",
                format!(
                    "the number of categories must be in 1..={CATE_IDSET_BITS}, but got {num_categories}"
                ),
            ));
        }

        let mut categories = Vec::with_capacity(num_categories);
        for i in 0..num_categories {
            let raw = region.bytes(4 + i * CATEGORY_NAME_LEN, CATEGORY_NAME_LEN)?;
            categories.push(decode_fixed_name(raw, "char.bin")?);
        }

        let table_offset = 4 + num_categories * CATEGORY_NAME_LEN;
        let expected_len = table_offset + (MAX_CODE_POINT as usize + 1) * 4;
        if region.len() < expected_len {
            return Err(MecabDicError::invalid_format(
                "char.bin",
                format!(
                    "file is truncated: expected at least {expected_len} bytes, but got {}",
                    region.len()
                ),
            ));
        }
        log::debug!("[mecabdic] char.bin categories: {categories:?}");

        Ok(Self {
            region,
            categories,
            table_offset,
        })
    }

    /// カテゴリIDでインデックス化されたカテゴリ名のリストを返します。
    #[inline(always)]
    pub fn category_names(&self) -> &[String] {
        &self.categories
    }

    /// カテゴリ名からカテゴリIDを引きます。
    pub fn cate_id(&self, name: &str) -> Option<u32> {
        self.categories
            .iter()
            .position(|c| c == name)
            .and_then(|i| u32::try_from(i).ok())
    }

    /// コードポイントの文字情報を取得します。
    ///
    /// # エラー
    ///
    /// `code_point`が`0..=0xFFFF`の範囲外の場合は
    /// [`MecabDicError::OutOfRange`]を返します。
    pub fn char_info(&self, code_point: u32) -> Result<CharInfo> {
        if code_point > MAX_CODE_POINT {
            return Err(MecabDicError::out_of_range(
                "code point",
                u64::from(code_point),
                u64::from(MAX_CODE_POINT) + 1,
            ));
        }
        let offset = self.table_offset + code_point as usize * 4;
        Ok(CharInfo::from_raw(self.region.u32_at(offset)?))
    }

    /// 代表カテゴリIDのカテゴリ名を取得します。
    pub(crate) fn base_name(&self, info: CharInfo) -> Result<&str> {
        self.categories
            .get(info.base_id() as usize)
            .map(String::as_str)
            .ok_or_else(|| {
                MecabDicError::invalid_format(
                    "char.bin",
                    format!(
                        "default category id {} exceeds the number of categories {}",
                        info.base_id(),
                        self.categories.len()
                    ),
                )
            })
    }

    /// コードポイントの代表カテゴリと副カテゴリを取得します。
    ///
    /// 副カテゴリには、`cate_idset`でビットが立っているカテゴリのうち、
    /// 代表カテゴリ以外のものがカテゴリID順に入ります。
    pub fn categories_of(&self, code_point: u32) -> Result<CharCategories<'_>> {
        let info = self.char_info(code_point)?;
        let primary = self.base_name(info)?;
        let base_id = info.base_id() as usize;
        let secondary = self
            .categories
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != base_id && info.cate_idset() & (1 << i) != 0)
            .map(|(_, name)| name.as_str())
            .collect();
        Ok(CharCategories { primary, secondary })
    }
}

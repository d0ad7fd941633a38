//! 辞書ファイルのヘッダ
//!
//! `sys.dic`と`unk.dic`は、9個のu32フィールドと32バイトの文字コード名からなる
//! 72バイトのヘッダで始まります。

use byteorder::{ByteOrder, LittleEndian};

use crate::errors::{MecabDicError, Result};
use crate::region::{decode_fixed_name, ByteRegion};

/// ファイルサイズフィールドを難読化するXOR定数
pub const DIC_MAGIC_ID: u32 = 0xEF71_8F77;

/// ヘッダの全長（バイト）
pub const HEADER_LEN: usize = 72;

const NUM_FIELDS: usize = 10;
const CHARSET_LEN: usize = 32;

/// 辞書ファイルのヘッダ
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Header {
    /// ファイルサイズ（XORを解除した値）
    pub size: u32,
    /// 辞書フォーマットのバージョン
    pub version: u32,
    /// 辞書の種類（0: システム、1: ユーザー、2: 未知語）
    pub dictype: u32,
    /// 語彙数
    pub lexsize: u32,
    /// 左文脈IDの数
    pub lsize: u32,
    /// 右文脈IDの数
    pub rsize: u32,
    /// ダブル配列領域のバイト数
    pub dsize: u32,
    /// トークン表のバイト数
    pub tsize: u32,
    /// 素性文字列領域のバイト数
    pub fsize: u32,
    /// 文字コード名
    pub charset: String,
}

impl Header {
    /// ヘッダを読み込み、検証します。
    ///
    /// # エラー
    ///
    /// 次の場合にフォーマットエラーを返します:
    /// - XORを解除したサイズがファイルサイズと一致しない
    /// - 予約フィールドが0でない
    /// - 各領域がファイルに収まらない、またはレコード長の倍数でない
    pub(crate) fn parse(region: &ByteRegion) -> Result<Self> {
        let name = region.name();
        if region.len() < HEADER_LEN {
            return Err(MecabDicError::invalid_format(
                name,
                format!("file is shorter than the {HEADER_LEN}-byte header"),
            ));
        }

        let raw = region.bytes(0, NUM_FIELDS * 4)?;
        let mut fields = [0u32; NUM_FIELDS];
        LittleEndian::read_u32_into(raw, &mut fields);
        let [magic, version, dictype, lexsize, lsize, rsize, dsize, tsize, fsize, reserved] =
            fields;

        let size = magic ^ DIC_MAGIC_ID;
        if u64::from(size) != region.len() as u64 {
            return Err(MecabDicError::invalid_format(
                name,
                format!(
                    "size checksum mismatch: header says {size} bytes, but the file has {} bytes",
                    region.len()
                ),
            ));
        }
        if reserved != 0 {
            return Err(MecabDicError::invalid_format(
                name,
                format!("reserved header field must be 0, but got {reserved:#x}"),
            ));
        }

        let body_len = u64::from(dsize) + u64::from(tsize) + u64::from(fsize);
        if HEADER_LEN as u64 + body_len > u64::from(size) {
            return Err(MecabDicError::invalid_format(
                name,
                format!(
                    "regions (dsize={dsize}, tsize={tsize}, fsize={fsize}) exceed the file size {size}"
                ),
            ));
        }
        if dsize % 8 != 0 {
            return Err(MecabDicError::invalid_format(
                name,
                format!("double-array size {dsize} is not a multiple of 8"),
            ));
        }
        if tsize % 16 != 0 {
            return Err(MecabDicError::invalid_format(
                name,
                format!("token table size {tsize} is not a multiple of 16"),
            ));
        }

        let charset = decode_fixed_name(region.bytes(NUM_FIELDS * 4, CHARSET_LEN)?, name)?;

        Ok(Self {
            size,
            version,
            dictype,
            lexsize,
            lsize,
            rsize,
            dsize,
            tsize,
            fsize,
            charset,
        })
    }

    /// ダブル配列領域の開始オフセット
    #[inline(always)]
    pub const fn da_offset(&self) -> usize {
        HEADER_LEN
    }

    /// トークン表の開始オフセット
    #[inline(always)]
    pub const fn token_offset(&self) -> usize {
        HEADER_LEN + self.dsize as usize
    }

    /// 素性文字列領域の開始オフセット
    #[inline(always)]
    pub const fn feature_offset(&self) -> usize {
        self.token_offset() + self.tsize as usize
    }

    /// 文字コードがUTF-8かどうか
    pub fn is_utf8(&self) -> bool {
        self.charset.eq_ignore_ascii_case("utf-8") || self.charset.eq_ignore_ascii_case("utf8")
    }
}

//! エラー型の定義
//!
//! このモジュールは、mecabdicで使用されるすべてのエラー型を定義します。

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// mecabdic専用のResult型
///
/// エラー型としてデフォルトで[`MecabDicError`]を使用します。
pub type Result<T, E = MecabDicError> = std::result::Result<T, E>;

/// mecabdicのエラー型
///
/// このライブラリで発生する可能性のあるすべてのエラーを表現します。
#[derive(Debug, thiserror::Error)]
pub enum MecabDicError {
    /// 無効な引数エラー
    ///
    /// [`InvalidArgumentError`]のエラーバリアント。
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// 無効なフォーマットエラー
    ///
    /// ヘッダのチェックサム不一致、予約フィールドの不一致、
    /// 素性文字列のフィールド不足などで発生します。
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// 辞書ディレクトリの構成エラー
    ///
    /// 辞書ファイルが存在しない、または読み込めない場合に発生します。
    /// データの破損ではなく、配置や設定の誤りを示します。
    #[error("Failed to open dictionary file '{}': {source}", path.display())]
    Config {
        /// 開けなかったファイルのパス
        path: PathBuf,
        /// 原因となったI/Oエラー
        source: std::io::Error,
    },

    /// 範囲外アクセスエラー
    ///
    /// コードポイント、トライのインデックス、接続IDなどが
    /// 有効な範囲を超えた場合に発生します。
    #[error("{what} {index} is out of range (limit: {limit})")]
    OutOfRange {
        /// 範囲外となった値の種類
        what: &'static str,
        /// 指定された値
        index: u64,
        /// 有効な値の上限（この値を含まない）
        limit: u64,
    },

    /// 整数変換エラー
    #[error(transparent)]
    TryFromInt(#[from] std::num::TryFromIntError),

    /// UTF-8エンコーディングエラー
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),
}

impl MecabDicError {
    /// 無効な引数エラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - 引数の名前
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効なフォーマットエラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - フォーマット名
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) const fn out_of_range(what: &'static str, index: u64, limit: u64) -> Self {
        Self::OutOfRange { what, index, limit }
    }

    /// 構成エラー（ファイルが開けない）であるかどうかを返します。
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

/// 引数が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// 引数の名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// 入力フォーマットが無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidFormatError {
    /// フォーマットの名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidFormatError {}

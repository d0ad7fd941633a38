//! # mecabdic
//!
//! コンパイル済みMeCab辞書（`char.bin`、`matrix.bin`、`sys.dic`、`unk.dic`）への
//! 読み取り専用アクセスを提供します。
//!
//! ## 概要
//!
//! このライブラリは、形態素解析器が必要とする次の問い合わせを提供します:
//!
//! - **表層形の検索**: ダブル配列トライによる共通接頭辞検索
//! - **文字カテゴリの分類**: コードポイントごとの代表カテゴリと副カテゴリ
//! - **連接コスト**: 左右の文脈IDによる接続コスト行列の参照
//! - **未知語処理**: カテゴリごとのポリシーと未知語エントリ
//!
//! 辞書ファイルはメモリマップされ、すべての読み出しは境界チェックされます。
//! 頻出する問い合わせは、インスタンスごとの上限付きキャッシュでメモ化されます。
//!
//! ## 使用例
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use mecabdic::Dictionary;
//!
//! let dict = Dictionary::from_dir("/var/lib/mecab/dic/ipadic-utf8")?;
//!
//! for m in dict.lookup("すもももももももものうち")? {
//!     let extra = dict.extra_features(m.token_index)?;
//!     println!("{}\t{}\t{}", m.surface, extra.pos, extra.reading);
//! }
//!
//! let cates = dict.categories_of('あ')?;
//! assert_eq!(cates.primary, "HIRAGANA");
//! println!("{}", dict.transition_cost(0, 0)?);
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("`target_pointer_width` must be 32 or 64");

/// 上限付きメモ化キャッシュ
mod cache;

/// 辞書データ構造
pub mod dictionary;

/// エラー型の定義
pub mod errors;

/// メモリマップされたバイト領域
mod region;

#[cfg(test)]
mod test_utils;

// Re-exports
pub use cache::DEFAULT_CACHE_CAPACITY;
pub use dictionary::{DictMatch, Dictionary, DictionaryOptions, LexType};
pub use errors::{MecabDicError, Result};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

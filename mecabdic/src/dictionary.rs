//! コンパイル済みMeCab辞書の読み込みモジュール。
//!
//! 辞書ディレクトリは次の4ファイルから構成されます:
//!
//! - `char.bin`: 文字カテゴリとコードポイントごとの文字情報
//! - `matrix.bin`: 接続コスト行列
//! - `sys.dic`: システム辞書（ダブル配列トライ、トークン表、素性文字列）
//! - `unk.dic`: 未知語辞書（`sys.dic`と同じレイアウト）
//!
//! [`Dictionary::from_dir`]はこれらをすべてメモリマップして検証し、
//! 文字カテゴリごとの未知語処理ポリシーと未知語エントリを事前計算します。
//! いずれかの段階で失敗した場合、辞書インスタンスは作成されません。
pub(crate) mod character;
pub(crate) mod connector;
pub(crate) mod lexicon;
pub(crate) mod unknown;

use std::path::{Path, PathBuf};

use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::errors::{MecabDicError, Result};

pub use crate::dictionary::character::{CharCategories, CharInfo, CharProperty, MAX_CODE_POINT};
pub use crate::dictionary::connector::{ConnectorCost, ConnectorView, MatrixConnector};
pub use crate::dictionary::lexicon::{
    BaseCheck, ExtraFeatures, Header, LexMatch, Lexicon, TrieMatch, WordEntry, WordParam,
};
pub use crate::dictionary::unknown::{CategoryPolicy, UnkEntry, UnkHandler};

/// 文字プロパティのファイル名
pub const CHAR_PROPERTY_FILE: &str = "char.bin";
/// 接続コスト行列のファイル名
pub const MATRIX_FILE: &str = "matrix.bin";
/// システム辞書のファイル名
pub const SYSTEM_DIC_FILE: &str = "sys.dic";
/// 未知語辞書のファイル名
pub const UNKNOWN_DIC_FILE: &str = "unk.dic";

/// 語彙辞書の種類
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default)]
#[repr(u8)]
pub enum LexType {
    /// システム辞書。
    #[default]
    System,
    /// 未知語辞書。
    Unknown,
}

impl LexType {
    /// 辞書ディレクトリ内のファイル名を返します。
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::System => SYSTEM_DIC_FILE,
            Self::Unknown => UNKNOWN_DIC_FILE,
        }
    }
}

/// 辞書の読み込みオプション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionaryOptions {
    /// メモ化キャッシュ1つあたりの最大エントリ数
    pub cache_capacity: u64,
}

impl Default for DictionaryOptions {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl DictionaryOptions {
    /// キャッシュ容量を設定します。
    ///
    /// # エラー
    ///
    /// `capacity`が0の場合はエラーを返します。
    pub fn cache_capacity(mut self, capacity: u64) -> Result<Self> {
        if capacity == 0 {
            return Err(MecabDicError::invalid_argument(
                "capacity",
                "cache capacity must be positive",
            ));
        }
        self.cache_capacity = capacity;
        Ok(self)
    }
}

/// システム辞書の検索結果
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct DictMatch<'a> {
    /// トークン番号
    pub token_index: u32,
    /// 一致した表層形
    pub surface: &'a str,
    /// 左文脈ID
    pub left_id: u16,
    /// 右文脈ID
    pub right_id: u16,
    /// 単語コスト
    pub word_cost: i16,
}

/// トークン化のための読み取り専用辞書。
///
/// 構築後は不変で、複数スレッドから同時に参照できます。
pub struct Dictionary {
    dicdir: PathBuf,
    char_prop: CharProperty,
    connector: MatrixConnector,
    system_lexicon: Lexicon,
    unknown_lexicon: Lexicon,
    unk_handler: UnkHandler,
}

impl Dictionary {
    /// 辞書ディレクトリを読み込みます。
    ///
    /// # 使用例
    ///
    /// ```no_run
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use mecabdic::Dictionary;
    ///
    /// let dict = Dictionary::from_dir("/usr/lib/mecab/dic/ipadic")?;
    /// for m in dict.lookup("すもももももももものうち")? {
    ///     println!("{}\t{}", m.surface, dict.word_feature(m.token_index)?);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # エラー
    ///
    /// - いずれかのファイルが存在しない、または読み込めない場合は
    ///   [`MecabDicError::Config`]を返します。
    /// - ヘッダの検証に失敗した場合など、ファイルが破損している場合は
    ///   フォーマットエラーを返します。
    pub fn from_dir<P>(dicdir: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Self::from_dir_with_options(dicdir, DictionaryOptions::default())
    }

    /// オプションを指定して辞書ディレクトリを読み込みます。
    pub fn from_dir_with_options<P>(dicdir: P, options: DictionaryOptions) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let dicdir = dicdir.as_ref();
        let capacity = options.cache_capacity;

        let char_prop = CharProperty::from_path(dicdir.join(CHAR_PROPERTY_FILE))?;
        let connector = MatrixConnector::from_path(dicdir.join(MATRIX_FILE), capacity)?;
        let system_lexicon = Lexicon::from_path(
            dicdir.join(SYSTEM_DIC_FILE),
            LexType::System,
            capacity,
        )?;
        let unknown_lexicon = Lexicon::from_path(
            dicdir.join(UNKNOWN_DIC_FILE),
            LexType::Unknown,
            capacity,
        )?;

        let header = system_lexicon.header();
        if header.lsize as usize != connector.num_left()
            || header.rsize as usize != connector.num_right()
        {
            log::warn!(
                "[mecabdic] sys.dic declares a {}x{} context space, but matrix.bin is {}x{}",
                header.lsize,
                header.rsize,
                connector.num_left(),
                connector.num_right(),
            );
        }

        let unk_handler = UnkHandler::new(&char_prop, &unknown_lexicon)?;

        log::info!(
            "[mecabdic] loaded {} ({} system tokens, {} categories)",
            dicdir.display(),
            system_lexicon.num_tokens(),
            char_prop.category_names().len(),
        );

        Ok(Self {
            dicdir: dicdir.to_path_buf(),
            char_prop,
            connector,
            system_lexicon,
            unknown_lexicon,
            unk_handler,
        })
    }

    /// 辞書ディレクトリのパス
    #[inline(always)]
    pub fn dicdir(&self) -> &Path {
        &self.dicdir
    }

    /// 文字プロパティへの参照を取得します。
    #[inline(always)]
    pub const fn char_prop(&self) -> &CharProperty {
        &self.char_prop
    }

    /// コネクタへの参照を取得します。
    #[inline(always)]
    pub const fn connector(&self) -> &MatrixConnector {
        &self.connector
    }

    /// システム辞書への参照を取得します。
    #[inline(always)]
    pub const fn system_lexicon(&self) -> &Lexicon {
        &self.system_lexicon
    }

    /// 未知語辞書への参照を取得します。
    #[inline(always)]
    pub const fn unknown_lexicon(&self) -> &Lexicon {
        &self.unknown_lexicon
    }

    /// 未知語ハンドラへの参照を取得します。
    #[inline(always)]
    pub const fn unk_handler(&self) -> &UnkHandler {
        &self.unk_handler
    }

    /// `surface`の接頭辞に一致するシステム辞書のトークンを返します。
    ///
    /// 結果は一致長の昇順で、各結果は一致した部分文字列を借用します。
    pub fn lookup<'a>(&self, surface: &'a str) -> Result<Vec<DictMatch<'a>>> {
        self.system_lexicon
            .lookup(surface.as_bytes())?
            .into_iter()
            .map(|m| -> Result<DictMatch<'a>> {
                let matched = surface.get(..m.length).ok_or_else(|| {
                    MecabDicError::invalid_format(
                        SYSTEM_DIC_FILE,
                        format!("match of {} bytes splits a UTF-8 character", m.length),
                    )
                })?;
                Ok(DictMatch {
                    token_index: m.token_index,
                    surface: matched,
                    left_id: m.left_id,
                    right_id: m.right_id,
                    word_cost: m.word_cost,
                })
            })
            .collect()
    }

    /// 連接コストを返します。
    ///
    /// # 引数
    ///
    /// * `left_id` - 左文脈ID（行列の列）
    /// * `right_id` - 右文脈ID（行列の行）
    #[inline]
    pub fn transition_cost(&self, left_id: u16, right_id: u16) -> Result<i32> {
        self.connector.cost(left_id, right_id)
    }

    /// 文字の代表カテゴリと副カテゴリを返します。
    ///
    /// # エラー
    ///
    /// `c`が基本多言語面の外にある場合は[`MecabDicError::OutOfRange`]を返します。
    #[inline]
    pub fn categories_of(&self, c: char) -> Result<CharCategories<'_>> {
        self.char_prop.categories_of(u32::from(c))
    }

    /// カテゴリが常に未知語処理を起動するかどうか。未知のカテゴリでは`false`です。
    pub fn is_always_invoked(&self, cate: &str) -> bool {
        self.unk_handler.policy(cate).is_some_and(|p| p.invoke)
    }

    /// カテゴリが文字をグループ化するかどうか。未知のカテゴリでは`false`です。
    pub fn is_grouping(&self, cate: &str) -> bool {
        self.unk_handler.policy(cate).is_some_and(|p| p.group)
    }

    /// カテゴリの未知語の最大文字数。未知のカテゴリでは`-1`です。
    pub fn max_group_length(&self, cate: &str) -> i32 {
        self.unk_handler
            .policy(cate)
            .map_or(-1, |p| i32::from(p.length))
    }

    /// カテゴリの未知語エントリを返します。
    #[inline]
    pub fn unknown_entries(&self, cate: &str) -> &[UnkEntry] {
        self.unk_handler.entries(cate)
    }

    /// システム辞書のトークンの素性文字列を返します。
    #[inline]
    pub fn word_feature(&self, token_index: u32) -> Result<&str> {
        self.system_lexicon.word_feature(token_index)
    }

    /// システム辞書のトークンの付加情報を返します。
    ///
    /// # エラー
    ///
    /// 素性文字列のフィールドが9個未満の場合はフォーマットエラーを返します。
    pub fn extra_features(&self, token_index: u32) -> Result<ExtraFeatures> {
        ExtraFeatures::parse(self.word_feature(token_index)?)
    }
}

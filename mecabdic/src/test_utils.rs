//! テスト用ユーティリティ
//!
//! テストコードで使用する便利なマクロと、小さな辞書ディレクトリを
//! 一時ディレクトリに書き出すフィクスチャを提供します。

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, WriteBytesExt};
use tempfile::TempDir;

use crate::dictionary::lexicon::{DIC_MAGIC_ID, HEADER_LEN};
use crate::dictionary::{CHAR_PROPERTY_FILE, MATRIX_FILE, SYSTEM_DIC_FILE, UNKNOWN_DIC_FILE};

macro_rules! hashmap {
    ( $($k:expr => $v:expr,)* ) => {
        {
            #[allow(unused_mut)]
            let mut h = hashbrown::HashMap::new();
            $(
                h.insert($k, $v);
            )*
            h
        }
    };
    ( $($k:expr => $v:expr),* ) => {
        hashmap![$( $k => $v, )*]
    };
}

pub(crate) use hashmap;

/// `(left_id, right_id, pos_id, word_cost, feature)`
pub(crate) type TestToken = (u16, u16, u16, i16, &'static str);

pub(crate) const CATEGORIES: &[&str] = &[
    "DEFAULT",
    "SPACE",
    "KANJI",
    "SYMBOL",
    "NUMERIC",
    "ALPHA",
    "HIRAGANA",
    "KATAKANA",
    "KANJINUMERIC",
    "GREEK",
    "CYRILLIC",
];

pub(crate) const MATRIX_LSIZE: u16 = 3;
pub(crate) const MATRIX_RSIZE: u16 = 4;

/// `matrix.bin`に書き出す接続コスト
pub(crate) fn matrix_cost(left_id: u16, right_id: u16) -> i16 {
    right_id as i16 * 100 - left_id as i16 * 7
}

/// システム辞書のエントリ。トークン番号はこの順に割り当てられます。
pub(crate) const SYS_ENTRIES: &[(&str, &[TestToken])] = &[
    ("うち", &[
        (2, 2, 66, 5_537, "名詞,非自立,副詞可能,*,*,*,うち,ウチ,ウチ"),
        (1, 1, 38, 6_972, "名詞,一般,*,*,*,*,うち,ウチ,ウチ"),
    ]),
    ("す", &[(0, 1, 31, 7_548, "動詞,自立,*,*,サ変・スル,文語基本形,す,ス,ス")]),
    ("すも", &[(1, 1, 38, 9_999, "名詞,一般,*,*,*,*,すも,スモ,スモ")]),
    ("すもも", &[(1, 1, 38, 7_546, "名詞,一般,*,*,*,*,すもも,スモモ,スモモ")]),
    ("の", &[(0, 0, 24, 4_816, "助詞,連体化,*,*,*,*,の,ノ,ノ")]),
    ("も", &[
        (0, 0, 16, 4_669, "助詞,係助詞,*,*,*,*,も,モ,モ"),
        (1, 1, 38, 10_191, "名詞,一般,*,*,*,*,も,モ,モ"),
    ]),
    ("もも", &[(1, 1, 38, 7_219, "名詞,一般,*,*,*,*,もも,モモ,モモ")]),
    ("壊", &[(1, 2, 38, 3_000, "名詞,一般")]),
];

/// 未知語辞書のエントリ。`GREEK`は意図的に含めていません。
pub(crate) const UNK_ENTRIES: &[(&str, &[TestToken])] = &[
    ("ALPHA", &[(1, 1, 36, 13_398, "名詞,固有名詞,組織,*,*,*,*")]),
    ("CYRILLIC", &[
        (1, 1, 36, 9_879, "名詞,一般,*,*,*,*,*"),
        (2, 2, 39, 14_425, "名詞,固有名詞,組織,*,*,*,*"),
    ]),
    ("DEFAULT", &[(3, 3, 5, 5_695, "記号,一般,*,*,*,*,*")]),
    ("HIRAGANA", &[(1, 1, 38, 10_271, "名詞,一般,*,*,*,*,*")]),
    ("KANJI", &[(1, 1, 38, 8_588, "名詞,一般,*,*,*,*,*")]),
    ("KANJINUMERIC", &[(0, 0, 48, 3_228, "名詞,数,*,*,*,*,*")]),
    ("KATAKANA", &[(1, 1, 38, 2_944, "名詞,一般,*,*,*,*,*")]),
    ("NUMERIC", &[(0, 0, 48, 2_953, "名詞,数,*,*,*,*,*")]),
    ("SPACE", &[(3, 3, 8, -3_000, "記号,空白,*,*,*,*,*")]),
    ("SYMBOL", &[(3, 3, 5, 3_000, "記号,一般,*,*,*,*,*")]),
];

/// `char.bin`に書き出す文字情報をパックします。
pub(crate) const fn pack_char_info(
    cate_idset: u32,
    base_id: u32,
    length: u32,
    group: bool,
    invoke: bool,
) -> u32 {
    cate_idset | base_id << 18 | length << 26 | (group as u32) << 30 | (invoke as u32) << 31
}

fn char_info_of(code_point: u32) -> u32 {
    match code_point {
        0x09 | 0x20 | 0x3000 => pack_char_info(1 << 1, 1, 0, true, false),
        0x21..=0x2F | 0x3A..=0x40 => pack_char_info(1 << 3, 3, 0, true, true),
        0x30..=0x39 => pack_char_info(1 << 4, 4, 0, true, true),
        0x41..=0x5A | 0x61..=0x7A => pack_char_info(1 << 5, 5, 0, true, true),
        0x0391..=0x03C9 => pack_char_info(1 << 9, 9, 0, true, true),
        0x0410..=0x044F => pack_char_info(1 << 10, 10, 0, true, true),
        0x3007 => pack_char_info(1 << 3 | 1 << 8, 3, 0, true, true),
        0x3041..=0x309F => pack_char_info(1 << 6, 6, 2, true, false),
        0x30A1..=0x30FF => pack_char_info(1 << 7, 7, 2, true, true),
        0x4E00 | 0x4E8C | 0x4E09 => pack_char_info(1 << 2 | 1 << 8, 8, 0, true, true),
        0x4E01..=0x9FFF => pack_char_info(1 << 2, 2, 2, false, false),
        // The last code point is excluded from the category policy walk.
        0xFFFF => pack_char_info(1, 0, 9, false, true),
        _ => pack_char_info(1, 0, 0, true, false),
    }
}

/// `char.bin`の内容を生成します。
pub(crate) fn char_bin() -> Vec<u8> {
    let mut buf = vec![];
    buf.write_u32::<LittleEndian>(CATEGORIES.len() as u32).unwrap();
    for name in CATEGORIES {
        buf.extend_from_slice(&fixed_name(name));
    }
    for code_point in 0..=0xFFFF {
        buf.write_u32::<LittleEndian>(char_info_of(code_point)).unwrap();
    }
    buf
}

/// `matrix.bin`の内容を生成します。
pub(crate) fn matrix_bin() -> Vec<u8> {
    let mut buf = vec![];
    buf.write_u16::<LittleEndian>(MATRIX_LSIZE).unwrap();
    buf.write_u16::<LittleEndian>(MATRIX_RSIZE).unwrap();
    for right_id in 0..MATRIX_RSIZE {
        for left_id in 0..MATRIX_LSIZE {
            buf.write_i16::<LittleEndian>(matrix_cost(left_id, right_id)).unwrap();
        }
    }
    buf
}

fn fixed_name(name: &str) -> [u8; 32] {
    let mut raw = [0; 32];
    raw[..name.len()].copy_from_slice(name.as_bytes());
    raw
}

#[derive(Default)]
struct TrieNode {
    children: BTreeMap<u8, TrieNode>,
    value: Option<u32>,
}

/// テスト用のダブル配列構築器
///
/// 各ノードには一意なbaseを割り当て、終端を`base`のスロット、
/// バイト`c`の子を`base + c + 1`のスロットに置きます。
#[derive(Default)]
struct DoubleArrayBuilder {
    base: Vec<i32>,
    check: Vec<u32>,
    used: Vec<bool>,
    used_bases: Vec<bool>,
}

impl DoubleArrayBuilder {
    fn build(records: &[(&[u8], u32)]) -> Vec<(i32, u32)> {
        let mut root = TrieNode::default();
        for &(key, value) in records {
            let mut node = &mut root;
            for &c in key {
                node = node.children.entry(c).or_default();
            }
            node.value = Some(value);
        }

        let mut builder = Self::default();
        builder.reserve(1);
        builder.used[0] = true;
        let root_base = builder.place(&root);
        builder.base[0] = root_base as i32;
        builder.base.into_iter().zip(builder.check).collect()
    }

    fn reserve(&mut self, len: usize) {
        if self.used.len() < len {
            self.base.resize(len, 0);
            self.check.resize(len, 0);
            self.used.resize(len, false);
        }
    }

    fn is_free(&self, pos: usize) -> bool {
        self.used.get(pos).is_none_or(|u| !u)
    }

    fn place(&mut self, node: &TrieNode) -> usize {
        let mut offsets = vec![];
        if node.value.is_some() {
            offsets.push(0);
        }
        offsets.extend(node.children.keys().map(|&c| usize::from(c) + 1));

        let mut b = 1;
        while self.used_bases.get(b).copied().unwrap_or(false)
            || !offsets.iter().all(|&o| self.is_free(b + o))
        {
            b += 1;
        }
        if self.used_bases.len() <= b {
            self.used_bases.resize(b + 1, false);
        }
        self.used_bases[b] = true;
        for &o in &offsets {
            self.reserve(b + o + 1);
            self.used[b + o] = true;
            self.check[b + o] = b as u32;
        }
        if let Some(v) = node.value {
            self.base[b] = -(v as i32) - 1;
        }
        for (&c, child) in &node.children {
            let child_base = self.place(child);
            self.base[b + usize::from(c) + 1] = child_base as i32;
        }
        b
    }
}

/// 辞書ファイルの内容を生成します。
pub(crate) fn dic_bin(entries: &[(&str, &[TestToken])], dictype: u32) -> Vec<u8> {
    let entries: Vec<(&[u8], &[TestToken])> = entries
        .iter()
        .map(|&(surface, toks)| (surface.as_bytes(), toks))
        .collect();
    dic_bin_from_bytes(&entries, dictype)
}

/// 任意のバイト列をキーとする辞書ファイルの内容を生成します。
pub(crate) fn dic_bin_from_bytes(entries: &[(&[u8], &[TestToken])], dictype: u32) -> Vec<u8> {
    let mut tokens = vec![];
    let mut features = vec![];
    let mut records: Vec<(&[u8], u32)> = vec![];
    for &(surface, toks) in entries {
        let start = tokens.len() as u32 / 16;
        for &(left_id, right_id, pos_id, word_cost, feature) in toks {
            let offset = features.len() as u32;
            features.extend_from_slice(feature.as_bytes());
            features.push(0);
            tokens.write_u16::<LittleEndian>(left_id).unwrap();
            tokens.write_u16::<LittleEndian>(right_id).unwrap();
            tokens.write_u16::<LittleEndian>(pos_id).unwrap();
            tokens.write_i16::<LittleEndian>(word_cost).unwrap();
            tokens.write_u32::<LittleEndian>(offset).unwrap();
            tokens.write_u32::<LittleEndian>(0).unwrap();
        }
        records.push((surface, start << 8 | toks.len() as u32));
    }

    let mut da = vec![];
    for (base, check) in DoubleArrayBuilder::build(&records) {
        da.write_i32::<LittleEndian>(base).unwrap();
        da.write_u32::<LittleEndian>(check).unwrap();
    }

    let size = (HEADER_LEN + da.len() + tokens.len() + features.len()) as u32;
    let mut buf = vec![];
    for field in [
        size ^ DIC_MAGIC_ID,
        102,
        dictype,
        (tokens.len() / 16) as u32,
        u32::from(MATRIX_LSIZE),
        u32::from(MATRIX_RSIZE),
        da.len() as u32,
        tokens.len() as u32,
        features.len() as u32,
        0,
    ] {
        buf.write_u32::<LittleEndian>(field).unwrap();
    }
    buf.extend_from_slice(&fixed_name("UTF-8"));
    buf.extend_from_slice(&da);
    buf.extend_from_slice(&tokens);
    buf.extend_from_slice(&features);
    buf
}

/// システム辞書で`surface`に割り当てられた最初のトークン番号を返します。
pub(crate) fn sys_token_index(surface: &str) -> u32 {
    let mut index = 0;
    for &(s, toks) in SYS_ENTRIES {
        if s == surface {
            return index;
        }
        index += toks.len() as u32;
    }
    panic!("no such surface: {surface}");
}

/// 辞書ディレクトリ一式を書き出した一時ディレクトリ
pub(crate) struct TestDicDir {
    _temp_dir: TempDir,
    path: PathBuf,
}

impl TestDicDir {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create a temporary directory");
        let path = temp_dir.path().to_path_buf();
        fs::write(path.join(CHAR_PROPERTY_FILE), char_bin()).unwrap();
        fs::write(path.join(MATRIX_FILE), matrix_bin()).unwrap();
        fs::write(path.join(SYSTEM_DIC_FILE), dic_bin(SYS_ENTRIES, 0)).unwrap();
        fs::write(path.join(UNKNOWN_DIC_FILE), dic_bin(UNK_ENTRIES, 2)).unwrap();
        Self {
            _temp_dir: temp_dir,
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

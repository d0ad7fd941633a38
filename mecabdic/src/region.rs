//! メモリマップされた読み取り専用バイト領域
//!
//! 辞書ファイルは開いた時点でメモリマップされ、所有するコンポーネントが
//! 破棄されるまで保持されます。すべての読み出しはデコード前に境界チェックされます。

use std::fs::File;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use memmap2::Mmap;

use crate::errors::{MecabDicError, Result};

/// 境界チェック付きの不変バイト領域
#[derive(Debug)]
pub(crate) struct ByteRegion {
    mmap: Mmap,
    name: &'static str,
}

impl ByteRegion {
    /// ファイルを開いてメモリマップします。
    ///
    /// ファイルが存在しない、または読み込めない場合は
    /// [`MecabDicError::Config`]を返します。
    pub fn open(path: &Path, name: &'static str) -> Result<Self> {
        let config_err = |source| MecabDicError::Config {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(config_err)?;
        // The file is opened read-only and never written through the map.
        let mmap = unsafe { Mmap::map(&file) }.map_err(config_err)?;
        log::debug!("[mecabdic] mapped {} ({} bytes)", path.display(), mmap.len());
        Ok(Self { mmap, name })
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// `offset`から`len`バイトのスライスを返します。
    #[inline]
    pub fn bytes(&self, offset: usize, len: usize) -> Result<&[u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.mmap.get(offset..end))
            .ok_or_else(|| {
                MecabDicError::out_of_range(
                    self.name,
                    offset.saturating_add(len) as u64,
                    self.mmap.len() as u64,
                )
            })
    }

    #[inline]
    pub fn u16_at(&self, offset: usize) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.bytes(offset, 2)?))
    }

    #[inline]
    pub fn i16_at(&self, offset: usize) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.bytes(offset, 2)?))
    }

    #[inline]
    pub fn u32_at(&self, offset: usize) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.bytes(offset, 4)?))
    }

    #[inline]
    pub fn i32_at(&self, offset: usize) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.bytes(offset, 4)?))
    }

    /// `offset`から始まるNUL終端文字列を、終端を含まずに返します。
    pub fn cstr_at(&self, offset: usize) -> Result<&[u8]> {
        let tail = self.mmap.get(offset..).ok_or_else(|| {
            MecabDicError::out_of_range(self.name, offset as u64, self.mmap.len() as u64)
        })?;
        let end = tail.iter().position(|&b| b == 0).ok_or_else(|| {
            MecabDicError::invalid_format(
                self.name,
                format!("string at offset {offset} is not NUL-terminated"),
            )
        })?;
        Ok(&tail[..end])
    }
}

/// 固定長のNUL詰めASCII名をデコードします。
pub(crate) fn decode_fixed_name(bytes: &[u8], what: &'static str) -> Result<String> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let name = &bytes[..end];
    if !name.is_ascii() {
        return Err(MecabDicError::invalid_format(
            what,
            format!("name {:?} is not ASCII", String::from_utf8_lossy(name)),
        ));
    }
    Ok(std::str::from_utf8(name)?.to_string())
}

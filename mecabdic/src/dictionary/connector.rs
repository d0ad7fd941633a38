//! 接続コスト計算のためのコネクター
//!
//! このモジュールは、`matrix.bin`に格納された接続コスト行列を読み出します。

use std::path::Path;

use crate::cache::MemoCache;
use crate::errors::{MecabDicError, Result};
use crate::region::ByteRegion;

const MATRIX_HEADER_LEN: usize = 4;

/// コネクターのビュー機能を提供するトレイト
pub trait ConnectorView {
    /// 左文脈IDの最大数を返します。
    fn num_left(&self) -> usize;

    /// 右文脈IDの最大数を返します。
    fn num_right(&self) -> usize;
}

/// 接続コスト計算機能を提供するトレイト
pub trait ConnectorCost: ConnectorView {
    /// 接続行列の値を取得します。
    ///
    /// # 引数
    ///
    /// * `left_id` - 左文脈ID
    /// * `right_id` - 右文脈ID
    ///
    /// # 戻り値
    ///
    /// 接続コスト
    fn cost(&self, left_id: u16, right_id: u16) -> Result<i32>;
}

/// 接続コストの行列
///
/// `matrix.bin`はu16の`lsize`とu16の`rsize`に続いて、
/// `lsize * rsize`個のi16コストを`right_id * lsize + left_id`の順に格納します。
pub struct MatrixConnector {
    region: ByteRegion,
    num_left: usize,
    num_right: usize,
    cache: MemoCache<(u16, u16), i16>,
}

impl MatrixConnector {
    /// `matrix.bin`を読み込みます。
    pub fn from_path<P>(path: P, cache_capacity: u64) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let region = ByteRegion::open(path.as_ref(), "matrix.bin")?;
        if region.len() < MATRIX_HEADER_LEN {
            return Err(MecabDicError::invalid_format(
                "matrix.bin",
                format!(
                    "file is shorter than the {MATRIX_HEADER_LEN}-byte header: {} bytes",
                    region.len()
                ),
            ));
        }
        let num_left = usize::from(region.u16_at(0)?);
        let num_right = usize::from(region.u16_at(2)?);

        // Computed in u64 so that 65535x65535 cannot overflow on 32-bit targets.
        let expected_len =
            MATRIX_HEADER_LEN as u64 + num_left as u64 * num_right as u64 * 2;
        if (region.len() as u64) < expected_len {
            return Err(MecabDicError::invalid_format(
                "matrix.bin",
                format!(
                    "a {num_left}x{num_right} matrix needs {expected_len} bytes, but the file has {}",
                    region.len()
                ),
            ));
        }
        log::debug!("[mecabdic] matrix.bin: lsize={num_left}, rsize={num_right}");

        Ok(Self {
            region,
            num_left,
            num_right,
            cache: MemoCache::new(cache_capacity),
        })
    }

    fn read_cost(&self, left_id: u16, right_id: u16) -> Result<i16> {
        let index = usize::from(right_id) * self.num_left + usize::from(left_id);
        self.region.i16_at(MATRIX_HEADER_LEN + index * 2)
    }
}

impl ConnectorView for MatrixConnector {
    #[inline(always)]
    fn num_left(&self) -> usize {
        self.num_left
    }

    #[inline(always)]
    fn num_right(&self) -> usize {
        self.num_right
    }
}

impl ConnectorCost for MatrixConnector {
    fn cost(&self, left_id: u16, right_id: u16) -> Result<i32> {
        if usize::from(left_id) >= self.num_left {
            return Err(MecabDicError::out_of_range(
                "left context id",
                u64::from(left_id),
                self.num_left as u64,
            ));
        }
        if usize::from(right_id) >= self.num_right {
            return Err(MecabDicError::out_of_range(
                "right context id",
                u64::from(right_id),
                self.num_right as u64,
            ));
        }
        let cost = self
            .cache
            .get_or_try_insert((left_id, right_id), || self.read_cost(left_id, right_id))?;
        Ok(i32::from(cost))
    }
}

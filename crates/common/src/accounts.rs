//! decoding of the Anchor program accounts the dashboard reads.
//!
//! layouts (after the 8 byte discriminator):
//!
//! - `SubDaoEpochInfoV0`: epoch u64, sub_dao key, dc_burned u64,
//!   vehnt_at_epoch_start u64, vehnt_in_closing_positions u128,
//!   fall_rates_from_closing_positions u128, delegation_rewards_issued u64,
//!   utility_score Option<u128>, rewards_issued_at Option<i64>, ...
//! - `TreasuryManagementV0`: reserve_mint, supply_mint, authority, treasury keys, ...
//! - `PositionV0`: registrar, mint keys, lockup (i64, i64, u8), amount_deposited_native u64, ...
use crate::types::EpochRecord;
use anyhow::{Error, anyhow};
use sha2::{Digest, Sha256};

pub const DISCRIMINATOR_LEN: usize = 8;
pub const KEY_LEN: usize = 32;

pub const EPOCH_INFO_EPOCH_OFFSET: usize = DISCRIMINATOR_LEN;
pub const EPOCH_INFO_SUB_DAO_OFFSET: usize = EPOCH_INFO_EPOCH_OFFSET + 8;
pub const TREASURY_SUPPLY_MINT_OFFSET: usize = DISCRIMINATOR_LEN + KEY_LEN;
pub const TREASURY_KEY_OFFSET: usize = DISCRIMINATOR_LEN + 3 * KEY_LEN;
pub const POSITION_REGISTRAR_OFFSET: usize = DISCRIMINATOR_LEN;
pub const POSITION_AMOUNT_OFFSET: usize = DISCRIMINATOR_LEN + 2 * KEY_LEN + 17;
// Clock sysvar: slot, epoch_start_timestamp, epoch, leader_schedule_epoch, unix_timestamp
const CLOCK_UNIX_TIMESTAMP_OFFSET: usize = 32;

pub const SUB_DAO_EPOCH_INFO: &str = "SubDaoEpochInfoV0";
pub const TREASURY_MANAGEMENT: &str = "TreasuryManagementV0";
pub const POSITION: &str = "PositionV0";

/// first 8 bytes of sha256("account:<name>")
pub fn account_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let hash = Sha256::digest(format!("account:{name}").as_bytes());
    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&hash[..DISCRIMINATOR_LEN]);
    out
}

/// little-endian borsh cursor
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Reader { data, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
        let end = self.pos + len;
        let bytes = self.data.get(self.pos..end).ok_or(anyhow!(
            "error: account data ends at {} (wanted {end})",
            self.data.len()
        ))?;
        self.pos = end;
        Ok(bytes)
    }

    fn skip(&mut self, len: usize) -> Result<(), Error> {
        self.take(len).map(|_| ())
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    fn u64(&mut self) -> Result<u64, Error> {
        Ok(u64::from_le_bytes(self.array()?))
    }

    fn i64(&mut self) -> Result<i64, Error> {
        Ok(i64::from_le_bytes(self.array()?))
    }

    fn u128(&mut self) -> Result<u128, Error> {
        Ok(u128::from_le_bytes(self.array()?))
    }

    fn key(&mut self) -> Result<String, Error> {
        Ok(bs58::encode(self.take(KEY_LEN)?).into_string())
    }

    fn option<T>(&mut self, read: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<Option<T>, Error> {
        match self.u8()? {
            0 => Ok(None),
            1 => read(self).map(Some),
            tag => Err(anyhow!("error: invalid option tag {tag}")),
        }
    }

    fn discriminator(&mut self, name: &str) -> Result<(), Error> {
        let expected = account_discriminator(name);
        if self.take(DISCRIMINATOR_LEN)? != expected {
            return Err(anyhow!("error: account is not a {name}"));
        }
        Ok(())
    }
}

/// decodes a `SubDaoEpochInfoV0`; trailing fields that cannot be read are left empty
pub fn decode_sub_dao_epoch_info(data: &[u8]) -> Result<EpochRecord, Error> {
    let mut r = Reader::new(data);
    r.discriminator(SUB_DAO_EPOCH_INFO)?;
    let epoch = r.u64()?;
    r.skip(KEY_LEN)?;
    let dc_burned = r.u64().ok();
    let vehnt_at_epoch_start = r.u64().ok();

    let mut utility_score = None;
    let mut rewards_issued_at = None;
    // vehnt_in_closing_positions, fall_rates_from_closing_positions, delegation_rewards_issued
    if r.skip(16 + 16 + 8).is_ok() {
        if let Ok(score) = r.option(|r| r.u128()) {
            utility_score = score;
            rewards_issued_at = r.option(|r| r.i64()).ok().flatten();
        }
    }

    Ok(EpochRecord {
        epoch,
        rewards_issued_at,
        utility_score,
        vehnt_at_epoch_start,
        dc_burned,
    })
}

/// treasury token account of a `TreasuryManagementV0`
pub fn decode_treasury_key(data: &[u8]) -> Result<String, Error> {
    let mut r = Reader::new(data);
    r.discriminator(TREASURY_MANAGEMENT)?;
    r.skip(3 * KEY_LEN)?;
    r.key()
}

/// `amount_deposited_native` from an 8 byte `dataSlice` of a `PositionV0`
pub fn decode_position_amount(slice: &[u8]) -> Result<u64, Error> {
    Reader::new(slice).u64()
}

pub fn decode_clock_unix_timestamp(data: &[u8]) -> Result<i64, Error> {
    let mut r = Reader::new(data);
    r.skip(CLOCK_UNIX_TIMESTAMP_OFFSET)?;
    r.i64()
}

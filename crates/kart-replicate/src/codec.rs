//! MessagePack encoding of wire records.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ReplicateResult;

pub fn encode<T: Serialize>(value: &T) -> ReplicateResult<Vec<u8>> {
    Ok(rmp_serde::to_vec(value)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> ReplicateResult<T> {
    Ok(rmp_serde::from_slice(bytes)?)
}

/*
    Copyright (C) 2024  ZERK developers

    This file is part of ZERK, a Rust library for emulating Berzerk-style arcade boards.

    For the full copyright notice, see the lib.rs file.
*/
//! Utilities for serializing memory planes as base64 strings or just bytes in binary serializers.
use core::fmt;
use std::borrow::Cow;
use std::convert::TryInto;
#[cfg(feature = "compression")] use core::iter::FromIterator;
#[cfg(feature = "compression")] use compression::prelude::*;
#[cfg(feature = "compression")] use serde::ser;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{
    Serializer, Deserialize, Deserializer,
    de::{self, Visitor}
};

/// Serializes a memory plane, gzip compressed when the `compression` feature is enabled.
pub fn serialize_mem<S, const LEN: usize>(mem: &Box<[u8;LEN]>, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer
{
    #[cfg(not(feature = "compression"))]
    {
        serialize_mem_slice(&mem[..], serializer)
    }
    #[cfg(feature = "compression")]
    {
        let compr = mem.iter().copied()
            .encode(&mut GZipEncoder::new(), Action::Finish)
            .collect::<Result<Vec<_>, _>>()
            .map_err(ser::Error::custom)?;
        serialize_mem_slice(&compr, serializer)
    }
}

/// Serializes raw bytes as a base64 string in human readable formats.
pub fn serialize_mem_slice<S>(slice: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer
{
    if serializer.is_human_readable() {
        serializer.serialize_str(&BASE64.encode(slice))
    }
    else {
        serializer.serialize_bytes(slice)
    }
}

/// Deserializes a memory plane serialized with [serialize_mem], with or without compression.
pub fn deserialize_mem<'de, D, const LEN: usize>(deserializer: D) -> Result<Box<[u8;LEN]>, D::Error>
    where D: Deserializer<'de>
{
    let buf = if deserializer.is_human_readable() {
        Deserialize::deserialize(deserializer).and_then(|string: Cow<str>|
            BASE64.decode(&*string).map_err(de::Error::custom)
        )?
    }
    else {
        deserializer.deserialize_byte_buf(ByteBufVisitor)?
    };
    mem_from_byte_buf(buf)
}

#[allow(unused_mut)]
fn mem_from_byte_buf<E: de::Error, const LEN: usize>(mut buf: Vec<u8>) -> Result<Box<[u8;LEN]>, E> {
    #[cfg(feature = "compression")]
    {
        if is_compressed(&buf) {
            buf = decompress(&buf)?;
        }
    }
    let buf = buf.into_boxed_slice();
    buf.try_into().map_err(|buf: Box<[_]>|
        de::Error::custom(
            format!("failed to deserialize memory, {} bytes required, received: {}",
                LEN, buf.len())))
}

struct ByteBufVisitor;

impl Visitor<'_> for ByteBufVisitor {
    type Value = Vec<u8>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a byte array")
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
        Ok(v)
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ok(Vec::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Vec::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Vec::from(v))
    }
}

#[cfg(feature = "compression")]
fn is_compressed(data: &[u8]) -> bool {
    matches!(data.get(0..3), Some(&[0x1f, 0x8b, 0x08]))
}

#[cfg(feature = "compression")]
fn decompress<T: FromIterator<u8>, E: de::Error>(data: &[u8]) -> Result<T, E> {
    data.iter().copied()
        .decode(&mut GZipDecoder::new())
        .collect::<Result<T, _>>()
        .map_err(de::Error::custom)
}

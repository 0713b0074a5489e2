/*
    Copyright (C) 2024  ZERK developers

    This file is part of ZERK, a Rust library for emulating Berzerk-style arcade boards.

    For the full copyright notice, see the lib.rs file.
*/
//! Chipset emulation building blocks and implementations.
mod berzerk;

pub use berzerk::*;
pub use zerk_core::chip::*;

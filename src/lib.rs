// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod assemble;
pub mod config;
pub mod constants;
pub mod error;
pub mod generator;
pub mod kubernetes;
pub mod render;
pub mod request;
pub mod resolve;
pub mod template;

#[cfg(test)]
pub mod test_utils;

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Read-only cluster introspection: client creation, namespace lookup and namespace reports.

pub mod client;
pub mod inspect;
pub mod namespaces;

pub use client::create_client;
pub use inspect::{inspect_namespace, NamespaceReport};
pub use namespaces::ensure_namespace_present;

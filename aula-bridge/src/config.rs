// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

use aula_base::config::{Config as AulaConfig, Logging};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Settings from Aula Base.
    pub aula_config: AulaConfig,
    /// TcpListener from prometheus axum server, empty to disable it.
    pub prometheus: String,
    /// Logging parameters.
    pub logging: Logging,
    /// Exposes the fixture reset used by end-to-end test suites.
    pub test_hooks: bool,
}

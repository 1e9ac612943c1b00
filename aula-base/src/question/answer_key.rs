// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::BTreeMap;

/// Returns `true` iff `answer` is a non-empty label present in `options`.
pub fn is_valid_answer_key(
    options: &BTreeMap<String, String>,
    answer: Option<&str>,
) -> bool {
    match answer {
        Some(label) if !label.is_empty() => options.contains_key(label),
        _ => false,
    }
}

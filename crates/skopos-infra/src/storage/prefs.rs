// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! File-backed tier preference persistence.

use anyhow::{Context, Result};
use skopos_core::platform::PreferenceStore;
use skopos_core::tier::TierMode;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A [`PreferenceStore`] kept as a small JSON document on disk.
///
/// A missing file reads as "no preference yet"; anything else that goes
/// wrong surfaces as an error for the caller to log and shrug off.
pub struct JsonPreferenceStore {
    path: PathBuf,
}

impl JsonPreferenceStore {
    /// Creates a store persisting to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where the preference lives.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn load(&self) -> Result<Option<TierMode>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(error).with_context(|| {
                    format!(
                        "Failed to read tier preference from {}",
                        self.path.display()
                    )
                })
            }
        };
        let mode = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed tier preference in {}", self.path.display()))?;
        Ok(Some(mode))
    }

    fn save(&self, mode: TierMode) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create preference directory {}",
                        parent.display()
                    )
                })?;
            }
        }
        let contents = serde_json::to_string_pretty(&mode)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write tier preference to {}", self.path.display()))
    }
}

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

//! Errors surfaced at the configuration and export boundaries.
//!
//! Timing itself never fails; only parsing configuration and serializing
//! snapshots can.

use thiserror::Error;

/// A specialized `Result` type for timings operations.
pub type TimingsResult<T> = Result<T, TimingsError>;

/// An error that can occur outside of the timing hot path.
#[derive(Debug, Error)]
pub enum TimingsError {
    /// The configuration could not be parsed.
    #[error("invalid timings configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// A snapshot could not be serialized.
    #[error("failed to serialize timings export: {0}")]
    Export(#[source] serde_json::Error),
}

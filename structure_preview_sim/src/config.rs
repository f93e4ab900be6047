// Data-driven preview configuration.
//
// `PreviewConfig` holds the few tunables the preview core needs, loaded from
// JSON by the host at startup (`from_json_str()`), with `Default` values
// suitable for vanilla templates:
//
// - `background_block`: descriptor returned for grid cells no block record
//   covers. Templates routinely omit air, so the grid needs a concrete value
//   for those cells instead of an undefined read.
// - `max_template_volume`: upper bound on `width * height * length` for a
//   grid build. A corrupt or hostile size declaration fails with
//   `TemplateTooLarge` before anything is allocated.
// - `initial_facing`: facing applied when a proxy is constructed. `None`
//   builds the unrotated geometry.
//
// Unknown fields are rejected so a typo in a config file surfaces as an
// error rather than a silently ignored setting.
//
// See also: `proxy.rs` which reads the config at construction and on every
// `rotate()`, `error.rs` for `PreviewError::Config`.

use crate::error::PreviewResult;
use crate::types::{BlockState, Facing};
use serde::{Deserialize, Serialize};

/// 256³ cells.
pub const DEFAULT_MAX_TEMPLATE_VOLUME: u64 = 256 * 256 * 256;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// Descriptor for cells with no block record.
    pub background_block: BlockState,

    /// Largest grid (in cells) a build will allocate.
    pub max_template_volume: u64,

    /// Facing applied at construction.
    pub initial_facing: Option<Facing>,
}

impl PreviewConfig {
    pub fn from_json_str(json: &str) -> PreviewResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            background_block: BlockState::air(),
            max_template_volume: DEFAULT_MAX_TEMPLATE_VOLUME,
            initial_facing: None,
        }
    }
}

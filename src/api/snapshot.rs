use serde::{Deserialize, Serialize};

use crate::core::{Offset, PointRef, Viewport, ZoomScale};
use crate::error::{InteractionError, InteractionResult};
use crate::interaction::{InteractionHandler, InteractionKind};

use super::ChartSurface;

pub const SURFACE_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Serializable view of the surface for debugging and regression fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSnapshot {
    pub viewport: Viewport,
    pub scale: ZoomScale,
    pub translate: Offset,
    pub min_scale: f64,
    pub hover_target: Option<PointRef>,
    /// Selection in insertion order.
    pub selection: Vec<PointRef>,
    pub drag_owner: Option<String>,
    pub interactions: Vec<InteractionSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionSnapshot {
    pub id: String,
    pub kind: InteractionKind,
    pub enabled: bool,
    pub pending_work: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: SurfaceSnapshot,
}

impl SurfaceSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> InteractionResult<String> {
        let payload = SurfaceSnapshotJsonContractV1 {
            schema_version: SURFACE_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            InteractionError::Serialization(format!(
                "failed to serialize surface snapshot contract v1: {e}"
            ))
        })
    }

    /// Accepts either a bare snapshot or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> InteractionResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<SurfaceSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: SurfaceSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            InteractionError::Serialization(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != SURFACE_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(InteractionError::Serialization(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

impl ChartSurface {
    #[must_use]
    pub fn snapshot(&self) -> SurfaceSnapshot {
        SurfaceSnapshot {
            viewport: self.viewport,
            scale: self.view.scale(),
            translate: self.view.translate(),
            min_scale: self.view.min_scale(),
            hover_target: self.view.hover_target(),
            selection: self.view.selection().iter().copied().collect(),
            drag_owner: self.registry.drag_owner().map(str::to_owned),
            interactions: self
                .registry
                .iter()
                .map(|interaction| InteractionSnapshot {
                    id: interaction.id().to_owned(),
                    kind: interaction.kind(),
                    enabled: interaction.enabled(),
                    pending_work: interaction.has_pending_work(),
                })
                .collect(),
        }
    }

    pub fn snapshot_json_contract_v1_pretty(&self) -> InteractionResult<String> {
        self.snapshot().to_json_contract_v1_pretty()
    }
}

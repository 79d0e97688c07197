//! Name-to-reader registry.
//!
//! A static mapping from dataset names to the closed set of reader kinds.
//! Read-only after initialization; unknown names fail immediately.

use crate::error::UnisetError;

/// The supported dataset kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatasetKind {
    Cars3d,
    Cub,
    Pascal3d,
    CelebA,
    BeardGlasses,
    Afhq,
}

impl DatasetKind {
    /// Every supported kind, in registry order.
    pub const ALL: [DatasetKind; 6] = [
        DatasetKind::Cars3d,
        DatasetKind::Cub,
        DatasetKind::Pascal3d,
        DatasetKind::CelebA,
        DatasetKind::BeardGlasses,
        DatasetKind::Afhq,
    ];

    /// The registry name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            DatasetKind::Cars3d => "cars3d",
            DatasetKind::Cub => "cub",
            DatasetKind::Pascal3d => "pascal3d",
            DatasetKind::CelebA => "celeba",
            DatasetKind::BeardGlasses => "beard2glasses",
            DatasetKind::Afhq => "afhq",
        }
    }
}

/// Resolves a dataset name to its kind.
pub fn resolve(name: &str) -> Result<DatasetKind, UnisetError> {
    DatasetKind::ALL
        .iter()
        .copied()
        .find(|kind| kind.name() == name)
        .ok_or_else(|| UnisetError::UnknownDataset(name.to_string()))
}

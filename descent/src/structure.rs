//! The merged block structure that generation produces.

use std::collections::BTreeMap;
use std::sync::Arc;

use descent_base::math::{
    AxisBox, Face6, GridCoordinate, GridPoint, GridRotation, GridVector, Transform,
};

use crate::piece::Piece;
use crate::template::{Template, TemplateId};

/// What a placed piece is for.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum PieceRole {
    /// The room the dungeon is entered from.
    Start,
    /// The room the dungeon is meant to be finished in.
    End,
    /// Any other room.
    Room,
    /// Part of a corridor between rooms.
    Corridor,
}

/// Record of one piece placed into a [`Structure`].
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct Placement {
    /// What the piece is for.
    pub role: PieceRole,
    /// The template the piece is an instance of.
    pub template: TemplateId,
    /// Volume the piece occupies.
    pub bounds: AxisBox,
    /// Translation part of the transform from template space.
    pub translation: [GridCoordinate; 3],
    /// Images of the template's +X, +Y and +Z axes.
    pub rotation: [Face6; 3],
}

impl Placement {
    fn new(role: PieceRole, piece: &Piece) -> Self {
        let transform = piece.transform();
        Self {
            role,
            template: piece.template().clone(),
            bounds: piece.bounds(),
            translation: transform.translation.to_array(),
            rotation: transform.rotation.to_basis(),
        }
    }

    /// The transform from template space to this placement.
    pub fn transform(&self) -> Option<Transform> {
        let rotation = GridRotation::from_basis(self.rotation)?;
        Some(Transform {
            rotation,
            translation: self.translation.into(),
        })
    }
}

/// A set of named blocks at integer positions, together with the record of which
/// pieces contributed them.
///
/// Positions are kept ordered, so equal structures serialize identically.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Serialize)]
pub struct Structure {
    placements: Vec<Placement>,
    #[serde(serialize_with = "serialize_blocks")]
    blocks: BTreeMap<[GridCoordinate; 3], Arc<str>>,
}

impl Structure {
    /// Constructs an empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the blocks of `template`, moved as `piece` is, into this structure and
    /// records the placement. `piece` must be an instance of `template`.
    ///
    /// Blocks already present at the same positions are replaced.
    pub fn place(&mut self, template: &Template, piece: &Piece, role: PieceRole) {
        debug_assert_eq!(&template.id, piece.template());
        let transform = piece.transform();
        for block in &template.blocks {
            let position = transform.transform_cube(block.position.into());
            self.blocks.insert(position.to_array(), block.block.clone());
        }
        self.placements.push(Placement::new(role, piece));
    }

    /// Overlays `other` onto this structure; where both have a block, `other`'s wins.
    pub fn merge(&mut self, other: Structure) {
        self.placements.extend(other.placements);
        self.blocks.extend(other.blocks);
    }

    /// Returns a copy of this structure displaced by `offset`.
    #[must_use]
    pub fn translated(&self, offset: GridVector) -> Self {
        Self {
            placements: self
                .placements
                .iter()
                .map(|p| Placement {
                    bounds: p.bounds.translate(offset),
                    translation: (GridVector::from(p.translation) + offset).to_array(),
                    ..p.clone()
                })
                .collect(),
            blocks: self
                .blocks
                .iter()
                .map(|(&position, block)| {
                    (
                        (GridPoint::from(position) + offset).to_array(),
                        block.clone(),
                    )
                })
                .collect(),
        }
    }

    /// Sets the block at `position`, replacing any block already there.
    pub fn set_block(&mut self, position: GridPoint, block: impl Into<Arc<str>>) {
        self.blocks.insert(position.to_array(), block.into());
    }

    /// Returns the name of the block at `position`, if any.
    pub fn block(&self, position: GridPoint) -> Option<&str> {
        self.blocks.get(&position.to_array()).map(|b| &**b)
    }

    /// All blocks, ordered by position.
    pub fn blocks(&self) -> impl Iterator<Item = (GridPoint, &str)> {
        self.blocks
            .iter()
            .map(|(&position, block)| (GridPoint::from(position), &**block))
    }

    /// Pieces placed, in placement order.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Smallest box containing every placement and every block, or [`None`] if the
    /// structure is empty.
    pub fn bounds(&self) -> Option<AxisBox> {
        self.placements
            .iter()
            .map(|p| p.bounds)
            .chain(
                self.blocks
                    .keys()
                    .map(|&position| AxisBox::single_cube(position.into())),
            )
            .reduce(|a, b| a.union(b))
    }
}

fn serialize_blocks<S: serde::Serializer>(
    blocks: &BTreeMap<[GridCoordinate; 3], Arc<str>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    #[derive(serde::Serialize)]
    struct Entry<'a> {
        position: &'a [GridCoordinate; 3],
        block: &'a str,
    }

    serializer.collect_seq(
        blocks
            .iter()
            .map(|(position, block)| Entry { position, block }),
    )
}

//! # Spatial Index
//!
//! R-tree wrapper for bounding-box prefiltering of land features.
//! Each entry carries the geographic envelope of one feature and its
//! position in the owning dataset.
//!
//! ## Table of Contents
//! 1. LandSpatialIndex — R-tree wrapper
//! 2. IndexedFeature — R-tree entry

use rstar::{RTree, RTreeObject, AABB};

use crate::window::GeoWindow;

// ============================================================================
// 1. LandSpatialIndex — R-tree wrapper
// ============================================================================

/// R-tree of feature envelopes in WGS84 degrees.
pub struct LandSpatialIndex {
    tree: RTree<IndexedFeature>,
}

impl LandSpatialIndex {
    /// Build the R-tree from every feature envelope at once
    pub fn bulk_load(features: Vec<IndexedFeature>) -> Self {
        Self {
            tree: RTree::bulk_load(features),
        }
    }

    /// Positions of all features whose envelope intersects `window`,
    /// in ascending order so scans are reproducible.
    pub fn query_window(&self, window: &GeoWindow) -> Vec<usize> {
        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&window.envelope())
            .map(|f| f.index)
            .collect();
        hits.sort_unstable();
        hits
    }

    /// Number of indexed features
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

// ============================================================================
// 2. IndexedFeature — R-tree entry
// ============================================================================

/// A feature envelope in the spatial index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedFeature {
    /// Position of the feature in the owning dataset
    pub index: usize,
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl RTreeObject for IndexedFeature {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.min_lon, self.min_lat], [self.max_lon, self.max_lat])
    }
}

impl IndexedFeature {
    /// Create from a bounding rectangle in geographic degrees
    pub fn from_rect(index: usize, rect: geo::Rect<f64>) -> Self {
        Self {
            index,
            min_lon: rect.min().x,
            min_lat: rect.min().y,
            max_lon: rect.max().x,
            max_lat: rect.max().y,
        }
    }
}

use geo_types::Rect;
use rstar::{AABB, RTree, RTreeObject};

/// Minimal spatial-index abstraction: bounding boxes in, candidate ids out.
///
/// The index is a pruning step only. Exact geometry tests stay on the
/// caller's side, which keeps construction and query isolated as the hot
/// path for optimization and testing.
pub trait SpatialIndex {
    fn insert(&mut self, id: u64, bbox: Rect<f64>);
    /// Ids of every entry whose bounding box intersects `bbox`.
    fn query(&self, bbox: &Rect<f64>) -> Vec<u64>;
}

#[derive(Debug, Clone)]
struct IndexedBox {
    id: u64,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// R-tree backed index. Sub-quadratic neighbor discovery is a hard
/// requirement at city scale; a naive all-pairs scan is unacceptable.
#[derive(Debug, Default)]
pub struct RTreeIndex {
    tree: RTree<IndexedBox>,
}

impl RTreeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk loading beats repeated insertion for the one-shot batch build
    /// the pipeline does.
    pub fn bulk_load(boxes: impl IntoIterator<Item = (u64, Rect<f64>)>) -> Self {
        let items = boxes
            .into_iter()
            .map(|(id, bbox)| IndexedBox {
                id,
                envelope: to_aabb(&bbox),
            })
            .collect();
        Self {
            tree: RTree::bulk_load(items),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl SpatialIndex for RTreeIndex {
    fn insert(&mut self, id: u64, bbox: Rect<f64>) {
        self.tree.insert(IndexedBox {
            id,
            envelope: to_aabb(&bbox),
        });
    }

    fn query(&self, bbox: &Rect<f64>) -> Vec<u64> {
        self.tree
            .locate_in_envelope_intersecting(&to_aabb(bbox))
            .map(|entry| entry.id)
            .collect()
    }
}

fn to_aabb(rect: &Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
}

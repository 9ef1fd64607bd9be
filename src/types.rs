use std::collections::BTreeMap;
use std::ops::Range;


/// Sparse column -> count mapping for one vocabulary id. Ordered so rendered
/// rows come out in ascending column order.
pub type Row = BTreeMap<u32, u64>;

/// A unit of parallel work: its position in the partition and the parent
/// indices it covers.
pub type Chunk = (usize, Range<usize>);

/// Completion message of the rendering phase.
pub type RenderedChunk = (usize, Vec<Vec<u8>>);

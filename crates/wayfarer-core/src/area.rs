//! Connected-component (area) labelling.

/// Area label of nodes that cannot be walked on.
pub const NO_AREA: u32 = 0;

/// Label every node with a connected-component id.
///
/// Walkable nodes reachable from each other through walkable neighbours
/// share a label; labels start at 1 and are assigned in node order, so the
/// result is deterministic. Non-walkable nodes get [`NO_AREA`].
///
/// `neighbors(i, buf)` appends the neighbours of node `i` into `buf`; the
/// caller clears `buf` before each call. Edges are assumed symmetric.
pub fn label_areas(
    len: usize,
    walkable: impl Fn(usize) -> bool,
    mut neighbors: impl FnMut(usize, &mut Vec<usize>),
) -> Vec<u32> {
    let mut labels = vec![NO_AREA; len];
    let mut stack = Vec::new();
    let mut nbuf = Vec::with_capacity(8);
    let mut label = NO_AREA;

    for start in 0..len {
        if labels[start] != NO_AREA || !walkable(start) {
            continue;
        }
        label += 1;

        // Iterative DFS from `start`.
        stack.clear();
        stack.push(start);
        labels[start] = label;

        while let Some(ci) = stack.pop() {
            nbuf.clear();
            neighbors(ci, &mut nbuf);
            for &ni in &nbuf {
                if ni < len && labels[ni] == NO_AREA && walkable(ni) {
                    labels[ni] = label;
                    stack.push(ni);
                }
            }
        }
    }

    labels
}

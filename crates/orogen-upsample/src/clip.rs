//! Clips a single triangle against one axis-aligned threshold.

/// One vertex of a clipped polygon, relative to the input triangle's corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClipStep {
    /// Corner (0..2) of the input triangle, kept unchanged.
    Keep(usize),
    /// New vertex on the edge `from`-`to` at `lerp(values[from], values[to],
    /// ratio)`, which lands exactly on the threshold. `from` is always the
    /// clipped-away corner, so both triangles sharing the edge synthesize an
    /// identical vertex.
    Split { from: usize, to: usize, ratio: f64 },
}

/// Intersects the triangle `(values[0], values[1], values[2])` with the
/// half-plane `value >= threshold` (`keep_above`) or `value <= threshold`,
/// writing the resulting polygon into `out`.
///
/// The polygon has 0, 3, or 4 vertices and preserves the input winding. A
/// split whose ratio resolves to exactly 1 coincides with an already-kept
/// corner and is not emitted, so degenerate duplicates never appear; the
/// caller must drop polygons left with fewer than 3 vertices.
pub fn clip_axis(threshold: f64, keep_above: bool, values: [f64; 3], out: &mut Vec<ClipStep>) {
    out.clear();

    let behind = |v: f64| {
        if keep_above {
            v < threshold
        } else {
            v > threshold
        }
    };
    let b0 = behind(values[0]);
    let b1 = behind(values[1]);
    let b2 = behind(values[2]);
    let behind_count = b0 as u8 + b1 as u8 + b2 as u8;

    let ratio = |from: usize, to: usize| (threshold - values[from]) / (values[to] - values[from]);
    let split = |from: usize, to: usize| ClipStep::Split {
        from,
        to,
        ratio: ratio(from, to),
    };

    match behind_count {
        0 => {
            out.push(ClipStep::Keep(0));
            out.push(ClipStep::Keep(1));
            out.push(ClipStep::Keep(2));
        }
        1 => {
            // One corner clipped off: quad of the two kept corners plus the
            // two edge crossings, in the input winding.
            if b0 {
                out.push(ClipStep::Keep(1));
                out.push(ClipStep::Keep(2));
                if ratio(0, 2) != 1.0 {
                    out.push(split(0, 2));
                }
                if ratio(0, 1) != 1.0 {
                    out.push(split(0, 1));
                }
            } else if b1 {
                out.push(ClipStep::Keep(2));
                out.push(ClipStep::Keep(0));
                if ratio(1, 0) != 1.0 {
                    out.push(split(1, 0));
                }
                if ratio(1, 2) != 1.0 {
                    out.push(split(1, 2));
                }
            } else {
                out.push(ClipStep::Keep(0));
                out.push(ClipStep::Keep(1));
                if ratio(2, 1) != 1.0 {
                    out.push(split(2, 1));
                }
                if ratio(2, 0) != 1.0 {
                    out.push(split(2, 0));
                }
            }
        }
        2 => {
            // One corner kept: triangle of that corner plus the two edge
            // crossings. A kept corner sitting exactly on the threshold
            // leaves only a zero-width sliver; emit nothing.
            if !b0 && values[0] != threshold {
                out.push(ClipStep::Keep(0));
                out.push(split(1, 0));
                out.push(split(2, 0));
            } else if !b1 && values[1] != threshold {
                out.push(ClipStep::Keep(1));
                out.push(split(2, 1));
                out.push(split(0, 1));
            } else if !b2 && values[2] != threshold {
                out.push(ClipStep::Keep(2));
                out.push(split(0, 2));
                out.push(split(1, 2));
            }
        }
        _ => {}
    }
}

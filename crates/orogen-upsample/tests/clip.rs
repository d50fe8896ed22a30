use orogen_upsample::{ClipStep, clip_axis};

fn run(threshold: f64, keep_above: bool, values: [f64; 3]) -> Vec<ClipStep> {
    let mut out = Vec::new();
    clip_axis(threshold, keep_above, values, &mut out);
    out
}

#[test]
fn fully_inside_passes_through() {
    let out = run(10.0, true, [10.0, 20.0, 30.0]);
    assert_eq!(
        out,
        vec![ClipStep::Keep(0), ClipStep::Keep(1), ClipStep::Keep(2)]
    );
}

#[test]
fn fully_outside_emits_nothing() {
    assert!(run(10.0, true, [1.0, 2.0, 3.0]).is_empty());
    assert!(run(10.0, false, [11.0, 12.0, 13.0]).is_empty());
}

#[test]
fn one_outside_emits_quad_with_consistent_winding() {
    // Corner 0 clipped off; quad starts at corner 1 and walks the original
    // winding: 1, 2, crossing of edge 0-2, crossing of edge 0-1.
    let out = run(10.0, true, [0.0, 20.0, 20.0]);
    assert_eq!(
        out,
        vec![
            ClipStep::Keep(1),
            ClipStep::Keep(2),
            ClipStep::Split {
                from: 0,
                to: 2,
                ratio: 0.5
            },
            ClipStep::Split {
                from: 0,
                to: 1,
                ratio: 0.5
            },
        ]
    );

    // Same triangle, corner 1 clipped off.
    let out = run(10.0, true, [20.0, 0.0, 20.0]);
    assert_eq!(
        out,
        vec![
            ClipStep::Keep(2),
            ClipStep::Keep(0),
            ClipStep::Split {
                from: 1,
                to: 0,
                ratio: 0.5
            },
            ClipStep::Split {
                from: 1,
                to: 2,
                ratio: 0.5
            },
        ]
    );

    // Corner 2 clipped off.
    let out = run(10.0, true, [20.0, 20.0, 0.0]);
    assert_eq!(
        out,
        vec![
            ClipStep::Keep(0),
            ClipStep::Keep(1),
            ClipStep::Split {
                from: 2,
                to: 1,
                ratio: 0.5
            },
            ClipStep::Split {
                from: 2,
                to: 0,
                ratio: 0.5
            },
        ]
    );
}

#[test]
fn two_outside_emits_triangle() {
    let out = run(10.0, true, [30.0, 0.0, 0.0]);
    assert_eq!(
        out,
        vec![
            ClipStep::Keep(0),
            ClipStep::Split {
                from: 1,
                to: 0,
                ratio: 1.0 / 3.0
            },
            ClipStep::Split {
                from: 2,
                to: 0,
                ratio: 1.0 / 3.0
            },
        ]
    );
}

#[test]
fn keep_below_mirrors_keep_above() {
    let out = run(10.0, false, [30.0, 0.0, 0.0]);
    // Corner 0 clipped off instead.
    assert_eq!(out[0], ClipStep::Keep(1));
    assert_eq!(out[1], ClipStep::Keep(2));
    assert_eq!(out.len(), 4);
}

#[test]
fn split_landing_on_kept_corner_is_skipped() {
    // Corner 2 sits exactly on the threshold, so the edge 0-2 crossing
    // coincides with it; the result is a triangle, not a quad.
    let out = run(10.0, true, [0.0, 20.0, 10.0]);
    assert_eq!(
        out,
        vec![
            ClipStep::Keep(1),
            ClipStep::Keep(2),
            ClipStep::Split {
                from: 0,
                to: 1,
                ratio: 0.5
            },
        ]
    );
}

#[test]
fn sliver_against_threshold_is_dropped() {
    // The only non-clipped corner lies exactly on the threshold: the
    // intersection has no area.
    assert!(run(10.0, true, [10.0, 0.0, 0.0]).is_empty());
}

#[test]
fn vertices_on_threshold_count_as_inside_for_both_sides() {
    let above = run(10.0, true, [10.0, 10.0, 10.0]);
    let below = run(10.0, false, [10.0, 10.0, 10.0]);
    assert_eq!(above.len(), 3);
    assert_eq!(below.len(), 3);
}

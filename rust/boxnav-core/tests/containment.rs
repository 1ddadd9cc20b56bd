use boxnav_core::{OrientedBox, Pt};

fn rotated() -> OrientedBox {
    // AB = (-2, 2), BC = (3, 3); fourth corner D = (5, 3).
    OrientedBox::new(Pt::new(2.0, 0.0), Pt::new(0.0, 2.0), Pt::new(3.0, 5.0), Pt::new(2.5, 2.5))
}

#[test]
fn stackoverflow_reference_box() {
    let b = OrientedBox::new(Pt::new(5.0, 0.0), Pt::new(0.0, 2.0), Pt::new(1.0, 5.0), Pt::new(3.0, 3.0));
    assert!(b.point_is_inside(Pt::new(4.0, 2.0)));
    assert!(!b.point_is_inside(Pt::new(6.0, 1.0)));
}

#[test]
fn corners_and_edge_midpoints_are_inside() {
    let b = rotated();
    for p in b.corners() {
        assert!(b.point_is_inside(p), "corner {p:?}");
    }
    let [a, bb, c, d] = b.corners();
    for (p, q) in [(a, bb), (bb, c), (c, d), (d, a)] {
        let mid = (p + q) * 0.5;
        assert!(b.point_is_inside(mid), "midpoint {mid:?}");
    }
}

#[test]
fn each_projection_inequality_rejects_on_its_own() {
    let b = rotated();
    let center = Pt::new(2.5, 2.5);
    assert!(b.point_is_inside(center));
    let ab = b.edge_ab().normalized().unwrap();
    let bc = b.edge_bc().normalized().unwrap();
    let half_h = b.height() / 2.0;
    let half_w = b.width() / 2.0;
    // Past each of the four sides by a small margin.
    for outside in [
        center + ab * (half_h + 0.01),
        center - ab * (half_h + 0.01),
        center + bc * (half_w + 0.01),
        center - bc * (half_w + 0.01),
    ] {
        assert!(!b.point_is_inside(outside), "{outside:?}");
    }
    // Just inside each side.
    for inside in [
        center + ab * (half_h - 0.01),
        center - ab * (half_h - 0.01),
        center + bc * (half_w - 0.01),
        center - bc * (half_w - 0.01),
    ] {
        assert!(b.point_is_inside(inside), "{inside:?}");
    }
}

#[test]
fn axis_aligned_boundary_is_closed() {
    let b = OrientedBox::new(Pt::new(0.0, 0.0), Pt::new(0.0, 20.0), Pt::new(10.0, 20.0), Pt::new(5.0, 18.0));
    for p in [Pt::new(0.0, 7.0), Pt::new(10.0, 7.0), Pt::new(4.0, 0.0), Pt::new(4.0, 20.0)] {
        assert!(b.point_is_inside(p), "{p:?}");
    }
    assert!(!b.point_is_inside(Pt::new(-0.001, 7.0)));
    assert!(!b.point_is_inside(Pt::new(4.0, 20.001)));
}

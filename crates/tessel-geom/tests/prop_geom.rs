use proptest::num::f32::NORMAL;
use proptest::prelude::*;
use proptest::strategy::Strategy;
use tessel_geom::{BlockPos, Direction, Vec3};

fn approx_abs_rel(a: f32, b: f32, atol: f32, rtol: f32) -> bool {
    let diff = (a - b).abs();
    let scale = a.abs().max(b.abs());
    diff <= atol + rtol * scale
}

fn vapprox_abs_rel(a: Vec3, b: Vec3, atol: f32, rtol: f32) -> bool {
    approx_abs_rel(a.x, b.x, atol, rtol)
        && approx_abs_rel(a.y, b.y, atol, rtol)
        && approx_abs_rel(a.z, b.z, atol, rtol)
}

fn bounded_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e6)
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_f32(), bounded_f32(), bounded_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn arb_pos() -> impl Strategy<Value = BlockPos> {
    (-30_000_000i32..30_000_000, -512i32..512, -30_000_000i32..30_000_000)
        .prop_map(|(x, y, z)| BlockPos::new(x, y, z))
}

fn arb_dir() -> impl Strategy<Value = Direction> {
    (0usize..6).prop_map(|i| Direction::ALL[i])
}

proptest! {
    // Stepping out and back returns to the same block
    #[test]
    fn offset_then_opposite_is_identity(p in arb_pos(), d in arb_dir()) {
        prop_assert_eq!(p.offset(d).offset(d.opposite()), p);
    }

    // Offsets agree with the direction normal
    #[test]
    fn offset_matches_normal(p in arb_pos(), d in arb_dir()) {
        let q = p.offset(d);
        let n = d.normal();
        prop_assert_eq!((q.x - p.x) as f32, n.x);
        prop_assert_eq!((q.y - p.y) as f32, n.y);
        prop_assert_eq!((q.z - p.z) as f32, n.z);
    }

    // Addition then subtraction round-trips within float tolerance
    #[test]
    fn add_sub_inverse(a in arb_vec3(), b in arb_vec3()) {
        let c = (a + b) - b;
        prop_assert!(vapprox_abs_rel(c, a, 1e-1, 1e-5));
    }

    // Cross product is orthogonal to both inputs (for normalized inputs)
    #[test]
    fn cross_is_orthogonal(a in arb_vec3(), b in arb_vec3()) {
        let a = a.normalized();
        let b = b.normalized();
        let c = a.cross(b);
        prop_assert!(c.dot(a).abs() <= 1e-4);
        prop_assert!(c.dot(b).abs() <= 1e-4);
    }
}

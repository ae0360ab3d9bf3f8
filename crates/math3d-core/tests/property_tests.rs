//! Property tests for the kernel, the value stack and the handle table.

use math3d_core::kernel::{matrix, quat, vector};
use math3d_core::{LinearType, MathError, RefTable, ValueStack};
use proptest::prelude::*;

fn close(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol * (1.0 + a.abs().max(b.abs()))
}

fn unit_quat() -> impl Strategy<Value = [f32; 4]> {
    prop::array::uniform4(-1.0f32..1.0)
        .prop_filter("near-zero quaternion", |q| {
            q.iter().map(|x| x * x).sum::<f32>() > 0.01
        })
        .prop_map(|q| quat::normalize(&q))
}

fn positive_scale() -> impl Strategy<Value = [f32; 3]> {
    prop::array::uniform3(0.25f32..4.0)
}

fn translation() -> impl Strategy<Value = [f32; 3]> {
    prop::array::uniform3(-100.0f32..100.0)
}

fn nonzero_vec3() -> impl Strategy<Value = [f32; 3]> {
    prop::array::uniform3(-50.0f32..50.0).prop_filter("near-zero vector", |v| vector::length(v) > 1e-2)
}

fn any_tag() -> impl Strategy<Value = LinearType> {
    (0u8..5).prop_map(|b| LinearType::from_u8(b).expect("valid tag code"))
}

/// `q` and `-q` are the same rotation.
fn same_rotation(a: &[f32; 4], b: &[f32; 4], tol: f32) -> bool {
    let d = a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>();
    close(d.abs(), 1.0, tol)
}

proptest! {
    #[test]
    fn decompose_recovers_srt(s in positive_scale(), r in unit_quat(), t in translation()) {
        let (s2, r2, t2) = matrix::decompose(&matrix::srt(&s, &r, &t));
        for i in 0..3 {
            prop_assert!(close(s2[i], s[i], 1e-4), "scale {:?} vs {:?}", s2, s);
            prop_assert!(close(t2[i], t[i], 1e-6), "translation {:?} vs {:?}", t2, t);
        }
        prop_assert!(same_rotation(&r2, &r, 1e-4), "rotation {:?} vs {:?}", r2, r);
    }

    #[test]
    fn quat_matrix_round_trip(q in unit_quat()) {
        let back = quat::from_rotation_matrix(&quat::to_matrix(&q));
        prop_assert!(same_rotation(&back, &q, 1e-5), "{:?} vs {:?}", back, q);
    }

    #[test]
    fn normalize_is_idempotent(v in nonzero_vec3()) {
        let once = vector::normalize3(&v);
        let twice = vector::normalize3(&once);
        for i in 0..3 {
            prop_assert!(close(once[i], twice[i], 1e-6));
        }
        prop_assert!(close(vector::length(&once), 1.0, 1e-5));
    }

    #[test]
    fn quat_normalize_is_idempotent(q in prop::array::uniform4(-10.0f32..10.0)) {
        let once = quat::normalize(&q);
        let twice = quat::normalize(&once);
        for i in 0..4 {
            prop_assert!(close(once[i], twice[i], 1e-6));
        }
    }

    #[test]
    fn inverse_law(
        s in prop::array::uniform3(0.5f32..2.0),
        r in unit_quat(),
        t in prop::array::uniform3(-10.0f32..10.0),
    ) {
        let m = matrix::srt(&s, &r, &t);
        let inv = matrix::try_inverse(&m).expect("SRT with positive scale is invertible");
        let p = matrix::mul(&m, &inv);
        for (i, (x, y)) in p.iter().zip(matrix::IDENTITY.iter()).enumerate() {
            prop_assert!((x - y).abs() < 1e-3, "element {} = {}", i, x);
        }
    }

    #[test]
    fn dependent_columns_invert_to_none(
        r in unit_quat(),
        t in translation(),
        a in -3.0f32..3.0,
        b in -3.0f32..3.0,
    ) {
        let mut m = matrix::srt(&[1.0; 3], &r, &t);
        for k in 0..3 {
            m[8 + k] = a * m[k] + b * m[4 + k];
        }
        prop_assert!(matrix::try_inverse(&m).is_none(), "det {}", matrix::determinant(&m));
    }

    #[test]
    fn zero_scale_decompose_recomposes(
        s in positive_scale(),
        r in unit_quat(),
        t in translation(),
        zeros in prop::array::uniform3(any::<bool>()),
    ) {
        let mut s = s;
        for i in 0..3 {
            if zeros[i] {
                s[i] = 0.0;
            }
        }
        let m = matrix::srt(&s, &r, &t);
        let (s2, r2, t2) = matrix::decompose(&m);
        let back = matrix::srt(&s2, &r2, &t2);
        for i in 0..16 {
            prop_assert!(close(back[i], m[i], 1e-4), "element {}: {} vs {}", i, back[i], m[i]);
        }
    }

    #[test]
    fn mark_restore_is_identity(
        before in prop::collection::vec(any_tag(), 0..8),
        during in prop::collection::vec(any_tag(), 0..16),
    ) {
        let mut stack = ValueStack::default();
        for tag in &before {
            stack.push(*tag, &vec![1.0; tag.slots()]).unwrap();
        }
        let len = stack.len();
        let used = stack.used();
        let top = stack.top().ok().map(|(tag, data)| (tag, data.to_vec()));

        let mark = stack.mark();
        for tag in &during {
            stack.push(*tag, &vec![2.0; tag.slots()]).unwrap();
        }
        stack.restore(mark).unwrap();

        prop_assert_eq!(stack.len(), len);
        prop_assert_eq!(stack.used(), used);
        prop_assert_eq!(stack.top().ok().map(|(tag, data)| (tag, data.to_vec())), top);
    }

    #[test]
    fn retain_release_balance(extra in 0u32..16) {
        let mut table = RefTable::new();
        let id = table.promote(LinearType::Vector3, &[1.0, 2.0, 3.0]).unwrap();
        for _ in 0..extra {
            table.retain(id).unwrap();
        }
        for _ in 0..extra {
            table.release(id).unwrap();
            prop_assert!(table.read(id).is_ok());
        }
        prop_assert_eq!(table.release(id).unwrap(), 0);
        prop_assert_eq!(table.read(id).unwrap_err(), MathError::UnknownHandle(id));
    }
}

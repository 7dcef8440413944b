use opm_unshear::{host, GpuContext, GpuUnshear, GpuVolume};
use opm_volume::Volume;

fn synthetic_volume(shape: [usize; 3]) -> Volume<f32> {
    // Deterministic non-constant content; values stay in [0, 1] so the
    // cross-backend tolerance is meaningful in absolute terms.
    let numel: usize = shape.iter().product();
    let data = (0..numel)
        .map(|i| ((i * 2654435761) % 1000) as f32 / 1000.0)
        .collect();
    Volume::from_shape_vec(shape, data).expect("shape matches data")
}

#[test]
#[ignore = "requires a GPU adapter"]
fn gpu_matches_host_fractional_slope() {
    let ctx = GpuContext::new().expect("probe said no adapter is available");
    let pipeline = GpuUnshear::new(&ctx);

    let src = synthetic_volume([20, 30, 40]);

    for (sub_j, sup_i, slope) in [(1, 0, 1.7_f32), (2, 0, -0.6), (0, 2, 2.25)] {
        let expected = host::unshear(&src, sub_j, sup_i, slope).unwrap();

        let device_src = GpuVolume::upload(&ctx, &src);
        let device_dst = pipeline
            .unshear(&ctx, &device_src, sub_j, sup_i, slope)
            .unwrap();
        let actual = device_dst.download(&ctx).unwrap();

        assert_eq!(actual.shape, expected.shape);
        let max_abs_diff = actual
            .as_slice()
            .iter()
            .zip(expected.as_slice())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);
        assert!(
            max_abs_diff < 1e-4,
            "backends disagree: max abs diff {max_abs_diff} for axes ({sub_j}, {sup_i}), slope {slope}"
        );
    }
}

#[test]
#[ignore = "requires a GPU adapter"]
fn gpu_identity_and_integer_slope_exact() {
    let ctx = GpuContext::new().expect("probe said no adapter is available");
    let pipeline = GpuUnshear::new(&ctx);

    let src = synthetic_volume([8, 16, 12]);

    // Identity: exact equality, interpolation weights collapse to 1 and 0.
    let device_src = GpuVolume::upload(&ctx, &src);
    let identity = pipeline
        .unshear(&ctx, &device_src, 1, 0, 0.0)
        .unwrap()
        .download(&ctx)
        .unwrap();
    assert_eq!(identity.shape, src.shape);
    assert_eq!(identity.as_slice(), src.as_slice());

    // Integer slope: pure relocation, still exact.
    let expected = host::unshear(&src, 1, 0, 2.0).unwrap();
    let shifted = pipeline
        .unshear(&ctx, &device_src, 1, 0, 2.0)
        .unwrap()
        .download(&ctx)
        .unwrap();
    assert_eq!(shifted.shape, expected.shape);
    assert_eq!(shifted.as_slice(), expected.as_slice());
}

#[test]
fn probe_never_errors() {
    // The capability probe returns a choice on any machine; which one
    // depends on the hardware, so only the contract is asserted.
    let kind = opm_unshear::detect_backend();
    let engine = opm_unshear::Unshearer::auto();
    if kind == opm_unshear::BackendKind::Host {
        assert_eq!(engine.kind(), opm_unshear::BackendKind::Host);
    }
}

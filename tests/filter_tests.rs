use rftoolbox::element::{ElemType, Position};
use rftoolbox::error::RfError;
use rftoolbox::filter::ladder::synthesize_ladder;
use rftoolbox::filter::optimize::{optimize_order, OrderSearch};
use rftoolbox::filter::response::evaluate_response;
use rftoolbox::filter::{
    design_filter, FilterSpec, FilterSpecBuilder, ResponseFamily, Topology,
};
use rftoolbox::frequency::Frequency;
use rftoolbox::scale::Scale;
use rftoolbox::util::{comp_f64, NumMargin};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn mag_db_at(spec: &FilterSpec, freq: f64) -> f64 {
    20.0 * spec.transfer_function().unwrap().eval_freq(freq).norm().log10()
}

#[test]
fn test_butterworth_cutoff() {
    init();
    for order in 1..=10 {
        for topology in [Topology::Lowpass, Topology::Highpass] {
            let spec = FilterSpecBuilder::new()
                .topology(topology)
                .order(order)
                .cutoff_scaled(1.0, Scale::Giga)
                .build()
                .unwrap();
            let db = mag_db_at(&spec, 1e9);
            assert!((db + 3.01).abs() < 0.1, "order {} {}: {} dB", order, topology, db);
        }
    }
}

#[test]
fn test_default_ladder() {
    init();
    let design = design_filter(&FilterSpec::default()).unwrap();
    let ladder = design.ladder.unwrap();
    let reactive: Vec<_> = ladder.reactive().collect();
    assert_eq!(reactive.len(), 4);
    for (k, elem) in reactive.iter().enumerate() {
        if k % 2 == 0 {
            assert_eq!(elem.kind(), ElemType::Inductor);
            assert_eq!(elem.position(), Position::Series(k + 1));
        } else {
            assert_eq!(elem.kind(), ElemType::Capacitor);
            assert_eq!(elem.position(), Position::Shunt(k + 1));
        }
    }
    assert!((ladder.s21_db(1e9) + 3.01).abs() < 0.1);
    assert!((mag_db_at(&design.spec, 1e9) + 3.01).abs() < 0.1);
}

#[test]
fn test_highpass_ladder_swaps_elements() {
    let spec = FilterSpecBuilder::new()
        .topology(Topology::Highpass)
        .order(3)
        .build()
        .unwrap();
    let ladder = design_filter(&spec).unwrap().ladder.unwrap();
    let kinds: Vec<_> = ladder.reactive().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        vec![ElemType::Capacitor, ElemType::Inductor, ElemType::Capacitor]
    );
    let tf = spec.transfer_function().unwrap();
    for f in [0.2e9, 0.7e9, 1e9, 3e9] {
        comp_f64(
            &(20.0 * tf.eval_freq(f).norm().log10()),
            &ladder.s21_db(f),
            NumMargin::absolute(1e-6),
            "highpass",
            "s21",
        );
    }
}

#[test]
fn test_other_families_have_no_ladder() {
    let spec = FilterSpecBuilder::new()
        .family(ResponseFamily::ChebyshevI)
        .build()
        .unwrap();
    let design = design_filter(&spec).unwrap();
    assert!(design.ladder.is_none());
    assert!(matches!(
        synthesize_ladder(&design.transfer, 50.0, Topology::Lowpass),
        Err(RfError::InvalidSpec(_))
    ));
}

#[test]
fn test_family_edges() {
    let cheby = FilterSpecBuilder::new()
        .family(ResponseFamily::ChebyshevI)
        .ripple_db(0.5)
        .order(5)
        .build()
        .unwrap();
    comp_f64(&-0.5, &mag_db_at(&cheby, 1e9), NumMargin::absolute(1e-6), "cheby1", "edge");

    let inverse = FilterSpecBuilder::new()
        .family(ResponseFamily::ChebyshevII)
        .stopband_db(40.0)
        .order(5)
        .build()
        .unwrap();
    comp_f64(&-40.0, &mag_db_at(&inverse, 1e9), NumMargin::absolute(1e-6), "cheby2", "edge");

    let ellip = FilterSpecBuilder::new()
        .family(ResponseFamily::Elliptic)
        .ripple_db(1.0)
        .stopband_db(40.0)
        .order(4)
        .build()
        .unwrap();
    comp_f64(&-1.0, &mag_db_at(&ellip, 1e9), NumMargin::absolute(1e-6), "elliptic", "edge");
    let passband = Frequency::from_lin_range(1e6, 1e9, 500, Scale::Base).unwrap();
    let resp = evaluate_response(&ellip.transfer_function().unwrap(), &passband).unwrap();
    assert!(resp.max_mag_db() < 1e-6);
    assert!(resp.min_mag_db() > -1.0 - 1e-6);
}

#[test]
fn test_invalid_specs() {
    assert!(matches!(
        FilterSpecBuilder::new().order(0).build(),
        Err(RfError::InvalidSpec(_))
    ));
    assert!(matches!(
        FilterSpecBuilder::new()
            .topology(Topology::Bandpass)
            .band(2e9, 1e9)
            .build(),
        Err(RfError::InvalidSpec(_))
    ));
    assert!(matches!(
        FilterSpecBuilder::new()
            .topology(Topology::Bandstop)
            .band(1e9, 1e9)
            .build(),
        Err(RfError::InvalidSpec(_))
    ));
}

#[test]
fn test_response_needs_two_points() {
    let tf = FilterSpec::default().transfer_function().unwrap();
    let single = Frequency::from_vec(vec![1.0], Scale::Giga).unwrap();
    assert!(matches!(
        evaluate_response(&tf, &single),
        Err(RfError::InsufficientSamples { required: 2, got: 1 })
    ));
}

#[test]
fn test_group_delay_positive_in_passband() {
    let tf = FilterSpec::default().transfer_function().unwrap();
    let sweep = Frequency::from_lin_range(0.1, 0.9, 81, Scale::Giga).unwrap();
    let resp = evaluate_response(&tf, &sweep).unwrap();
    assert_eq!(resp.npts(), 81);
    assert!(resp.group_delay().iter().all(|&t| t > 0.0));
    assert!(resp.phase_deg()[80] < resp.phase_deg()[0]);
}

#[test]
fn test_optimize_idempotent() {
    init();
    let spec = FilterSpecBuilder::new().order(2).build().unwrap();
    let once = optimize_order(&spec, 40.0).unwrap();
    let twice = optimize_order(&once, 40.0).unwrap();
    assert_eq!(once, twice);

    let strict = OrderSearch::strict();
    let once = strict.run(&spec, 40.0).unwrap();
    assert!(once.order() > spec.order());
    assert_eq!(strict.run(&once, 40.0).unwrap(), once);
}

#[test]
fn test_bessel_order_search_steps_through_every_order() {
    init();
    let spec = FilterSpecBuilder::new()
        .family(ResponseFamily::Bessel)
        .order(5)
        .build()
        .unwrap();
    assert_eq!(optimize_order(&spec, 40.0).unwrap(), spec);
    for order in 1..=20 {
        assert!(design_filter(&spec.with_order(order).unwrap()).is_ok(), "bessel order {}", order);
    }
    match OrderSearch::strict().run(&spec, 60.0) {
        Ok(best) => assert!(best.order() >= 5),
        Err(RfError::UnreachableTarget { max_order, .. }) => assert_eq!(max_order, 20),
        Err(e) => panic!("bessel order search failed: {}", e),
    }
}

#[test]
fn test_serialize() {
    let spec = FilterSpecBuilder::new()
        .topology(Topology::Bandpass)
        .family(ResponseFamily::Elliptic)
        .band(2.3e9, 2.5e9)
        .order(3)
        .build()
        .unwrap();
    let text = serde_json::to_string(&spec).unwrap();
    let back: FilterSpec = serde_json::from_str(&text).unwrap();
    assert_eq!(spec, back);

    let design = design_filter(&FilterSpec::default()).unwrap();
    let value = serde_json::to_value(&design).unwrap();
    assert_eq!(value["ladder"]["elements"].as_array().unwrap().len(), 6);
}

use pk_core::units::{k, kw, m2, m3, w_per_m2k};
use pk_materials::catalog;
use pk_thermal::{NetworkBuilder, ThermalComponent, ThermalError, ThermalNetwork};
use proptest::prelude::*;

fn linked_pair(h: f64, area: f64) -> ThermalNetwork {
    let mut a = ThermalComponent::new("a", catalog::stainless_steel().unwrap(), m3(0.5), k(400.0));
    a.add_convection("b", w_per_m2k(h), m2(area));
    let mut b = ThermalComponent::new("b", catalog::water().unwrap(), m3(2.0), k(300.0));
    b.add_convection("a", w_per_m2k(h), m2(area));

    let mut builder = NetworkBuilder::new();
    builder.add(a);
    builder.add(b);
    builder.build().unwrap()
}

/// Forward-Euler march of the network for `steps` steps.
fn march(net: &ThermalNetwork, temps: &mut [f64], dt: f64, steps: usize) {
    let mut dtdt = vec![0.0; temps.len()];
    for n in 0..steps {
        net.derivatives(n as f64 * dt, temps, 0.0, &mut dtdt).unwrap();
        for (t, d) in temps.iter_mut().zip(&dtdt) {
            *t += dt * d;
        }
    }
}

proptest! {
    #[test]
    fn exchange_without_generation_conserves_energy(
        t_a in 250.0f64..900.0,
        t_b in 250.0f64..900.0,
        h in 1.0f64..5000.0,
        area in 0.01f64..5.0,
    ) {
        let net = linked_pair(h, area);
        let mut temps = [t_a, t_b];
        let e0 = net.total_energy_j(&temps).unwrap();

        march(&net, &mut temps, 0.01, 200);

        let e1 = net.total_energy_j(&temps).unwrap();
        prop_assert!(((e1 - e0) / e0).abs() < 1e-9);
    }

    #[test]
    fn exchange_never_overshoots(
        t_a in 250.0f64..900.0,
        t_b in 250.0f64..900.0,
    ) {
        let net = linked_pair(100.0, 1.0);
        let mut temps = [t_a, t_b];
        let (lo, hi) = (t_a.min(t_b), t_a.max(t_b));

        march(&net, &mut temps, 0.1, 100);

        for t in temps {
            prop_assert!(t >= lo - 1e-9 && t <= hi + 1e-9);
        }
    }
}

#[test]
fn equal_temperatures_without_generation_are_steady() {
    let net = linked_pair(7000.0, 2.5);
    let mut dtdt = [1.0, 1.0];
    net.derivatives(0.0, &[350.0, 350.0], 0.0, &mut dtdt).unwrap();
    assert_eq!(dtdt, [0.0, 0.0]);
}

#[test]
fn generation_scales_with_thermal_power() {
    let fuel = ThermalComponent::new("fuel", catalog::lookup("uzrh").unwrap(), m3(0.02), k(500.0))
        .with_heat_generation(kw(250.0));
    let mut builder = NetworkBuilder::new();
    builder.add(fuel);
    let net = builder.build().unwrap();

    let mut at_one = [0.0];
    let mut at_two = [0.0];
    net.derivatives(0.0, &[500.0], 1.0, &mut at_one).unwrap();
    net.derivatives(0.0, &[500.0], 2.0, &mut at_two).unwrap();
    assert!(at_one[0] > 0.0);
    assert!((at_two[0] - 2.0 * at_one[0]).abs() < 1e-12);
}

#[test]
fn asymmetric_declaration_is_rejected() {
    let mut a = ThermalComponent::new("a", catalog::water().unwrap(), m3(1.0), k(300.0));
    a.add_convection("b", w_per_m2k(10.0), m2(1.0));
    let mut b = ThermalComponent::new("b", catalog::water().unwrap(), m3(1.0), k(300.0));
    b.add_convection("a", w_per_m2k(20.0), m2(1.0));

    let mut builder = NetworkBuilder::new();
    builder.add(a);
    builder.add(b);
    let err = builder.build().unwrap_err();
    assert!(matches!(err, ThermalError::AsymmetricLink { .. }));
    assert!(err.is_configuration());
}

#[test]
fn missing_reciprocal_is_rejected() {
    let mut a = ThermalComponent::new("a", catalog::water().unwrap(), m3(1.0), k(300.0));
    a.add_convection("b", w_per_m2k(10.0), m2(1.0));
    let b = ThermalComponent::new("b", catalog::water().unwrap(), m3(1.0), k(300.0));

    let mut builder = NetworkBuilder::new();
    builder.add(a);
    builder.add(b);
    assert!(matches!(
        builder.build(),
        Err(ThermalError::MissingReciprocal { .. })
    ));
}

use std::path::PathBuf;

use pk_app::{compile_scenario, load_scenario, summarize};
use pk_sim::Simulation;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

#[test]
fn triga_demo_compiles() {
    let scenario = load_scenario(&demo("triga.yaml")).expect("load failed");
    let summary = summarize(&scenario);
    assert_eq!(summary.component_count, 2);
    assert_eq!(summary.link_count, 1);
    assert_eq!(summary.steps, 20_001);

    let setup = compile_scenario(&scenario).expect("compile failed");
    assert_eq!(setup.network.feedback_coefficients().len(), 1);
    let sim = Simulation::new(setup).expect("driver construction failed");
    assert_eq!(sim.history().len(), 1);
}

#[test]
fn flibe_demo_compiles() {
    let scenario = load_scenario(&demo("flibe_loss_of_sink.yaml")).expect("load failed");
    let setup = compile_scenario(&scenario).expect("compile failed");
    assert_eq!(setup.kinetics.decay_heat_groups(), 11);
    assert!(
        setup
            .network
            .components()
            .iter()
            .any(|c| c.heat_removal().is_some())
    );
}

#[test]
fn missing_file_is_reported() {
    let err = load_scenario(&demo("nope.yaml")).unwrap_err();
    assert!(matches!(err, pk_app::AppError::ScenarioFileRead { .. }));
}

#[test]
fn demo_survives_json_save_and_reload() {
    let scenario = load_scenario(&demo("triga.yaml")).expect("load failed");
    let path = std::env::temp_dir().join(format!("pk_app_triga_{}.json", std::process::id()));

    pk_app::save_scenario(&path, &scenario).expect("save failed");
    let reloaded = load_scenario(&path).expect("reload failed");
    assert_eq!(reloaded, scenario);

    let _ = std::fs::remove_file(&path);
}

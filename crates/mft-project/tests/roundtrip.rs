use mft_model::{CubicEnv, DimerEnv};
use mft_project::*;

fn sample_cubic() -> CubicDef {
    CubicDef {
        bz_points_per_dim: 8,
        tae: 0.2,
        tce: 1.0,
        tbe: 0.4,
        tao: 0.08,
        tco: 0.4,
        tbo: 0.16,
        m: 0.1,
        w: 0.01,
        mu: 0.0,
        beta: 100.0,
        b: 0.01,
        ja: 0.5,
        jc: 0.25,
        ka: 0.0,
        kc: 0.0,
        kb: 0.0,
        epsilon_m: 0.05,
        epsilon_r: 0.05,
        ions_only: false,
    }
}

#[test]
fn roundtrip_yaml_cubic() {
    let model = ModelDef::Cubic(sample_cubic());
    let path = std::env::temp_dir().join("mft_project_roundtrip_cubic.yaml");

    save_yaml(&path, &model).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(model, loaded);
}

#[test]
fn roundtrip_json_dimer_at_zero_temperature() {
    let mut env = DimerEnv::default();
    env.beta = f64::INFINITY;
    env.jb0 = 0.3;
    env.m01 = 1.0;
    let model = ModelDef::Dimer(DimerDef::from(&env));
    let path = std::env::temp_dir().join("mft_project_roundtrip_dimer.json");

    save_json(&path, &model).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let raw: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(raw["Model"], "Dimer");
    assert_eq!(raw["Beta"].as_f64(), Some(f64::MAX));

    let loaded = load_path(&path).unwrap();
    match loaded {
        ModelDef::Dimer(def) => {
            assert!(def.beta.is_infinite());
            assert_eq!(DimerEnv::from(&def).jb0, 0.3);
        }
        other => panic!("expected dimer, got {}", other.kind()),
    }
}

#[test]
fn parses_pascal_case_keys() {
    let text = r#"{
        "Model": "Cubic",
        "BZPointsPerDim": 6,
        "Tae": 0.2, "Tce": 1.0, "Tbe": 0.4,
        "Tao": 0.08, "Tco": 0.4, "Tbo": 0.16,
        "M": 1.0, "W": 1.0, "Mu": 0.0,
        "Beta": 1.7976931348623157e308,
        "B": 0.01, "Ja": 0.5, "Jc": 0.25,
        "Ka": 0.0, "Kc": 0.0, "Kb": 0.0,
        "EpsilonM": 0.05, "EpsilonR": 0.05
    }"#;
    let model = from_json_str(text).unwrap();
    let ModelDef::Cubic(def) = model else {
        panic!("expected cubic");
    };
    let env = CubicEnv::from(&def);
    assert_eq!(env.bz_points_per_dim, 6);
    assert!(env.beta.is_infinite());
    assert!(!env.ions_only);
}

#[test]
fn max_beta_written_for_infinite_temperature_inverse() {
    let mut def = sample_cubic();
    def.beta = f64::INFINITY;
    let text = to_json_string(&ModelDef::Cubic(def)).unwrap();
    let raw: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(raw["Beta"].as_f64(), Some(f64::MAX));
    assert!(!text.contains("IonsOnly"));
}

#[test]
fn final_output_reloads_as_model() {
    let result = FinalDef {
        model: ModelDef::Cubic(sample_cubic()),
        expectations: vec![("Dao".to_string(), 0.02), ("Dco".to_string(), 0.1)],
        free_energy: -1.5,
    };
    let path = std::env::temp_dir().join("mft_project_final.json");
    save_final_json(&path, &result).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"Dco\": 0.1"));
    assert!(text.contains("\"FreeEnergy\": -1.5"));

    let reloaded = load_json(&path).unwrap();
    assert_eq!(reloaded, result.model);
}

#[test]
fn missing_model_tag_is_an_error() {
    let text = r#"{ "BZPointsPerDim": 4, "Beta": 1.0 }"#;
    assert!(matches!(from_json_str(text), Err(ProjectError::Json(_))));
}

#[test]
fn invalid_values_fail_on_save() {
    let mut def = sample_cubic();
    def.beta = 0.0;
    let path = std::env::temp_dir().join("mft_project_invalid.json");
    let err = save_json(&path, &ModelDef::Cubic(def)).unwrap_err();
    assert!(matches!(err, ProjectError::Validation(_)));
}

#[test]
fn unknown_extension_rejected() {
    let path = std::path::Path::new("params.toml");
    assert!(matches!(load_path(path), Err(ProjectError::Format { .. })));
}

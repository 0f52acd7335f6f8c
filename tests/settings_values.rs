use chrono::{Datelike, Timelike};
use config::Map;
use rulebind::RulebindError;
use rulebind::settings::Settings;
use rulebind::value::{Scalar, ScalarType, Value, VariableKind, XSD};

#[test]
fn default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.enabled, vec!["IRIparts".to_string(), "thisYear".to_string()]);
    assert!(settings.fixed_now().unwrap().is_none());
}

#[test]
fn settings_from_toml() {
    let settings = Settings::from_toml(
        r#"
namespace = "urn:makub:builtIn#"
enabled = ["IRIparts"]
fixed_time = "2024-03-17T10:00:00"
"#,
    )
    .expect("valid toml");
    assert_eq!(settings.namespace, "urn:makub:builtIn#");
    assert_eq!(settings.enabled, vec!["IRIparts".to_string()]);
    // unspecified keys keep their defaults
    assert_eq!(settings.log_filter, Settings::default().log_filter);
    let now = settings.context().unwrap().now();
    assert_eq!(now.year(), 2024);
    assert_eq!(now.hour(), 10);
}

fn environment(vars: &[(&str, &str)]) -> Map<String, String> {
    vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn settings_load_reads_enabled_list_from_environment() {
    unsafe { std::env::set_var("RULEBIND_ENABLED", "thisYear") };
    let loaded = Settings::load(None);
    unsafe { std::env::remove_var("RULEBIND_ENABLED") };
    let settings = loaded.expect("a single name is a list of one");
    assert_eq!(settings.enabled, vec!["thisYear".to_string()]);
    assert_eq!(settings.namespace, Settings::default().namespace);
}

#[test]
fn settings_layer_file_under_environment() {
    let path = std::env::temp_dir().join(format!("rulebind-layering-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        "namespace = \"urn:file#\"\nenabled = [\"IRIparts\"]\nlog_filter = \"debug\"\n",
    )
    .unwrap();
    let vars = environment(&[
        ("RULEBIND_ENABLED", "thisYear,IRIparts"),
        ("RULEBIND_LOG_FILTER", "rulebind=trace"),
    ]);
    let loaded = Settings::load_from(path.to_str(), Settings::environment().source(Some(vars)));
    std::fs::remove_file(&path).unwrap();
    let settings = loaded.expect("file and environment");
    assert_eq!(settings.namespace, "urn:file#");
    assert_eq!(settings.enabled, vec!["thisYear".to_string(), "IRIparts".to_string()]);
    assert_eq!(settings.log_filter, "rulebind=trace");
}

#[test]
fn settings_load_requires_given_file() {
    let missing = std::env::temp_dir().join("rulebind-no-such-settings.toml");
    let result = Settings::load_from(missing.to_str(), Settings::environment().source(Some(environment(&[]))));
    assert!(matches!(result, Err(RulebindError::Config(_))));
}

#[test]
fn fixed_time_accepts_dates() {
    let settings = Settings { fixed_time: Some("2023-12-31".to_string()), ..Settings::default() };
    let now = settings.fixed_now().unwrap().expect("pinned");
    assert_eq!((now.year(), now.month(), now.day()), (2023, 12, 31));
}

#[test]
fn fixed_time_rejects_garbage() {
    let settings = Settings { fixed_time: Some("next tuesday".to_string()), ..Settings::default() };
    assert!(matches!(settings.fixed_now(), Err(RulebindError::Config(_))));
    assert!(settings.context().is_err());
}

#[test]
fn tracing_init_is_repeatable() {
    let settings = Settings::default();
    settings.init_tracing().expect("first");
    settings.init_tracing().expect("second is ignored");
}

#[test]
fn scalar_literals_are_validated() {
    assert!(Scalar::new("2024", ScalarType::Integer).is_ok());
    assert!(Scalar::new("-7", ScalarType::Integer).is_ok());
    assert!(Scalar::new("20x4", ScalarType::Integer).is_err());
    assert!(Scalar::new("3.14", ScalarType::Decimal).is_ok());
    assert!(Scalar::new("true", ScalarType::Boolean).is_ok());
    assert!(Scalar::new("yes", ScalarType::Boolean).is_err());
    assert!(Scalar::new("2024-02-29", ScalarType::Date).is_ok());
    assert!(Scalar::new("2023-02-29", ScalarType::Date).is_err());
    assert!(Scalar::new("2024-02-29T12:00:00", ScalarType::DateTime).is_ok());
    // timezones are optional on both
    assert!(Scalar::new("2024-01-01T00:00:00Z", ScalarType::DateTime).is_ok());
    assert!(Scalar::new("2024-01-01T00:00:00+02:00", ScalarType::DateTime).is_ok());
    assert!(Scalar::new("2024-01-01T00:00:00.250-05:30", ScalarType::DateTime).is_ok());
    assert!(Scalar::new("2024-01-01Z", ScalarType::Date).is_ok());
    assert!(Scalar::new("2024-01-01-03:00", ScalarType::Date).is_ok());
    assert!(Scalar::new("2024-01-01T00:00:00+25:00", ScalarType::DateTime).is_err());
    assert!(Scalar::new("2024-01-01 00:00:00", ScalarType::DateTime).is_err());
    assert!(Scalar::new("2023-02-29Z", ScalarType::Date).is_err());
    let err = Scalar::new("twelve", ScalarType::Integer).unwrap_err();
    assert!(format!("{err}").contains("xsd:integer"));
}

#[test]
fn scalar_types_map_to_xsd() {
    assert_eq!(ScalarType::Integer.iri(), format!("{XSD}integer"));
    assert_eq!(ScalarType::from_iri(&format!("{XSD}string")), ScalarType::String);
    let custom = ScalarType::from_iri("urn:type#money");
    assert_eq!(custom, ScalarType::Other("urn:type#money".to_string()));
    assert_eq!(custom.iri(), "urn:type#money");
}

#[test]
fn values_know_their_kind() {
    assert_eq!(Value::entity("urn:a").kind(), VariableKind::Entity);
    assert_eq!(Value::integer(5).kind(), VariableKind::Scalar);
    assert_eq!(Value::integer(5).as_scalar().and_then(Scalar::as_i64), Some(5));
    assert_eq!(Value::entity("urn:a").as_entity().map(|e| e.id()), Some("urn:a"));
    assert_eq!(Value::string("a").to_string(), "\"a\"^^xsd:string");
}

/*!
 * Tests for application configuration functionality
 */

use smisub::app_config::{Config, LogLevel};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.sami.class_marker, "<P Class=KRCC>");
    assert_eq!(config.sami.last_cue_duration_ms, 1000);
    assert!(!config.sami.repair_in_place);
    assert!(config.sami.forced_encoding.is_none());
    assert_eq!(config.output.extension, "srt");
    assert!(!config.output.force_overwrite);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.sami.class_marker = "KRCC".to_string();
    assert!(config.validate().is_err());
    config.sami.class_marker = "<P Class=ENCC>".to_string();
    assert!(config.validate().is_ok());

    config.sami.last_cue_duration_ms = 0;
    assert!(config.validate().is_err());
    config.sami.last_cue_duration_ms = 1500;

    config.sami.forced_encoding = Some("not-an-encoding".to_string());
    assert!(config.validate().is_err());
    config.sami.forced_encoding = Some("cp949".to_string());
    assert!(config.validate().is_ok());

    config.output.extension = "".to_string();
    assert!(config.validate().is_err());
    config.output.extension = ".srt".to_string();
    assert!(config.validate().is_ok());
}

/// Test deserializing a partial config file
#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() {
    let json = r#"{ "sami": { "repair_in_place": true, "encoding_hint_tld": "kr" }, "log_level": "debug" }"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert!(config.sami.repair_in_place);
    assert_eq!(config.sami.encoding_hint_tld.as_deref(), Some("kr"));
    assert_eq!(config.sami.class_marker, "<P Class=KRCC>");
    assert_eq!(config.sami.last_cue_duration_ms, 1000);
    assert_eq!(config.output.extension, "srt");
    assert_eq!(config.log_level, LogLevel::Debug);
}

/// Test that a serialized default config can be read back
#[test]
fn test_config_serialize_withDefaults_shouldReadBackSameValues() {
    let json = serde_json::to_string_pretty(&Config::default()).unwrap();
    let config: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(config.sami.class_marker, "<P Class=KRCC>");
    assert_eq!(config.output.extension, "srt");
}

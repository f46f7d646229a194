use rstest::rstest;
use std::fs;
use tempfile::tempdir;
use valve_config::{load_file, load_toml};

#[test]
fn accepts_full_config() {
    let toml = r#"
[serial]
port = "COM11"
baud = 115200
timeout_s = 0.5

[logging]
file = "valve.log"
level = "debug"
rotation = "daily"
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.serial.port, "COM11");
    assert_eq!(cfg.serial.baud, 115_200);
    assert_eq!(cfg.logging.rotation.as_deref(), Some("daily"));
}

#[rstest]
#[case("[serial]\nbaud = 0\n", "serial.baud must be > 0")]
#[case("[serial]\ntimeout_s = 0.0\n", "serial.timeout_s must be a positive")]
#[case("[serial]\ntimeout_s = -1.0\n", "serial.timeout_s must be a positive")]
#[case("[serial]\ntimeout_s = 600.0\n", "unreasonably large")]
#[case("[serial]\nport = \"  \"\n", "serial.port must not be empty")]
#[case("[logging]\nrotation = \"weekly\"\n", "logging.rotation must be one of")]
#[case("[logging]\nlevel = \"loud\"\n", "logging.level must be one of")]
#[case("[logging]\nfile = \"\"\n", "logging.file must not be empty")]
fn rejects_invalid_values(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should be rejected");
    assert!(
        format!("{err}").contains(needle),
        "error {err} should mention {needle:?}"
    );
}

#[test]
fn wrong_type_is_a_parse_error() {
    assert!(load_toml("[serial]\nbaud = \"fast\"\n").is_err());
}

#[test]
fn load_file_reads_and_validates() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.toml");
    fs::write(&good, "[serial]\nport = \"/dev/ttyUSB0\"\n").unwrap();
    let cfg = load_file(&good).expect("valid file loads");
    assert_eq!(cfg.serial.port, "/dev/ttyUSB0");

    let bad = dir.path().join("bad.toml");
    fs::write(&bad, "[serial]\nbaud = 0\n").unwrap();
    let err = load_file(&bad).expect_err("invalid file rejected");
    assert!(format!("{err}").contains("serial.baud"));

    let missing = dir.path().join("missing.toml");
    let err = load_file(&missing).expect_err("missing file rejected");
    assert!(format!("{err}").contains("read config"));
}

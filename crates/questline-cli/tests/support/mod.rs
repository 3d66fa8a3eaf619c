use assert_cmd::Command;
use tempfile::TempDir;

pub fn new_command_with_temp_home() -> (Command, TempDir) {
    let temp_home = tempfile::tempdir().expect("temp home");
    let mut command = Command::cargo_bin("questline").expect("questline binary");
    command.env("HOME", temp_home.path());
    (command, temp_home)
}

pub fn write_config(temp_home: &TempDir, raw: &str) {
    let config_dir = temp_home.path().join(".config").join("questline");
    std::fs::create_dir_all(&config_dir).expect("config dir");
    std::fs::write(config_dir.join("config.toml"), raw).expect("write config");
}

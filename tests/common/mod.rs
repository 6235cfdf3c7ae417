#![allow(dead_code)]

pub mod mock_api;
pub mod server;

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Helper struct to run deskbox commands in an isolated temp directory
pub struct DeskboxTest {
    pub temp_dir: TempDir,
    binary_path: String,
    envs: Vec<(String, String)>,
}

impl DeskboxTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let binary_path = if cfg!(debug_assertions) {
            concat!(env!("CARGO_MANIFEST_DIR"), "/target/debug/deskbox")
        } else {
            concat!(env!("CARGO_MANIFEST_DIR"), "/target/release/deskbox")
        };

        let binary_path = if std::path::Path::new(binary_path).exists() {
            binary_path.to_string()
        } else {
            env!("CARGO_BIN_EXE_deskbox").to_string()
        };

        DeskboxTest {
            temp_dir,
            binary_path,
            envs: Vec::new(),
        }
    }

    /// Set an environment variable for every command run by this harness
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let mut command = Command::new(&self.binary_path);
        command
            .args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("DESKBOX_API_URL")
            .env_remove("DESKBOX_TOKEN")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        for (key, value) in &self.envs {
            command.env(key, value);
        }
        command.output().expect("Failed to execute deskbox command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn read_config(&self) -> String {
        let path = self.temp_dir.path().join(".deskbox").join("config.yaml");
        fs::read_to_string(path).expect("Failed to read config file")
    }

    pub fn write_config(&self, content: &str) {
        let dir = self.temp_dir.path().join(".deskbox");
        fs::create_dir_all(&dir).expect("Failed to create .deskbox directory");
        fs::write(dir.join("config.yaml"), content).expect("Failed to write config file");
    }
}

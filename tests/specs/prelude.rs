//! Shared helpers for CLI specs

use std::path::PathBuf;
use std::process::Output;

use tempfile::TempDir;

pub const ISSUER: &str = "/CN=Test CA";

/// Directory, users, and services shared by most specs
pub const DEFAULT_CONFIG: &str = r#"
apps = ["detox", "dealer"]

[[users]]
id = 10
name = "alice"
subject = "/CN=alice"
issuer = "/CN=Test CA"
authorized = true

[[users]]
id = 11
name = "bob"
subject = "/CN=bob"
issuer = "/CN=Test CA"
authorized = true

[[users]]
id = 12
name = "carol"
subject = "/CN=carol"
issuer = "/CN=Test CA"

[[users]]
id = 13
name = "ops"
subject = "/CN=ops"
issuer = "/CN=Test CA"
authorized = true
can_impersonate = true

[[services]]
id = 2
name = "dynamo"
"#;

/// Isolated state and socket directories for one daemon
pub struct Project {
    dir: TempDir,
}

impl Project {
    /// No configuration file
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// The default configuration
    pub fn configured() -> Self {
        Self::with_config(DEFAULT_CONFIG)
    }

    pub fn with_config(content: &str) -> Self {
        let project = Self::empty();
        std::fs::create_dir_all(project.state_dir()).unwrap();
        std::fs::write(project.state_dir().join("config.toml"), content).unwrap();
        project
    }

    pub fn state_dir(&self) -> PathBuf {
        self.dir.path().join("state")
    }

    fn socket_dir(&self) -> PathBuf {
        self.dir.path().join("sock")
    }

    /// The CLI with no identity
    pub fn alock(&self) -> CliBuilder {
        let mut cmd = assert_cmd::Command::cargo_bin("alock").unwrap();
        cmd.env("ALOCK_STATE_DIR", self.state_dir())
            .env("ALOCK_SOCKET_DIR", self.socket_dir())
            .env("ALOCK_DAEMON_BINARY", assert_cmd::cargo::cargo_bin("alockd"))
            .env_remove("ALOCK_SUBJECT")
            .env_remove("ALOCK_ISSUER");
        CliBuilder { cmd }
    }

    /// The CLI authenticated as a configured user
    pub fn alock_as(&self, user: &str) -> CliBuilder {
        self.alock().args(&[
            "--subject",
            &format!("/CN={}", user),
            "--issuer",
            ISSUER,
        ])
    }

    /// Configure and start the daemon
    pub fn started() -> Self {
        let project = Self::configured();
        project.alock().args(&["daemon", "start"]).passes();
        project
    }
}

impl Drop for Project {
    fn drop(&mut self) {
        let _ = self.alock().args(&["daemon", "stop"]).cmd.output();
    }
}

pub struct CliBuilder {
    cmd: assert_cmd::Command,
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    /// Run and require exit status 0
    pub fn passes(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        let run = RunAssert { output };
        assert!(
            run.output.status.success(),
            "expected success\nstdout: {}\nstderr: {}",
            run.stdout(),
            run.stderr()
        );
        run
    }

    /// Run and require a non-zero exit status
    pub fn fails(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        let run = RunAssert { output };
        assert!(
            !run.output.status.success(),
            "expected failure\nstdout: {}\nstderr: {}",
            run.stdout(),
            run.stderr()
        );
        run
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain {:?}\nstdout: {}",
            expected,
            stdout
        );
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            !stdout.contains(unexpected),
            "stdout unexpectedly contains {:?}\nstdout: {}",
            unexpected,
            stdout
        );
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain {:?}\nstderr: {}",
            expected,
            stderr
        );
        self
    }
}

use std::fmt;
use std::path::Path;

use crate::config::{QuestlineConfig, load_config, resolve_config_path};
use crate::media::list_image_candidates;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Pass,
    Fail,
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorCheck {
    pub name: String,
    pub state: CheckState,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    pub checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    pub fn has_failures(&self) -> bool {
        self.checks
            .iter()
            .any(|check| check.state == CheckState::Fail)
    }

    pub fn summary(&self) -> String {
        let passed = self
            .checks
            .iter()
            .filter(|check| check.state == CheckState::Pass)
            .count();
        let failed = self.checks.len().saturating_sub(passed);
        format!("{passed} passed, {failed} failed")
    }
}

pub fn run_doctor(cwd: &Path) -> DoctorReport {
    let mut checks = Vec::new();

    match resolve_config_path() {
        Ok(config_path) => {
            if config_path.exists() {
                checks.push(pass_check(
                    "config file exists",
                    format!("found at {}", config_path.display()),
                ));

                match load_config(&config_path) {
                    Ok(config) => {
                        checks.push(pass_check("config parses and validates", "config is valid"));
                        push_media_checks(&mut checks, &config, cwd);
                    }
                    Err(error) => {
                        checks.push(fail_check("config parses and validates", error.to_string()));
                        push_skipped_checks(
                            &mut checks,
                            &["media directory exists", "media directory has images"],
                            "config is invalid",
                        );
                    }
                }
            } else {
                checks.push(pass_check(
                    "config file exists",
                    format!(
                        "not found at {}; defaults apply",
                        config_path.display()
                    ),
                ));
                checks.push(pass_check(
                    "config parses and validates",
                    "built-in defaults are always valid",
                ));
                push_media_checks(&mut checks, &QuestlineConfig::default(), cwd);
            }
        }
        Err(error) => {
            checks.push(fail_check("config path resolves", error.to_string()));
            push_skipped_checks(
                &mut checks,
                &[
                    "config file exists",
                    "config parses and validates",
                    "media directory exists",
                    "media directory has images",
                ],
                "config path could not be resolved",
            );
        }
    }

    DoctorReport { checks }
}

fn push_media_checks(checks: &mut Vec<DoctorCheck>, config: &QuestlineConfig, cwd: &Path) {
    let media_dir = config.media_dir(cwd);

    if !media_dir.is_dir() {
        checks.push(fail_check(
            "media directory exists",
            format!("{} is not a directory", media_dir.display()),
        ));
        checks.push(skipped_check(
            "media directory has images",
            "media directory is missing",
        ));
        return;
    }

    checks.push(pass_check(
        "media directory exists",
        format!("found at {}", media_dir.display()),
    ));

    match list_image_candidates(&media_dir, &config.media.extensions) {
        Ok(candidates) if candidates.is_empty() => {
            checks.push(fail_check(
                "media directory has images",
                format!(
                    "no files matching [{}] in {}",
                    config.media.extensions.join(", "),
                    media_dir.display()
                ),
            ));
        }
        Ok(candidates) => {
            checks.push(pass_check(
                "media directory has images",
                format!("{} candidate(s) found", candidates.len()),
            ));
        }
        Err(error) => {
            checks.push(fail_check("media directory has images", error.to_string()));
        }
    }
}

fn pass_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Pass,
        details: details.into(),
    }
}

fn fail_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Fail,
        details: details.into(),
    }
}

fn skipped_check(name: &str, reason: &str) -> DoctorCheck {
    fail_check(name, format!("skipped because {reason}"))
}

fn push_skipped_checks(checks: &mut Vec<DoctorCheck>, names: &[&str], reason: &str) {
    checks.extend(
        names
            .iter()
            .copied()
            .map(|name| skipped_check(name, reason)),
    );
}

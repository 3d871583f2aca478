//! The sample's application: the order API and the web frontend, each behind its
//! own sidecar, both exporting telemetry to the same place.

use crate::resources::{AppModel, DaprSidecar, ProjectResource};
use crate::telemetry::TelemetryExport;
use std::path::{Path, PathBuf};

pub const DEFAULT_DAPR_CLI: &str = "dapr";

pub const API_NAME: &str = "api";
pub const WEB_NAME: &str = "web";

#[derive(Debug, Clone)]
pub struct HostConfig {
    pub dapr_cli_path: PathBuf,
    /// Directory holding the `order-api` and `web-frontend` binaries.
    pub bin_dir: PathBuf,
    pub api_port: u16,
    pub api_dapr_http_port: u16,
    pub web_port: u16,
    pub web_dapr_http_port: u16,
    pub telemetry: TelemetryExport,
}

fn binary(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}{}", std::env::consts::EXE_SUFFIX))
}

fn sidecar(port: u16, telemetry: &TelemetryExport) -> DaprSidecar {
    telemetry
        .environment()
        .into_iter()
        .fold(DaprSidecar::new(port), |s, (k, v)| s.with_environment(k, v))
}

fn with_telemetry(project: ProjectResource, telemetry: &TelemetryExport) -> ProjectResource {
    telemetry
        .environment()
        .into_iter()
        .fold(project, |p, (k, v)| p.with_environment(k, v))
}

pub fn build_application(config: &HostConfig) -> AppModel {
    let telemetry = &config.telemetry;
    let mut model = AppModel::new(&config.dapr_cli_path);

    let api = ProjectResource::new(API_NAME, binary(&config.bin_dir, "order-api"))
        .with_app_port(config.api_port)
        .with_dapr_sidecar(sidecar(config.api_dapr_http_port, telemetry));
    model.add_project(with_telemetry(api, telemetry));

    let web = ProjectResource::new(WEB_NAME, binary(&config.bin_dir, "web-frontend"))
        .with_app_port(config.web_port)
        .with_dapr_sidecar(sidecar(config.web_dapr_http_port, telemetry))
        .with_environment("API_APP_ID", API_NAME);
    model.add_project(with_telemetry(web, telemetry));

    model
}

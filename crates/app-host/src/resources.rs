//! # Application Model
//!
//! Describes what the host runs: one entry per project (a service binary), each
//! with an optional sidecar. Built fluently and serializable, so `--manifest` can
//! print exactly what `launch` would start.
//!
//! ```rust
//! use app_host::resources::{AppModel, DaprSidecar, ProjectResource};
//!
//! let mut model = AppModel::new("dapr");
//! model.add_project(
//!     ProjectResource::new("api", "order-api")
//!         .with_app_port(5000)
//!         .with_dapr_sidecar(DaprSidecar::new(3500))
//!         .with_environment("RUST_LOG", "info"),
//! );
//! assert_eq!(model.projects[0].environment["APP_PORT"], "5000");
//! assert_eq!(model.projects[0].environment["DAPR_HTTP_PORT"], "3500");
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppModel {
    /// Sidecar CLI used to launch every project.
    pub dapr_cli_path: PathBuf,
    pub projects: Vec<ProjectResource>,
}

impl AppModel {
    pub fn new(dapr_cli_path: impl Into<PathBuf>) -> Self {
        Self {
            dapr_cli_path: dapr_cli_path.into(),
            projects: Vec::new(),
        }
    }

    pub fn add_project(&mut self, project: ProjectResource) -> &mut Self {
        self.projects.push(project);
        self
    }

    pub fn project(&self, name: &str) -> Option<&ProjectResource> {
        self.projects.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectResource {
    /// Also the sidecar app id.
    pub name: String,
    pub binary: PathBuf,
    pub app_port: Option<u16>,
    pub environment: BTreeMap<String, String>,
    pub sidecar: Option<DaprSidecar>,
}

impl ProjectResource {
    pub fn new(name: impl Into<String>, binary: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            binary: binary.into(),
            app_port: None,
            environment: BTreeMap::new(),
            sidecar: None,
        }
    }

    pub fn with_app_port(mut self, port: u16) -> Self {
        self.app_port = Some(port);
        self.environment
            .insert("APP_PORT".to_string(), port.to_string());
        self
    }

    /// Attaches a sidecar; the app learns its port through `DAPR_HTTP_PORT`.
    pub fn with_dapr_sidecar(mut self, sidecar: DaprSidecar) -> Self {
        self.environment
            .insert("DAPR_HTTP_PORT".to_string(), sidecar.http_port.to_string());
        self.sidecar = Some(sidecar);
        self
    }

    pub fn with_environment(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    /// Environment of the `dapr run` process: the sidecar's variables, then the app's
    /// on top. Both the sidecar and the app inherit it.
    pub fn launch_environment(&self) -> BTreeMap<String, String> {
        let mut env = self
            .sidecar
            .as_ref()
            .map(|s| s.environment.clone())
            .unwrap_or_default();
        env.extend(self.environment.clone());
        env
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaprSidecar {
    pub http_port: u16,
    pub environment: BTreeMap<String, String>,
}

impl DaprSidecar {
    pub fn new(http_port: u16) -> Self {
        Self {
            http_port,
            environment: BTreeMap::new(),
        }
    }

    pub fn with_environment(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }
}

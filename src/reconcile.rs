//! One reconciliation pass: validate, resolve, dispatch, classify.
//!
//! Every precondition is checked before the first backend call, and every
//! state runs exactly one mutating invocation at most. Nothing is retried.

use crate::backend::Backend;
use crate::config::Settings;
use crate::dispatch::{DesiredState, Invocation};
use crate::error::StateError;
use crate::identity::{self, Identity};
use crate::manifest;
use crate::outcome::{self, Outcome};
use crate::request::Request;
use crate::snapshot::Snapshot;

pub struct Reconciler<'a, B> {
    backend: &'a B,
    settings: &'a Settings,
}

impl<'a, B: Backend> Reconciler<'a, B> {
    pub fn new(backend: &'a B, settings: &'a Settings) -> Self {
        Self { backend, settings }
    }

    pub async fn reconcile(&self, request: &Request) -> Result<Outcome, StateError> {
        tracing::debug!(state = %request.state, "reconciling");
        let outcome = match request.state {
            DesiredState::Present => self.ensure_present(request).await?,
            DesiredState::Updated => self.ensure_updated(request).await?,
            DesiredState::Absent
            | DesiredState::Started
            | DesiredState::Stopped
            | DesiredState::Rebooted => self.ensure_lifecycle(request).await?,
        };
        tracing::info!(state = %request.state, changed = outcome.changed, "reconciled");
        Ok(outcome)
    }

    // ── present ──────────────────────────────────────────

    async fn ensure_present(&self, request: &Request) -> Result<Outcome, StateError> {
        let manifest = manifest::load(request.manifest_path()?)?;
        if request.identifier.is_some() || request.alias.is_some() {
            tracing::warn!("uuid/alias are ignored for state 'present'; the manifest alias is used");
        }

        let invocation = Invocation::Create {
            manifest: manifest.path.clone(),
        };
        let args = invocation.args();
        let command = self.backend.render(&args);

        if let Some(existing) = identity::lookup(self.backend, &manifest.alias).await? {
            tracing::info!(alias = %manifest.alias, id = %existing, "VM already exists, skipping create");
            return outcome::classify_create(&command, None);
        }

        tracing::info!(%command, "dispatching");
        let output = self.backend.run(&args).await?;
        outcome::classify_create(&command, Some(&output))
    }

    // ── start / stop / reboot / destroy ──────────────────

    async fn ensure_lifecycle(&self, request: &Request) -> Result<Outcome, StateError> {
        let target = request.identity()?;
        let verb = request.state.verb();
        if request.force && !verb.accepts_force() {
            tracing::debug!(state = %request.state, "force has no effect");
        }

        let id = self.resolve(&target).await?;
        let invocation = Invocation::lifecycle(verb, &id, request.force);
        let args = invocation.args();
        let command = self.backend.render(&args);

        tracing::info!(verb = invocation.verb().as_str(), %command, "dispatching");
        let output = self.backend.run(&args).await?;
        outcome::classify_lifecycle(&command, &output, &self.settings.success_marker)
    }

    // ── update ───────────────────────────────────────────

    async fn ensure_updated(&self, request: &Request) -> Result<Outcome, StateError> {
        let target = request.identity()?;
        let payload = request.update_payload()?;

        let id = self.resolve(&target).await?;
        let volatile = self.settings.volatile_fields();
        let before = Snapshot::take(self.backend, &id, &volatile).await?;

        let invocation = Invocation::Update {
            id: id.clone(),
            payload,
        };
        let args = invocation.args();
        let command = self.backend.render(&args);

        tracing::info!(%command, "dispatching");
        let output = self.backend.run(&args).await?;
        outcome::ensure_success(&command, &output)?;

        let after = Snapshot::take(self.backend, &id, &volatile).await?;
        tracing::debug!(before = before.hash(), after = after.hash(), "compared snapshots");
        Ok(outcome::classify_update(&output, &before, &after))
    }

    async fn resolve(&self, target: &Identity) -> Result<String, StateError> {
        identity::resolve(self.backend, target).await
    }
}

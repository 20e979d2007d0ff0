//! Lint registry.
//!
//! Registration happens on a [`RegistryBuilder`] in an explicit build step
//! the caller controls. The resulting [`Registry`] is immutable; filtering
//! produces sub-registries that share lint instances and configuration
//! with their parent. Iteration is always name-sorted, independent of
//! registration order.

pub mod filter;

pub use filter::FilterOptions;

use crate::config::ConfigStore;
use crate::error::RegistryError;
use crate::lint::{Lint, LintMetadata, Source};
use crate::target::{ObjectKind, ObjectModel};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// A lint implementation, tagged by the object kind it accepts.
pub enum LintImpl<M: ObjectModel> {
    Certificate(Arc<dyn Lint<M::Certificate>>),
    RevocationList(Arc<dyn Lint<M::RevocationList>>),
    OcspResponse(Arc<dyn Lint<M::OcspResponse>>),
}

impl<M: ObjectModel> LintImpl<M> {
    pub fn kind(&self) -> ObjectKind {
        match self {
            LintImpl::Certificate(_) => ObjectKind::Certificate,
            LintImpl::RevocationList(_) => ObjectKind::RevocationList,
            LintImpl::OcspResponse(_) => ObjectKind::OcspResponse,
        }
    }
}

impl<M: ObjectModel> Clone for LintImpl<M> {
    fn clone(&self) -> Self {
        match self {
            LintImpl::Certificate(l) => LintImpl::Certificate(Arc::clone(l)),
            LintImpl::RevocationList(l) => LintImpl::RevocationList(Arc::clone(l)),
            LintImpl::OcspResponse(l) => LintImpl::OcspResponse(Arc::clone(l)),
        }
    }
}

/// A lint together with its metadata, as held by a registry.
pub struct RegisteredLint<M: ObjectModel> {
    metadata: Arc<LintMetadata>,
    lint: LintImpl<M>,
}

impl<M: ObjectModel> RegisteredLint<M> {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn kind(&self) -> ObjectKind {
        self.lint.kind()
    }

    pub fn metadata(&self) -> &Arc<LintMetadata> {
        &self.metadata
    }

    pub fn implementation(&self) -> &LintImpl<M> {
        &self.lint
    }

    pub fn as_certificate_lint(&self) -> Option<&Arc<dyn Lint<M::Certificate>>> {
        match &self.lint {
            LintImpl::Certificate(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_revocation_list_lint(&self) -> Option<&Arc<dyn Lint<M::RevocationList>>> {
        match &self.lint {
            LintImpl::RevocationList(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_ocsp_response_lint(&self) -> Option<&Arc<dyn Lint<M::OcspResponse>>> {
        match &self.lint {
            LintImpl::OcspResponse(l) => Some(l),
            _ => None,
        }
    }
}

impl<M: ObjectModel> Clone for RegisteredLint<M> {
    fn clone(&self) -> Self {
        Self {
            metadata: Arc::clone(&self.metadata),
            lint: self.lint.clone(),
        }
    }
}

impl<M: ObjectModel> std::fmt::Debug for RegisteredLint<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredLint")
            .field("name", &self.metadata.name)
            .field("kind", &self.kind())
            .finish()
    }
}

/// Collects lints, rejecting duplicates and incomplete metadata.
pub struct RegistryBuilder<M: ObjectModel> {
    lints: BTreeMap<String, RegisteredLint<M>>,
    config: ConfigStore,
}

impl<M: ObjectModel> std::fmt::Debug for RegistryBuilder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("lints", &self.lints.keys().collect::<Vec<_>>())
            .field("config_tables", &self.config.table_names().count())
            .finish()
    }
}

impl<M: ObjectModel> Default for RegistryBuilder<M> {
    fn default() -> Self {
        Self {
            lints: BTreeMap::new(),
            config: ConfigStore::default(),
        }
    }
}

impl<M: ObjectModel> RegistryBuilder<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_certificate_lint<L>(
        &mut self,
        metadata: impl Into<LintMetadata>,
        lint: L,
    ) -> Result<&mut Self, RegistryError>
    where
        L: Lint<M::Certificate> + 'static,
    {
        self.insert(metadata.into(), LintImpl::Certificate(Arc::new(lint)))
    }

    pub fn register_revocation_list_lint<L>(
        &mut self,
        metadata: impl Into<LintMetadata>,
        lint: L,
    ) -> Result<&mut Self, RegistryError>
    where
        L: Lint<M::RevocationList> + 'static,
    {
        self.insert(metadata.into(), LintImpl::RevocationList(Arc::new(lint)))
    }

    pub fn register_ocsp_response_lint<L>(
        &mut self,
        metadata: impl Into<LintMetadata>,
        lint: L,
    ) -> Result<&mut Self, RegistryError>
    where
        L: Lint<M::OcspResponse> + 'static,
    {
        self.insert(metadata.into(), LintImpl::OcspResponse(Arc::new(lint)))
    }

    /// Register an already tagged implementation.
    pub fn register(
        &mut self,
        metadata: impl Into<LintMetadata>,
        lint: LintImpl<M>,
    ) -> Result<&mut Self, RegistryError> {
        self.insert(metadata.into(), lint)
    }

    fn insert(
        &mut self,
        mut metadata: LintMetadata,
        lint: LintImpl<M>,
    ) -> Result<&mut Self, RegistryError> {
        let kind = lint.kind();
        metadata
            .validate()
            .map_err(|reason| RegistryError::InvalidLint {
                name: metadata.name.clone(),
                reason,
            })?;

        match metadata.kind {
            Some(declared) if declared != kind => {
                return Err(RegistryError::InvalidLint {
                    name: metadata.name.clone(),
                    reason: format!("declared for {} but registered as a {} lint", declared, kind),
                });
            }
            _ => metadata.kind = Some(kind),
        }

        if let Some(existing) = self.lints.get(&metadata.name) {
            return Err(RegistryError::DuplicateName {
                name: metadata.name,
                existing: existing.kind(),
                new: kind,
            });
        }

        tracing::trace!(lint = %metadata.name, kind = %kind, "Registered lint");
        self.lints.insert(
            metadata.name.clone(),
            RegisteredLint {
                metadata: Arc::new(metadata),
                lint,
            },
        );
        Ok(self)
    }

    pub fn with_config(mut self, config: ConfigStore) -> Self {
        self.config = config;
        self
    }

    pub fn set_config(&mut self, config: ConfigStore) -> &mut Self {
        self.config = config;
        self
    }

    pub fn len(&self) -> usize {
        self.lints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lints.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lints.contains_key(name)
    }

    pub fn build(self) -> Registry<M> {
        let universe = Arc::new(self.lints.keys().cloned().collect());
        Registry {
            lints: self.lints,
            config: Arc::new(self.config),
            universe,
        }
    }
}

/// Immutable catalogue of lints plus the configuration they run with.
pub struct Registry<M: ObjectModel> {
    lints: BTreeMap<String, RegisteredLint<M>>,
    config: Arc<ConfigStore>,
    /// Every name registered in the root registry this one derives from.
    /// Name filters are validated against it so a typo fails loudly even
    /// after other filters have narrowed this view.
    universe: Arc<BTreeSet<String>>,
}

impl<M: ObjectModel> Clone for Registry<M> {
    fn clone(&self) -> Self {
        Self {
            lints: self.lints.clone(),
            config: Arc::clone(&self.config),
            universe: Arc::clone(&self.universe),
        }
    }
}

impl<M: ObjectModel> std::fmt::Debug for Registry<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("lints", &self.lints.keys().collect::<Vec<_>>())
            .field("config_tables", &self.config.table_names().count())
            .finish()
    }
}

impl<M: ObjectModel> Registry<M> {
    pub fn builder() -> RegistryBuilder<M> {
        RegistryBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.lints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lints.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Result<&RegisteredLint<M>, RegistryError> {
        self.lints.get(name).ok_or_else(|| RegistryError::NotFound {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lints.contains_key(name)
    }

    /// All lint names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lints.keys().map(String::as_str)
    }

    /// All lints, sorted by name.
    pub fn lints(&self) -> impl Iterator<Item = &RegisteredLint<M>> {
        self.lints.values()
    }

    /// Lints affined to `kind`, sorted by name.
    pub fn lints_for(&self, kind: ObjectKind) -> impl Iterator<Item = &RegisteredLint<M>> {
        self.lints.values().filter(move |l| l.kind() == kind)
    }

    pub fn count_for(&self, kind: ObjectKind) -> usize {
        self.lints_for(kind).count()
    }

    /// Sources present in this registry.
    pub fn sources(&self) -> BTreeSet<Source> {
        self.lints
            .values()
            .map(|l| l.metadata.source.clone())
            .collect()
    }

    pub fn configuration(&self) -> &ConfigStore {
        &self.config
    }

    /// Same lints, different configuration.
    pub fn with_configuration(&self, config: ConfigStore) -> Self {
        Self {
            lints: self.lints.clone(),
            config: Arc::new(config),
            universe: Arc::clone(&self.universe),
        }
    }

    /// Sub-registry of the lints whose metadata satisfies `predicate`.
    pub fn filter_by<P>(&self, predicate: P) -> Self
    where
        P: Fn(&LintMetadata) -> bool,
    {
        let lints = self
            .lints
            .iter()
            .filter(|(_, l)| predicate(&l.metadata))
            .map(|(name, l)| (name.clone(), l.clone()))
            .collect();
        Self {
            lints,
            config: Arc::clone(&self.config),
            universe: Arc::clone(&self.universe),
        }
    }

    /// Sub-registry selected by `options`. All criteria must hold.
    pub fn filter(&self, options: &FilterOptions) -> Result<Self, RegistryError> {
        let unknown: Vec<String> = options
            .include_names
            .iter()
            .chain(options.exclude_names.iter())
            .filter(|name| !self.universe.contains(name.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(RegistryError::UnknownNames { names: unknown });
        }

        let predicate = options.compile()?;
        let filtered = self.filter_by(|md| predicate.matches(md));
        tracing::debug!(
            before = self.len(),
            after = filtered.len(),
            "Filtered lint registry"
        );
        Ok(filtered)
    }
}

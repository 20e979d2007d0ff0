//! Built-in lints.
//!
//! A representative set covering each object kind. Names follow the usual
//! severity prefix convention (`e_`, `w_`, `n_`).

pub mod certificate;
pub mod crl;
pub mod ocsp;

use crate::model::X509;
use certlint_core::{ConfigStore, Registry, RegistryBuilder, RegistryError};

/// Register every built-in lint on `builder`.
pub fn register_builtin(builder: &mut RegistryBuilder<X509>) -> Result<(), RegistryError> {
    builder
        .register_certificate_lint(
            certificate::ExtensionsRequireV3::metadata(),
            certificate::ExtensionsRequireV3,
        )?
        .register_certificate_lint(
            certificate::SerialNumberNotPositive::metadata(),
            certificate::SerialNumberNotPositive,
        )?
        .register_certificate_lint(
            certificate::ValidityPeriodTooLong::metadata(),
            certificate::ValidityPeriodTooLong,
        )?
        .register_revocation_list_lint(crl::NextUpdateMissing::metadata(), crl::NextUpdateMissing)?
        .register_revocation_list_lint(
            crl::NextUpdateBeforeThisUpdate::metadata(),
            crl::NextUpdateBeforeThisUpdate,
        )?
        .register_ocsp_response_lint(
            ocsp::WithoutSingleResponses::metadata(),
            ocsp::WithoutSingleResponses,
        )?;
    Ok(())
}

/// All built-in lints with an empty configuration.
pub fn builtin_registry() -> Result<Registry<X509>, RegistryError> {
    builtin_registry_with(ConfigStore::default())
}

pub fn builtin_registry_with(config: ConfigStore) -> Result<Registry<X509>, RegistryError> {
    let mut builder = RegistryBuilder::new().with_config(config);
    register_builtin(&mut builder)?;
    let registry = builder.build();
    tracing::debug!(lints = registry.len(), "Built-in lint registry ready");
    Ok(registry)
}

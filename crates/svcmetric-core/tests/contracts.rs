//! Method identity, metadata, and error surface.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashSet;

use svcmetric_core::{ConfigurationError, ErrorCode, InterceptError, MethodIdentity, MethodMeta};

const FOO: MethodIdentity = MethodIdentity::new("OrderService", "fn foo(&self) -> u32");

#[test]
fn identity_is_a_value_key() {
    let mut seen = HashSet::new();
    seen.insert(FOO);
    seen.insert(MethodIdentity::new("OrderService", "fn foo(&self) -> u32"));
    seen.insert(MethodIdentity::new("OrderService", "fn bar(&self)"));
    assert_eq!(seen.len(), 2);
    assert_eq!(FOO.to_string(), "OrderService::fn foo(&self) -> u32");
}

#[test]
fn meta_carries_optional_metric() {
    assert_eq!(MethodMeta::with_metric(FOO, "svc.foo").metric_name(), Some("svc.foo"));
    assert_eq!(MethodMeta::new(FOO).metric_name(), None);
}

#[test]
fn configuration_errors_have_stable_codes() {
    let missing = ConfigurationError::MissingMetadata { method: FOO };
    assert_eq!(missing.code().as_str(), "MISSING_METADATA");
    assert!(missing.to_string().contains("OrderService::fn foo"));

    let unknown = ConfigurationError::UnknownMetric { name: "svc.nope".into() };
    assert_eq!(unknown.code(), ErrorCode::UnknownMetric);
    assert_eq!(unknown.to_string(), "metric \"svc.nope\" is not registered");
}

#[test]
fn intercept_error_keeps_delegate_payload() {
    let err: InterceptError<std::io::Error> =
        InterceptError::Delegate(std::io::Error::new(std::io::ErrorKind::TimedOut, "slow disk"));
    assert!(!err.is_configuration());
    assert_eq!(err.to_string(), "slow disk");
    let inner = err.into_delegate().unwrap();
    assert_eq!(inner.kind(), std::io::ErrorKind::TimedOut);

    let cfg: InterceptError<std::io::Error> = ConfigurationError::MissingMetadata { method: FOO }.into();
    assert!(cfg.is_configuration());
    assert!(cfg.into_delegate().is_none());
}

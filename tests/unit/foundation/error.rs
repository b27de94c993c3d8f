use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RelingoError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        RelingoError::unsupported_container("x")
            .to_string()
            .contains("unsupported container:")
    );
    assert!(
        RelingoError::configuration("x")
            .to_string()
            .contains("configuration error:")
    );
    assert_eq!(
        RelingoError::service("translate", "bad json").to_string(),
        "translate failed: bad json"
    );
}

#[test]
fn abort_is_distinguishable_from_failures() {
    assert!(RelingoError::Aborted.is_abort());
    assert!(!RelingoError::encode("x").is_abort());
    assert!(!RelingoError::decode("x").is_abort());
}

#[test]
fn into_service_tags_foreign_errors_only() {
    let tagged = RelingoError::decode("garbled").into_service("transcribe");
    match tagged {
        RelingoError::Service { operation, message } => {
            assert_eq!(operation, "transcribe");
            assert!(message.contains("garbled"));
        }
        other => panic!("unexpected {other:?}"),
    }

    let cfg = RelingoError::configuration("no key").into_service("transcribe");
    assert!(matches!(cfg, RelingoError::Configuration(_)));
    assert!(RelingoError::Aborted.into_service("transcribe").is_abort());
}

#[test]
fn into_service_retags_collaborator_operation() {
    match RelingoError::service("upstream", "quota").into_service("transcribe") {
        RelingoError::Service { operation, message } => {
            assert_eq!(operation, "transcribe");
            assert_eq!(message, "upstream: quota");
        }
        other => panic!("unexpected {other:?}"),
    }

    match RelingoError::service("translate", "bad json").into_service("translate") {
        RelingoError::Service { operation, message } => {
            assert_eq!(operation, "translate");
            assert_eq!(message, "bad json");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RelingoError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

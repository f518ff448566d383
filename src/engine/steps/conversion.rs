//! Subject normalization before comparison.
//!
//! When both sides have different but convertible kinds, the subject is
//! replaced by a lossless conversion onto the expectation's kind. A failed
//! conversion leaves the subject untouched and later steps see the original
//! pair.

use tracing::trace;

use crate::engine::comparands::Comparands;
use crate::engine::options::{AutoConversion, EquivalencyOptions};
use crate::types::numeric::{convert_numeric, parse_as};

pub(super) fn handle(options: &EquivalencyOptions, comparands: &mut Comparands<'_>) {
    let target = comparands.expectation().kind();
    let subject = comparands.subject();
    let from = subject.kind();
    if from == target {
        return;
    }

    let converted = match options.settings().auto_conversion {
        AutoConversion::Disabled => None,
        AutoConversion::Numeric => convert_numeric(subject, target),
        AutoConversion::Lenient => convert_numeric(subject, target)
            .or_else(|| subject.as_str().and_then(|text| parse_as(text, target))),
    };

    if let Some(converted) = converted {
        trace!(from = ?from, to = ?target, "subject_converted");
        comparands.convert_subject(converted);
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::engine::{AutoConversion, EquivalencyEngine, EquivalencyOptions, FailureKind};
    use crate::types::Value;

    fn engine(conversion: AutoConversion) -> EquivalencyEngine {
        EquivalencyEngine::new(
            EquivalencyOptions::builder()
                .auto_conversion(conversion)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_numeric_widening() {
        let engine = engine(AutoConversion::Numeric);
        assert!(engine.compare(&3i32, &3.0f64).unwrap().is_proven());
        assert!(engine.compare(&3u8, &3i64).unwrap().is_proven());
        assert!(engine
            .compare(&0.1f64, &Decimal::new(1, 1))
            .unwrap()
            .is_proven());
    }

    #[test]
    fn test_lossy_conversion_is_refused() {
        let engine = engine(AutoConversion::Numeric);
        let result = engine.compare(&2.5f64, &2i64).unwrap();
        assert_eq!(result.first_failure().unwrap().kind, FailureKind::ValueMismatch);

        let result = engine.compare(&-1i64, &1u64).unwrap();
        assert!(!result.is_proven());
    }

    #[test]
    fn test_disabled_conversion() {
        let engine = engine(AutoConversion::Disabled);
        let result = engine.compare(&3i32, &3.0f64).unwrap();
        assert!(!result.is_proven());
    }

    #[test]
    fn test_lenient_parses_strings() {
        let engine = engine(AutoConversion::Lenient);
        assert!(engine.compare("42", &42i64).unwrap().is_proven());
        assert!(engine.compare("true", &true).unwrap().is_proven());

        // Numbers are never turned into strings
        let result = engine.compare(&42i64, "42").unwrap();
        assert_eq!(result.first_failure().unwrap().kind, FailureKind::TypeMismatch);

        let numeric = self::engine(AutoConversion::Numeric);
        assert!(!numeric.compare(&Value::str("42"), &42i64).unwrap().is_proven());
    }
}

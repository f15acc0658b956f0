use error_stack::Report;
use serde::Serialize;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Error)]
#[error("Invalid given data occurred")]
pub struct Wrapper;

/// Per-field validation messages, attached to every report made by
/// [`IntoValidatorReport`] so they can be handed back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMessages(pub Vec<FieldMessage>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMessage {
    pub field: String,
    pub message: String,
}

pub trait IntoValidatorReport<T> {
    fn into_validator_report(self) -> error_stack::Result<T, Wrapper>;
}

impl<T> IntoValidatorReport<T> for Result<T, ValidationErrors> {
    fn into_validator_report(self) -> error_stack::Result<T, Wrapper> {
        self.map_err(|errors| {
            let messages = field_messages(&errors);
            let report = messages
                .iter()
                .fold(Report::new(Wrapper), |report, (field, message)| {
                    report.attach_printable(format!("{field}: {message}"))
                });

            report.attach(FieldMessages(
                messages
                    .into_iter()
                    .map(|(field, message)| FieldMessage { field, message })
                    .collect(),
            ))
        })
    }
}

/// Flattens validation errors into `(field path, message)` pairs.
/// Nested fields are joined with dots, list items by their index.
#[must_use]
pub fn field_messages(errors: &ValidationErrors) -> Vec<(String, String)> {
    fn read_errors(
        errors: &ValidationErrors,
        fields_queue: &mut Vec<String>,
        output: &mut Vec<(String, String)>,
    ) {
        for (field, kind) in errors.errors() {
            fields_queue.push(field.to_string());
            match kind {
                ValidationErrorsKind::Struct(inner) => read_errors(inner, fields_queue, output),
                ValidationErrorsKind::List(items) => {
                    for (index, inner) in items {
                        fields_queue.push(index.to_string());
                        read_errors(inner, fields_queue, output);
                        fields_queue.pop();
                    }
                }
                ValidationErrorsKind::Field(list) => {
                    let field_str = fields_queue.join(".");
                    for error in list {
                        output.push((field_str.clone(), describe(error)));
                    }
                }
            }
            fields_queue.pop();
        }
    }

    let mut output = Vec::new();
    read_errors(errors, &mut Vec::new(), &mut output);
    output.sort();
    output
}

fn describe(error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map_or_else(|| error.code.to_string(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Inner {
        #[validate(length(min = 3, message = "too short"))]
        name: String,
    }

    #[derive(Validate)]
    struct Outer {
        #[validate(nested)]
        inner: Inner,
        #[validate(range(min = 1))]
        amount: u32,
    }

    #[test]
    fn test_field_messages() {
        let value = Outer {
            inner: Inner { name: "ab".into() },
            amount: 0,
        };

        let errors = value.validate().unwrap_err();
        let messages = field_messages(&errors);
        assert_eq!(
            messages,
            vec![
                ("amount".to_string(), "range".to_string()),
                ("inner.name".to_string(), "too short".to_string()),
            ]
        );
    }

    #[test]
    fn test_into_validator_report() {
        let value = Inner { name: "x".into() };
        let report = value.validate().into_validator_report().unwrap_err();
        assert!(format!("{report:?}").contains("name: too short"));

        let messages = report.downcast_ref::<FieldMessages>().unwrap();
        assert_eq!(
            messages.0,
            vec![FieldMessage {
                field: "name".into(),
                message: "too short".into(),
            }]
        );
    }
}

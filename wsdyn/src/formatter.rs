use colored::*;
use serde::Serialize;
use std::fmt::Display;
use wsdyn_core::{
    ComplexType, InvokeError, LookupError, OperationDescriptor, ParameterDescriptor, ParseError,
    ServiceDescriptor, TypeRef,
};

/// A wrapper struct for a formatted, colored string.
///
/// Implements `Display` so it can be printed directly.
pub struct FormattedString(pub String);

pub struct ServiceList(pub Vec<String>);

pub struct OperationList(pub String, pub Vec<String>);

pub struct GenericError<T: Display>(pub &'static str, pub T);

/// Model data printed as pretty JSON.
pub struct Json<T: Serialize>(pub T);

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.0)?;
        Ok(())
    }
}

impl From<serde_json::Value> for FormattedString {
    fn from(value: serde_json::Value) -> Self {
        FormattedString(serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()))
    }
}

impl<T: Serialize> From<Json<T>> for FormattedString {
    fn from(Json(value): Json<T>) -> Self {
        match serde_json::to_string_pretty(&value) {
            Ok(json) => FormattedString(json),
            Err(err) => GenericError("Failed to serialize", err).into(),
        }
    }
}

impl From<anyhow::Error> for FormattedString {
    fn from(err: anyhow::Error) -> Self {
        FormattedString(format!(
            "{}\n\n'{:#}'",
            "Failed to load description:".red().bold(),
            err
        ))
    }
}

impl From<ParseError> for FormattedString {
    fn from(err: ParseError) -> Self {
        FormattedString(format!(
            "{}\n\n'{}'",
            "Failed to parse description:".red().bold(),
            err
        ))
    }
}

impl From<LookupError> for FormattedString {
    fn from(err: LookupError) -> Self {
        FormattedString(format!("{}\n\n'{}'", "Lookup Failed:".red().bold(), err))
    }
}

impl From<InvokeError> for FormattedString {
    fn from(err: InvokeError) -> Self {
        let title = match &err {
            InvokeError::Transport(_) => "Remote Call Failed:",
            _ => "Call Failed:",
        };

        FormattedString(format!("{}\n\n'{}'", title.red().bold(), err))
    }
}

impl<T: Display> From<GenericError<T>> for FormattedString {
    fn from(GenericError(msg, err): GenericError<T>) -> Self {
        FormattedString(format!("{}:\n\n'{}'", msg.red().bold(), err))
    }
}

impl From<ServiceList> for FormattedString {
    fn from(ServiceList(services): ServiceList) -> Self {
        if services.is_empty() {
            return FormattedString("No services found.".yellow().to_string());
        }

        let mut out = String::new();
        out.push_str("Available Services:\n");
        for svc in services {
            out.push_str(&format!("  - {}\n", svc.green()));
        }
        FormattedString(out.trim_end().to_string())
    }
}

impl From<OperationList> for FormattedString {
    fn from(OperationList(service, operations): OperationList) -> Self {
        if operations.is_empty() {
            return FormattedString(
                format!("No operations found in '{service}'.")
                    .yellow()
                    .to_string(),
            );
        }

        let mut out = format!("Operations of {}:\n", service.green());
        for op in operations {
            out.push_str(&format!("  - {}\n", op.green()));
        }
        FormattedString(out.trim_end().to_string())
    }
}

fn type_name(type_ref: &TypeRef) -> ColoredString {
    type_ref.to_string().yellow()
}

fn parameter(param: &ParameterDescriptor) -> String {
    let marker = if param.optional { "?" } else { "" };
    format!("{}{}: {}", param.name, marker, type_name(&param.type_ref))
}

impl From<&ServiceDescriptor> for FormattedString {
    fn from(service: &ServiceDescriptor) -> Self {
        let mut out = String::new();
        out.push_str(&format!(
            "{} {} {{\n",
            "service".cyan(),
            service.name.green()
        ));

        if let Some(endpoint) = &service.endpoint {
            out.push_str(&format!("  // {endpoint}\n"));
        }

        for op in &service.operations {
            out.push_str("  ");
            // Reuse the From<&OperationDescriptor> implementation
            out.push_str(&FormattedString::from(op).0);
            out.push_str("\n\n");
        }
        out.push('}');
        FormattedString(out)
    }
}

impl From<&OperationDescriptor> for FormattedString {
    fn from(op: &OperationDescriptor) -> Self {
        let params = op
            .parameters
            .iter()
            .map(parameter)
            .collect::<Vec<_>>()
            .join(", ");

        FormattedString(format!(
            "{} {}({}) {} {};",
            "operation".cyan(),
            op.name.green(),
            params,
            "returns".cyan(),
            type_name(&op.return_type)
        ))
    }
}

impl From<&ComplexType> for FormattedString {
    fn from(complex: &ComplexType) -> Self {
        let mut out = String::new();
        out.push_str(&format!("{} {} {{\n", "type".cyan(), complex.name.green()));

        for field in &complex.fields {
            out.push_str(&format!("  {};\n", parameter(field)));
        }
        out.push('}');
        FormattedString(out)
    }
}

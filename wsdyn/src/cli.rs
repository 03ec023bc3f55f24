//! # CLI
//!
//! This module defines the command-line interface of `wsdyn` using `clap`.
//!
//! It is responsible for parsing user input and performing validation (e.g., ensuring operations are
//! `Service/Operation` and arguments are a JSON array).
use clap::{Parser, Subcommand};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "wsdyn", version, about = "Dynamic SOAP CLI")]
pub struct Cli {
    /// The service description: a URL (e.g. http://localhost:8080/calculator.asmx?wsdl) or a file path
    pub description: String,

    /// Enable debug logs (`RUST_LOG` takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Invoke an operation
    ///
    /// Arguments are positional and must follow the declared parameter order.
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// wsdyn http://localhost:8080/calculator.asmx?wsdl call Calculator/Add --args '[2, 3]'
    /// ```
    Call {
        /// Operation (Service/Operation)
        #[arg(value_parser = parse_operation)]
        operation: (String, String),

        /// JSON array of positional arguments
        #[arg(long, value_parser = parse_args, default_value = "[]")]
        // Fully qualified so clap parses the whole array as one value.
        args: ::std::vec::Vec<serde_json::Value>,

        /// Send the request to this address instead of the one declared by the description
        #[arg(long)]
        endpoint: Option<String>,

        /// Request timeout in seconds
        #[arg(long, value_parser = parse_timeout)]
        timeout: Option<Duration>,
    },

    /// List available services or operations
    List {
        #[command(subcommand)]
        sub: ListCommands,
    },

    /// Describe a service, an operation or a type in detail
    Describe {
        /// Print the parsed model as JSON instead of a signature
        #[arg(long, global = true)]
        json: bool,

        #[command(subcommand)]
        sub: DescribeCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
    /// List all services declared by the description
    Services,
    /// List the operations of a service
    Operations {
        /// Service name (e.g. Calculator)
        service: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DescribeCommands {
    /// Describe a specific service (list its operations)
    Service {
        /// Service name (e.g. Calculator)
        service: String,
    },
    /// Describe a specific operation (show its signature)
    Operation {
        /// Operation (e.g. Calculator/Add)
        #[arg(value_parser = parse_operation)]
        operation: (String, String),
    },
    /// Describe a complex type (show its fields)
    Type {
        /// Type name (e.g. Person)
        name: String,
    },
}

fn parse_operation(value: &str) -> Result<(String, String), String> {
    let (service, operation) = value.split_once('/').ok_or_else(|| {
        format!("Invalid operation format: '{value}'. Expected 'Service/Operation'")
    })?;

    if service.trim().is_empty() || operation.trim().is_empty() {
        return Err("Service and Operation names cannot be empty".to_string());
    }

    Ok((service.to_string(), operation.to_string()))
}

fn parse_args(value: &str) -> Result<Vec<serde_json::Value>, String> {
    match serde_json::from_str(value) {
        Ok(serde_json::Value::Array(items)) => Ok(items),
        Ok(_) => Err("Arguments must be a JSON array, e.g. '[2, 3]'".to_string()),
        Err(e) => Err(format!("Invalid JSON: {e}")),
    }
}

fn parse_timeout(value: &str) -> Result<Duration, String> {
    let secs: f64 = value
        .parse()
        .map_err(|_| format!("Invalid timeout: '{value}'. Expected a number of seconds"))?;

    Duration::try_from_secs_f64(secs).map_err(|e| format!("Invalid timeout: {e}"))
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_operation() {
        assert_eq!(
            parse_operation("Calculator/Add").unwrap(),
            ("Calculator".to_string(), "Add".to_string())
        );
        assert!(parse_operation("Calculator").is_err());
        assert!(parse_operation("/Add").is_err());
        assert!(parse_operation("Calculator/ ").is_err());
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(parse_args("[2, 3]").unwrap(), vec![json!(2), json!(3)]);
        assert_eq!(parse_args("[]").unwrap(), Vec::<serde_json::Value>::new());
        assert!(parse_args(r#"{"a": 2}"#).is_err());
        assert!(parse_args("[2,").is_err());
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("1.5").unwrap(), Duration::from_millis(1500));
        assert!(parse_timeout("soon").is_err());
        assert!(parse_timeout("-1").is_err());
    }

    #[test]
    fn test_call_command() {
        let cli = Cli::try_parse_from([
            "wsdyn",
            "calculator.wsdl",
            "call",
            "Calculator/Add",
            "--args",
            "[2, 3]",
            "--timeout",
            "10",
        ])
        .unwrap();

        match cli.command {
            Commands::Call {
                operation,
                args,
                endpoint,
                timeout,
            } => {
                assert_eq!(operation.1, "Add");
                assert_eq!(args, vec![json!(2), json!(3)]);
                assert_eq!(endpoint, None);
                assert_eq!(timeout, Some(Duration::from_secs(10)));
            }
            other => panic!("Unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_describe_json_flag() {
        let cli = Cli::try_parse_from([
            "wsdyn",
            "directory.wsdl",
            "describe",
            "type",
            "Person",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Describe {
                json,
                sub: DescribeCommands::Type { name },
            } => {
                assert!(json);
                assert_eq!(name, "Person");
            }
            other => panic!("Unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["wsdyn", "calculator.wsdl", "list", "services", "-v"])
            .unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::List {
                sub: ListCommands::Services
            }
        ));
    }
}

//! # Wsdyn CLI Entry Point
//!
//! The main executable for the Wsdyn tool. This file drives the application lifecycle:
//!
//! 1. **Initialization**: Parses command-line arguments using [`cli::Cli`] and installs the logger.
//! 2. **Loading**: Fetches the service description and indexes it with `wsdyn_core`.
//! 3. **Execution**: Introspects the description or invokes an operation through a SOAP transport.
//! 4. **Presentation**: Formats and prints the resulting data or error to standard output/error.
mod cli;
mod description;
mod formatter;
mod logger;

use clap::Parser;
use cli::{Cli, Commands, DescribeCommands, ListCommands};
use formatter::{FormattedString, GenericError, Json, OperationList, ServiceList};
use std::process;
use std::time::Duration;
use wsdyn_core::client::Offline;
use wsdyn_core::{DynamicProxy, SoapHttpTransport};

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    logger::init_cli_logger(args.verbose);

    let proxy = load_or_exit(&args.description).await;

    match args.command {
        Commands::Call {
            operation,
            args,
            endpoint,
            timeout,
        } => {
            let (service, operation) = operation;
            run_call(proxy, &service, &operation, args, endpoint, timeout).await;
        }
        Commands::List { sub } => match sub {
            ListCommands::Services => {
                println!("{}", FormattedString::from(ServiceList(proxy.list_services())))
            }
            ListCommands::Operations { service } => list_operations(&proxy, &service),
        },
        Commands::Describe { json, sub } => match sub {
            DescribeCommands::Service { service } => describe_service(&proxy, &service, json),
            DescribeCommands::Operation { operation } => {
                let (service, operation) = operation;
                describe_operation(&proxy, &service, &operation, json)
            }
            DescribeCommands::Type { name } => describe_type(&proxy, &name, json),
        },
    }
}

fn exit_with(err: impl Into<FormattedString>) -> ! {
    eprintln!("{}", err.into());
    process::exit(1);
}

async fn load_or_exit(source: &str) -> DynamicProxy<Offline> {
    let bytes = match description::load(source).await {
        Ok(bytes) => bytes,
        Err(err) => exit_with(err),
    };

    match DynamicProxy::offline(&bytes) {
        Ok(proxy) => proxy,
        Err(err) => exit_with(err),
    }
}

fn list_operations(proxy: &DynamicProxy<Offline>, service: &str) {
    match proxy.list_operations(service) {
        Ok(operations) => println!(
            "{}",
            FormattedString::from(OperationList(service.to_string(), operations))
        ),
        Err(err) => exit_with(err),
    }
}

fn describe_service(proxy: &DynamicProxy<Offline>, service: &str, json: bool) {
    match proxy.service(service) {
        Ok(descriptor) if json => println!("{}", FormattedString::from(Json(descriptor))),
        Ok(descriptor) => println!("{}", FormattedString::from(descriptor)),
        Err(err) => exit_with(err),
    }
}

fn describe_operation(
    proxy: &DynamicProxy<Offline>,
    service: &str,
    operation: &str,
    json: bool,
) {
    match proxy.registry().lookup_operation(service, operation) {
        Ok(descriptor) if json => println!("{}", FormattedString::from(Json(descriptor))),
        Ok(descriptor) => println!("{}", FormattedString::from(descriptor)),
        Err(err) => exit_with(err),
    }
}

fn describe_type(proxy: &DynamicProxy<Offline>, name: &str, json: bool) {
    match proxy.complex_type(name) {
        Some(complex) if json => println!("{}", FormattedString::from(Json(complex))),
        Some(complex) => println!("{}", FormattedString::from(complex)),
        None => exit_with(GenericError("Type not found", name)),
    }
}

async fn run_call(
    proxy: DynamicProxy<Offline>,
    service: &str,
    operation: &str,
    args: Vec<serde_json::Value>,
    endpoint: Option<String>,
    timeout: Option<Duration>,
) {
    let mut transport = SoapHttpTransport::new();
    if let Some(endpoint) = endpoint {
        transport = transport.with_endpoint(endpoint);
    }
    if let Some(timeout) = timeout {
        transport = transport.with_timeout(timeout);
    }

    let proxy = proxy.with_transport(transport);

    match proxy.invoke(service, operation, args).await {
        Ok(value) => println!("{}", FormattedString::from(value)),
        Err(err) => exit_with(err),
    }
}

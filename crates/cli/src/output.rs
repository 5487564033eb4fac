use clap::ValueEnum;
use serde::Serialize;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Serialize)]
struct SuccessEnvelope<'a, T: Serialize> {
    status: &'static str,
    data: &'a T,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    status: &'static str,
    error: String,
}

pub fn print_success<T: Serialize>(data: &T) -> anyhow::Result<()> {
    let envelope = SuccessEnvelope {
        status: "success",
        data,
    };
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

/// Errors go to stderr; in JSON mode as an envelope, with the full cause chain.
pub fn print_error(format: OutputFormat, err: &anyhow::Error) {
    match format {
        OutputFormat::Json => {
            let envelope = ErrorEnvelope {
                status: "error",
                error: chain(err),
            };
            match serde_json::to_string_pretty(&envelope) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("Error: {}", envelope.error),
            }
        }
        OutputFormat::Text => eprintln!("Error: {}", chain(err)),
    }
}

fn chain(err: &anyhow::Error) -> String {
    err.chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}
